//! Demo session against in-memory data
//!
//! `plume demo` loads a profile and a post detail stream from a bundled
//! fixture, then replays a few user actions and prints every update the
//! stream reports.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::api::{Page, ResponseConfig, StreamSource};
use crate::config::Config;
use crate::error::{self, SourceError};
use crate::generators::{PostDetailGenerator, ProfileGenerator};
use crate::models::{Comment, Love, Payload, Post, RelationshipPriority, Shared, User, shared};
use crate::store::ModelStore;
use crate::stream::{
    CellItem, CellKind, ContentChange, NoPrefetch, StreamCommand, StreamController,
    StreamDataSource, StreamKind, StreamUpdate, TextSizeCalculator,
};

const FIXTURE: &str = r#"{
  "users": [
    { "id": "me", "username": "plume", "name": "Plume Demo", "relationship": "me" },
    { "id": "ann", "username": "ann", "name": "Ann Example", "relationship": "following", "posts_count": 3 },
    { "id": "bob", "username": "bob", "name": "Bob Sample" },
    { "id": "cat", "username": "cat", "name": "Cat Placeholder", "relationship": "following" }
  ],
  "posts": [
    {
      "id": "p1", "token": "first", "author_id": "ann", "created_at": "2024-05-01T12:00:00Z",
      "content": [
        { "kind": "text", "content": "<p>Spring is here &amp; so are the <b>tulips</b>.</p>" },
        { "kind": "image", "url": "https://example.com/tulips.jpg", "width": 1200, "height": 900 }
      ],
      "loves_count": 2, "comments_count": 3
    },
    {
      "id": "p2", "token": "second", "author_id": "ann", "created_at": "2024-05-02T08:30:00Z",
      "content": [{ "kind": "text", "content": "<p>Trip report coming soon.</p>" }],
      "content_warning": "long read"
    },
    {
      "id": "p3", "token": "third", "author_id": "ann", "created_at": "2024-05-03T18:45:00Z",
      "content": [{ "kind": "embed", "url": "https://example.com/video" }]
    },
    {
      "id": "p4", "token": "fourth", "author_id": "cat", "repost_author_id": "ann",
      "created_at": "2024-05-04T10:00:00Z",
      "content": [{ "kind": "text", "content": "<p>Reposting this gem.</p>" }]
    }
  ],
  "comments": [
    { "id": "c1", "author_id": "bob", "post_id": "p1", "loaded_from_post_id": "p1",
      "content": "<p>Lovely!</p>", "created_at": "2024-05-01T12:10:00Z" },
    { "id": "c2", "author_id": "cat", "post_id": "p1", "loaded_from_post_id": "p1",
      "content": "<p>Where was this taken?</p>", "created_at": "2024-05-01T12:20:00Z" },
    { "id": "c3", "author_id": "bob", "post_id": "p1", "loaded_from_post_id": "p1",
      "content": "<p>Going there next week.</p>", "created_at": "2024-05-01T13:00:00Z" }
  ],
  "loves": [
    { "post_id": "p1", "user_id": "bob" },
    { "post_id": "p1", "user_id": "cat" }
  ],
  "reposts": [
    { "post_id": "p1", "user_id": "cat" }
  ]
}"#;

#[derive(Debug, Deserialize)]
struct Fixture {
    users: Vec<User>,
    posts: Vec<Post>,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    loves: Vec<Edge>,
    #[serde(default)]
    reposts: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    post_id: String,
    user_id: String,
}

/// A [`StreamSource`] serving fixture data
pub struct InMemorySource {
    store: ModelStore,
    posts: Vec<Shared<Post>>,
    comments: Vec<Shared<Comment>>,
    loves: HashMap<String, Vec<String>>,
    reposts: HashMap<String, Vec<String>>,
    page_size: usize,
    comments_page_size: usize,
}

impl InMemorySource {
    /// Build from fixture JSON
    pub fn from_json(json: &str, config: &Config) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json).context("Failed to parse demo fixture")?;
        let mut store = ModelStore::new();

        for user in fixture.users {
            store.save_user(&shared(user));
        }
        let posts: Vec<Shared<Post>> = fixture
            .posts
            .into_iter()
            .map(|post| store.save_post(&shared(post)))
            .collect();
        let comments: Vec<Shared<Comment>> = fixture
            .comments
            .into_iter()
            .map(|comment| {
                let comment = shared(comment);
                store.link_comment(&comment);
                comment
            })
            .collect();

        Ok(Self {
            store,
            posts,
            comments,
            loves: group_edges(fixture.loves),
            reposts: group_edges(fixture.reposts),
            page_size: config.page_size.max(1),
            comments_page_size: config.comments_page_size.max(1),
        })
    }

    /// The bundled fixture
    pub fn demo(config: &Config) -> Result<Self> {
        Self::from_json(FIXTURE, config)
    }

    /// Loaded users and posts
    pub const fn store(&self) -> &ModelStore {
        &self.store
    }

    fn users(&self, ids: Option<&Vec<String>>) -> Vec<Shared<User>> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.store.user(id))
            .collect()
    }
}

fn group_edges(edges: Vec<Edge>) -> HashMap<String, Vec<String>> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for edge in edges {
        grouped.entry(edge.post_id).or_default().push(edge.user_id);
    }
    grouped
}

/// Slice out one page; the cursor is the offset of its first item
fn paginate<T: Clone>(items: &[T], cursor: Option<&str>, page_size: usize) -> Page<T> {
    let start = cursor
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(0)
        .min(items.len());
    let end = (start + page_size).min(items.len());
    let remaining = (items.len() - end).div_ceil(page_size);
    Page {
        items: items[start..end].to_vec(),
        config: ResponseConfig {
            next_cursor: (end < items.len()).then(|| end.to_string()),
            total_pages_remaining: Some(remaining),
        },
    }
}

impl StreamSource for InMemorySource {
    async fn user(&self, user_id: &str) -> error::Result<Shared<User>> {
        self.store
            .user(user_id)
            .ok_or_else(|| SourceError::not_found("user", user_id))
    }

    async fn user_posts(
        &self,
        user_id: &str,
        cursor: Option<&str>,
    ) -> error::Result<Page<Shared<Post>>> {
        let posts: Vec<Shared<Post>> = self
            .posts
            .iter()
            .filter(|post| post.borrow().involves_user(user_id))
            .cloned()
            .collect();
        Ok(paginate(&posts, cursor, self.page_size))
    }

    async fn post(&self, post_id: &str) -> error::Result<Shared<Post>> {
        self.store
            .post(post_id)
            .ok_or_else(|| SourceError::not_found("post", post_id))
    }

    async fn post_comments(
        &self,
        post_id: &str,
        cursor: Option<&str>,
    ) -> error::Result<Page<Shared<Comment>>> {
        let comments: Vec<Shared<Comment>> = self
            .comments
            .iter()
            .filter(|comment| comment.borrow().post_id == post_id)
            .cloned()
            .collect();
        Ok(paginate(&comments, cursor, self.comments_page_size))
    }

    async fn post_lovers(&self, post_id: &str) -> error::Result<Vec<Shared<User>>> {
        Ok(self.users(self.loves.get(post_id)))
    }

    async fn post_reposters(&self, post_id: &str) -> error::Result<Vec<Shared<User>>> {
        Ok(self.users(self.reposts.get(post_id)))
    }

    async fn related_posts(&self, post_id: &str) -> error::Result<Vec<Shared<Post>>> {
        let post = self.post(post_id).await?;
        let author_id = post.borrow().author_id.clone();
        Ok(self
            .posts
            .iter()
            .filter(|p| {
                let p = p.borrow();
                p.id != post_id && p.author_id == author_id
            })
            .take(2)
            .cloned()
            .collect())
    }
}

type DemoController = StreamController<TextSizeCalculator, NoPrefetch>;

struct Session {
    controller: DemoController,
    updates: mpsc::UnboundedReceiver<StreamUpdate>,
}

impl Session {
    fn new(kind: StreamKind, current_user: Option<Shared<User>>, config: &Config) -> Self {
        let (tx, updates) = mpsc::unbounded_channel();
        let mut data_source = StreamDataSource::new(kind, current_user);
        data_source.set_column_count(config.column_count);
        let controller = StreamController::new(
            data_source,
            TextSizeCalculator::from_config(config),
            NoPrefetch,
            config.stream_width,
            tx,
        );
        Self {
            controller,
            updates,
        }
    }

    async fn send(&mut self, command: StreamCommand) {
        self.controller.handle(command).await;
    }

    fn print_updates(&mut self, step: &str) {
        println!("\n▸ {step}");
        let mut any = false;
        while let Ok(update) = self.updates.try_recv() {
            println!("    {}", describe_update(&update));
            any = true;
        }
        if !any {
            println!("    (no change)");
        }
    }

    fn print_rows(&self) {
        let data_source = self.controller.data_source();
        let columns = data_source.column_count();
        println!(
            "\n  {} stream, {} visible of {} rows",
            data_source.stream_kind.name(),
            data_source.visible_count(),
            data_source.all_items().len()
        );
        for (index, item) in data_source.visible_items().enumerate() {
            let height = item
                .heights
                .get(columns)
                .map_or_else(|| "?".to_string(), |h| format!("{h:.0}"));
            println!("  {index:>3} {height:>5}pt  {}", describe_row(item));
        }
    }
}

fn describe_update(update: &StreamUpdate) -> String {
    match update {
        StreamUpdate::Change { deleted, inserted } => {
            format!("delete {deleted:?} / insert {inserted:?}")
        }
        StreamUpdate::Reload { paths } => format!("reload {paths:?}"),
        StreamUpdate::Diff(delta) => format!(
            "diff: delete {:?} / insert {:?} / move {:?}",
            delta.deleted, delta.inserted, delta.moved
        ),
        StreamUpdate::Invalidate { index } => format!("invalidate {index}"),
    }
}

fn describe_row(item: &CellItem) -> String {
    let kind = format!("{:?}", item.kind());
    let detail = match item.payload() {
        Some(Payload::Post(post)) => {
            let post = post.borrow();
            let author = post
                .author
                .as_ref()
                .map_or_else(|| post.author_id.clone(), |a| a.borrow().at_name());
            let reposted = if post.is_repost() { " (repost)" } else { "" };
            format!("{} by {}{} · {}", post.id, author, reposted, post.relative_time())
        }
        Some(Payload::Comment(comment)) => {
            let comment = comment.borrow();
            format!("{} on {}", comment.id, comment.loaded_from_post_id)
        }
        Some(Payload::User(user)) => user.borrow().at_name(),
        Some(Payload::UserAvatars(avatars)) => {
            let avatars = avatars.borrow();
            let names: Vec<String> = avatars.users.iter().map(|u| u.borrow().at_name()).collect();
            format!("{}: {}", avatars.kind.name(), names.join(", "))
        }
        Some(other) => other.id(),
        None => String::new(),
    };
    format!("{kind:<16} {detail}")
}

/// Run the scripted session
pub async fn run(config: &Config) -> Result<()> {
    let source = InMemorySource::demo(config)?;
    let me = source.user("me").await?;

    println!("Plume demo: profile stream");
    let mut profile = Session::new(
        StreamKind::UserStream {
            user_id: "ann".to_string(),
        },
        Some(me.clone()),
        config,
    );
    let mut generator = ProfileGenerator::new(&source, "ann", None);
    generator.load(&mut profile.controller).await;
    profile.print_updates("load @ann");
    while generator.has_next_page() {
        generator.load_next_page(&mut profile.controller).await;
        profile.print_updates("next page");
    }
    profile.print_rows();

    profile
        .send(StreamCommand::ToggleCollapsed { index: 0 })
        .await;
    profile.print_updates("toggle the first post");

    let muted = source.user("cat").await?;
    muted.borrow_mut().relationship = RelationshipPriority::Mute;
    profile
        .send(StreamCommand::UserRelationship { user: muted.clone() })
        .await;
    profile.print_updates("mute @cat (drops their repost of an @ann post)");
    profile.print_rows();

    println!("\nPlume demo: post detail stream");
    let mut detail = Session::new(
        StreamKind::PostDetail {
            post_id: "p1".to_string(),
        },
        Some(me.clone()),
        config,
    );
    let mut generator = PostDetailGenerator::new(&source, "p1", None, Some(me.clone()));
    generator.load(&mut detail.controller).await;
    detail.print_updates("load p1");
    while generator.has_more_comments() {
        generator.load_more_comments(&mut detail.controller).await;
        detail.print_updates("more comments");
    }
    detail.print_rows();

    let post = source.post("p1").await?;
    let mut comment = Comment::new(&uuid::Uuid::new_v4().to_string(), "me", "p1");
    comment.content = "<p>Adding my two cents.</p>".to_string();
    comment.author = Some(me.clone());
    detail
        .send(StreamCommand::Modify {
            payload: Payload::Comment(shared(comment)),
            change: ContentChange::Create,
        })
        .await;
    detail.print_updates("comment on p1");

    let love = Love::new(&uuid::Uuid::new_v4().to_string(), &post, &me);
    post.borrow_mut().is_loved = true;
    detail
        .send(StreamCommand::Modify {
            payload: Payload::Love(shared(love)),
            change: ContentChange::Create,
        })
        .await;
    detail
        .send(StreamCommand::Modify {
            payload: Payload::Post(post.clone()),
            change: ContentChange::Loved,
        })
        .await;
    detail.print_updates("love p1");

    let bob = source.user("bob").await?;
    bob.borrow_mut().relationship = RelationshipPriority::Block;
    detail
        .send(StreamCommand::UserRelationship { user: bob })
        .await;
    detail.print_updates("block @bob");

    detail
        .send(StreamCommand::UpdateFilter {
            filter: Some(Box::new(|item: &CellItem| item.kind() != CellKind::UserAvatars)),
        })
        .await;
    detail.print_updates("hide avatar strips");
    detail.print_rows();

    detail.send(StreamCommand::Shutdown).await;
    profile.send(StreamCommand::Shutdown).await;
    Ok(())
}
