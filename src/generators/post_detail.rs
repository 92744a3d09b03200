//! Post detail stream: the post, its social strips, comments and related
//! posts

use super::{StreamDestination, placeholders};
use crate::api::{Page, StreamSource};
use crate::error::Result;
use crate::models::{AvatarsKind, Comment, Payload, Post, Shared, User};
use crate::stream::{CellItem, CellItemParser, CellKind, PlaceholderGroup, StreamKind};

const GROUPS: [PlaceholderGroup; 8] = [
    PlaceholderGroup::PostHeader,
    PlaceholderGroup::PostLovers,
    PlaceholderGroup::PostReposters,
    PlaceholderGroup::PostSocialPadding,
    PlaceholderGroup::PostCommentBar,
    PlaceholderGroup::PostComments,
    PlaceholderGroup::PostLoadingComments,
    PlaceholderGroup::PostRelatedPosts,
];

/// Loads a post and everything around it into a stream
pub struct PostDetailGenerator<'a, S> {
    source: &'a S,
    post_id: String,
    post: Option<Shared<Post>>,
    current_user: Option<Shared<User>>,
    parser: CellItemParser,
    next_comments_cursor: Option<String>,
}

impl<'a, S: StreamSource> PostDetailGenerator<'a, S> {
    /// Create a generator; a known `post` is shown before the load finishes
    pub fn new(
        source: &'a S,
        post_id: &str,
        post: Option<Shared<Post>>,
        current_user: Option<Shared<User>>,
    ) -> Self {
        Self {
            source,
            post_id: post_id.to_string(),
            post,
            current_user,
            parser: CellItemParser::new(StreamKind::PostDetail {
                post_id: post_id.to_string(),
            }),
            next_comments_cursor: None,
        }
    }

    /// Whether more comments can be loaded
    pub const fn has_more_comments(&self) -> bool {
        self.next_comments_cursor.is_some()
    }

    /// Initial load: declares all eight groups and fills each once
    pub async fn load<D: StreamDestination>(&mut self, destination: &mut D) {
        destination.set_placeholders(placeholders(&GROUPS)).await;

        if let Some(post) = self.post.clone() {
            destination.set_primary(Payload::Post(post.clone()));
            destination
                .replace_placeholder(PlaceholderGroup::PostHeader, self.parser.post_items(&post))
                .await;
        }

        let post = match self.source.post(&self.post_id).await {
            Ok(post) => post,
            Err(e) if e.is_not_found() => {
                destination.primary_model_not_found();
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to load post {}: {}", self.post_id, e);
                for group in GROUPS {
                    destination.replace_placeholder(group, Vec::new()).await;
                }
                return;
            }
        };
        self.post = Some(post.clone());
        destination.set_primary(Payload::Post(post.clone()));
        destination
            .replace_placeholder(PlaceholderGroup::PostHeader, self.parser.post_items(&post))
            .await;

        let (lovers, reposters, comments, related) = futures::join!(
            self.source.post_lovers(&self.post_id),
            self.source.post_reposters(&self.post_id),
            self.source.post_comments(&self.post_id, None),
            self.source.related_posts(&self.post_id),
        );

        let lovers = self.users_or_empty(lovers, AvatarsKind::Lovers);
        let reposters = self.users_or_empty(reposters, AvatarsKind::Reposters);
        let padding = if lovers.is_empty() && reposters.is_empty() {
            Vec::new()
        } else {
            CellItemParser::social_padding()
        };
        destination
            .replace_placeholder(PlaceholderGroup::PostLovers, lovers)
            .await;
        destination
            .replace_placeholder(PlaceholderGroup::PostReposters, reposters)
            .await;
        destination
            .replace_placeholder(PlaceholderGroup::PostSocialPadding, padding)
            .await;

        let comment_bar = if self.current_user.is_some() {
            vec![CellItemParser::create_comment_item(&post)]
        } else {
            Vec::new()
        };
        destination
            .replace_placeholder(PlaceholderGroup::PostCommentBar, comment_bar)
            .await;

        let (comment_items, loading) = match comments {
            Ok(page) => self.comments_page(&post, page, destination),
            Err(e) => {
                tracing::warn!("Failed to load comments for {}: {}", self.post_id, e);
                (Vec::new(), Vec::new())
            }
        };
        destination
            .replace_placeholder(PlaceholderGroup::PostComments, comment_items)
            .await;
        destination
            .replace_placeholder(PlaceholderGroup::PostLoadingComments, loading)
            .await;

        let related = match related {
            Ok(posts) if !posts.is_empty() => {
                let payloads: Vec<Payload> = posts.into_iter().map(Payload::Post).collect();
                let mut items = vec![CellItem::structural(CellKind::TextHeader)];
                items.extend(self.parser.parse(&payloads));
                items
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load related posts for {}: {}", self.post_id, e);
                Vec::new()
            }
        };
        destination
            .replace_placeholder(PlaceholderGroup::PostRelatedPosts, related)
            .await;
    }

    /// Append the next page of comments; the see-more row goes away on the
    /// last page
    pub async fn load_more_comments<D: StreamDestination>(&mut self, destination: &mut D) {
        let Some(post) = self.post.clone() else {
            return;
        };
        let Some(cursor) = self.next_comments_cursor.clone() else {
            destination
                .replace_placeholder(PlaceholderGroup::PostLoadingComments, Vec::new())
                .await;
            return;
        };

        let page = match self.source.post_comments(&self.post_id, Some(&cursor)).await {
            Ok(page) => page,
            Err(e) => {
                // the see-more row stays so the load can be retried
                tracing::warn!("Failed to load more comments for {}: {}", self.post_id, e);
                return;
            }
        };
        let (items, loading) = self.comments_page(&post, page, destination);
        destination
            .append_items(PlaceholderGroup::PostComments, items)
            .await;
        if loading.is_empty() {
            destination
                .replace_placeholder(PlaceholderGroup::PostLoadingComments, loading)
                .await;
        }
    }

    fn users_or_empty(&self, users: Result<Vec<Shared<User>>>, kind: AvatarsKind) -> Vec<CellItem> {
        match users {
            Ok(users) => CellItemParser::user_avatar_items(users, &self.post_id, kind),
            Err(e) => {
                tracing::warn!("Failed to load {} for {}: {}", kind.name(), self.post_id, e);
                Vec::new()
            }
        }
    }

    /// Rows for a page of comments plus the see-more row, if more remain
    fn comments_page<D: StreamDestination>(
        &mut self,
        post: &Shared<Post>,
        page: Page<Shared<Comment>>,
        destination: &mut D,
    ) -> (Vec<CellItem>, Vec<CellItem>) {
        self.next_comments_cursor = if page.config.is_out_of_data() {
            None
        } else {
            page.config.next_cursor.clone()
        };
        destination.set_paging_config(page.config);

        let mut items = Vec::new();
        for comment in page.items {
            attach_to_post(&comment, post);
            items.extend(CellItemParser::comment_items(&comment));
        }
        let loading = if self.next_comments_cursor.is_some() {
            vec![CellItemParser::see_more_comments_item(post)]
        } else {
            Vec::new()
        };
        (items, loading)
    }
}

/// Record which post's stream loaded a comment
fn attach_to_post(comment: &Shared<Comment>, post: &Shared<Post>) {
    let mut comment = comment.borrow_mut();
    if comment.loaded_from_post.is_none() {
        comment.loaded_from_post_id.clone_from(&post.borrow().id);
        comment.loaded_from_post = Some(post.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ResponseConfig;
    use crate::generators::testing::{RecordingDestination, ScriptedSource};
    use crate::models::shared;

    fn comments(ids: &[&str], next_cursor: Option<&str>) -> Page<Shared<Comment>> {
        Page {
            items: ids
                .iter()
                .map(|id| shared(Comment::new(id, "u2", "123")))
                .collect(),
            config: ResponseConfig {
                next_cursor: next_cursor.map(str::to_string),
                total_pages_remaining: None,
            },
        }
    }

    fn source() -> ScriptedSource {
        ScriptedSource {
            posts: vec![
                shared(Post::new("123", "u1").with_text("<p>hello</p>")),
                shared(Post::new("456", "u3").with_text("<p>related</p>")),
            ],
            lovers: vec![shared(User::new("u2", "bob"))],
            reposters: vec![shared(User::new("u3", "cat"))],
            related: vec![shared(Post::new("456", "u3").with_text("<p>related</p>"))],
            comment_pages: std::cell::RefCell::new(vec![
                comments(&["c1", "c2"], Some("page-2")),
                comments(&["c3"], Some("page-3")),
                comments(&["c4"], None),
            ]),
            ..ScriptedSource::default()
        }
    }

    fn generator(source: &ScriptedSource) -> PostDetailGenerator<'_, ScriptedSource> {
        PostDetailGenerator::new(source, "123", None, Some(shared(User::new("42", "me"))))
    }

    #[tokio::test]
    async fn test_load_sets_every_group() {
        let source = source();
        let mut destination = RecordingDestination::default();
        generator(&source).load(&mut destination).await;

        assert_eq!(destination.placeholders, GROUPS.to_vec());
        for group in GROUPS {
            assert!(destination.count(group) > 0, "{group:?} is empty");
        }
        assert_eq!(destination.replaced.len(), 8);
        assert!(matches!(&destination.primary, Some(Payload::Post(p)) if p.borrow().id == "123"));
    }

    #[tokio::test]
    async fn test_comments_know_their_post() {
        let source = source();
        let mut destination = RecordingDestination::default();
        generator(&source).load(&mut destination).await;

        let first = &destination.groups[&PlaceholderGroup::PostComments][0];
        let comment = first.payload().and_then(Payload::as_comment).unwrap();
        assert!(comment.borrow().loaded_from_post.is_some());
    }

    #[tokio::test]
    async fn test_load_more_comments_until_the_end() {
        let source = source();
        let mut destination = RecordingDestination::default();
        let mut generator = generator(&source);
        generator.load(&mut destination).await;
        assert_eq!(destination.count(PlaceholderGroup::PostComments), 4);

        generator.load_more_comments(&mut destination).await;
        assert_eq!(destination.count(PlaceholderGroup::PostComments), 6);
        assert_eq!(destination.count(PlaceholderGroup::PostLoadingComments), 1);

        generator.load_more_comments(&mut destination).await;
        assert_eq!(destination.count(PlaceholderGroup::PostComments), 8);
        assert_eq!(destination.count(PlaceholderGroup::PostLoadingComments), 0);
        assert!(!generator.has_more_comments());
    }

    #[tokio::test]
    async fn test_quiet_post_has_empty_groups() {
        let source = ScriptedSource {
            posts: vec![shared(Post::new("123", "u1"))],
            ..ScriptedSource::default()
        };
        let mut destination = RecordingDestination::default();
        PostDetailGenerator::new(&source, "123", None, None)
            .load(&mut destination)
            .await;

        assert_eq!(destination.replaced.len(), 8);
        for group in &GROUPS[1..] {
            assert_eq!(destination.count(*group), 0, "{group:?} is not empty");
        }
    }

    #[tokio::test]
    async fn test_missing_post() {
        let source = ScriptedSource::default();
        let mut destination = RecordingDestination::default();
        generator(&source).load(&mut destination).await;
        assert!(destination.not_found);
        assert!(destination.replaced.is_empty());
    }
}
