//! Domain events applied to a stream
//!
//! Events can arrive before, after or instead of the network page that
//! would have shown their object, so anything that does not resolve is
//! skipped silently.

use std::collections::HashSet;
use std::rc::Rc;

use super::cell_item::{CellItem, CellUid};
use super::data_source::{StreamDataSource, StreamUpdate};
use super::kind::{CellKind, ContentChange, PlaceholderGroup, StreamKind};
use super::parser::CellItemParser;
use crate::models::{
    AvatarsKind, Comment, Love, Payload, Post, RelationshipPriority, Shared, User,
};
use crate::store::ModelStore;

impl StreamDataSource {
    /// Apply a content event; returns the view updates, in order
    pub fn modify(&mut self, payload: &Payload, change: ContentChange) -> Vec<StreamUpdate> {
        let updates = match change {
            ContentChange::Create => self.create(payload),
            ContentChange::Delete => self.delete(payload),
            ContentChange::Replaced => self.replace(payload).into_iter().collect(),
            ContentChange::Update => self.update(payload).into_iter().collect(),
            ContentChange::Loved | ContentChange::Reposted | ContentChange::Watching => self
                .merge_and_reload(payload, change)
                .into_iter()
                .collect(),
        };
        updates.into_iter().filter(|u| !u.is_empty()).collect()
    }

    // ==================== Create ====================

    fn create(&mut self, payload: &Payload) -> Vec<StreamUpdate> {
        match payload {
            Payload::Love(love) => {
                let (post, user) = {
                    let love = love.borrow();
                    (love.post.clone(), love.user.clone())
                };
                if let Some(post) = post
                    && self.stream_kind.is_detail(&post.borrow().id)
                {
                    return user.map(|u| self.insert_lover(&post, u)).unwrap_or_default();
                }
                self.insert_love(love).into_iter().collect()
            }
            Payload::Comment(comment) => self.insert_comment(comment).into_iter().collect(),
            Payload::Post(post) => self.insert_post(post).into_iter().collect(),
            Payload::User(_)
            | Payload::Notification(_)
            | Payload::Editorial(_)
            | Payload::Badge(_)
            | Payload::UserAvatars(_) => Vec::new(),
        }
    }

    /// Show a new lover in the love drawer of a post detail stream
    fn insert_lover(&mut self, post: &Shared<Post>, user: Shared<User>) -> Vec<StreamUpdate> {
        let post_id = post.borrow().id.clone();
        let mut updates = Vec::new();

        if self.has_items(PlaceholderGroup::PostLovers) {
            if let Some((uid, avatars)) = self.avatars_for(&post_id, AvatarsKind::Lovers) {
                avatars.borrow_mut().append(user);
                if let Some(index) = self.visible_position_of(uid) {
                    updates.push(StreamUpdate::Reload { paths: vec![index] });
                }
            }
        } else {
            let items = CellItemParser::user_avatar_items(vec![user], &post_id, AvatarsKind::Lovers);
            let (deleted, inserted) = self.replace_placeholder(PlaceholderGroup::PostLovers, items);
            updates.push(StreamUpdate::Change { deleted, inserted });
        }

        if self.has_items(PlaceholderGroup::PostReposters) {
            let (deleted, inserted) = self.replace_placeholder(
                PlaceholderGroup::PostSocialPadding,
                CellItemParser::social_padding(),
            );
            updates.push(StreamUpdate::Change { deleted, inserted });
        }
        updates
    }

    /// New comments go directly after the post's create-comment row
    fn insert_comment(&mut self, comment: &Shared<Comment>) -> Option<StreamUpdate> {
        let parent_id = comment.borrow().loaded_from_post_id.clone();
        let first = *self.comment_index_paths(&parent_id).first()?;
        if self.item(first)?.kind() != CellKind::CreateComment {
            return None;
        }

        let items = CellItemParser::comment_items(comment);
        if matches!(self.stream_kind, StreamKind::PostDetail { .. }) {
            let (deleted, inserted) = if self.has_items(PlaceholderGroup::PostComments) {
                let items = tag(items, PlaceholderGroup::PostComments);
                (Vec::new(), self.insert(items, first + 1))
            } else {
                self.replace_placeholder(PlaceholderGroup::PostComments, items)
            };
            return Some(StreamUpdate::Change { deleted, inserted });
        }

        let items = tag(items, PlaceholderGroup::StreamItems);
        let inserted = self.insert(items, first + 1);
        Some(StreamUpdate::Change {
            deleted: Vec::new(),
            inserted,
        })
    }

    /// New posts go above existing ones in the following stream and in the
    /// current user's own profile
    fn insert_post(&mut self, post: &Shared<Post>) -> Option<StreamUpdate> {
        match &self.stream_kind {
            StreamKind::Following => {}
            StreamKind::UserStream { user_id } => {
                if self.current_user_id().as_ref() != Some(user_id) {
                    return None;
                }
            }
            _ => return None,
        }

        let items = self.parser().post_items(post);
        let paths = self.index_paths(PlaceholderGroup::StreamItems);
        let Some(&first) = paths.first() else {
            let (deleted, inserted) = self.replace_placeholder(PlaceholderGroup::StreamItems, items);
            return Some(StreamUpdate::Change { deleted, inserted });
        };

        let only_no_posts =
            paths.len() == 1 && self.item(first).is_some_and(|i| i.kind() == CellKind::NoPosts);
        if only_no_posts {
            let (deleted, inserted) = self.replace_placeholder(PlaceholderGroup::StreamItems, items);
            return Some(StreamUpdate::Change { deleted, inserted });
        }

        let items = tag(items, PlaceholderGroup::StreamItems);
        let inserted = self.insert(items, first);
        Some(StreamUpdate::Change {
            deleted: Vec::new(),
            inserted,
        })
    }

    /// A new love by the current user heads their loves stream
    fn insert_love(&mut self, love: &Shared<Love>) -> Option<StreamUpdate> {
        let StreamKind::UserLoves { username } = &self.stream_kind else {
            return None;
        };
        let current_username = self.current_user.as_ref()?.borrow().username.clone();
        if *username != current_username {
            return None;
        }
        let post_id = love.borrow().post.as_ref()?.borrow().id.clone();
        if self.all_items().iter().any(|item| item.is_post(&post_id)) {
            return None;
        }

        let items = tag(
            self.parser().payload_items(&Payload::Love(love.clone())),
            PlaceholderGroup::StreamItems,
        );
        let inserted = self.insert(items, 0);
        Some(StreamUpdate::Change {
            deleted: Vec::new(),
            inserted,
        })
    }

    // ==================== Delete ====================

    fn delete(&mut self, payload: &Payload) -> Vec<StreamUpdate> {
        let mut updates = match payload {
            Payload::Love(love) => self.remove_lover(love),
            Payload::Post(_)
            | Payload::Comment(_)
            | Payload::User(_)
            | Payload::Notification(_)
            | Payload::Editorial(_)
            | Payload::Badge(_)
            | Payload::UserAvatars(_) => Vec::new(),
        };

        let removed = self.remove_items_for(payload, ContentChange::Delete);
        updates.push(StreamUpdate::Change {
            deleted: removed,
            inserted: Vec::new(),
        });
        updates
    }

    /// Take a withdrawn love's user out of the lovers strip
    fn remove_lover(&mut self, love: &Shared<Love>) -> Vec<StreamUpdate> {
        let (post, user) = {
            let love = love.borrow();
            (love.post.clone(), love.user.clone())
        };
        let (Some(post), Some(user)) = (post, user) else {
            return Vec::new();
        };
        let post_id = post.borrow().id.clone();
        let user_id = user.borrow().id.clone();
        let mut updates = Vec::new();

        if let Some((uid, avatars)) = self.avatars_for(&post_id, AvatarsKind::Lovers) {
            avatars.borrow_mut().remove(&user_id);
            if avatars.borrow().users.is_empty() {
                let (deleted, inserted) =
                    self.replace_placeholder(PlaceholderGroup::PostLovers, Vec::new());
                updates.push(StreamUpdate::Change { deleted, inserted });
            } else if let Some(index) = self.visible_position_of(uid) {
                updates.push(StreamUpdate::Reload { paths: vec![index] });
            }
        }

        if !self.has_items(PlaceholderGroup::PostLovers)
            && !self.has_items(PlaceholderGroup::PostReposters)
        {
            let (deleted, inserted) =
                self.replace_placeholder(PlaceholderGroup::PostSocialPadding, Vec::new());
            updates.push(StreamUpdate::Change { deleted, inserted });
        }
        updates
    }

    /// Remove every row matching a payload; returns the visible positions
    /// that were removed
    pub fn remove_items_for(&mut self, payload: &Payload, change: ContentChange) -> Vec<usize> {
        let uids = self.matching_uids(payload, change);
        let paths = self.visible_positions(|item| uids.contains(&item.uid()));
        self.remove_uids(&uids);
        paths
    }

    // ==================== Update ====================

    fn replace(&mut self, payload: &Payload) -> Option<StreamUpdate> {
        let uids = self.matching_uids(payload, ContentChange::Replaced);
        let first = self
            .all_items()
            .iter()
            .position(|item| uids.contains(&item.uid()))?;
        let group = self.all_items()[first].group;

        let mut items = self.parser().payload_items(payload);
        if let Some(group) = group {
            items = tag(items, group);
        }

        let deleted = self.visible_positions(|item| uids.contains(&item.uid()));
        self.remove_uids(&uids);
        let inserted = self.insert_at_all_index(items, first);
        Some(StreamUpdate::Change { deleted, inserted })
    }

    fn update(&mut self, payload: &Payload) -> Option<StreamUpdate> {
        if matches!(self.stream_kind, StreamKind::UserLoves { .. })
            && let Payload::Post(post) = payload
            && !post.borrow().is_loved
        {
            let deleted = self.remove_items_for(payload, ContentChange::Delete);
            return Some(StreamUpdate::Change {
                deleted,
                inserted: Vec::new(),
            });
        }
        self.merge_and_reload(payload, ContentChange::Update)
    }

    /// Merge fresh state into every matching payload of the same kind and
    /// reload the affected rows
    fn merge_and_reload(&mut self, payload: &Payload, change: ContentChange) -> Option<StreamUpdate> {
        let uids = self.matching_uids(payload, change);
        let mut modified = false;
        for item in self.all_items() {
            if !uids.contains(&item.uid()) {
                continue;
            }
            if let Some(existing) = item.payload()
                && existing.merge_from(payload)
            {
                modified = true;
            }
        }
        if !modified {
            return None;
        }
        let paths = self.visible_positions(|item| uids.contains(&item.uid()));
        Some(StreamUpdate::Reload { paths })
    }

    // ==================== Users ====================

    /// Apply a relationship change (follow, mute, block, ...)
    pub fn modify_user_relationship(
        &mut self,
        user: &Shared<User>,
        store: &mut ModelStore,
    ) -> Vec<StreamUpdate> {
        if user.borrow().relationship.is_muted_or_blocked() {
            self.remove_user_from_stream(user)
        } else {
            self.update_user_relationship_controls(user, store)
                .into_iter()
                .collect()
        }
    }

    fn remove_user_from_stream(&mut self, user: &Shared<User>) -> Vec<StreamUpdate> {
        let (user_id, priority) = {
            let user = user.borrow();
            (user.id.clone(), user.relationship)
        };
        let keep = match &self.stream_kind {
            StreamKind::UserStream { user_id: owner } => *owner == user_id,
            StreamKind::BlockedUsers => priority == RelationshipPriority::Block,
            StreamKind::MutedUsers => priority == RelationshipPriority::Mute,
            _ => false,
        };
        if keep {
            return Vec::new();
        }
        self.modify(&Payload::User(user.clone()), ContentChange::Delete)
    }

    fn update_user_relationship_controls(
        &mut self,
        user: &Shared<User>,
        store: &mut ModelStore,
    ) -> Option<StreamUpdate> {
        let user_id = user.borrow().id.clone();
        let user = &store.save_user(user);
        let mut changed: HashSet<CellUid> = HashSet::new();

        for item in self.all_items() {
            if !item.kind().shows_user_relationship() {
                continue;
            }
            let Some(payload) = item.payload() else {
                continue;
            };
            let found = users_in(payload);
            let mut touched = false;
            for found_user in found {
                if found_user.borrow().id != user_id {
                    continue;
                }
                if !Rc::ptr_eq(&found_user, user) {
                    found_user.borrow_mut().merge_relationship(&user.borrow());
                }
                touched = true;
            }
            if touched {
                changed.insert(item.uid());
            }
        }

        if changed.is_empty() {
            return None;
        }
        let paths = self.visible_positions(|item| changed.contains(&item.uid()));
        Some(StreamUpdate::Reload { paths })
    }

    /// Swap in an edited user (profile settings) and reload its rows
    pub fn modify_user_settings(&mut self, user: &Shared<User>) -> Option<StreamUpdate> {
        let payload = Payload::User(user.clone());
        let uids = self.matching_uids(&payload, ContentChange::Update);
        let mut swapped = HashSet::new();
        for item in self.all_items_mut() {
            if uids.contains(&item.uid()) && item.swap_payload(payload.clone()) {
                swapped.insert(item.uid());
            }
        }
        let paths = self.visible_positions(|item| swapped.contains(&item.uid()));
        (!paths.is_empty()).then_some(StreamUpdate::Reload { paths })
    }

    // ==================== Matching ====================

    /// Rows affected by a change to `payload`, across the whole sequence
    fn matching_uids(&self, payload: &Payload, change: ContentChange) -> HashSet<CellUid> {
        self.all_items()
            .iter()
            .filter(|item| item_matches(item, payload, change))
            .map(CellItem::uid)
            .collect()
    }

    fn avatars_for(
        &self,
        post_id: &str,
        kind: AvatarsKind,
    ) -> Option<(CellUid, Shared<crate::models::UserAvatars>)> {
        self.all_items().iter().find_map(|item| {
            let avatars = item.payload()?.as_user_avatars()?;
            avatars
                .borrow()
                .belongs_to(post_id, kind)
                .then(|| (item.uid(), avatars.clone()))
        })
    }
}

fn tag(items: Vec<CellItem>, group: PlaceholderGroup) -> Vec<CellItem> {
    items.into_iter().map(|item| item.with_group(group)).collect()
}

/// Users a row shows: the payload itself, its author, a post's repost author
fn users_in(payload: &Payload) -> Vec<Shared<User>> {
    let mut users: Vec<Shared<User>> = Vec::new();
    if let Some(user) = payload.as_user() {
        users.push(user.clone());
    }
    if let Some(author) = payload.author() {
        users.push(author);
    }
    if let Some(post) = payload.as_post()
        && let Some(repost_author) = post.borrow().repost_author.clone()
    {
        users.push(repost_author);
    }
    users
}

fn item_matches(item: &CellItem, payload: &Payload, change: ContentChange) -> bool {
    let Some(item_payload) = item.payload() else {
        return false;
    };
    match payload {
        Payload::Post(post) => {
            let post_id = post.borrow().id.clone();
            if item.is_post(&post_id) {
                // a love only changes the footer
                return change != ContentChange::Loved || item.kind() == CellKind::Footer;
            }
            let Some(comment) = item_payload.as_comment() else {
                return false;
            };
            let belongs = comment.borrow().belongs_to_post(&post_id);
            match change {
                ContentChange::Delete => belongs,
                ContentChange::Watching => belongs && item.kind() == CellKind::CreateComment,
                _ => false,
            }
        }
        Payload::User(user) => {
            let (user_id, priority) = {
                let user = user.borrow();
                (user.id.clone(), user.relationship)
            };
            if item_payload.as_user().is_some_and(|u| u.borrow().id == user_id) {
                return true;
            }
            match priority {
                RelationshipPriority::Following
                | RelationshipPriority::None
                | RelationshipPriority::Inactive
                | RelationshipPriority::Block
                | RelationshipPriority::Mute => authored_by(item_payload, &user_id),
                RelationshipPriority::Me => false,
            }
        }
        Payload::Comment(_)
        | Payload::Love(_)
        | Payload::Notification(_)
        | Payload::Editorial(_)
        | Payload::Badge(_)
        | Payload::UserAvatars(_) => item_payload.is_same(payload),
    }
}

/// Whether a row's payload was written or reposted by the user, including
/// comments left under that user's posts
fn authored_by(payload: &Payload, user_id: &str) -> bool {
    match payload {
        Payload::Post(post) => post.borrow().involves_user(user_id),
        Payload::Comment(comment) => {
            let comment = comment.borrow();
            comment.author_id == user_id
                || comment
                    .loaded_from_post
                    .as_ref()
                    .is_some_and(|p| p.borrow().author_id == user_id)
        }
        Payload::Notification(n) => n.borrow().author_id.as_deref() == Some(user_id),
        Payload::User(_)
        | Payload::Love(_)
        | Payload::Editorial(_)
        | Payload::Badge(_)
        | Payload::UserAvatars(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Notification, NotificationKind, shared};

    fn stream(kind: StreamKind) -> StreamDataSource {
        let mut source = StreamDataSource::new(kind, Some(shared(User::new("me", "me"))));
        source.set_placeholders(vec![CellItem::placeholder(PlaceholderGroup::StreamItems)]);
        source
    }

    fn fill(source: &mut StreamDataSource, payloads: &[Payload]) {
        let items = source.parser().parse(payloads);
        source.replace_placeholder(PlaceholderGroup::StreamItems, items);
    }

    fn post(id: &str, author_id: &str) -> Shared<Post> {
        shared(Post::new(id, author_id).with_text("<p>hi</p>"))
    }

    fn user(id: &str, relationship: RelationshipPriority) -> Shared<User> {
        let user = shared(User::new(id, id));
        user.borrow_mut().relationship = relationship;
        user
    }

    fn deleted(updates: &[StreamUpdate]) -> Vec<usize> {
        updates
            .iter()
            .filter_map(|u| match u {
                StreamUpdate::Change { deleted, .. } => Some(deleted.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_mute_removes_everything_by_user() {
        let mut source = stream(StreamKind::Following);
        let mut repost = Post::new("p3", "u2").with_text("<p>shared</p>");
        repost.repost_author_id = Some("u1".to_string());
        fill(
            &mut source,
            &[
                Payload::Post(post("p1", "u1")),
                Payload::Post(post("p2", "u2")),
                Payload::Post(shared(repost)),
                Payload::Notification(shared(Notification::new(
                    "n1",
                    NotificationKind::Follow,
                    Some("u1"),
                ))),
            ],
        );

        let mut store = ModelStore::new();
        let updates =
            source.modify_user_relationship(&user("u1", RelationshipPriority::Mute), &mut store);

        assert!(!deleted(&updates).is_empty());
        assert_eq!(source.visible_count(), 4);
        assert!(source.visible_items().all(|item| item.is_post("p2")));
    }

    #[test]
    fn test_mute_keeps_the_muted_users_profile() {
        let mut source = stream(StreamKind::UserStream {
            user_id: "u1".to_string(),
        });
        fill(&mut source, &[Payload::Post(post("p1", "u1"))]);
        let mut store = ModelStore::new();
        let updates =
            source.modify_user_relationship(&user("u1", RelationshipPriority::Block), &mut store);
        assert!(updates.is_empty());
        assert_eq!(source.visible_count(), 4);
    }

    #[test]
    fn test_blocked_list_keeps_blocked_user() {
        let mut source = stream(StreamKind::BlockedUsers);
        let blocked = user("u1", RelationshipPriority::Block);
        fill(&mut source, &[Payload::User(blocked.clone())]);
        let mut store = ModelStore::new();
        assert!(source.modify_user_relationship(&blocked, &mut store).is_empty());
        assert_eq!(source.visible_count(), 1);
    }

    #[test]
    fn test_muted_list_keeps_muted_user() {
        let mut source = stream(StreamKind::MutedUsers);
        let muted = user("u1", RelationshipPriority::Mute);
        fill(&mut source, &[Payload::User(muted.clone())]);
        let mut store = ModelStore::new();
        assert!(source.modify_user_relationship(&muted, &mut store).is_empty());
        assert_eq!(source.visible_count(), 1);
    }

    #[test]
    fn test_blocked_list_drops_muted_user() {
        let mut source = stream(StreamKind::BlockedUsers);
        let muted = user("u1", RelationshipPriority::Mute);
        fill(
            &mut source,
            &[
                Payload::User(muted.clone()),
                Payload::User(user("u2", RelationshipPriority::Block)),
            ],
        );
        let mut store = ModelStore::new();
        let updates = source.modify_user_relationship(&muted, &mut store);
        assert_eq!(deleted(&updates), vec![0]);
        assert_eq!(source.visible_count(), 1);
    }

    #[test]
    fn test_deleting_the_only_post_keeps_the_group() {
        let mut source = stream(StreamKind::UserStream {
            user_id: "me".to_string(),
        });
        let only = post("p1", "me");
        fill(&mut source, &[Payload::Post(only.clone())]);
        source.modify(&Payload::Post(only), ContentChange::Delete);
        assert_eq!(source.visible_count(), 0);
        assert!(!source.has_items(PlaceholderGroup::StreamItems));

        let updates = source.modify(&Payload::Post(post("p2", "me")), ContentChange::Create);
        assert_eq!(
            updates,
            vec![StreamUpdate::Change {
                deleted: vec![],
                inserted: vec![0, 1, 2, 3],
            }]
        );

        fill_more(&mut source, &post("p3", "me"));
        assert_eq!(source.visible_count(), 8);
        assert!(source.item(4).unwrap().is_post("p3"));
    }

    #[test]
    fn test_follow_reloads_relationship_rows() {
        let mut source = stream(StreamKind::Following);
        let listed = user("u1", RelationshipPriority::None);
        fill(
            &mut source,
            &[Payload::User(listed.clone()), Payload::Post(post("p1", "u2"))],
        );
        let fresh = user("u1", RelationshipPriority::Following);
        let mut store = ModelStore::new();
        let updates = source.modify_user_relationship(&fresh, &mut store);

        assert_eq!(updates, vec![StreamUpdate::Reload { paths: vec![0] }]);
        assert_eq!(listed.borrow().relationship, RelationshipPriority::Following);
        assert!(store.user("u1").is_some());
    }

    #[test]
    fn test_follow_reloads_notification_not_comment_header() {
        let mut source = stream(StreamKind::Notifications);
        let author = user("u1", RelationshipPriority::None);
        let mut notification = Notification::new("n1", NotificationKind::Follow, Some("u1"));
        notification.author = Some(author.clone());
        let mut comment = Comment::new("c1", "u1", "p1");
        comment.author = Some(author.clone());
        source.replace_placeholder(
            PlaceholderGroup::StreamItems,
            vec![
                CellItem::new(CellKind::Notification, shared(notification)),
                CellItem::new(CellKind::CommentHeader, shared(comment)),
            ],
        );

        let mut store = ModelStore::new();
        let updates =
            source.modify_user_relationship(&user("u1", RelationshipPriority::Following), &mut store);

        assert_eq!(updates, vec![StreamUpdate::Reload { paths: vec![0] }]);
        assert_eq!(author.borrow().relationship, RelationshipPriority::Following);
    }

    #[test]
    fn test_loved_reloads_footer_only() {
        let mut source = stream(StreamKind::Following);
        let existing = post("p1", "u1");
        fill(&mut source, &[Payload::Post(existing.clone())]);

        let fresh = post("p1", "u1");
        fresh.borrow_mut().is_loved = true;
        let updates = source.modify(&Payload::Post(fresh), ContentChange::Loved);

        assert_eq!(updates, vec![StreamUpdate::Reload { paths: vec![2] }]);
        assert!(existing.borrow().is_loved);
    }

    #[test]
    fn test_delete_post_removes_its_comments() {
        let mut source = stream(StreamKind::Following);
        let p1 = post("p1", "u1");
        let comment = shared(Comment::new("c1", "u2", "p1"));
        let mut items = source.parser().post_items(&p1);
        items.push(CellItemParser::create_comment_item(&p1));
        items.extend(CellItemParser::comment_items(&comment));
        source.replace_placeholder(PlaceholderGroup::StreamItems, items);
        fill_more(&mut source, &post("p2", "u1"));
        assert_eq!(source.visible_count(), 11);

        let updates = source.modify(&Payload::Post(p1), ContentChange::Delete);
        assert_eq!(deleted(&updates), (0..7).collect::<Vec<_>>());
        assert!(source.visible_items().all(|item| item.is_post("p2")));
    }

    fn fill_more(source: &mut StreamDataSource, post: &Shared<Post>) {
        let items = source.parser().post_items(post);
        source.append_to_group(PlaceholderGroup::StreamItems, items);
    }

    #[test]
    fn test_create_comment_lands_under_create_row() {
        let mut source = stream(StreamKind::Following);
        let p1 = post("p1", "u1");
        let mut items = source.parser().post_items(&p1);
        items.push(CellItemParser::create_comment_item(&p1));
        source.replace_placeholder(PlaceholderGroup::StreamItems, items);

        let comment = shared(Comment::new("c1", "me", "p1"));
        let updates = source.modify(&Payload::Comment(comment), ContentChange::Create);

        assert_eq!(
            updates,
            vec![StreamUpdate::Change {
                deleted: vec![],
                inserted: vec![5, 6],
            }]
        );
        assert_eq!(source.item(5).map(CellItem::kind), Some(CellKind::CommentHeader));
    }

    #[test]
    fn test_create_comment_without_create_row_is_ignored() {
        let mut source = stream(StreamKind::Following);
        fill(&mut source, &[Payload::Post(post("p1", "u1"))]);
        let comment = shared(Comment::new("c1", "me", "p1"));
        assert!(source.modify(&Payload::Comment(comment), ContentChange::Create).is_empty());
    }

    #[test]
    fn test_create_post_heads_following_stream() {
        let mut source = stream(StreamKind::Following);
        fill(&mut source, &[Payload::Post(post("old", "u1"))]);
        let updates = source.modify(&Payload::Post(post("new", "me")), ContentChange::Create);
        assert_eq!(
            updates,
            vec![StreamUpdate::Change {
                deleted: vec![],
                inserted: vec![0, 1, 2, 3],
            }]
        );
        assert!(source.item(0).unwrap().is_post("new"));
    }

    #[test]
    fn test_create_post_replaces_no_posts_row() {
        let mut source = stream(StreamKind::UserStream {
            user_id: "me".to_string(),
        });
        source.replace_placeholder(PlaceholderGroup::StreamItems, CellItemParser::no_posts_items());
        let updates = source.modify(&Payload::Post(post("new", "me")), ContentChange::Create);
        assert_eq!(
            updates,
            vec![StreamUpdate::Change {
                deleted: vec![0],
                inserted: vec![0, 1, 2, 3],
            }]
        );
        assert_eq!(source.visible_count(), 4);
    }

    #[test]
    fn test_create_post_ignored_in_other_profiles() {
        let mut source = stream(StreamKind::UserStream {
            user_id: "u1".to_string(),
        });
        fill(&mut source, &[Payload::Post(post("p1", "u1"))]);
        assert!(source.modify(&Payload::Post(post("new", "me")), ContentChange::Create).is_empty());
    }

    #[test]
    fn test_lovers_strip_follows_loves() {
        let mut source = StreamDataSource::new(
            StreamKind::PostDetail {
                post_id: "p1".to_string(),
            },
            None,
        );
        source.set_placeholders(vec![
            CellItem::placeholder(PlaceholderGroup::PostLovers),
            CellItem::placeholder(PlaceholderGroup::PostReposters),
            CellItem::placeholder(PlaceholderGroup::PostSocialPadding),
        ]);
        let p1 = post("p1", "u1");
        let ann = shared(Love::new("l1", &p1, &user("ann", RelationshipPriority::None)));
        let bob = shared(Love::new("l2", &p1, &user("bob", RelationshipPriority::None)));

        let updates = source.modify(&Payload::Love(ann.clone()), ContentChange::Create);
        assert_eq!(
            updates,
            vec![StreamUpdate::Change {
                deleted: vec![],
                inserted: vec![0],
            }]
        );

        let updates = source.modify(&Payload::Love(bob.clone()), ContentChange::Create);
        assert_eq!(updates, vec![StreamUpdate::Reload { paths: vec![0] }]);

        let updates = source.modify(&Payload::Love(bob), ContentChange::Delete);
        assert_eq!(updates, vec![StreamUpdate::Reload { paths: vec![0] }]);

        let updates = source.modify(&Payload::Love(ann), ContentChange::Delete);
        assert_eq!(deleted(&updates), vec![0]);
        assert_eq!(source.visible_count(), 0);
        assert!(!source.has_items(PlaceholderGroup::PostLovers));
    }

    #[test]
    fn test_love_heads_own_loves_stream() {
        let mut source = stream(StreamKind::UserLoves {
            username: "me".to_string(),
        });
        let p1 = post("p1", "u1");
        let love = shared(Love::new("l1", &p1, &user("me", RelationshipPriority::Me)));
        let updates = source.modify(&Payload::Love(love.clone()), ContentChange::Create);
        assert_eq!(deleted(&updates), Vec::<usize>::new());
        assert_eq!(source.visible_count(), 4);

        // already listed
        assert!(source.modify(&Payload::Love(love), ContentChange::Create).is_empty());
    }

    #[test]
    fn test_unloved_post_leaves_loves_stream() {
        let mut source = stream(StreamKind::UserLoves {
            username: "me".to_string(),
        });
        let p1 = post("p1", "u1");
        p1.borrow_mut().is_loved = true;
        fill(&mut source, &[Payload::Post(p1)]);

        let fresh = post("p1", "u1");
        let updates = source.modify(&Payload::Post(fresh), ContentChange::Update);
        assert_eq!(deleted(&updates), vec![0, 1, 2, 3]);
        assert_eq!(source.visible_count(), 0);
    }

    #[test]
    fn test_replaced_post_keeps_its_slot() {
        let mut source = stream(StreamKind::Following);
        fill(
            &mut source,
            &[Payload::Post(post("p1", "u1")), Payload::Post(post("p2", "u1"))],
        );
        let edited = shared(Post::new("p1", "u1").with_text("<p>a</p>").with_text("<p>b</p>"));
        let updates = source.modify(&Payload::Post(edited), ContentChange::Replaced);
        assert_eq!(
            updates,
            vec![StreamUpdate::Change {
                deleted: vec![0, 1, 2, 3],
                inserted: vec![0, 1, 2, 3, 4],
            }]
        );
        assert_eq!(source.item(2).map(CellItem::kind), Some(CellKind::Text(1)));
        assert!(source.item(5).unwrap().is_post("p2"));
        assert!(source.all_items()[0].in_group(PlaceholderGroup::StreamItems));
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let mut source = stream(StreamKind::Following);
        fill(&mut source, &[Payload::Post(post("p1", "u1"))]);
        let unknown = Payload::Post(post("gone", "u1"));
        assert!(source.modify(&unknown, ContentChange::Update).is_empty());
        assert!(source.modify(&unknown, ContentChange::Delete).is_empty());
        assert!(source.modify(&unknown, ContentChange::Replaced).is_empty());
        assert_eq!(source.visible_count(), 4);
    }

    #[test]
    fn test_user_settings_swap_payload() {
        let mut source = stream(StreamKind::UserStream {
            user_id: "me".to_string(),
        });
        let me = user("me", RelationshipPriority::Me);
        source.replace_placeholder(
            PlaceholderGroup::StreamItems,
            CellItemParser::profile_header_items(&me),
        );
        let edited = user("me", RelationshipPriority::Me);
        edited.borrow_mut().name = "Renamed".to_string();

        let update = source.modify_user_settings(&edited);
        assert_eq!(update, Some(StreamUpdate::Reload { paths: vec![0, 1] }));
        let shown = source.item(0).and_then(|i| i.payload()).and_then(Payload::as_user);
        assert_eq!(shown.unwrap().borrow().name, "Renamed");
    }
}
