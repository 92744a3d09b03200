//! Turns domain objects into stream rows

use super::cell_item::CellItem;
use super::kind::{CellKind, CellState, StreamKind};
use crate::models::{
    AvatarsKind, Comment, Love, Payload, Post, Region, Shared, User, UserAvatars, shared,
};

/// Builds the rows that render each payload in a given stream
#[derive(Debug, Clone)]
pub struct CellItemParser {
    stream_kind: StreamKind,
}

impl CellItemParser {
    /// Create a parser for a stream
    pub const fn new(stream_kind: StreamKind) -> Self {
        Self { stream_kind }
    }

    /// Rows for a list of payloads, in order
    pub fn parse(&self, payloads: &[Payload]) -> Vec<CellItem> {
        payloads.iter().flat_map(|p| self.payload_items(p)).collect()
    }

    /// Rows for one payload
    pub fn payload_items(&self, payload: &Payload) -> Vec<CellItem> {
        match payload {
            Payload::Post(post) => self.post_items(post),
            Payload::Comment(comment) => Self::comment_items(comment),
            Payload::Love(love) => self.love_items(love),
            Payload::User(user) => vec![CellItem::new(CellKind::UserListItem, user.clone())],
            Payload::Notification(n) => vec![CellItem::new(CellKind::Notification, n.clone())],
            Payload::Editorial(e) => vec![CellItem::new(CellKind::Editorial, e.clone())],
            Payload::Badge(b) => vec![CellItem::new(CellKind::Badge, b.clone())],
            Payload::UserAvatars(a) => vec![CellItem::new(CellKind::UserAvatars, a.clone())],
        }
    }

    /// Header, one row per content region, footer and spacing
    pub fn post_items(&self, post: &Shared<Post>) -> Vec<CellItem> {
        let (state, regions) = {
            let p = post.borrow();
            let state = if p.content_warning.is_some() {
                CellState::Collapsed
            } else {
                CellState::Expanded
            };
            (state, p.content.clone())
        };

        let mut items = vec![CellItem::new(CellKind::StreamHeader, post.clone()).with_state(state)];
        for (index, region) in regions.iter().enumerate() {
            let kind = match region {
                Region::Text { .. } => CellKind::Text(index),
                Region::Image { .. } => CellKind::Image(index),
                Region::Embed { .. } => CellKind::Embed(index),
            };
            items.push(CellItem::new(kind, post.clone()).with_state(state));
        }
        items.push(CellItem::new(CellKind::Footer, post.clone()).with_state(state));
        if !matches!(self.stream_kind, StreamKind::PostDetail { .. }) {
            items.push(CellItem::new(CellKind::Spacer, post.clone()));
        }
        items
    }

    /// Header and body
    pub fn comment_items(comment: &Shared<Comment>) -> Vec<CellItem> {
        vec![
            CellItem::new(CellKind::CommentHeader, comment.clone()),
            CellItem::new(CellKind::CommentBody, comment.clone()),
        ]
    }

    /// A love renders as the loved post
    fn love_items(&self, love: &Shared<Love>) -> Vec<CellItem> {
        let post = love.borrow().post.clone();
        post.map(|p| self.post_items(&p)).unwrap_or_default()
    }

    /// Rows at the top of a profile
    pub fn profile_header_items(user: &Shared<User>) -> Vec<CellItem> {
        vec![
            CellItem::new(CellKind::ProfileHeader, user.clone()),
            CellItem::new(CellKind::Spacer, user.clone()),
        ]
    }

    /// The create-comment bar for a post
    pub fn create_comment_item(post: &Shared<Post>) -> CellItem {
        CellItem::new(
            CellKind::CreateComment,
            shared(Comment::new_for_post(post)),
        )
    }

    /// The see-more-comments row for a post
    pub fn see_more_comments_item(post: &Shared<Post>) -> CellItem {
        CellItem::new(
            CellKind::SeeMoreComments,
            shared(Comment::new_for_post(post)),
        )
    }

    /// An avatar strip, or nothing when there are no users
    pub fn user_avatar_items(
        users: Vec<Shared<User>>,
        post_id: &str,
        kind: AvatarsKind,
    ) -> Vec<CellItem> {
        if users.is_empty() {
            return Vec::new();
        }
        let avatars = shared(UserAvatars::new(post_id, kind, users));
        vec![CellItem::new(CellKind::UserAvatars, avatars)]
    }

    /// Spacing under the avatar strips
    pub fn social_padding() -> Vec<CellItem> {
        vec![CellItem::structural(CellKind::Spacer)]
    }

    /// Shown in a profile with no posts
    pub fn no_posts_items() -> Vec<CellItem> {
        vec![CellItem::structural(CellKind::NoPosts)]
    }
}
