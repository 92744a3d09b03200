//! Love model

use serde::{Deserialize, Serialize};

use super::{Post, Shared, User};

/// A user's love of a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Love {
    /// Server ID
    pub id: String,
    /// Whether the love was withdrawn
    #[serde(default)]
    pub is_deleted: bool,
    /// Loved post ID
    pub post_id: String,
    /// Loving user ID
    pub user_id: String,
    /// Loved post
    #[serde(skip)]
    pub post: Option<Shared<Post>>,
    /// Loving user
    #[serde(skip)]
    pub user: Option<Shared<User>>,
}

impl Love {
    /// Create a love linking a user to a post
    pub fn new(id: &str, post: &Shared<Post>, user: &Shared<User>) -> Self {
        Self {
            id: id.to_string(),
            is_deleted: false,
            post_id: post.borrow().id.clone(),
            user_id: user.borrow().id.clone(),
            post: Some(post.clone()),
            user: Some(user.clone()),
        }
    }
}
