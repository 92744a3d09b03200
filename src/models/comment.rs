//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Post, Shared, User};

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Server ID
    pub id: String,
    /// Author ID
    pub author_id: String,
    /// Author (resolved through the model store)
    #[serde(skip)]
    pub author: Option<Shared<User>>,
    /// ID of the post the comment was written on
    pub post_id: String,
    /// ID of the post whose stream loaded this comment (differs from
    /// `post_id` for comments on reposts)
    pub loaded_from_post_id: String,
    /// The post whose stream loaded this comment
    #[serde(skip)]
    pub loaded_from_post: Option<Shared<Post>>,
    /// HTML content
    #[serde(default)]
    pub content: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment on a post
    pub fn new(id: &str, author_id: &str, post_id: &str) -> Self {
        Self {
            id: id.to_string(),
            author_id: author_id.to_string(),
            author: None,
            post_id: post_id.to_string(),
            loaded_from_post_id: post_id.to_string(),
            loaded_from_post: None,
            content: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Stand-in comment carried by the rows that belong to a post's comment
    /// area (create-comment bar, see-more row)
    pub fn new_for_post(post: &Shared<Post>) -> Self {
        let (post_id, author_id) = {
            let post = post.borrow();
            (post.id.clone(), post.author_id.clone())
        };
        Self {
            id: format!("new-comment:{post_id}"),
            author_id,
            author: None,
            post_id: post_id.clone(),
            loaded_from_post_id: post_id,
            loaded_from_post: Some(post.clone()),
            content: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether this comment belongs to the given post's comment area
    pub fn belongs_to_post(&self, post_id: &str) -> bool {
        self.loaded_from_post_id == post_id || self.post_id == post_id
    }

    /// Copy server state from a fresher copy of the same comment
    pub fn merge(&mut self, other: &Comment) {
        self.content.clone_from(&other.content);
        if other.author.is_some() {
            self.author.clone_from(&other.author);
        }
    }
}
