//! Editorial model

use serde::{Deserialize, Serialize};

use super::{Post, Shared};

/// Editorial card layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorialKind {
    /// A single featured post
    Post,
    /// A carousel of posts
    PostStream,
    /// A link to an external page
    External,
    /// A link into the app
    Internal,
    /// Invite-your-friends card
    Invite,
    /// Sign-up card for logged out users
    Join,
}

/// A curated editorial card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Editorial {
    /// Server ID
    pub id: String,
    /// Card layout
    pub kind: EditorialKind,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Subtitle (HTML)
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Background image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the background image has been fetched
    #[serde(default)]
    pub image_ready: bool,
    /// Featured posts
    #[serde(skip)]
    pub posts: Vec<Shared<Post>>,
}

impl Editorial {
    /// Create an editorial card
    pub fn new(id: &str, kind: EditorialKind, title: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            subtitle: None,
            image_url: None,
            image_ready: false,
            posts: Vec::new(),
        }
    }
}
