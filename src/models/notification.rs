//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Shared, User};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone commented
    Comment,
    /// Someone mentioned the current user
    Mention,
    /// Someone loved a post
    Love,
    /// Someone reposted a post
    Repost,
    /// Someone followed the current user
    Follow,
    /// Anything else
    Other,
}

/// An activity notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Server ID
    pub id: String,
    /// What happened
    pub kind: NotificationKind,
    /// ID of the user who caused it
    pub author_id: Option<String>,
    /// User who caused it
    #[serde(skip)]
    pub author: Option<Shared<User>>,
    /// ID of the post or comment the notification is about
    pub subject_id: Option<String>,
    /// Summary text (HTML)
    #[serde(default)]
    pub text: String,
    /// When it happened
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification
    pub fn new(id: &str, kind: NotificationKind, author_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            kind,
            author_id: author_id.map(str::to_string),
            author: None,
            subject_id: None,
            text: String::new(),
            created_at: Utc::now(),
        }
    }
}
