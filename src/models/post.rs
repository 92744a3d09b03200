//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Shared, User};

/// A post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Server ID
    pub id: String,
    /// Short token used in permalinks
    #[serde(default)]
    pub token: String,
    /// Author ID
    pub author_id: String,
    /// Author (resolved through the model store)
    #[serde(skip)]
    pub author: Option<Shared<User>>,
    /// ID of the original author, if this is a repost
    #[serde(default)]
    pub repost_author_id: Option<String>,
    /// Original author (if repost)
    #[serde(skip)]
    pub repost_author: Option<Shared<User>>,
    /// Content regions, in display order
    #[serde(default)]
    pub content: Vec<Region>,
    /// Content warning; posts that carry one start collapsed
    #[serde(default)]
    pub content_warning: Option<String>,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// Number of loves
    #[serde(default)]
    pub loves_count: u32,
    /// Number of reposts
    #[serde(default)]
    pub reposts_count: u32,
    /// Number of comments
    #[serde(default)]
    pub comments_count: u32,
    /// Number of views
    #[serde(default)]
    pub views_count: u32,
    /// Whether the current user loves this post
    #[serde(default)]
    pub is_loved: bool,
    /// Whether the current user has reposted this post
    #[serde(default)]
    pub is_reposted: bool,
    /// Whether the current user is watching this post's comments
    #[serde(default)]
    pub is_watching: bool,
}

/// One block of post content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Region {
    /// HTML text
    Text {
        /// Raw HTML
        content: String,
    },
    /// Image, optionally with its intrinsic size
    Image {
        /// Image URL
        url: String,
        /// Intrinsic width in pixels
        width: Option<u32>,
        /// Intrinsic height in pixels
        height: Option<u32>,
    },
    /// Embedded media (video, audio, ...)
    Embed {
        /// Embed URL
        url: String,
    },
}

impl Post {
    /// Create an empty post
    pub fn new(id: &str, author_id: &str) -> Self {
        Self {
            id: id.to_string(),
            token: String::new(),
            author_id: author_id.to_string(),
            author: None,
            repost_author_id: None,
            repost_author: None,
            content: Vec::new(),
            content_warning: None,
            created_at: Utc::now(),
            loves_count: 0,
            reposts_count: 0,
            comments_count: 0,
            views_count: 0,
            is_loved: false,
            is_reposted: false,
            is_watching: false,
        }
    }

    /// Add a text region
    pub fn with_text(mut self, content: &str) -> Self {
        self.content.push(Region::Text {
            content: content.to_string(),
        });
        self
    }

    /// Whether this post is a repost
    pub fn is_repost(&self) -> bool {
        self.repost_author_id.is_some()
    }

    /// Whether the given user wrote or reposted this post
    pub fn involves_user(&self, user_id: &str) -> bool {
        self.author_id == user_id || self.repost_author_id.as_deref() == Some(user_id)
    }

    /// Copy server state from a fresher copy of the same post
    pub fn merge(&mut self, other: &Post) {
        self.token.clone_from(&other.token);
        self.author_id.clone_from(&other.author_id);
        if other.author.is_some() {
            self.author.clone_from(&other.author);
        }
        self.repost_author_id.clone_from(&other.repost_author_id);
        if other.repost_author.is_some() {
            self.repost_author.clone_from(&other.repost_author);
        }
        if !other.content.is_empty() {
            self.content.clone_from(&other.content);
        }
        self.content_warning.clone_from(&other.content_warning);
        self.loves_count = other.loves_count;
        self.reposts_count = other.reposts_count;
        self.comments_count = other.comments_count;
        self.views_count = other.views_count;
        self.is_loved = other.is_loved;
        self.is_reposted = other.is_reposted;
        self.is_watching = other.is_watching;
    }

    /// Get relative time string (e.g., "5m", "2h", "3d")
    pub fn relative_time(&self) -> String {
        let duration = Utc::now().signed_duration_since(self.created_at);

        if duration.num_seconds() < 60 {
            format!("{}s", duration.num_seconds())
        } else if duration.num_minutes() < 60 {
            format!("{}m", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d", duration.num_days())
        } else {
            self.created_at.format("%b %d").to_string()
        }
    }
}
