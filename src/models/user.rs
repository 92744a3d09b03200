//! User model

use serde::{Deserialize, Serialize};

/// The current user's relationship to another user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipPriority {
    /// Followed by the current user
    Following,
    /// No relationship
    #[default]
    None,
    /// Previously followed
    Inactive,
    /// Blocked by the current user
    Block,
    /// Muted by the current user
    Mute,
    /// The current user themself
    Me,
}

impl RelationshipPriority {
    /// Whether content from this user should disappear from streams
    pub const fn is_muted_or_blocked(&self) -> bool {
        matches!(self, Self::Block | Self::Mute)
    }
}

/// A user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Server ID
    pub id: String,
    /// Username (without the @)
    pub username: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Avatar URL
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Relationship to the current user
    #[serde(default)]
    pub relationship: RelationshipPriority,
    /// Number of followers
    #[serde(default)]
    pub followers_count: u32,
    /// Number of followed users
    #[serde(default)]
    pub following_count: u32,
    /// Number of posts
    #[serde(default)]
    pub posts_count: u32,
    /// Badge slugs
    #[serde(default)]
    pub badges: Vec<String>,
}

impl User {
    /// Create a new user
    pub fn new(id: &str, username: &str) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            name: String::new(),
            avatar_url: None,
            relationship: RelationshipPriority::None,
            followers_count: 0,
            following_count: 0,
            posts_count: 0,
            badges: Vec::new(),
        }
    }

    /// Handle with the leading @
    pub fn at_name(&self) -> String {
        format!("@{}", self.username)
    }

    /// Copy relationship state (priority and counts) from another copy
    pub fn merge_relationship(&mut self, other: &User) {
        self.relationship = other.relationship;
        self.followers_count = other.followers_count;
        self.following_count = other.following_count;
    }

    /// Copy server state from a fresher copy of the same user
    pub fn merge(&mut self, other: &User) {
        self.username.clone_from(&other.username);
        self.name.clone_from(&other.name);
        self.avatar_url.clone_from(&other.avatar_url);
        self.posts_count = other.posts_count;
        self.badges.clone_from(&other.badges);
        self.merge_relationship(other);
    }
}
