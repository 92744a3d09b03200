//! Strip of user avatars shown under a post (lovers, reposters)

use super::{Shared, User};

/// Which users the strip lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvatarsKind {
    /// Users who loved the post
    Lovers,
    /// Users who reposted the post
    Reposters,
}

impl AvatarsKind {
    /// Short name, used in identities
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lovers => "lovers",
            Self::Reposters => "reposters",
        }
    }
}

/// Avatars of users related to one post
#[derive(Debug, Clone)]
pub struct UserAvatars {
    /// Post the strip belongs to
    pub post_id: String,
    /// Which users the strip lists
    pub kind: AvatarsKind,
    /// Listed users, in display order
    pub users: Vec<Shared<User>>,
}

impl UserAvatars {
    /// Create a strip
    pub fn new(post_id: &str, kind: AvatarsKind, users: Vec<Shared<User>>) -> Self {
        Self {
            post_id: post_id.to_string(),
            kind,
            users,
        }
    }

    /// Stable identity: one strip per post and kind
    pub fn id(&self) -> String {
        format!("{}:{}", self.post_id, self.kind.name())
    }

    /// Whether this strip lists `kind` users of the given post
    pub fn belongs_to(&self, post_id: &str, kind: AvatarsKind) -> bool {
        self.post_id == post_id && self.kind == kind
    }

    /// Add a user at the front, unless already listed
    pub fn append(&mut self, user: Shared<User>) {
        let id = user.borrow().id.clone();
        if !self.users.iter().any(|u| u.borrow().id == id) {
            self.users.insert(0, user);
        }
    }

    /// Remove a user by ID
    pub fn remove(&mut self, user_id: &str) {
        self.users.retain(|u| u.borrow().id != user_id);
    }
}
