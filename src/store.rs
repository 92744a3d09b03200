//! Repository of loaded domain objects
//!
//! Relations between models (a post's author, a love's post) are resolved
//! through a [`ModelStore`] that callers pass around explicitly. Saving an
//! object whose ID is already known merges into the existing handle, so
//! every stream row that holds it observes the update.

use std::collections::HashMap;
use std::rc::Rc;

use crate::models::{Comment, Love, Post, Shared, User};

/// Loaded users and posts, keyed by server ID
#[derive(Debug, Default)]
pub struct ModelStore {
    users: HashMap<String, Shared<User>>,
    posts: HashMap<String, Shared<Post>>,
}

impl ModelStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a user
    pub fn user(&self, id: &str) -> Option<Shared<User>> {
        self.users.get(id).cloned()
    }

    /// Look up a post
    pub fn post(&self, id: &str) -> Option<Shared<Post>> {
        self.posts.get(id).cloned()
    }

    /// Save a user, returning the canonical handle for its ID
    pub fn save_user(&mut self, user: &Shared<User>) -> Shared<User> {
        let id = user.borrow().id.clone();
        if let Some(existing) = self.users.get(&id) {
            if !Rc::ptr_eq(existing, user) {
                existing.borrow_mut().merge(&user.borrow());
            }
            return existing.clone();
        }
        self.users.insert(id, user.clone());
        user.clone()
    }

    /// Save a post and link its author and repost author, returning the
    /// canonical handle for its ID
    pub fn save_post(&mut self, post: &Shared<Post>) -> Shared<Post> {
        self.link_post(post);
        let id = post.borrow().id.clone();
        if let Some(existing) = self.posts.get(&id) {
            if !Rc::ptr_eq(existing, post) {
                existing.borrow_mut().merge(&post.borrow());
            }
            return existing.clone();
        }
        self.posts.insert(id, post.clone());
        post.clone()
    }

    /// Resolve a comment's author and parent post
    pub fn link_comment(&self, comment: &Shared<Comment>) {
        let mut comment = comment.borrow_mut();
        if comment.author.is_none() {
            comment.author = self.user(&comment.author_id);
        }
        if comment.loaded_from_post.is_none() {
            comment.loaded_from_post = self.post(&comment.loaded_from_post_id);
        }
    }

    /// Resolve a love's post and user
    pub fn link_love(&self, love: &Shared<Love>) {
        let mut love = love.borrow_mut();
        if love.post.is_none() {
            love.post = self.post(&love.post_id);
        }
        if love.user.is_none() {
            love.user = self.user(&love.user_id);
        }
    }

    fn link_post(&self, post: &Shared<Post>) {
        let mut post = post.borrow_mut();
        if post.author.is_none() {
            post.author = self.user(&post.author_id);
        }
        if post.repost_author.is_none()
            && let Some(id) = post.repost_author_id.clone()
        {
            post.repost_author = self.user(&id);
        }
    }
}
