//! Paged access to the objects a stream shows

use crate::error::Result;
use crate::models::{Comment, Post, Shared, User};

/// Paging metadata returned with each page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseConfig {
    /// Cursor for the next page, if any
    pub next_cursor: Option<String>,
    /// Pages left after this one, when the source knows
    pub total_pages_remaining: Option<usize>,
}

impl ResponseConfig {
    /// A config with no further pages
    pub const fn last_page() -> Self {
        Self {
            next_cursor: None,
            total_pages_remaining: Some(0),
        }
    }

    /// Whether there is nothing left to load
    pub fn is_out_of_data(&self) -> bool {
        self.next_cursor.is_none() || self.total_pages_remaining == Some(0)
    }
}

/// One page of results
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items, in display order
    pub items: Vec<T>,
    /// Paging metadata
    pub config: ResponseConfig,
}

impl<T> Page<T> {
    /// A page with no successor
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            config: ResponseConfig::last_page(),
        }
    }
}

/// Where generators load their content from
#[allow(async_fn_in_trait)]
pub trait StreamSource {
    /// Load a user
    async fn user(&self, user_id: &str) -> Result<Shared<User>>;

    /// Load a page of a user's posts
    async fn user_posts(&self, user_id: &str, cursor: Option<&str>) -> Result<Page<Shared<Post>>>;

    /// Load a post
    async fn post(&self, post_id: &str) -> Result<Shared<Post>>;

    /// Load a page of a post's comments
    async fn post_comments(
        &self,
        post_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Shared<Comment>>>;

    /// Users who loved a post
    async fn post_lovers(&self, post_id: &str) -> Result<Vec<Shared<User>>>;

    /// Users who reposted a post
    async fn post_reposters(&self, post_id: &str) -> Result<Vec<Shared<User>>>;

    /// Posts related to a post
    async fn related_posts(&self, post_id: &str) -> Result<Vec<Shared<Post>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_data() {
        assert!(ResponseConfig::default().is_out_of_data());
        assert!(ResponseConfig::last_page().is_out_of_data());
        let more = ResponseConfig {
            next_cursor: Some("abc".to_string()),
            total_pages_remaining: None,
        };
        assert!(!more.is_out_of_data());
        let counted_out = ResponseConfig {
            next_cursor: Some("abc".to_string()),
            total_pages_remaining: Some(0),
        };
        assert!(counted_out.is_out_of_data());
    }
}
