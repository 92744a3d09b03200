//! Generators fill a stream's placeholder groups from a [`StreamSource`]
//!
//! A generator declares every group it owns up front, then replaces each of
//! them exactly once per load, with an empty list when there is nothing to
//! show, so the destination never has to guess which sections exist.
//!
//! [`StreamSource`]: crate::api::StreamSource

mod post_detail;
mod profile;

pub use post_detail::PostDetailGenerator;
pub use profile::ProfileGenerator;

use crate::api::ResponseConfig;
use crate::models::Payload;
use crate::stream::{CellItem, PlaceholderGroup};

/// What a generator writes into
#[allow(async_fn_in_trait)]
pub trait StreamDestination {
    /// Replace the stream with one placeholder marker per group
    async fn set_placeholders(&mut self, items: Vec<CellItem>);

    /// Replace every row of a group
    async fn replace_placeholder(&mut self, group: PlaceholderGroup, items: Vec<CellItem>);

    /// Add rows to the end of a group (a later page)
    async fn append_items(&mut self, group: PlaceholderGroup, items: Vec<CellItem>) {
        tracing::debug!(
            "Destination does not page; dropping {} {:?} rows",
            items.len(),
            group
        );
    }

    /// The object the stream is about
    fn set_primary(&mut self, payload: Payload);

    /// Paging metadata of the latest page
    fn set_paging_config(&mut self, config: ResponseConfig);

    /// The object the stream is about does not exist
    fn primary_model_not_found(&mut self);
}

fn placeholders(groups: &[PlaceholderGroup]) -> Vec<CellItem> {
    groups.iter().map(|&group| CellItem::placeholder(group)).collect()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording destination and scripted source shared by generator tests

    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::api::{Page, StreamSource};
    use crate::error::{Result, SourceError};
    use crate::models::{Comment, Post, Shared, User};

    #[derive(Default)]
    pub struct RecordingDestination {
        pub placeholders: Vec<PlaceholderGroup>,
        pub groups: HashMap<PlaceholderGroup, Vec<CellItem>>,
        pub replaced: Vec<PlaceholderGroup>,
        pub primary: Option<Payload>,
        pub paging: Option<ResponseConfig>,
        pub not_found: bool,
    }

    impl RecordingDestination {
        pub fn count(&self, group: PlaceholderGroup) -> usize {
            self.groups.get(&group).map_or(0, Vec::len)
        }
    }

    impl StreamDestination for RecordingDestination {
        async fn set_placeholders(&mut self, items: Vec<CellItem>) {
            self.placeholders = items.iter().filter_map(|item| item.group).collect();
        }

        async fn replace_placeholder(&mut self, group: PlaceholderGroup, items: Vec<CellItem>) {
            self.replaced.push(group);
            self.groups.insert(group, items);
        }

        async fn append_items(&mut self, group: PlaceholderGroup, items: Vec<CellItem>) {
            self.groups.entry(group).or_default().extend(items);
        }

        fn set_primary(&mut self, payload: Payload) {
            self.primary = Some(payload);
        }

        fn set_paging_config(&mut self, config: ResponseConfig) {
            self.paging = Some(config);
        }

        fn primary_model_not_found(&mut self) {
            self.not_found = true;
        }
    }

    /// Serves fixed data; comment pages are consumed in order
    #[derive(Default)]
    pub struct ScriptedSource {
        pub users: Vec<Shared<User>>,
        pub posts: Vec<Shared<Post>>,
        pub lovers: Vec<Shared<User>>,
        pub reposters: Vec<Shared<User>>,
        pub related: Vec<Shared<Post>>,
        pub comment_pages: RefCell<Vec<Page<Shared<Comment>>>>,
        pub offline: bool,
    }

    impl ScriptedSource {
        fn check(&self) -> Result<()> {
            if self.offline {
                Err(SourceError::Unavailable("offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl StreamSource for ScriptedSource {
        async fn user(&self, user_id: &str) -> Result<Shared<User>> {
            self.check()?;
            self.users
                .iter()
                .find(|u| u.borrow().id == user_id)
                .cloned()
                .ok_or_else(|| SourceError::not_found("user", user_id))
        }

        async fn user_posts(
            &self,
            user_id: &str,
            cursor: Option<&str>,
        ) -> Result<Page<Shared<Post>>> {
            self.check()?;
            let posts: Vec<Shared<Post>> = self
                .posts
                .iter()
                .filter(|p| p.borrow().author_id == user_id)
                .cloned()
                .collect();
            // two posts per page; the cursor is the offset
            let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
            let end = (start + 2).min(posts.len());
            let next_cursor = (end < posts.len()).then(|| end.to_string());
            Ok(Page {
                items: posts[start.min(end)..end].to_vec(),
                config: ResponseConfig {
                    next_cursor,
                    total_pages_remaining: None,
                },
            })
        }

        async fn post(&self, post_id: &str) -> Result<Shared<Post>> {
            self.check()?;
            self.posts
                .iter()
                .find(|p| p.borrow().id == post_id)
                .cloned()
                .ok_or_else(|| SourceError::not_found("post", post_id))
        }

        async fn post_comments(
            &self,
            _post_id: &str,
            _cursor: Option<&str>,
        ) -> Result<Page<Shared<Comment>>> {
            self.check()?;
            let mut pages = self.comment_pages.borrow_mut();
            if pages.is_empty() {
                return Ok(Page::last(Vec::new()));
            }
            Ok(pages.remove(0))
        }

        async fn post_lovers(&self, _post_id: &str) -> Result<Vec<Shared<User>>> {
            self.check()?;
            Ok(self.lovers.clone())
        }

        async fn post_reposters(&self, _post_id: &str) -> Result<Vec<Shared<User>>> {
            self.check()?;
            Ok(self.reposters.clone())
        }

        async fn related_posts(&self, _post_id: &str) -> Result<Vec<Shared<Post>>> {
            self.check()?;
            Ok(self.related.clone())
        }
    }
}
