//! Profile stream: header plus the user's posts

use super::{StreamDestination, placeholders};
use crate::api::StreamSource;
use crate::models::{Payload, Shared, User};
use crate::stream::{CellItemParser, PlaceholderGroup, StreamKind};

const GROUPS: [PlaceholderGroup; 2] = [PlaceholderGroup::ProfileHeader, PlaceholderGroup::StreamItems];

/// Loads a user's profile into a stream
pub struct ProfileGenerator<'a, S> {
    source: &'a S,
    user_id: String,
    user: Option<Shared<User>>,
    parser: CellItemParser,
    next_cursor: Option<String>,
}

impl<'a, S: StreamSource> ProfileGenerator<'a, S> {
    /// Create a generator; a known `user` is shown before the load finishes
    pub fn new(source: &'a S, user_id: &str, user: Option<Shared<User>>) -> Self {
        Self {
            source,
            user_id: user_id.to_string(),
            user,
            parser: CellItemParser::new(StreamKind::UserStream {
                user_id: user_id.to_string(),
            }),
            next_cursor: None,
        }
    }

    /// Whether another page of posts can be loaded
    pub const fn has_next_page(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Initial load: declares both groups and fills each once
    pub async fn load<D: StreamDestination>(&mut self, destination: &mut D) {
        destination.set_placeholders(placeholders(&GROUPS)).await;

        if let Some(user) = &self.user {
            destination.set_primary(Payload::User(user.clone()));
        }

        let (user, posts) = futures::join!(
            self.source.user(&self.user_id),
            self.source.user_posts(&self.user_id, None)
        );

        let user = match user {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                destination.primary_model_not_found();
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to load profile {}: {}", self.user_id, e);
                for group in GROUPS {
                    destination.replace_placeholder(group, Vec::new()).await;
                }
                return;
            }
        };

        self.user = Some(user.clone());
        destination.set_primary(Payload::User(user.clone()));
        destination
            .replace_placeholder(
                PlaceholderGroup::ProfileHeader,
                CellItemParser::profile_header_items(&user),
            )
            .await;

        let items = match posts {
            Ok(page) => {
                self.next_cursor.clone_from(&page.config.next_cursor);
                destination.set_paging_config(page.config);
                let payloads: Vec<Payload> = page.items.into_iter().map(Payload::Post).collect();
                if payloads.is_empty() {
                    CellItemParser::no_posts_items()
                } else {
                    self.parser.parse(&payloads)
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load posts for {}: {}", self.user_id, e);
                Vec::new()
            }
        };
        destination
            .replace_placeholder(PlaceholderGroup::StreamItems, items)
            .await;
    }

    /// Append the next page of posts, if there is one
    pub async fn load_next_page<D: StreamDestination>(&mut self, destination: &mut D) {
        let Some(cursor) = self.next_cursor.take() else {
            return;
        };
        match self.source.user_posts(&self.user_id, Some(&cursor)).await {
            Ok(page) => {
                self.next_cursor.clone_from(&page.config.next_cursor);
                destination.set_paging_config(page.config);
                let payloads: Vec<Payload> = page.items.into_iter().map(Payload::Post).collect();
                destination
                    .append_items(PlaceholderGroup::StreamItems, self.parser.parse(&payloads))
                    .await;
            }
            Err(e) => {
                tracing::warn!("Failed to load more posts for {}: {}", self.user_id, e);
                self.next_cursor = Some(cursor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::testing::{RecordingDestination, ScriptedSource};
    use crate::models::{Post, shared};
    use crate::stream::CellKind;

    fn source() -> ScriptedSource {
        ScriptedSource {
            users: vec![shared(User::new("42", "ann"))],
            posts: (0..3)
                .map(|i| shared(Post::new(&format!("p{i}"), "42").with_text("<p>hi</p>")))
                .collect(),
            ..ScriptedSource::default()
        }
    }

    #[tokio::test]
    async fn test_load_sets_both_groups() {
        let source = source();
        let mut destination = RecordingDestination::default();
        let mut generator = ProfileGenerator::new(&source, "42", None);
        generator.load(&mut destination).await;

        assert_eq!(destination.placeholders, GROUPS.to_vec());
        assert!(destination.count(PlaceholderGroup::ProfileHeader) > 0);
        assert_eq!(destination.count(PlaceholderGroup::StreamItems), 8);
        assert_eq!(
            destination.replaced,
            vec![PlaceholderGroup::ProfileHeader, PlaceholderGroup::StreamItems]
        );
        assert!(matches!(&destination.primary, Some(Payload::User(u)) if u.borrow().id == "42"));
        assert!(destination.paging.is_some());
        assert!(generator.has_next_page());
    }

    #[tokio::test]
    async fn test_next_page_appends() {
        let source = source();
        let mut destination = RecordingDestination::default();
        let mut generator = ProfileGenerator::new(&source, "42", None);
        generator.load(&mut destination).await;
        generator.load_next_page(&mut destination).await;

        assert_eq!(destination.count(PlaceholderGroup::StreamItems), 12);
        assert!(!generator.has_next_page());
        assert!(destination.paging.as_ref().is_some_and(|c| c.is_out_of_data()));
    }

    #[tokio::test]
    async fn test_user_without_posts() {
        let source = ScriptedSource {
            users: vec![shared(User::new("42", "ann"))],
            ..ScriptedSource::default()
        };
        let mut destination = RecordingDestination::default();
        ProfileGenerator::new(&source, "42", None)
            .load(&mut destination)
            .await;

        let items = &destination.groups[&PlaceholderGroup::StreamItems];
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind(), CellKind::NoPosts);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let source = source();
        let mut destination = RecordingDestination::default();
        ProfileGenerator::new(&source, "nobody", None)
            .load(&mut destination)
            .await;
        assert!(destination.not_found);
        assert!(destination.replaced.is_empty());
    }

    #[tokio::test]
    async fn test_offline_still_sets_groups() {
        let source = ScriptedSource {
            offline: true,
            ..source()
        };
        let mut destination = RecordingDestination::default();
        ProfileGenerator::new(&source, "42", None)
            .load(&mut destination)
            .await;
        assert!(!destination.not_found);
        assert_eq!(destination.replaced.len(), 2);
        assert_eq!(destination.count(PlaceholderGroup::StreamItems), 0);
    }
}
