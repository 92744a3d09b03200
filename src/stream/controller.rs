//! Single owner of a stream's data source
//!
//! Commands are applied in the order they are received. Incoming rows are
//! measured before they enter the stream, and every resulting update is sent
//! to the view over an unbounded channel.

use tokio::sync::mpsc;

use super::cell_item::CellItem;
use super::data_source::{StreamDataSource, StreamUpdate};
use super::filter::StreamFilter;
use super::kind::{ContentChange, PlaceholderGroup};
use super::sizing::{EditorialPrefetcher, SizeCalculator, calculate_cell_items, measure};
use crate::api::ResponseConfig;
use crate::generators::StreamDestination;
use crate::models::{Payload, Shared, User};
use crate::store::ModelStore;

/// Commands accepted by a [`StreamController`]
pub enum StreamCommand {
    /// Replace the whole stream with placeholder markers
    SetPlaceholders {
        /// Markers, one per group
        items: Vec<CellItem>,
    },
    /// Append rows
    Append {
        /// New rows
        items: Vec<CellItem>,
    },
    /// Insert rows before a visible position
    Insert {
        /// New rows
        items: Vec<CellItem>,
        /// Visible position
        at: usize,
    },
    /// Replace every row of a group
    ReplacePlaceholder {
        /// Group to replace
        group: PlaceholderGroup,
        /// New rows
        items: Vec<CellItem>,
    },
    /// Append rows to the end of a group
    AppendToGroup {
        /// Group to extend
        group: PlaceholderGroup,
        /// New rows
        items: Vec<CellItem>,
    },
    /// Remove rows at visible positions
    Remove {
        /// Visible positions
        paths: Vec<usize>,
    },
    /// Swap the caller filter
    UpdateFilter {
        /// New filter, or none
        filter: Option<StreamFilter>,
    },
    /// Collapse or expand the post at a visible position
    ToggleCollapsed {
        /// Visible position
        index: usize,
    },
    /// Apply a content event
    Modify {
        /// Object the event is about
        payload: Payload,
        /// What happened to it
        change: ContentChange,
    },
    /// Apply a relationship change
    UserRelationship {
        /// User with the new relationship
        user: Shared<User>,
    },
    /// Apply edited profile settings
    UserSettings {
        /// Edited user
        user: Shared<User>,
    },
    /// Record a height measured by the view
    UpdateHeight {
        /// Visible position
        index: usize,
        /// Measured height
        height: f32,
    },
    /// The stream changed size
    Resize {
        /// New width
        width: f32,
        /// New column count
        column_count: usize,
    },
    /// Stop the command loop
    Shutdown,
}

/// Drives a [`StreamDataSource`] and reports its changes
pub struct StreamController<C, P> {
    data_source: StreamDataSource,
    store: ModelStore,
    calculator: C,
    prefetcher: P,
    width: f32,
    updates: mpsc::UnboundedSender<StreamUpdate>,
    primary: Option<Payload>,
    paging: Option<ResponseConfig>,
    primary_not_found: bool,
}

impl<C, P> StreamController<C, P>
where
    C: SizeCalculator,
    P: EditorialPrefetcher,
{
    /// Create a controller; updates are sent to `updates`
    pub fn new(
        data_source: StreamDataSource,
        calculator: C,
        prefetcher: P,
        width: f32,
        updates: mpsc::UnboundedSender<StreamUpdate>,
    ) -> Self {
        Self {
            data_source,
            store: ModelStore::new(),
            calculator,
            prefetcher,
            width,
            updates,
            primary: None,
            paging: None,
            primary_not_found: false,
        }
    }

    /// The driven data source
    pub const fn data_source(&self) -> &StreamDataSource {
        &self.data_source
    }

    /// Loaded users and posts
    pub const fn store(&self) -> &ModelStore {
        &self.store
    }

    /// The object this stream is about (a profile's user, a detail's post)
    pub const fn primary(&self) -> Option<&Payload> {
        self.primary.as_ref()
    }

    /// Latest paging metadata
    pub const fn paging_config(&self) -> Option<&ResponseConfig> {
        self.paging.as_ref()
    }

    /// Whether the primary object failed to load
    pub const fn is_primary_not_found(&self) -> bool {
        self.primary_not_found
    }

    /// Apply commands until the channel closes or a shutdown arrives
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<StreamCommand>) {
        while let Some(command) = commands.recv().await {
            if !self.handle(command).await {
                break;
            }
        }
        tracing::debug!("Stream {} controller stopped", self.data_source.stream_kind.name());
    }

    /// Apply one command; returns `false` on shutdown
    pub async fn handle(&mut self, command: StreamCommand) -> bool {
        match command {
            StreamCommand::Shutdown => return false,
            StreamCommand::SetPlaceholders { items } => {
                let previous = self.data_source.visible_count();
                self.data_source.set_placeholders(items);
                self.size_missing().await;
                self.send(StreamUpdate::Change {
                    deleted: (0..previous).collect(),
                    inserted: (0..self.data_source.visible_count()).collect(),
                });
            }
            StreamCommand::Append { items } => {
                let items = self.sized(items).await;
                let inserted = self.data_source.append(items);
                self.send_inserted(inserted);
            }
            StreamCommand::Insert { items, at } => {
                let items = self.sized(items).await;
                let inserted = self.data_source.insert(items, at);
                self.send_inserted(inserted);
            }
            StreamCommand::ReplacePlaceholder { group, items } => {
                let items = self.sized(items).await;
                let (deleted, inserted) = self.data_source.replace_placeholder(group, items);
                self.send(StreamUpdate::Change { deleted, inserted });
            }
            StreamCommand::AppendToGroup { group, items } => {
                let items = self.sized(items).await;
                let (deleted, inserted) = self.data_source.append_to_group(group, items);
                self.send(StreamUpdate::Change { deleted, inserted });
            }
            StreamCommand::Remove { mut paths } => {
                paths.retain(|&p| self.data_source.is_valid_index(p));
                paths.sort_unstable();
                paths.dedup();
                self.data_source.remove_items(&paths);
                self.send(StreamUpdate::Change {
                    deleted: paths,
                    inserted: Vec::new(),
                });
            }
            StreamCommand::UpdateFilter { filter } => {
                let delta = self.data_source.update_filter(filter);
                self.size_missing().await;
                self.send(StreamUpdate::Diff(delta));
            }
            StreamCommand::ToggleCollapsed { index } => {
                let delta = self.data_source.toggle_collapsed(index);
                self.size_missing().await;
                self.send(StreamUpdate::Diff(delta));
            }
            StreamCommand::Modify { payload, change } => {
                self.link(&payload);
                let updates = self.data_source.modify(&payload, change);
                self.size_missing().await;
                self.send_all(updates);
            }
            StreamCommand::UserRelationship { user } => {
                let updates = self
                    .data_source
                    .modify_user_relationship(&user, &mut self.store);
                self.send_all(updates);
            }
            StreamCommand::UserSettings { user } => {
                let update = self.data_source.modify_user_settings(&user);
                self.send_all(update);
            }
            StreamCommand::UpdateHeight { index, height } => {
                if self.data_source.update_height(index, height) {
                    self.send(StreamUpdate::Invalidate { index });
                }
            }
            StreamCommand::Resize {
                width,
                column_count,
            } => {
                self.width = width;
                self.data_source.set_column_count(column_count);
                self.data_source.invalidate_heights();
                self.size_missing().await;
                self.send(StreamUpdate::Reload {
                    paths: (0..self.data_source.visible_count()).collect(),
                });
            }
        }
        true
    }

    async fn sized(&self, mut items: Vec<CellItem>) -> Vec<CellItem> {
        calculate_cell_items(
            &mut items,
            &self.calculator,
            &self.prefetcher,
            self.width,
            self.data_source.column_count(),
        )
        .await;
        items
    }

    /// Measure every row that has no height for the current layout
    async fn size_missing(&mut self) {
        let column_count = self.data_source.column_count();
        let heights = measure(
            self.data_source
                .all_items()
                .iter()
                .filter(|item| item.heights.get(column_count).is_none()),
            &self.calculator,
            &self.prefetcher,
            self.width,
            column_count,
        )
        .await;
        for (uid, height) in heights {
            if let Some(item) = self.data_source.item_mut_by_uid(uid) {
                item.heights.set(column_count, height);
            }
        }
    }

    /// Resolve an event's relations against loaded objects
    fn link(&self, payload: &Payload) {
        match payload {
            Payload::Comment(comment) => self.store.link_comment(comment),
            Payload::Love(love) => self.store.link_love(love),
            _ => {}
        }
    }

    fn send_inserted(&self, inserted: Vec<usize>) {
        self.send(StreamUpdate::Change {
            deleted: Vec::new(),
            inserted,
        });
    }

    fn send_all(&self, updates: impl IntoIterator<Item = StreamUpdate>) {
        for update in updates {
            self.send(update);
        }
    }

    fn send(&self, update: StreamUpdate) {
        if update.is_empty() {
            return;
        }
        // The view may already be gone
        let _ = self.updates.send(update);
    }
}

impl<C, P> StreamDestination for StreamController<C, P>
where
    C: SizeCalculator,
    P: EditorialPrefetcher,
{
    async fn set_placeholders(&mut self, items: Vec<CellItem>) {
        self.handle(StreamCommand::SetPlaceholders { items }).await;
    }

    async fn replace_placeholder(&mut self, group: PlaceholderGroup, items: Vec<CellItem>) {
        self.handle(StreamCommand::ReplacePlaceholder { group, items })
            .await;
    }

    async fn append_items(&mut self, group: PlaceholderGroup, items: Vec<CellItem>) {
        self.handle(StreamCommand::AppendToGroup { group, items }).await;
    }

    fn set_primary(&mut self, payload: Payload) {
        let payload = match payload {
            Payload::User(user) => Payload::User(self.store.save_user(&user)),
            Payload::Post(post) => Payload::Post(self.store.save_post(&post)),
            other => other,
        };
        self.primary = Some(payload);
        self.primary_not_found = false;
    }

    fn set_paging_config(&mut self, config: ResponseConfig) {
        self.paging = Some(config);
    }

    fn primary_model_not_found(&mut self) {
        tracing::debug!("Primary object of {} stream not found", self.data_source.stream_kind.name());
        self.primary_not_found = true;
    }
}
