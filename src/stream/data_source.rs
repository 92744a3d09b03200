//! Authoritative item sequence and its visible projection
//!
//! Every operation that changes `all_items`, the filter or an item's state
//! recomputes the visible projection before returning. Positions handed in
//! and out are zero-based indices into the visible sequence.

use std::collections::HashSet;

use super::cell_item::{CellItem, CellUid};
use super::delta::{Delta, diff};
use super::filter::{StreamFilter, compute_visible};
use super::kind::{CellKind, PlaceholderGroup, StreamKind};
use super::parser::CellItemParser;
use crate::models::{Post, Shared, User};

/// A batch of positional mutations for the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Delete then insert; both lists are valid against the same
    /// intermediate state
    Change {
        /// Visible positions before the change
        deleted: Vec<usize>,
        /// Visible positions after the change
        inserted: Vec<usize>,
    },
    /// Rows whose content changed in place
    Reload {
        /// Visible positions
        paths: Vec<usize>,
    },
    /// Generic diff produced by a filter change
    Diff(Delta),
    /// A row's height changed
    Invalidate {
        /// Visible position
        index: usize,
    },
}

impl StreamUpdate {
    /// Whether applying this update would do nothing
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Change { deleted, inserted } => deleted.is_empty() && inserted.is_empty(),
            Self::Reload { paths } => paths.is_empty(),
            Self::Diff(delta) => delta.is_empty(),
            Self::Invalidate { .. } => false,
        }
    }
}

/// Stream contents for one screen
pub struct StreamDataSource {
    /// Which screen this stream renders
    pub stream_kind: StreamKind,
    /// The signed-in user, if any
    pub current_user: Option<Shared<User>>,
    column_count: usize,
    all_items: Vec<CellItem>,
    visible: Vec<usize>,
    filter: Option<StreamFilter>,
}

impl std::fmt::Debug for StreamDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDataSource")
            .field("stream_kind", &self.stream_kind)
            .field("column_count", &self.column_count)
            .field("all_items", &self.all_items.len())
            .field("visible", &self.visible.len())
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

impl StreamDataSource {
    /// Create an empty stream
    pub const fn new(stream_kind: StreamKind, current_user: Option<Shared<User>>) -> Self {
        Self {
            stream_kind,
            current_user,
            column_count: 1,
            all_items: Vec::new(),
            visible: Vec::new(),
            filter: None,
        }
    }

    /// Number of layout columns
    pub const fn column_count(&self) -> usize {
        self.column_count
    }

    /// Change the number of layout columns
    pub fn set_column_count(&mut self, column_count: usize) {
        self.column_count = column_count.max(1);
    }

    /// Parser for this stream's kind
    pub fn parser(&self) -> CellItemParser {
        CellItemParser::new(self.stream_kind.clone())
    }

    /// ID of the signed-in user
    pub fn current_user_id(&self) -> Option<String> {
        self.current_user.as_ref().map(|u| u.borrow().id.clone())
    }

    // ==================== Reading ====================

    /// Every item, visible or not
    pub fn all_items(&self) -> &[CellItem] {
        &self.all_items
    }

    /// Visible items, in order
    pub fn visible_items(&self) -> impl Iterator<Item = &CellItem> + '_ {
        self.visible.iter().map(|&i| &self.all_items[i])
    }

    /// Number of visible items
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Whether a visible position resolves
    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.visible.len()
    }

    /// Visible item at a position
    pub fn item(&self, index: usize) -> Option<&CellItem> {
        self.visible.get(index).map(|&i| &self.all_items[i])
    }

    /// Post carried by the visible item at a position
    pub fn post(&self, index: usize) -> Option<Shared<Post>> {
        self.item(index).and_then(CellItem::post).cloned()
    }

    /// Visible positions of a group's items
    pub fn index_paths(&self, group: PlaceholderGroup) -> Vec<usize> {
        self.visible_positions(|item| item.in_group(group))
    }

    /// Whether a group holds anything besides its placeholder marker
    pub fn has_items(&self, group: PlaceholderGroup) -> bool {
        let mut items = self.all_items.iter().filter(|item| item.in_group(group));
        match (items.next(), items.next()) {
            (None, _) => false,
            (Some(only), None) => !only.kind().is_placeholder(),
            (Some(_), Some(_)) => true,
        }
    }

    /// Every item carrying the given post, visible or not
    pub fn cell_items_for_post(&self, post_id: &str) -> impl Iterator<Item = &CellItem> + '_ {
        let post_id = post_id.to_string();
        self.all_items
            .iter()
            .filter(move |item| item.is_post(&post_id))
    }

    /// Visible positions of rows in a post's comment area, including the
    /// create-comment and see-more rows
    pub fn comment_index_paths(&self, post_id: &str) -> Vec<usize> {
        self.visible_positions(|item| is_comment_of(item, post_id))
    }

    pub(crate) fn visible_positions(&self, predicate: impl Fn(&CellItem) -> bool) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, i)| predicate(&self.all_items[**i]))
            .map(|(position, _)| position)
            .collect()
    }

    pub(crate) fn visible_position_of(&self, uid: CellUid) -> Option<usize> {
        self.visible
            .iter()
            .position(|&i| self.all_items[i].uid() == uid)
    }

    fn visible_positions_of(&self, uids: &HashSet<CellUid>) -> Vec<usize> {
        self.visible_positions(|item| uids.contains(&item.uid()))
    }

    pub(crate) fn item_mut_by_uid(&mut self, uid: CellUid) -> Option<&mut CellItem> {
        self.all_items.iter_mut().find(|item| item.uid() == uid)
    }

    // ==================== Adding ====================

    /// Append items; returns the visible positions they landed on
    pub fn append(&mut self, items: Vec<CellItem>) -> Vec<usize> {
        let start = self.visible.len();
        self.all_items.extend(items);
        self.refilter();
        (start..self.visible.len()).collect()
    }

    /// Insert items before the visible position `at`; returns the visible
    /// positions they landed on
    pub fn insert(&mut self, items: Vec<CellItem>, at: usize) -> Vec<usize> {
        let index = self.all_index_for_insert(at);
        self.insert_at_all_index(items, index)
    }

    /// Map a visible insertion point to an index into `all_items`
    fn all_index_for_insert(&self, at: usize) -> usize {
        self.visible
            .get(at)
            .copied()
            .unwrap_or(self.all_items.len())
    }

    pub(crate) fn insert_at_all_index(&mut self, items: Vec<CellItem>, index: usize) -> Vec<usize> {
        let index = index.min(self.all_items.len());
        let uids: HashSet<CellUid> = items.iter().map(CellItem::uid).collect();
        let filled: Vec<PlaceholderGroup> = items
            .iter()
            .filter(|item| !item.kind().is_placeholder())
            .filter_map(|item| item.group)
            .collect();
        self.all_items.splice(index..index, items);
        // a group's marker only lives while the group is empty
        if !filled.is_empty() {
            self.all_items.retain(|item| {
                !(item.kind().is_placeholder() && item.group.is_some_and(|g| filled.contains(&g)))
            });
        }
        self.refilter();
        self.visible_positions_of(&uids)
    }

    /// Replace the whole sequence with a generator's placeholder markers
    pub fn set_placeholders(&mut self, items: Vec<CellItem>) {
        self.all_items = items;
        self.refilter();
    }

    /// Replace every item of a group.
    ///
    /// New items take the slot of the group's first item; an empty list
    /// leaves a placeholder marker behind. Does nothing if the group is not
    /// in the stream.
    pub fn replace_placeholder(
        &mut self,
        group: PlaceholderGroup,
        items: Vec<CellItem>,
    ) -> (Vec<usize>, Vec<usize>) {
        let items = if items.is_empty() {
            vec![CellItem::placeholder(group)]
        } else {
            items.into_iter().map(|item| item.with_group(group)).collect()
        };

        let Some(first) = self.all_items.iter().position(|item| item.in_group(group)) else {
            tracing::debug!("Ignoring replacement of missing group {:?}", group);
            return (Vec::new(), Vec::new());
        };

        let deleted = self.index_paths(group);
        self.all_items.retain(|item| !item.in_group(group));
        let inserted = self.insert_at_all_index(items, first);
        (deleted, inserted)
    }

    /// Append items to the end of a group (filling it if it was empty)
    pub fn append_to_group(
        &mut self,
        group: PlaceholderGroup,
        items: Vec<CellItem>,
    ) -> (Vec<usize>, Vec<usize>) {
        if !self.has_items(group) {
            return self.replace_placeholder(group, items);
        }
        let Some(last) = self.all_items.iter().rposition(|item| item.in_group(group)) else {
            return (Vec::new(), Vec::new());
        };
        let items = items.into_iter().map(|item| item.with_group(group)).collect();
        (Vec::new(), self.insert_at_all_index(items, last + 1))
    }

    // ==================== Removing ====================

    /// Remove the items at visible positions; unknown positions are ignored
    pub fn remove_items(&mut self, paths: &[usize]) {
        let uids: HashSet<CellUid> = paths
            .iter()
            .filter_map(|&p| self.item(p))
            .map(CellItem::uid)
            .collect();
        self.remove_uids(&uids);
    }

    /// Remove by identity; a group left with nothing keeps a placeholder
    /// marker where its first removed item was
    pub(crate) fn remove_uids(&mut self, uids: &HashSet<CellUid>) {
        if uids.is_empty() {
            return;
        }
        let mut kept = Vec::with_capacity(self.all_items.len());
        let mut slots: Vec<(PlaceholderGroup, usize)> = Vec::new();
        for item in std::mem::take(&mut self.all_items) {
            if !uids.contains(&item.uid()) {
                kept.push(item);
            } else if let Some(group) = item.group
                && !slots.iter().any(|(g, _)| *g == group)
            {
                slots.push((group, kept.len()));
            }
        }
        for (group, at) in slots.into_iter().rev() {
            if !kept.iter().any(|item| item.in_group(group)) {
                kept.insert(at, CellItem::placeholder(group));
            }
        }
        self.all_items = kept;
        self.refilter();
    }

    /// Remove every item
    pub fn remove_all(&mut self) {
        self.all_items.clear();
        self.refilter();
    }

    /// Remove a post's comment area; returns the visible positions removed
    pub fn remove_comments_for_post(&mut self, post_id: &str) -> Vec<usize> {
        let paths = self.comment_index_paths(post_id);
        let uids: HashSet<CellUid> = self
            .all_items
            .iter()
            .filter(|item| is_comment_of(item, post_id))
            .map(CellItem::uid)
            .collect();
        self.remove_uids(&uids);
        paths
    }

    // ==================== Filtering and state ====================

    /// Swap the caller filter; returns the diff between the old and new
    /// visible sequences
    pub fn update_filter(&mut self, filter: Option<StreamFilter>) -> Delta {
        self.filter = filter;
        self.refilter_with_diff()
    }

    /// Recompute the projection; `all_items` must not have changed since
    /// the last recompute
    fn refilter_with_diff(&mut self) -> Delta {
        let previous = std::mem::take(&mut self.visible);
        self.refilter();

        let old: Vec<&CellItem> = previous.iter().map(|&i| &self.all_items[i]).collect();
        let new: Vec<&CellItem> = self.visible_items().collect();
        diff(&old, &new)
    }

    /// Collapse or expand the post at a visible position.
    ///
    /// Every row of that post flips, hidden ones included, except the
    /// footer: its open/closed state belongs to the comment drawer.
    /// Returns the change in the visible sequence.
    pub fn toggle_collapsed(&mut self, index: usize) -> Delta {
        let Some(item) = self.item(index) else {
            return Delta::default();
        };
        let Some(post_id) = item.post().map(|p| p.borrow().id.clone()) else {
            return Delta::default();
        };
        let new_state = item.state.toggled();

        for item in &mut self.all_items {
            if item.kind() != CellKind::Footer && item.is_post(&post_id) {
                item.state = new_state;
            }
        }
        self.refilter_with_diff()
    }

    /// Record a measured height for the visible item at a position; returns
    /// whether the layout must be invalidated
    pub fn update_height(&mut self, index: usize, height: f32) -> bool {
        let Some(&i) = self.visible.get(index) else {
            return false;
        };
        let heights = &mut self.all_items[i].heights;
        let changed = heights.one_column != Some(height) || heights.multi_column != Some(height);
        heights.set_all(height);
        changed
    }

    /// Drop every cached height (content width changed)
    pub fn invalidate_heights(&mut self) {
        for item in &mut self.all_items {
            item.heights.invalidate();
        }
    }

    pub(crate) fn refilter(&mut self) {
        self.visible = compute_visible(&self.all_items, self.filter.as_ref());
    }

    pub(crate) fn all_items_mut(&mut self) -> &mut [CellItem] {
        &mut self.all_items
    }
}

pub(crate) fn is_comment_of(item: &CellItem, post_id: &str) -> bool {
    item.payload()
        .and_then(|p| p.as_comment())
        .is_some_and(|c| c.borrow().loaded_from_post_id == post_id)
}
