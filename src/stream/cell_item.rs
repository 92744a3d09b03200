//! The atomic unit of a stream

use std::sync::atomic::{AtomicU64, Ordering};

use super::delta::Identifiable;
use super::kind::{CellKind, CellState, PlaceholderGroup};
use crate::models::{Payload, PayloadId, Post, Shared};

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one cell item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellUid(u64);

impl CellUid {
    fn next() -> Self {
        Self(NEXT_UID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Cached row heights, one per layout
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellHeights {
    /// Height in a one-column layout
    pub one_column: Option<f32>,
    /// Height in a multi-column layout
    pub multi_column: Option<f32>,
}

impl CellHeights {
    /// Cached height for a column count
    pub const fn get(&self, column_count: usize) -> Option<f32> {
        if column_count > 1 {
            self.multi_column
        } else {
            self.one_column
        }
    }

    /// Cache a height for a column count
    pub const fn set(&mut self, column_count: usize, height: f32) {
        if column_count > 1 {
            self.multi_column = Some(height);
        } else {
            self.one_column = Some(height);
        }
    }

    /// Cache the same height for every layout
    pub const fn set_all(&mut self, height: f32) {
        self.one_column = Some(height);
        self.multi_column = Some(height);
    }

    /// Drop every cached height
    pub const fn invalidate(&mut self) {
        self.one_column = None;
        self.multi_column = None;
    }
}

/// Diff identity of a cell item: what it shows and how
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    /// Identity of the carried payload
    pub payload: Option<PayloadId>,
    /// Row template
    pub kind: CellKind,
}

/// One row of a stream
#[derive(Debug)]
pub struct CellItem {
    uid: CellUid,
    kind: CellKind,
    payload: Option<Payload>,
    /// Region of the stream this row belongs to
    pub group: Option<PlaceholderGroup>,
    /// Expanded/collapsed state
    pub state: CellState,
    /// Cached heights
    pub heights: CellHeights,
}

impl CellItem {
    /// Create a row carrying a payload
    pub fn new(kind: CellKind, payload: impl Into<Payload>) -> Self {
        Self::build(kind, Some(payload.into()))
    }

    /// Create a structural row with no payload
    pub fn structural(kind: CellKind) -> Self {
        Self::build(kind, None)
    }

    /// Create the marker that stands in for an empty group
    pub fn placeholder(group: PlaceholderGroup) -> Self {
        Self::build(CellKind::Placeholder, None).with_group(group)
    }

    fn build(kind: CellKind, payload: Option<Payload>) -> Self {
        Self {
            uid: CellUid::next(),
            kind,
            payload,
            group: None,
            state: CellState::None,
            heights: CellHeights::default(),
        }
    }

    /// Tag with a group
    pub fn with_group(mut self, group: PlaceholderGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Set the initial state
    pub fn with_state(mut self, state: CellState) -> Self {
        self.state = state;
        self
    }

    /// Identity of this row
    pub const fn uid(&self) -> CellUid {
        self.uid
    }

    /// Row template
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Carried payload
    pub const fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Carried post, if the payload is one
    pub fn post(&self) -> Option<&Shared<Post>> {
        self.payload.as_ref().and_then(Payload::as_post)
    }

    /// Whether this row carries the post with the given ID
    pub fn is_post(&self, post_id: &str) -> bool {
        self.post().is_some_and(|p| p.borrow().id == post_id)
    }

    /// Whether this row is in the given group
    pub fn in_group(&self, group: PlaceholderGroup) -> bool {
        self.group == Some(group)
    }

    /// Swap the payload for another handle to the same object.
    ///
    /// Ignored when the new payload is a different object: identity is
    /// fixed for the lifetime of the row.
    pub fn swap_payload(&mut self, payload: Payload) -> bool {
        match &self.payload {
            Some(current) if current.is_same(&payload) => {
                self.payload = Some(payload);
                true
            }
            _ => false,
        }
    }
}

impl Identifiable for CellItem {
    type Id = ItemKey;

    fn identity(&self) -> ItemKey {
        ItemKey {
            payload: self.payload.as_ref().map(Payload::identity),
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, shared};

    #[test]
    fn test_uids_are_unique() {
        let a = CellItem::structural(CellKind::Spacer);
        let b = CellItem::structural(CellKind::Spacer);
        assert_ne!(a.uid(), b.uid());
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_identity_is_payload_and_kind() {
        let post = shared(Post::new("1", "u1"));
        let header = CellItem::new(CellKind::StreamHeader, post.clone());
        let footer = CellItem::new(CellKind::Footer, post.clone());
        let again = CellItem::new(CellKind::Footer, shared(Post::new("1", "u1")));
        assert_ne!(header.identity(), footer.identity());
        assert_eq!(footer.identity(), again.identity());
    }

    #[test]
    fn test_swap_payload_keeps_identity() {
        let mut item = CellItem::new(CellKind::UserListItem, shared(User::new("1", "ann")));
        assert!(item.swap_payload(shared(User::new("1", "ann-renamed")).into()));
        assert!(!item.swap_payload(shared(User::new("2", "bob")).into()));
        let user = item.payload().and_then(Payload::as_user).unwrap();
        assert_eq!(user.borrow().username, "ann-renamed");
    }

    #[test]
    fn test_heights_by_column_count() {
        let mut heights = CellHeights::default();
        heights.set(1, 40.0);
        assert_eq!(heights.get(1), Some(40.0));
        assert_eq!(heights.get(2), None);
        heights.set_all(10.0);
        assert_eq!(heights.get(3), Some(10.0));
        heights.invalidate();
        assert_eq!(heights.get(1), None);
    }
}
