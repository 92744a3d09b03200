//! Derives the visible sequence from the authoritative one

use super::cell_item::CellItem;
use super::kind::CellState;

/// Caller-supplied predicate; `true` keeps the item
pub type StreamFilter = Box<dyn Fn(&CellItem) -> bool>;

/// Built-in filter: hides collapsed regions of collapsed posts
pub fn collapsed_filter(item: &CellItem) -> bool {
    if !item.kind().is_collapsable() || item.post().is_none() {
        return true;
    }
    item.state != CellState::Collapsed
}

/// Whether an item belongs in the visible sequence
pub fn is_visible(item: &CellItem, filter: Option<&StreamFilter>) -> bool {
    if item.kind().is_placeholder() {
        return false;
    }
    if item.kind().always_show() {
        return true;
    }
    let stream_filtered = filter.is_none_or(|f| f(item));
    stream_filtered && collapsed_filter(item)
}

/// Indices into `all` of the visible items, in order
pub fn compute_visible(all: &[CellItem], filter: Option<&StreamFilter>) -> Vec<usize> {
    all.iter()
        .enumerate()
        .filter(|(_, item)| is_visible(item, filter))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, User, shared};
    use crate::stream::kind::{CellKind, PlaceholderGroup};

    fn post_item(id: &str, kind: CellKind) -> CellItem {
        CellItem::new(kind, shared(Post::new(id, "u1"))).with_state(CellState::Expanded)
    }

    #[test]
    fn test_no_filter_keeps_everything_but_placeholders() {
        let all = vec![
            post_item("1", CellKind::Text(0)),
            CellItem::placeholder(PlaceholderGroup::StreamItems),
            post_item("2", CellKind::Footer),
        ];
        assert_eq!(compute_visible(&all, None), vec![0, 2]);
    }

    #[test]
    fn test_filters_are_anded() {
        let mut collapsed = post_item("2", CellKind::Text(0));
        collapsed.state = CellState::Collapsed;
        let all = vec![
            post_item("1", CellKind::Text(0)),
            collapsed,
            post_item("3", CellKind::Text(0)),
        ];
        let filter: StreamFilter = Box::new(|item| !item.is_post("3"));
        assert_eq!(compute_visible(&all, Some(&filter)), vec![0]);
    }

    #[test]
    fn test_collapse_only_hides_collapsable_post_rows() {
        let mut footer = post_item("1", CellKind::Footer);
        footer.state = CellState::Collapsed;
        let mut user_row =
            CellItem::new(CellKind::UserListItem, shared(User::new("u1", "ann")));
        user_row.state = CellState::Collapsed;
        assert!(collapsed_filter(&footer));
        assert!(collapsed_filter(&user_row));
    }

    #[test]
    fn test_structural_rows_ignore_filters() {
        let all = vec![
            CellItem::structural(CellKind::Loading),
            CellItem::structural(CellKind::Spacer),
            CellItem::structural(CellKind::NoPosts),
        ];
        let reject_all: StreamFilter = Box::new(|_| false);
        assert_eq!(compute_visible(&all, Some(&reject_all)), vec![0, 1]);
    }
}
