//! Stream rendering and reconciliation
//!
//! A stream is one scrollable list of typed rows. [`StreamDataSource`] keeps
//! the authoritative sequence and the filtered, visible projection of it;
//! [`StreamController`] owns a data source, measures rows before they land
//! and reports every change as a [`StreamUpdate`].

mod cell_item;
mod controller;
mod data_source;
pub mod delta;
mod filter;
mod kind;
mod modify;
mod parser;
pub mod sizing;

pub use cell_item::{CellHeights, CellItem, CellUid, ItemKey};
pub use controller::{StreamCommand, StreamController};
pub use data_source::{StreamDataSource, StreamUpdate};
pub use delta::{Delta, Identifiable, diff};
pub use filter::{StreamFilter, collapsed_filter};
pub use kind::{CellKind, CellState, ContentChange, PlaceholderGroup, StreamKind};
pub use parser::CellItemParser;
pub use sizing::{
    EditorialPrefetcher, NoPrefetch, SizeCalculator, TextSizeCalculator, column_width, strip_html,
};
