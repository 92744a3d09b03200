//! # Plume
//!
//! Stream rendering and reconciliation core for a social content client.
//!
//! ## Overview
//!
//! A stream is one scrollable list of typed rows: post headers, body
//! regions, footers, comments, avatar strips, profile headers. Plume keeps
//! the authoritative row sequence and its filtered projection, loads
//! content into named placeholder groups, applies content and relationship
//! events, and reports every mutation as positional updates a view can
//! animate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     StreamController                        │
//! │   Applies commands, sizes rows, sends StreamUpdates         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │   Generators    │ │   DataSource    │ │     Sizing      │
//! │                 │ │                 │ │                 │
//! │ • Profile       │ │ • Filter chain  │ │ • Text wrap     │
//! │ • Post detail   │ │ • Placeholders  │ │ • Regions       │
//! │ • Paging        │ │ • Modify events │ │ • Prefetch      │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │                   │
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │  StreamSource   │ │     Models      │ │     Config      │
//! │                 │ │                 │ │                 │
//! │ • Pages/cursors │ │ • Post, User    │ │ • Columns       │
//! │ • NotFound      │ │ • Comment, Love │ │ • Width/gutter  │
//! │ • Related       │ │ • ModelStore    │ │ • Page sizes    │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Paged content source trait
//! - [`config`]: Configuration management
//! - [`demo`]: Scripted session over bundled data
//! - [`error`]: Source errors
//! - [`generators`]: Profile and post detail loaders
//! - [`models`]: Domain models (Post, User, Comment, ...)
//! - [`store`]: Repository of loaded models
//! - [`stream`]: Cell items, filtering, diffing and the data source
//!
//! ## Example
//!
//! ```no_run
//! use plume::{Config, demo};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     demo::run(&Config::load()?).await
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/plume/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::if_not_else)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::similar_names)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::future_not_send)]

pub mod api;
pub mod config;
pub mod demo;
pub mod error;
pub mod generators;
pub mod models;
pub mod paths;
pub mod store;
pub mod stream;

// Re-export main types for convenience
pub use api::{Page, ResponseConfig, StreamSource};
pub use config::Config;
pub use error::SourceError;
pub use generators::{PostDetailGenerator, ProfileGenerator, StreamDestination};
pub use models::{Comment, Payload, Post, Shared, User};
pub use store::ModelStore;
pub use stream::{
    CellItem, CellKind, ContentChange, PlaceholderGroup, StreamCommand, StreamController,
    StreamDataSource, StreamKind, StreamUpdate,
};

/// ASCII logo for the application
pub const LOGO: &str = r"
         __
   ___  / /_ ____ _  ___
  / _ \/ / // /  ' \/ -_)
 / .__/_/\_,_/_/_/_/\__/
/_/
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository URL
pub const REPO_URL: &str = "https://github.com/ricardodantas/plume";
