//! Token Board
//!
//! Sortable live token table on top of the ticker feed.

pub mod app;
pub mod ui;
pub mod view;

pub use app::{App, FeedStatus};
pub use view::{DetailView, LoadPhase, RowView, TableView, INITIAL_LOAD_DELAY, SKELETON_ROWS};
