//! Token Board - Main Library
//!
//! Binary-facing crate for the token board workspace.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **tokenboard**: Token model, ticker feed and table view (re-exported from workspace)
//! - **hypersockets**: WebSocket library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use tokenboard_app::bin_common::{load_board_config, parse_args};
//! use tokenboard_app::tokenboard::App;
//! ```

// Re-export workspace libraries for convenience
pub use hypersockets;
pub use tokenboard;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod runner;

    pub use cli::{load_board_config, load_config_from_env, parse_args, ConfigType};
    pub use runner::{BinaryRunner, RunConfig};
}
