//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod filter;
pub mod models;
pub mod run;
pub mod utils;

// Re-export main command functions
pub use filter::execute_filter;
pub use models::{FilterArgs, InputArgs, RunArgs};
pub use run::{execute_run, validate_args, validate_input};
pub use utils::{display_platforms, display_version, render_summary, validate_report_file};
