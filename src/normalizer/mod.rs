//! Timestamp parsing and retention-window filtering.
//!
//! Records carry raw timestamp text in whatever layout their platform
//! exports. This module parses it into UTC and keeps only the records that
//! fall inside the configured window.

pub mod filter;
pub mod timestamp;
pub mod window;

// Re-export main types and functions
pub use filter::{normalize, NormalizeOutcome, NormalizedRecord, ParsePolicy};
pub use timestamp::parse_timestamp;
pub use window::RetentionWindow;
