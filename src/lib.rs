//! SoV Studio
//!
//! Share-of-Voice aggregation for social engagement metrics
//! (YouTube, Twitter/X, Twitch) across a set of tracked games.
//!
//! The pipeline runs strictly left to right, each stage producing a new value:
//!
//! ```text
//! loader -> normalizer -> aggregator -> share -> rollup
//! ```
//!
//! ## Getting Started
//!
//! ```bash
//! sov run --input csvs/youtube --platform youtube --lookback-days 7 --summary
//! sov --help
//! ```
//!
//! Library callers can skip the CLI entirely:
//!
//! ```ignore
//! let load = load_sources(&sources);
//! let options = PipelineOptions::new(metrics, "View Count", 9);
//! let report = run_pipeline(&load, &options)?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod loader;
pub mod normalizer;
pub mod output;
pub mod pipeline;
pub mod rollup;
pub mod share;
pub mod utils;
