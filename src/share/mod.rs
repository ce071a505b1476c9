//! Share-of-voice calculation.
//!
//! Converts per-entity totals into percentage shares of each metric's
//! population total, with an explicit zero-total policy.

pub mod calculator;

pub use calculator::{
    compute_shares, population_totals, safe_share, DivisionPolicyWarning, ShareRow, ShareTable,
};
