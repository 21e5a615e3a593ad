//! Cache module - Session-scoped memoization for include resolution
//!
//! Provides:
//! - Lookup cache (shared and includer tables, misses included)
//! - Lookup statistics

pub mod stats;
pub mod store;

pub use stats::{SearchStats, StatsRecorder};
pub use store::{LookupCache, Outcome};
