//! Lookup statistics

use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Counters describing how a search list answered its queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Calls to `resolve`
    pub lookups: u64,
    /// Answers served from either cache table
    pub cache_hits: u64,
    /// Quoted includes satisfied by the including file's directory
    pub includer_hits: u64,
    /// Individual search-path entries consulted
    pub entry_probes: u64,
    /// Lookups that ended in not-found
    pub misses: u64,
}

impl SearchStats {
    /// Fraction of lookups answered from cache
    pub fn cache_hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / self.lookups as f64
    }
}

/// Interior-mutable counter block updated on the lookup path
#[derive(Debug, Default)]
pub struct StatsRecorder {
    stats: Cell<SearchStats>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, update: impl FnOnce(&mut SearchStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    pub fn snapshot(&self) -> SearchStats {
        self.stats.get()
    }
}
