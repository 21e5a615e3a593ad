//! One compilation session: a file cache, the loaded header maps, and the
//! search list built over them

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cache::SearchStats;
use crate::fs::{DiskFileCache, FsStats};
use crate::headermap::HeaderMapSet;
use crate::search::{SearchList, SearchPathConfig};

/// Owns everything a search list borrows
pub struct Session<'c> {
    config: &'c SearchPathConfig,
    fs: DiskFileCache,
    maps: HeaderMapSet,
}

impl<'c> Session<'c> {
    /// Load the header maps `config` names. Any load failure is fatal.
    pub fn new(config: &'c SearchPathConfig) -> Result<Self> {
        let maps = HeaderMapSet::load(config).context("Failed to load header maps")?;
        Ok(Self {
            config,
            fs: DiskFileCache::new(),
            maps,
        })
    }

    /// Build the search list and hand it to `command`
    pub fn run<F>(&self, show_stats: bool, command: F) -> Result<()>
    where
        F: FnOnce(&SearchList<'_, DiskFileCache>) -> Result<()>,
    {
        let list = self
            .config
            .build(&self.fs, &self.maps)
            .context("Invalid search path configuration")?;

        command(&list)?;

        // Output stats to stderr if requested
        if show_stats {
            print_stats(&list.stats(), &self.fs.stats());
        }
        Ok(())
    }
}

fn print_stats(search: &SearchStats, fs: &FsStats) {
    eprintln!("{}", "Header search statistics".bold());
    eprintln!("   Lookups: {}", search.lookups);
    eprintln!(
        "   Cache hits: {} ({:.1}%)",
        search.cache_hits.to_string().green(),
        search.cache_hit_rate() * 100.0
    );
    eprintln!("   Includer hits: {}", search.includer_hits);
    eprintln!("   Entries probed: {}", search.entry_probes);
    if search.misses > 0 {
        eprintln!("   Misses: {}", search.misses.to_string().yellow());
    } else {
        eprintln!("   Misses: 0");
    }
    eprintln!(
        "   File system: {} dir queries, {} file queries, {} stats",
        fs.dir_queries, fs.file_queries, fs.disk_stats
    );
}
