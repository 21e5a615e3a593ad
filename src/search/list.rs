//! The search list and its `resolve` algorithm
//!
//! Entries keep their configured order for the whole session: the first
//! entry that contains a name wins, whatever its characteristic. Every
//! outcome, misses included, is cached.

use tracing::{debug, trace};

use super::config::{ConfigError, SearchPathConfig};
use super::entry::{PathRequest, SearchPathEntry, SystemFrameworks};
use super::result::{FoundHeader, Includer, LookupResult, Origin};
use crate::cache::{LookupCache, Outcome, SearchStats, StatsRecorder};
use crate::core::model::{DirCharacteristic, IncludeKind};
use crate::core::paths::normalize_path;
use crate::core::util::hash_bytes;
use crate::fs::{DirectoryEntry, FileCache, FileEntry};
use crate::headermap::HeaderMapSet;

/// What the lookup cache stores for a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hit {
    file: FileEntry,
    origin: Origin,
    search_dir: Option<DirectoryEntry>,
    relative_start: usize,
    is_system_framework: bool,
    characteristic: DirCharacteristic,
}

/// Ordered search locations of one compilation session.
///
/// Borrows the file cache that issued its handles and the header maps its
/// entries point into, so it cannot outlive either. Caches are filled
/// through `&self`; the list is meant for a single thread.
pub struct SearchList<'a, F: FileCache + ?Sized> {
    fs: &'a F,
    entries: Vec<SearchPathEntry<'a>>,
    quote_only: Vec<bool>,
    angled_start: usize,
    system_frameworks: SystemFrameworks,
    cache: LookupCache<Hit>,
    stats: StatsRecorder,
}

impl<'a, F: FileCache + ?Sized> SearchList<'a, F> {
    /// Validate `config` and build the list. See [`SearchPathConfig::build`].
    pub fn build(
        config: &SearchPathConfig,
        fs: &'a F,
        maps: &'a HeaderMapSet,
    ) -> Result<Self, ConfigError> {
        config.build(fs, maps)
    }

    /// Assemble a list from already-validated parts
    pub(crate) fn from_parts(
        fs: &'a F,
        entries: Vec<(SearchPathEntry<'a>, bool)>,
        angled_start: usize,
        system_frameworks: SystemFrameworks,
    ) -> Self {
        let (entries, quote_only) = entries.into_iter().unzip();
        Self {
            fs,
            entries,
            quote_only,
            angled_start,
            system_frameworks,
            cache: LookupCache::new(),
            stats: StatsRecorder::new(),
        }
    }

    /// Resolve a spelled include name.
    ///
    /// Quoted includes first try the includer's own directory. Angled
    /// includes start at the angled start index and never match quote-only
    /// entries.
    pub fn resolve(
        &self,
        filename: &str,
        kind: IncludeKind,
        includer: Option<Includer>,
        want: PathRequest,
    ) -> LookupResult {
        self.stats.record(|s| s.lookups += 1);

        if let (IncludeKind::Quoted, Some(includer)) = (kind, includer) {
            let (outcome, cached) = self.lookup_in_includer(filename, includer);
            if let Some(hit) = outcome {
                self.stats.record(|s| {
                    s.includer_hits += 1;
                    if cached {
                        s.cache_hits += 1;
                    }
                });
                return self.materialize(filename, hit, want);
            }
        }

        let outcome = match self.cache.get(filename, kind) {
            Some(outcome) => {
                self.stats.record(|s| s.cache_hits += 1);
                outcome
            }
            None => {
                let outcome = self.scan(filename, kind);
                self.cache.insert(filename, kind, outcome);
                outcome
            }
        };

        match outcome {
            Some(hit) => self.materialize(filename, hit, want),
            None => {
                self.stats.record(|s| s.misses += 1);
                trace!(filename, ?kind, "not found");
                LookupResult::NotFound
            }
        }
    }

    /// Index the scan starts at for `kind`
    pub fn start_index(&self, kind: IncludeKind) -> usize {
        match kind {
            IncludeKind::Angled => self.angled_start,
            IncludeKind::Quoted => 0,
        }
    }

    /// Outcome for the includer's directory, and whether it came from the
    /// cache. Only the step that answers a lookup counts as a cache hit.
    fn lookup_in_includer(&self, filename: &str, includer: Includer) -> (Outcome<Hit>, bool) {
        let cached = self.cache.get_includer(includer.dir, filename);
        let from_cache = cached.is_some();
        let outcome = match cached {
            Some(outcome) => outcome,
            None => {
                let outcome = self.fs.stat_file(includer.dir, filename).map(|file| Hit {
                    file,
                    origin: Origin::Includer,
                    search_dir: Some(includer.dir),
                    relative_start: 0,
                    is_system_framework: false,
                    characteristic: includer.characteristic,
                });
                self.cache.insert_includer(includer.dir, filename, outcome);
                outcome
            }
        };
        // The same directory may be reached from includers of differing
        // characteristic; the current includer decides.
        let outcome = outcome.map(|hit| Hit {
            characteristic: includer.characteristic,
            ..hit
        });
        (outcome, from_cache)
    }

    fn scan(&self, filename: &str, kind: IncludeKind) -> Outcome<Hit> {
        let start = self.start_index(kind);
        for (index, entry) in self.entries.iter().enumerate().skip(start) {
            if kind == IncludeKind::Angled && self.quote_only[index] {
                continue;
            }
            self.stats.record(|s| s.entry_probes += 1);
            if let Some(hit) = entry.probe(filename, self.fs, &self.system_frameworks) {
                debug!(filename, entry = entry.name(), index, "resolved");
                return Some(Hit {
                    file: hit.file,
                    origin: Origin::Entry(index),
                    search_dir: hit.search_dir,
                    relative_start: hit.relative_start,
                    is_system_framework: hit.is_system_framework,
                    characteristic: entry.dir_characteristic(),
                });
            }
        }
        None
    }

    fn materialize(&self, filename: &str, hit: Hit, want: PathRequest) -> LookupResult {
        let search_path = want.search_path.then(|| match (hit.origin, hit.search_dir) {
            (Origin::Entry(index), search_dir) => self.entries[index].search_path_of(search_dir, self.fs),
            (Origin::Includer, Some(dir)) => normalize_path(&self.fs.dir_path(dir)),
            (Origin::Includer, None) => String::new(),
        });
        let relative_path = want
            .relative_path
            .then(|| filename[hit.relative_start..].to_string());

        LookupResult::Found(FoundHeader {
            file: hit.file,
            search_path,
            relative_path,
            is_system_framework: hit.is_system_framework,
            characteristic: hit.characteristic,
            origin: hit.origin,
        })
    }

    pub fn entries(&self) -> &[SearchPathEntry<'a>] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&SearchPathEntry<'a>> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn angled_start(&self) -> usize {
        self.angled_start
    }

    pub fn is_quote_only(&self, index: usize) -> bool {
        self.quote_only.get(index).copied().unwrap_or(false)
    }

    /// Entries an angled include may match, with their positions
    pub fn angled_entries(&self) -> impl Iterator<Item = (usize, &SearchPathEntry<'a>)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .skip(self.angled_start)
            .filter(|(index, _)| !self.quote_only[*index])
    }

    /// Entries a quoted include may match, with their positions
    pub fn quoted_entries(&self) -> impl Iterator<Item = (usize, &SearchPathEntry<'a>)> + '_ {
        self.entries.iter().enumerate()
    }

    pub fn system_frameworks(&self) -> &SystemFrameworks {
        &self.system_frameworks
    }

    pub fn file_cache(&self) -> &'a F {
        self.fs
    }

    pub fn stats(&self) -> SearchStats {
        self.stats.snapshot()
    }

    /// Number of cached outcomes
    pub fn cached_outcomes(&self) -> usize {
        self.cache.len()
    }

    /// Stable hash of the configured order, characteristics and flags
    pub fn fingerprint(&self) -> String {
        let mut text = String::new();
        for (index, entry) in self.entries.iter().enumerate() {
            text.push_str(&format!(
                "{}|{}|{}|{}|{}\n",
                entry.lookup_type(),
                entry.name(),
                entry.dir_characteristic(),
                self.quote_only[index],
                entry.is_index_header_map()
            ));
        }
        text.push_str(&format!("angled-start={}\n", self.angled_start));
        for framework in self.system_frameworks.sorted() {
            text.push_str(&format!("system-framework={}\n", framework));
        }
        hash_bytes(text.as_bytes())
    }
}
