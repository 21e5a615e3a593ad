//! Search-path entries
//!
//! One configured location in the search list: a plain directory, a
//! directory of framework bundles, or a header map. Every variant answers
//! the same `lookup_file` question.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::trace;

use crate::core::model::DirCharacteristic;
use crate::core::paths::{framework_bundle_name, join_normalized, normalize_path, split_framework, split_parent};
use crate::fs::{DirectoryEntry, FileCache, FileEntry};
use crate::headermap::HeaderMap;

/// Which variant an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupType {
    NormalDir,
    Framework,
    HeaderMap,
}

impl fmt::Display for LookupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LookupType::NormalDir => "dir",
            LookupType::Framework => "framework",
            LookupType::HeaderMap => "header-map",
        })
    }
}

/// Framework names the configuration declared as system frameworks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemFrameworks(HashSet<String>);

impl SystemFrameworks {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, framework: &str) -> bool {
        self.0.contains(framework)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in sorted order
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Which derived strings a lookup should compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathRequest {
    pub search_path: bool,
    pub relative_path: bool,
}

impl PathRequest {
    pub const NONE: PathRequest = PathRequest {
        search_path: false,
        relative_path: false,
    };

    pub const ALL: PathRequest = PathRequest {
        search_path: true,
        relative_path: true,
    };
}

/// A file found by one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMatch {
    pub file: FileEntry,
    pub search_path: Option<String>,
    pub relative_path: Option<String>,
    pub is_system_framework: bool,
}

/// Compact form of a hit, cheap to copy into the lookup cache.
///
/// `search_dir` is `None` for header maps, whose search path is the map's
/// name. `relative_start` is the byte offset of the relative path inside the
/// spelled name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntryHit {
    pub file: FileEntry,
    pub search_dir: Option<DirectoryEntry>,
    pub relative_start: usize,
    pub is_system_framework: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Bundle {
    headers: Option<DirectoryEntry>,
    private_headers: Option<DirectoryEntry>,
}

/// Per-entry memo of `<Name>.framework` lookups, misses included
#[derive(Debug, Default)]
pub struct FrameworkBundles(RefCell<HashMap<String, Bundle>>);

/// One location in the search list
#[derive(Debug)]
pub enum SearchPathEntry<'a> {
    NormalDirectory {
        dir: DirectoryEntry,
        name: String,
        characteristic: DirCharacteristic,
    },
    Framework {
        dir: DirectoryEntry,
        name: String,
        characteristic: DirCharacteristic,
        bundles: FrameworkBundles,
    },
    HeaderMap {
        map: &'a HeaderMap,
        characteristic: DirCharacteristic,
        is_index_map: bool,
    },
}

impl<'a> SearchPathEntry<'a> {
    /// A plain include directory; `name` is the path as configured
    pub fn new_directory(dir: DirectoryEntry, name: impl Into<String>, characteristic: DirCharacteristic) -> Self {
        SearchPathEntry::NormalDirectory {
            dir,
            name: name.into(),
            characteristic,
        }
    }

    /// A directory holding `<Name>.framework` bundles
    pub fn new_framework(dir: DirectoryEntry, name: impl Into<String>, characteristic: DirCharacteristic) -> Self {
        SearchPathEntry::Framework {
            dir,
            name: name.into(),
            characteristic,
            bundles: FrameworkBundles::default(),
        }
    }

    pub fn new_header_map(map: &'a HeaderMap, characteristic: DirCharacteristic, is_index_map: bool) -> Self {
        SearchPathEntry::HeaderMap {
            map,
            characteristic,
            is_index_map,
        }
    }

    pub fn lookup_type(&self) -> LookupType {
        match self {
            SearchPathEntry::NormalDirectory { .. } => LookupType::NormalDir,
            SearchPathEntry::Framework { .. } => LookupType::Framework,
            SearchPathEntry::HeaderMap { .. } => LookupType::HeaderMap,
        }
    }

    /// Directory path or header-map file name
    pub fn name(&self) -> &str {
        match self {
            SearchPathEntry::NormalDirectory { name, .. } | SearchPathEntry::Framework { name, .. } => name,
            SearchPathEntry::HeaderMap { map, .. } => map.name(),
        }
    }

    pub fn dir(&self) -> Option<DirectoryEntry> {
        match self {
            SearchPathEntry::NormalDirectory { dir, .. } => Some(*dir),
            _ => None,
        }
    }

    pub fn framework_dir(&self) -> Option<DirectoryEntry> {
        match self {
            SearchPathEntry::Framework { dir, .. } => Some(*dir),
            _ => None,
        }
    }

    pub fn header_map(&self) -> Option<&'a HeaderMap> {
        match self {
            SearchPathEntry::HeaderMap { map, .. } => Some(*map),
            _ => None,
        }
    }

    pub fn is_normal_dir(&self) -> bool {
        matches!(self, SearchPathEntry::NormalDirectory { .. })
    }

    pub fn is_framework(&self) -> bool {
        matches!(self, SearchPathEntry::Framework { .. })
    }

    pub fn is_header_map(&self) -> bool {
        matches!(self, SearchPathEntry::HeaderMap { .. })
    }

    pub fn dir_characteristic(&self) -> DirCharacteristic {
        match self {
            SearchPathEntry::NormalDirectory { characteristic, .. }
            | SearchPathEntry::Framework { characteristic, .. }
            | SearchPathEntry::HeaderMap { characteristic, .. } => *characteristic,
        }
    }

    pub fn is_index_header_map(&self) -> bool {
        matches!(self, SearchPathEntry::HeaderMap { is_index_map: true, .. })
    }

    /// Look `filename` up in this location alone.
    ///
    /// `want` selects which derived strings are built; a miss never builds
    /// any.
    pub fn lookup_file<F: FileCache + ?Sized>(
        &self,
        filename: &str,
        fs: &F,
        want: PathRequest,
        system_frameworks: &SystemFrameworks,
    ) -> Option<EntryMatch> {
        let hit = self.probe(filename, fs, system_frameworks)?;
        Some(EntryMatch {
            file: hit.file,
            search_path: want
                .search_path
                .then(|| self.search_path_of(hit.search_dir, fs)),
            relative_path: want
                .relative_path
                .then(|| filename[hit.relative_start..].to_string()),
            is_system_framework: hit.is_system_framework,
        })
    }

    /// Find `filename` in this entry. For an index header map,
    /// `is_system_framework` is also set when the verbatim key matches.
    pub(crate) fn probe<F: FileCache + ?Sized>(
        &self,
        filename: &str,
        fs: &F,
        system_frameworks: &SystemFrameworks,
    ) -> Option<EntryHit> {
        match self {
            SearchPathEntry::NormalDirectory { dir, .. } => {
                fs.stat_file(*dir, filename).map(|file| EntryHit {
                    file,
                    search_dir: Some(*dir),
                    relative_start: 0,
                    is_system_framework: false,
                })
            }
            SearchPathEntry::Framework { dir, bundles, .. } => {
                let (framework, rest) = split_framework(filename)?;
                let bundle = bundles.resolve(*dir, framework, fs);
                let relative_start = framework.len() + 1;
                [bundle.headers, bundle.private_headers]
                    .into_iter()
                    .flatten()
                    .find_map(|headers| {
                        fs.stat_file(headers, rest).map(|file| EntryHit {
                            file,
                            search_dir: Some(headers),
                            relative_start,
                            is_system_framework: system_frameworks.contains(framework),
                        })
                    })
            }
            SearchPathEntry::HeaderMap {
                map, is_index_map, ..
            } => {
                let framework = split_framework(filename);
                let is_system_framework = *is_index_map
                    && framework.is_some_and(|(name, _)| system_frameworks.contains(name));
                let hit = |file, relative_start| EntryHit {
                    file,
                    search_dir: None,
                    relative_start,
                    is_system_framework,
                };

                if let Some(file) = translate(map, filename, fs) {
                    return Some(hit(file, 0));
                }
                if !*is_index_map {
                    return None;
                }
                let (name, rest) = framework?;
                translate(map, rest, fs).map(|file| hit(file, name.len() + 1))
            }
        }
    }

    /// Search path reported for a hit in this entry
    pub(crate) fn search_path_of<F: FileCache + ?Sized>(
        &self,
        search_dir: Option<DirectoryEntry>,
        fs: &F,
    ) -> String {
        match (self, search_dir) {
            (SearchPathEntry::Framework { .. }, Some(headers)) => normalize_path(&fs.dir_path(headers)),
            _ => self.name().to_string(),
        }
    }
}

impl FrameworkBundles {
    fn resolve<F: FileCache + ?Sized>(&self, dir: DirectoryEntry, framework: &str, fs: &F) -> Bundle {
        if let Some(bundle) = self.0.borrow().get(framework) {
            return *bundle;
        }

        let root = join_normalized(&fs.dir_path(dir), &framework_bundle_name(framework));
        let bundle = match fs.stat_directory(&root) {
            Some(_) => Bundle {
                headers: fs.stat_directory(&root.join("Headers")),
                private_headers: fs.stat_directory(&root.join("PrivateHeaders")),
            },
            None => Bundle::default(),
        };
        trace!(
            framework,
            found = bundle.headers.is_some() || bundle.private_headers.is_some(),
            "framework bundle"
        );
        self.0.borrow_mut().insert(framework.to_string(), bundle);
        bundle
    }
}

/// Translate `key` through `map` and stat the target
fn translate<F: FileCache + ?Sized>(map: &HeaderMap, key: &str, fs: &F) -> Option<FileEntry> {
    let target = Path::new(map.lookup(key)?);
    let (parent, file_name) = split_parent(target)?;
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let dir = fs.stat_directory(parent)?;
    fs.stat_file(dir, file_name)
}
