//! Lookup results and their mapping onto the unified result model

use serde::{Deserialize, Serialize};

use crate::core::model::{DirCharacteristic, IncludeKind, ResultItem};
use crate::core::paths::normalize_path;
use crate::fs::{DirectoryEntry, FileCache, FileEntry};

/// Where a hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "from", content = "index", rename_all = "kebab-case")]
pub enum Origin {
    /// The directory of the file issuing a quoted include
    Includer,
    /// The search-path entry at this position
    Entry(usize),
}

/// The file issuing an include directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Includer {
    pub dir: DirectoryEntry,
    pub characteristic: DirCharacteristic,
}

impl Includer {
    pub fn new(dir: DirectoryEntry, characteristic: DirCharacteristic) -> Self {
        Self { dir, characteristic }
    }

    /// An includer living in a user directory
    pub fn user(dir: DirectoryEntry) -> Self {
        Self::new(dir, DirCharacteristic::User)
    }
}

/// A complete successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundHeader {
    pub file: FileEntry,
    pub search_path: Option<String>,
    pub relative_path: Option<String>,
    pub is_system_framework: bool,
    pub characteristic: DirCharacteristic,
    pub origin: Origin,
}

/// Answer to one `resolve` call: a full record or nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Found(FoundHeader),
    NotFound,
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }

    pub fn found(&self) -> Option<&FoundHeader> {
        match self {
            LookupResult::Found(header) => Some(header),
            LookupResult::NotFound => None,
        }
    }

    pub fn into_found(self) -> Option<FoundHeader> {
        match self {
            LookupResult::Found(header) => Some(header),
            LookupResult::NotFound => None,
        }
    }

    pub fn file(&self) -> Option<FileEntry> {
        self.found().map(|header| header.file)
    }

    /// Map onto the unified result model; `fs` must be the cache that issued
    /// the file handle.
    pub fn to_result_item<F: FileCache + ?Sized>(&self, name: &str, kind: IncludeKind, fs: &F) -> ResultItem {
        match self {
            LookupResult::Found(header) => {
                let mut item = ResultItem::header(name, kind, normalize_path(&fs.file_path(header.file)))
                    .with_characteristic(header.characteristic)
                    .with_search_path(header.search_path.clone(), header.relative_path.clone())
                    .with_system_framework(header.is_system_framework);
                if let Origin::Entry(index) = header.origin {
                    item = item.with_data(serde_json::json!({ "entry": index }));
                }
                item
            }
            LookupResult::NotFound => ResultItem::not_found(name, kind),
        }
    }
}
