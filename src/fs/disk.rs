//! Disk-backed file cache
//!
//! Memoizes every stat for the lifetime of the cache: the file system is
//! assumed not to change during one session.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::{DirectoryEntry, FileCache, FileEntry};
use crate::core::paths::join_normalized;

/// Query counters for a [`DiskFileCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FsStats {
    /// Calls to `stat_directory`
    pub dir_queries: u64,
    /// Calls to `stat_file`
    pub file_queries: u64,
    /// Queries that actually reached the disk
    pub disk_stats: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryType {
    Dir,
    File,
}

#[derive(Debug, Default)]
struct Arena {
    dirs: Vec<PathBuf>,
    dir_ids: HashMap<PathBuf, DirectoryEntry>,
    dir_lookups: HashMap<PathBuf, Option<DirectoryEntry>>,
    files: Vec<PathBuf>,
    file_ids: HashMap<PathBuf, FileEntry>,
    file_lookups: HashMap<DirectoryEntry, HashMap<String, Option<FileEntry>>>,
}

impl Arena {
    fn intern_dir(&mut self, canonical: PathBuf) -> DirectoryEntry {
        if let Some(&id) = self.dir_ids.get(&canonical) {
            return id;
        }
        let id = DirectoryEntry::new(self.dirs.len() as u32);
        self.dirs.push(canonical.clone());
        self.dir_ids.insert(canonical, id);
        id
    }

    fn intern_file(&mut self, canonical: PathBuf) -> FileEntry {
        if let Some(&id) = self.file_ids.get(&canonical) {
            return id;
        }
        let id = FileEntry::new(self.files.len() as u32);
        self.files.push(canonical.clone());
        self.file_ids.insert(canonical, id);
        id
    }
}

/// [`FileCache`] over the real file system
#[derive(Debug, Default)]
pub struct DiskFileCache {
    arena: RefCell<Arena>,
    stats: Cell<FsStats>,
}

impl DiskFileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the query counters
    pub fn stats(&self) -> FsStats {
        self.stats.get()
    }

    /// Number of distinct files interned so far
    pub fn file_count(&self) -> usize {
        self.arena.borrow().files.len()
    }

    fn bump(&self, update: impl FnOnce(&mut FsStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Stat `path` and return its canonical form when it has the wanted type
    fn probe(&self, path: &Path, want: EntryType) -> Option<PathBuf> {
        self.bump(|s| s.disk_stats += 1);
        match std::fs::metadata(path) {
            Ok(meta) => {
                let matches = match want {
                    EntryType::Dir => meta.is_dir(),
                    EntryType::File => meta.is_file(),
                };
                if !matches {
                    return None;
                }
                Some(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "stat failed, treating as a miss");
                None
            }
        }
    }
}

impl FileCache for DiskFileCache {
    fn stat_directory(&self, path: &Path) -> Option<DirectoryEntry> {
        self.bump(|s| s.dir_queries += 1);
        if let Some(cached) = self.arena.borrow().dir_lookups.get(path) {
            return *cached;
        }

        let found = self.probe(path, EntryType::Dir);
        let mut arena = self.arena.borrow_mut();
        let result = found.map(|canonical| arena.intern_dir(canonical));
        arena.dir_lookups.insert(path.to_path_buf(), result);
        trace!(path = %path.display(), found = result.is_some(), "stat directory");
        result
    }

    fn stat_file(&self, dir: DirectoryEntry, relative: &str) -> Option<FileEntry> {
        self.bump(|s| s.file_queries += 1);
        let base = {
            let arena = self.arena.borrow();
            if let Some(cached) = arena
                .file_lookups
                .get(&dir)
                .and_then(|names| names.get(relative))
            {
                return *cached;
            }
            arena.dirs.get(dir.index()).cloned()
        };

        // A handle this cache never issued cannot contain anything.
        let found = base.and_then(|base| self.probe(&join_normalized(&base, relative), EntryType::File));
        let mut arena = self.arena.borrow_mut();
        let result = found.map(|canonical| arena.intern_file(canonical));
        arena
            .file_lookups
            .entry(dir)
            .or_default()
            .insert(relative.to_string(), result);
        result
    }

    fn dir_path(&self, dir: DirectoryEntry) -> PathBuf {
        self.arena
            .borrow()
            .dirs
            .get(dir.index())
            .cloned()
            .unwrap_or_default()
    }

    fn file_path(&self, file: FileEntry) -> PathBuf {
        self.arena
            .borrow()
            .files
            .get(file.index())
            .cloned()
            .unwrap_or_default()
    }
}
