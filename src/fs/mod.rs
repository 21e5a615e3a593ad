//! File-system capability consumed by the search core
//!
//! Provides:
//! - Value handles for directories and files (`DirectoryEntry`, `FileEntry`)
//! - The `FileCache` trait every lookup goes through
//! - A memoizing disk-backed implementation (`DiskFileCache`)

pub mod disk;
pub mod entry;

use std::path::{Path, PathBuf};

pub use disk::{DiskFileCache, FsStats};
pub use entry::{DirectoryEntry, FileEntry};

/// Stat-level access to the file system.
///
/// Implementations own every handle they issue. Failures of any kind,
/// including permission errors, surface as `None`.
pub trait FileCache {
    /// Look up a directory by path
    fn stat_directory(&self, path: &Path) -> Option<DirectoryEntry>;

    /// Look up a regular file below `dir`; `relative` uses '/' separators
    fn stat_file(&self, dir: DirectoryEntry, relative: &str) -> Option<FileEntry>;

    /// Path of a directory handle issued by this cache
    fn dir_path(&self, dir: DirectoryEntry) -> PathBuf;

    /// Path of a file handle issued by this cache
    fn file_path(&self, file: FileEntry) -> PathBuf;
}

impl<T: FileCache + ?Sized> FileCache for &T {
    fn stat_directory(&self, path: &Path) -> Option<DirectoryEntry> {
        (**self).stat_directory(path)
    }

    fn stat_file(&self, dir: DirectoryEntry, relative: &str) -> Option<FileEntry> {
        (**self).stat_file(dir, relative)
    }

    fn dir_path(&self, dir: DirectoryEntry) -> PathBuf {
        (**self).dir_path(dir)
    }

    fn file_path(&self, file: FileEntry) -> PathBuf {
        (**self).file_path(file)
    }
}
