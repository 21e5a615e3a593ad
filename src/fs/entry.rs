//! Opaque handles issued by a file cache.
//!
//! Handles are plain indices into the issuing cache's arena. Two handles
//! from the same cache compare equal exactly when they name the same
//! canonical path.

use std::fmt;

/// Handle to a directory known to a [`FileCache`](super::FileCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectoryEntry(u32);

/// Handle to a regular file known to a [`FileCache`](super::FileCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileEntry(u32);

impl DirectoryEntry {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FileEntry {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dir#{}", self.0)
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}
