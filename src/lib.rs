//! hsearch - header search-path resolution
//!
//! hsearch provides:
//! - An ordered search list over include directories, framework directories
//!   and header maps
//! - Angled/quoted include resolution with per-session caching
//! - A command-line driver with unified output (jsonl/json/md/raw)

pub mod backends;
pub mod cache;
pub mod cli;
pub mod core;
pub mod fs;
pub mod headermap;
pub mod search;

pub use fs::{DirectoryEntry, DiskFileCache, FileCache, FileEntry};
pub use search::{Includer, LookupResult, PathRequest, SearchList, SearchPathConfig};
