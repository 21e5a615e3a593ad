//! Search module - header search-path resolution
//!
//! Provides:
//! - `SearchPathEntry`: directories, framework directories and header maps
//! - `SearchList`: the ordered list and its cached `resolve`
//! - `SearchPathConfig`: JSON/flag configuration and the validating builder

pub mod config;
pub mod entry;
pub mod list;
pub mod result;

pub use config::{ConfigError, Location, PathSpec, SearchFlags, SearchPathConfig};
pub use entry::{EntryMatch, LookupType, PathRequest, SearchPathEntry, SystemFrameworks};
pub use list::SearchList;
pub use result::{FoundHeader, Includer, LookupResult, Origin};
