//! Header map module - precomputed include-name translation tables
//!
//! Provides:
//! - `HeaderMap` with per-map case sensitivity
//! - JSON loading
//! - `HeaderMapSet`, the session-wide owner of every loaded map

pub mod load;
pub mod map;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use load::{load_header_map, parse_header_map, LoadOptions};
pub use map::{CaseSensitivity, HeaderMap};

use crate::search::config::{Location, SearchPathConfig};

/// Errors raised while loading a header map. All of them are fatal to
/// session setup.
#[derive(thiserror::Error, Debug)]
pub enum HeaderMapError {
    #[error("failed to read header map {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed header map {map}: {source}")]
    Parse {
        map: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("header map {map} contains an empty key")]
    InvalidKey { map: String },
    #[error("header map {map} maps `{key}` more than once")]
    DuplicateKey { map: String, key: String },
}

/// Owns the header maps of one session. A map is keyed by the path it was
/// configured with plus the options applied on load, so entries that share
/// a file but differ in options each get their own map.
#[derive(Debug, Default)]
pub struct HeaderMapSet {
    maps: Vec<HeaderMap>,
    by_key: HashMap<(PathBuf, LoadOptions), usize>,
}

impl HeaderMapSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every header map named by `config`, in configured order
    pub fn load(config: &SearchPathConfig) -> Result<Self, HeaderMapError> {
        let mut set = Self::new();
        for spec in &config.entries {
            if let Location::HeaderMap(path) = &spec.location {
                let options = spec.load_options();
                if set.slot(path, options).is_some() {
                    continue;
                }
                set.insert(path.clone(), options, load_header_map(path, options)?);
            }
        }
        Ok(set)
    }

    /// Register an already-built map; a later map for the same path and
    /// options replaces it
    pub fn insert(&mut self, path: impl Into<PathBuf>, options: LoadOptions, map: HeaderMap) {
        let key = (path.into(), options);
        match self.by_key.get(&key) {
            Some(&slot) => self.maps[slot] = map,
            None => {
                self.by_key.insert(key, self.maps.len());
                self.maps.push(map);
            }
        }
    }

    pub fn get(&self, path: &Path, options: LoadOptions) -> Option<&HeaderMap> {
        self.slot(path, options).map(|slot| &self.maps[slot])
    }

    /// Position of the map for `path` loaded with `options`; stable identity
    /// for duplicate checks
    pub fn slot(&self, path: &Path, options: LoadOptions) -> Option<usize> {
        self.by_key.get(&(path.to_path_buf(), options)).copied()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
