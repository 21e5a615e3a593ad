//! In-memory header map
//!
//! A header map translates spelled include names straight to file paths,
//! so a lookup never has to scan a directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::HeaderMapError;
use crate::core::util::fold_ascii;

/// How keys are compared on lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    Sensitive,
    /// ASCII case is ignored
    #[default]
    Insensitive,
}

/// A parsed name → path translation table
#[derive(Debug, Clone)]
pub struct HeaderMap {
    name: String,
    index: bool,
    case: CaseSensitivity,
    entries: HashMap<String, String>,
}

impl HeaderMap {
    /// Create an empty map. `name` is the file the map was read from.
    pub fn new(name: impl Into<String>, case: CaseSensitivity, index: bool) -> Self {
        Self {
            name: name.into(),
            index,
            case,
            entries: HashMap::new(),
        }
    }

    /// Build a map from `(key, path)` pairs, rejecting empty and colliding keys
    pub fn from_entries<K, V>(
        name: impl Into<String>,
        case: CaseSensitivity,
        index: bool,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, HeaderMapError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new(name, case, index);
        for (key, value) in entries {
            map.insert(key, value)?;
        }
        Ok(map)
    }

    /// Add one translation
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), HeaderMapError> {
        let key = key.into();
        if key.is_empty() {
            return Err(HeaderMapError::InvalidKey {
                map: self.name.clone(),
            });
        }
        let folded = self.fold(&key);
        if self.entries.contains_key(&folded) {
            return Err(HeaderMapError::DuplicateKey {
                map: self.name.clone(),
                key,
            });
        }
        self.entries.insert(folded, value.into());
        Ok(())
    }

    /// Translate `name` to a path, honouring the map's case sensitivity
    pub fn lookup(&self, name: &str) -> Option<&str> {
        let found = match self.case {
            CaseSensitivity::Sensitive => self.entries.get(name),
            CaseSensitivity::Insensitive => self.entries.get(&fold_ascii(name)),
        };
        found.map(String::as_str)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the map's keys omit a framework-name prefix
    pub fn is_index_map(&self) -> bool {
        self.index
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fold(&self, key: &str) -> String {
        match self.case {
            CaseSensitivity::Sensitive => key.to_string(),
            CaseSensitivity::Insensitive => fold_ascii(key),
        }
    }
}
