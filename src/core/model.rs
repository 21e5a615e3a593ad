//! Unified Result Model
//!
//! Shared vocabulary for the search core (characteristics, include kinds) and
//! the record type every command maps its answers to before rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification attached to a search location and copied into every
/// result found through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirCharacteristic {
    #[default]
    User,
    System,
    ExternCSystem,
}

impl DirCharacteristic {
    /// True for both system flavours
    pub fn is_system(self) -> bool {
        !matches!(self, DirCharacteristic::User)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirCharacteristic::User => "user",
            DirCharacteristic::System => "system",
            DirCharacteristic::ExternCSystem => "extern-c-system",
        }
    }
}

impl fmt::Display for DirCharacteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `#include <...>` vs `#include "..."`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeKind {
    Angled,
    Quoted,
}

impl IncludeKind {
    /// Re-spell a bare name with this kind's delimiters
    pub fn spell(self, name: &str) -> String {
        match self {
            IncludeKind::Angled => format!("<{}>", name),
            IncludeKind::Quoted => format!("\"{}\"", name),
        }
    }
}

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    /// A resolved header
    Header,
    /// An include that no location satisfied
    NotFound,
    /// One configured search-path entry
    Entry,
    /// Lookup statistics
    Stats,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Spelled include name, or the entry name for search-list items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// How the include was spelled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_kind: Option<IncludeKind>,

    /// Resolved file path, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Location the file was found relative to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,

    /// Path of the file below `search_path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristic: Option<DirCharacteristic>,

    /// Found inside a framework the configuration declared as system
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub system_framework: bool,

    /// 1-indexed source line of the directive (deps only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Structured payload (entry details, statistics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn blank(kind: Kind) -> Self {
        Self {
            kind,
            name: None,
            include_kind: None,
            path: None,
            search_path: None,
            relative_path: None,
            characteristic: None,
            system_framework: false,
            line: None,
            data: None,
            errors: Vec::new(),
        }
    }

    /// Create a resolved-header result
    pub fn header(name: impl Into<String>, include_kind: IncludeKind, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            include_kind: Some(include_kind),
            path: Some(path.into()),
            ..Self::blank(Kind::Header)
        }
    }

    /// Create a not-found result
    pub fn not_found(name: impl Into<String>, include_kind: IncludeKind) -> Self {
        let name = name.into();
        let message = format!("'{}' file not found", name);
        Self {
            include_kind: Some(include_kind),
            errors: vec![ItemError::new("HEADER_NOT_FOUND", message)],
            name: Some(name),
            ..Self::blank(Kind::NotFound)
        }
    }

    /// Create a search-list entry result
    pub fn entry(name: impl Into<String>, characteristic: DirCharacteristic) -> Self {
        Self {
            name: Some(name.into()),
            characteristic: Some(characteristic),
            ..Self::blank(Kind::Entry)
        }
    }

    /// Create a statistics result
    pub fn stats(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Self::blank(Kind::Stats)
        }
    }

    pub fn with_characteristic(mut self, characteristic: DirCharacteristic) -> Self {
        self.characteristic = Some(characteristic);
        self
    }

    pub fn with_search_path(mut self, search_path: Option<String>, relative_path: Option<String>) -> Self {
        self.search_path = search_path;
        self.relative_path = relative_path;
        self
    }

    pub fn with_system_framework(mut self, system_framework: bool) -> Self {
        self.system_framework = system_framework;
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items that carry errors
    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|i| !i.errors.is_empty()).count()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
