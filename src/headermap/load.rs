//! Header map loading
//!
//! Header maps are read from JSON, either a flat object of translations:
//!
//! ```json
//! { "Widget.h": "/src/ui/Widget.h" }
//! ```
//!
//! or a detailed form that also declares case sensitivity and whether the
//! map is an index map:
//!
//! ```json
//! { "case_sensitive": true, "index": true, "entries": { "Header.h": "/sdk/Header.h" } }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::{CaseSensitivity, HeaderMap, HeaderMapError};
use crate::core::paths::normalize_path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedMap {
    #[serde(default)]
    case_sensitive: Option<bool>,
    #[serde(default)]
    index: bool,
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HeaderMapFile {
    Detailed(DetailedMap),
    Flat(BTreeMap<String, String>),
}

/// Options the search-path configuration applies on top of the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    /// Overrides whatever the file declares
    pub case: Option<CaseSensitivity>,
    /// Forces index-map behaviour even if the file does not declare it
    pub index: bool,
}

/// Read and parse a header map file
pub fn load_header_map(path: &Path, options: LoadOptions) -> Result<HeaderMap, HeaderMapError> {
    let content = std::fs::read_to_string(path).map_err(|source| HeaderMapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_header_map(&normalize_path(path), &content, options)
}

/// Parse header map JSON; `name` identifies the map in diagnostics
pub fn parse_header_map(
    name: &str,
    content: &str,
    options: LoadOptions,
) -> Result<HeaderMap, HeaderMapError> {
    let file: HeaderMapFile =
        serde_json::from_str(content).map_err(|source| HeaderMapError::Parse {
            map: name.to_string(),
            source,
        })?;

    let (declared_case, declared_index, entries) = match file {
        HeaderMapFile::Detailed(detailed) => {
            let case = detailed.case_sensitive.map(|sensitive| {
                if sensitive {
                    CaseSensitivity::Sensitive
                } else {
                    CaseSensitivity::Insensitive
                }
            });
            (case, detailed.index, detailed.entries)
        }
        HeaderMapFile::Flat(entries) => (None, false, entries),
    };

    let case = options.case.or(declared_case).unwrap_or_default();
    let map = HeaderMap::from_entries(name, case, options.index || declared_index, entries)?;
    debug!(map = name, entries = map.len(), ?case, index = map.is_index_map(), "loaded header map");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flat_map() {
        let map = parse_header_map(
            "app.hmap",
            r#"{"Widget.h": "/src/Widget.h"}"#,
            LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(map.lookup("Widget.h"), Some("/src/Widget.h"));
        assert_eq!(map.case_sensitivity(), CaseSensitivity::Insensitive);
        assert!(!map.is_index_map());
    }

    #[test]
    fn test_parse_detailed_map() {
        let map = parse_header_map(
            "Widgets.hmap",
            r#"{"case_sensitive": true, "index": true, "entries": {"Header.h": "/sdk/Header.h"}}"#,
            LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(map.case_sensitivity(), CaseSensitivity::Sensitive);
        assert!(map.is_index_map());
        assert_eq!(map.lookup("header.h"), None);
    }

    #[test]
    fn test_options_override_file() {
        let options = LoadOptions {
            case: Some(CaseSensitivity::Insensitive),
            index: true,
        };
        let map = parse_header_map(
            "Widgets.hmap",
            r#"{"case_sensitive": true, "entries": {"Header.h": "/sdk/Header.h"}}"#,
            options,
        )
        .unwrap();
        assert_eq!(map.lookup("header.h"), Some("/sdk/Header.h"));
        assert!(map.is_index_map());
    }

    #[test]
    fn test_malformed_map_is_parse_error() {
        let result = parse_header_map("bad.hmap", "{not json", LoadOptions::default());
        assert!(matches!(result, Err(HeaderMapError::Parse { .. })));

        let result = parse_header_map("bad.hmap", r#"{"a.h": 3}"#, LoadOptions::default());
        assert!(matches!(result, Err(HeaderMapError::Parse { .. })));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = tempdir().unwrap();
        let result = load_header_map(&temp.path().join("none.json"), LoadOptions::default());
        assert!(matches!(result, Err(HeaderMapError::Io { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("app.json");
        std::fs::write(&path, r#"{"a.h": "/x/a.h"}"#).unwrap();

        let map = load_header_map(&path, LoadOptions::default()).unwrap();
        assert!(map.name().ends_with("app.json"));
        assert_eq!(map.len(), 1);
    }
}
