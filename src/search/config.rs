//! Search-path configuration and the list builder
//!
//! A `SearchPathConfig` is plain data: it comes from a JSON file, from
//! driver flags, or both. `build` validates it once against a file cache
//! and the loaded header maps and produces the immutable `SearchList`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::entry::{SearchPathEntry, SystemFrameworks};
use super::list::SearchList;
use crate::core::model::DirCharacteristic;
use crate::core::paths::normalize_path;
use crate::fs::{DirectoryEntry, FileCache};
use crate::headermap::{CaseSensitivity, HeaderMapSet, LoadOptions};

/// Fatal configuration problems, reported before any lookup can run
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("duplicate search path entry {name}: entries {first} and {second} are identical")]
    DuplicateEntry {
        first: usize,
        second: usize,
        name: String,
    },
    #[error("header map {} was not loaded", .path.display())]
    MissingHeaderMap { path: PathBuf },
    #[error("entry {index} ({name}) is not a header map but is marked as an index map")]
    IndexFlagOnDirectory { index: usize, name: String },
    #[error("angled start {angled_start} is past the end of {len} entries")]
    AngledStartOutOfRange { angled_start: usize, len: usize },
}

/// Where an entry looks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    Directory(PathBuf),
    Framework(PathBuf),
    HeaderMap(PathBuf),
}

impl Location {
    pub fn path(&self) -> &Path {
        match self {
            Location::Directory(path) | Location::Framework(path) | Location::HeaderMap(path) => path,
        }
    }
}

/// One configured entry.
///
/// JSON form: `{"directory": "/usr/include", "characteristic": "system"}`;
/// the location key is one of `directory`, `framework` or `header-map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSpec {
    #[serde(flatten)]
    pub location: Location,
    #[serde(default)]
    pub characteristic: DirCharacteristic,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub quote_only: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub index_map: bool,
    /// Overrides the header map's own setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitivity: Option<CaseSensitivity>,
}

impl PathSpec {
    pub fn new(location: Location, characteristic: DirCharacteristic) -> Self {
        Self {
            location,
            characteristic,
            quote_only: false,
            index_map: false,
            case_sensitivity: None,
        }
    }

    pub fn quote_only(mut self) -> Self {
        self.quote_only = true;
        self
    }

    pub fn index_map(mut self) -> Self {
        self.index_map = true;
        self
    }

    pub fn with_case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case_sensitivity = Some(case);
        self
    }

    /// Options a header map named by this entry is loaded with
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            case: self.case_sensitivity,
            index: self.index_map,
        }
    }
}

/// Search-path flags as a compiler driver spells them
#[derive(Debug, Clone, Default)]
pub struct SearchFlags {
    /// `-iquote`
    pub quote_dirs: Vec<PathBuf>,
    /// `-I`
    pub include_dirs: Vec<PathBuf>,
    /// `-F`
    pub framework_dirs: Vec<PathBuf>,
    /// `-isystem`
    pub system_dirs: Vec<PathBuf>,
    /// `-iframework`
    pub system_framework_dirs: Vec<PathBuf>,
    pub header_maps: Vec<PathBuf>,
    pub index_header_maps: Vec<PathBuf>,
    pub system_frameworks: Vec<String>,
}

/// The complete configuration of one session's search list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPathConfig {
    #[serde(default)]
    pub entries: Vec<PathSpec>,
    /// First entry angled includes may use; defaults to the first entry that
    /// is not quote-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angled_start: Option<usize>,
    #[serde(default)]
    pub system_frameworks: Vec<String>,
}

/// What makes two entries the same entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Identity {
    Directory(DirectoryEntry),
    Framework(DirectoryEntry),
    HeaderMap(usize),
}

impl SearchPathConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse search path config")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Quote-only dirs, header maps, `-I`, `-F`, `-isystem`, `-iframework`
    pub fn from_flags(flags: &SearchFlags) -> Self {
        let mut entries = Vec::new();
        let user = DirCharacteristic::User;
        let system = DirCharacteristic::System;

        entries.extend(
            flags
                .quote_dirs
                .iter()
                .map(|path| PathSpec::new(Location::Directory(path.clone()), user).quote_only()),
        );
        entries.extend(
            flags
                .header_maps
                .iter()
                .map(|path| PathSpec::new(Location::HeaderMap(path.clone()), user)),
        );
        entries.extend(
            flags
                .index_header_maps
                .iter()
                .map(|path| PathSpec::new(Location::HeaderMap(path.clone()), user).index_map()),
        );
        entries.extend(
            flags
                .include_dirs
                .iter()
                .map(|path| PathSpec::new(Location::Directory(path.clone()), user)),
        );
        entries.extend(
            flags
                .framework_dirs
                .iter()
                .map(|path| PathSpec::new(Location::Framework(path.clone()), user)),
        );
        entries.extend(
            flags
                .system_dirs
                .iter()
                .map(|path| PathSpec::new(Location::Directory(path.clone()), system)),
        );
        entries.extend(
            flags
                .system_framework_dirs
                .iter()
                .map(|path| PathSpec::new(Location::Framework(path.clone()), system)),
        );

        Self {
            entries,
            angled_start: Some(flags.quote_dirs.len()),
            system_frameworks: flags.system_frameworks.clone(),
        }
    }

    /// Append `other` after this config's entries.
    ///
    /// An explicit angled start survives only from the side that supplies
    /// the leading entries.
    pub fn merge(&mut self, other: SearchPathConfig) {
        if self.entries.is_empty() {
            self.angled_start = other.angled_start;
        }
        self.entries.extend(other.entries);
        for framework in other.system_frameworks {
            if !self.system_frameworks.contains(&framework) {
                self.system_frameworks.push(framework);
            }
        }
    }

    /// Position of the first entry that is not quote-only
    pub fn auto_angled_start(&self) -> usize {
        self.entries
            .iter()
            .position(|spec| !spec.quote_only)
            .unwrap_or(self.entries.len())
    }

    /// Validate and build the search list.
    ///
    /// Directories and framework roots that do not exist are dropped with a
    /// warning. Header maps must already be in `maps`.
    pub fn build<'a, F: FileCache + ?Sized>(
        &self,
        fs: &'a F,
        maps: &'a HeaderMapSet,
    ) -> Result<SearchList<'a, F>, ConfigError> {
        let len = self.entries.len();
        let angled_start = self.angled_start.unwrap_or_else(|| self.auto_angled_start());
        if angled_start > len {
            return Err(ConfigError::AngledStartOutOfRange { angled_start, len });
        }

        let mut entries = Vec::with_capacity(len);
        let mut seen: HashMap<(Identity, DirCharacteristic, bool, bool), usize> = HashMap::new();
        let mut dropped_before_start = 0;

        for (index, spec) in self.entries.iter().enumerate() {
            let path = spec.location.path();
            let name = normalize_path(path);
            if spec.index_map && !matches!(spec.location, Location::HeaderMap(_)) {
                return Err(ConfigError::IndexFlagOnDirectory { index, name });
            }

            let (entry, identity) = match &spec.location {
                Location::Directory(_) | Location::Framework(_) => {
                    let Some(dir) = fs.stat_directory(path) else {
                        warn!("ignoring nonexistent directory \"{}\"", name);
                        if index < angled_start {
                            dropped_before_start += 1;
                        }
                        continue;
                    };
                    if matches!(spec.location, Location::Framework(_)) {
                        (
                            SearchPathEntry::new_framework(dir, name.clone(), spec.characteristic),
                            Identity::Framework(dir),
                        )
                    } else {
                        (
                            SearchPathEntry::new_directory(dir, name.clone(), spec.characteristic),
                            Identity::Directory(dir),
                        )
                    }
                }
                Location::HeaderMap(path) => match (
                    maps.slot(path, spec.load_options()),
                    maps.get(path, spec.load_options()),
                ) {
                    (Some(slot), Some(map)) => (
                        SearchPathEntry::new_header_map(
                            map,
                            spec.characteristic,
                            spec.index_map || map.is_index_map(),
                        ),
                        Identity::HeaderMap(slot),
                    ),
                    _ => return Err(ConfigError::MissingHeaderMap { path: path.clone() }),
                },
            };

            let key = (identity, spec.characteristic, spec.quote_only, spec.index_map);
            if let Some(&first) = seen.get(&key) {
                return Err(ConfigError::DuplicateEntry {
                    first,
                    second: index,
                    name,
                });
            }
            seen.insert(key, index);
            entries.push((entry, spec.quote_only));
        }

        let angled_start = angled_start - dropped_before_start;
        debug!(entries = entries.len(), angled_start, "built search list");
        Ok(SearchList::from_parts(
            fs,
            entries,
            angled_start,
            SystemFrameworks::new(self.system_frameworks.iter().cloned()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::IncludeKind;
    use crate::fs::DiskFileCache;
    use crate::headermap::HeaderMap;
    use crate::search::entry::PathRequest;
    use crate::search::result::{LookupResult, Origin};
    use std::fs;
    use tempfile::tempdir;

    fn dir(path: &Path, characteristic: DirCharacteristic) -> PathSpec {
        PathSpec::new(Location::Directory(path.to_path_buf()), characteristic)
    }

    #[test]
    fn test_parse_json_config() {
        let config = SearchPathConfig::from_json_str(
            r#"{
                "entries": [
                    {"directory": "src", "quote_only": true},
                    {"header-map": "app.hmap", "index_map": true},
                    {"framework": "/Library/Frameworks", "characteristic": "system"},
                    {"directory": "/usr/include", "characteristic": "extern-c-system"}
                ],
                "system_frameworks": ["Widgets"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.entries.len(), 4);
        assert!(config.entries[0].quote_only);
        assert_eq!(config.entries[1].location, Location::HeaderMap(PathBuf::from("app.hmap")));
        assert!(config.entries[1].index_map);
        assert_eq!(config.entries[2].characteristic, DirCharacteristic::System);
        assert_eq!(config.entries[3].characteristic, DirCharacteristic::ExternCSystem);
        assert_eq!(config.angled_start, None);
        assert_eq!(config.auto_angled_start(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SearchPathConfig::from_json_str("{\"entries\": 3}").is_err());
    }

    #[test]
    fn test_from_flags_order() {
        let flags = SearchFlags {
            quote_dirs: vec!["q".into()],
            include_dirs: vec!["i".into()],
            framework_dirs: vec!["f".into()],
            system_dirs: vec!["s".into()],
            system_framework_dirs: vec!["sf".into()],
            header_maps: vec!["h.hmap".into()],
            index_header_maps: vec!["x.hmap".into()],
            system_frameworks: vec!["Widgets".into()],
        };
        let config = SearchPathConfig::from_flags(&flags);

        let locations: Vec<&Location> = config.entries.iter().map(|spec| &spec.location).collect();
        assert_eq!(
            locations,
            vec![
                &Location::Directory("q".into()),
                &Location::HeaderMap("h.hmap".into()),
                &Location::HeaderMap("x.hmap".into()),
                &Location::Directory("i".into()),
                &Location::Framework("f".into()),
                &Location::Directory("s".into()),
                &Location::Framework("sf".into()),
            ]
        );
        assert!(config.entries[0].quote_only);
        assert!(config.entries[2].index_map);
        assert_eq!(config.entries[5].characteristic, DirCharacteristic::System);
        assert_eq!(config.entries[6].characteristic, DirCharacteristic::System);
        assert_eq!(config.angled_start, Some(1));
    }

    #[test]
    fn test_merge_appends_flags() {
        let mut file = SearchPathConfig {
            entries: vec![dir(Path::new("a"), DirCharacteristic::User)],
            angled_start: Some(0),
            system_frameworks: vec!["Widgets".into()],
        };
        let flags = SearchPathConfig {
            entries: vec![dir(Path::new("b"), DirCharacteristic::User)],
            angled_start: Some(1),
            system_frameworks: vec!["Widgets".into(), "Gadgets".into()],
        };
        file.merge(flags);

        assert_eq!(file.entries.len(), 2);
        assert_eq!(file.angled_start, Some(0));
        assert_eq!(file.system_frameworks, vec!["Widgets", "Gadgets"]);
    }

    #[test]
    fn test_merge_into_empty_takes_angled_start() {
        let mut empty = SearchPathConfig::default();
        empty.merge(SearchPathConfig {
            entries: vec![dir(Path::new("q"), DirCharacteristic::User).quote_only()],
            angled_start: Some(1),
            system_frameworks: Vec::new(),
        });
        assert_eq!(empty.angled_start, Some(1));
    }

    #[test]
    fn test_build_drops_nonexistent_and_shifts_angled_start() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        let config = SearchPathConfig {
            entries: vec![
                dir(&temp.path().join("missing"), DirCharacteristic::User).quote_only(),
                dir(&temp.path().join("real"), DirCharacteristic::User).quote_only(),
                dir(&temp.path().join("also-missing"), DirCharacteristic::System),
                dir(&temp.path().join("real"), DirCharacteristic::System),
            ],
            angled_start: Some(2),
            system_frameworks: Vec::new(),
        };
        let cache = DiskFileCache::new();
        let maps = HeaderMapSet::new();
        let list = config.build(&cache, &maps).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.angled_start(), 1);
        assert!(list.is_quote_only(0));
        assert!(!list.is_quote_only(1));
    }

    #[test]
    fn test_build_rejects_duplicate() {
        let temp = tempdir().unwrap();
        let config = SearchPathConfig {
            entries: vec![
                dir(temp.path(), DirCharacteristic::User),
                dir(&temp.path().join("."), DirCharacteristic::User),
            ],
            ..Default::default()
        };
        let cache = DiskFileCache::new();
        let maps = HeaderMapSet::new();

        match config.build(&cache, &maps) {
            Err(ConfigError::DuplicateEntry { first, second, .. }) => {
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("expected duplicate error, got {:?}", other.map(|list| list.len())),
        }
    }

    #[test]
    fn test_same_directory_different_characteristic_is_allowed() {
        let temp = tempdir().unwrap();
        let config = SearchPathConfig {
            entries: vec![
                dir(temp.path(), DirCharacteristic::User),
                dir(temp.path(), DirCharacteristic::System),
                PathSpec::new(Location::Framework(temp.path().to_path_buf()), DirCharacteristic::User),
            ],
            ..Default::default()
        };
        let cache = DiskFileCache::new();
        let maps = HeaderMapSet::new();
        assert_eq!(config.build(&cache, &maps).unwrap().len(), 3);
    }

    #[test]
    fn test_build_rejects_unloaded_header_map() {
        let config = SearchPathConfig {
            entries: vec![PathSpec::new(Location::HeaderMap("app.hmap".into()), DirCharacteristic::User)],
            ..Default::default()
        };
        let cache = DiskFileCache::new();
        let maps = HeaderMapSet::new();
        assert!(matches!(
            config.build(&cache, &maps),
            Err(ConfigError::MissingHeaderMap { .. })
        ));
    }

    #[test]
    fn test_build_rejects_duplicate_header_map() {
        let config = SearchPathConfig {
            entries: vec![
                PathSpec::new(Location::HeaderMap("app.hmap".into()), DirCharacteristic::User),
                PathSpec::new(Location::HeaderMap("app.hmap".into()), DirCharacteristic::User),
            ],
            ..Default::default()
        };
        let cache = DiskFileCache::new();
        let mut maps = HeaderMapSet::new();
        maps.insert(
            "app.hmap",
            LoadOptions::default(),
            HeaderMap::new("app.hmap", CaseSensitivity::Insensitive, false),
        );
        assert!(matches!(
            config.build(&cache, &maps),
            Err(ConfigError::DuplicateEntry { .. })
        ));
    }

    #[test]
    fn test_shared_header_map_keeps_index_flag_per_entry() {
        let temp = tempdir().unwrap();
        let header = temp.path().join("Sources/Header.h");
        fs::create_dir_all(header.parent().unwrap()).unwrap();
        fs::write(&header, "").unwrap();
        let hmap = temp.path().join("widgets.json");
        fs::write(
            &hmap,
            serde_json::json!({ "Header.h": header.to_string_lossy() }).to_string(),
        )
        .unwrap();

        let config = SearchPathConfig {
            entries: vec![
                PathSpec::new(Location::HeaderMap(hmap.clone()), DirCharacteristic::User).index_map(),
                PathSpec::new(Location::HeaderMap(hmap.clone()), DirCharacteristic::System),
            ],
            angled_start: Some(1),
            system_frameworks: Vec::new(),
        };
        let cache = DiskFileCache::new();
        let maps = HeaderMapSet::load(&config).unwrap();
        let list = config.build(&cache, &maps).unwrap();

        assert!(list.entry(0).unwrap().is_index_header_map());
        assert!(!list.entry(1).unwrap().is_index_header_map());

        let angled = list.resolve("Widgets/Header.h", IncludeKind::Angled, None, PathRequest::NONE);
        assert_eq!(angled, LookupResult::NotFound);

        let quoted = list.resolve("Widgets/Header.h", IncludeKind::Quoted, None, PathRequest::NONE);
        assert_eq!(quoted.found().unwrap().origin, Origin::Entry(0));

        let plain = list.resolve("Header.h", IncludeKind::Angled, None, PathRequest::NONE);
        assert_eq!(plain.found().unwrap().origin, Origin::Entry(1));
        assert_eq!(plain.found().unwrap().characteristic, DirCharacteristic::System);
    }

    #[test]
    fn test_build_rejects_index_flag_on_directory() {
        let temp = tempdir().unwrap();
        let config = SearchPathConfig {
            entries: vec![dir(temp.path(), DirCharacteristic::User).index_map()],
            ..Default::default()
        };
        let cache = DiskFileCache::new();
        let maps = HeaderMapSet::new();
        assert!(matches!(
            config.build(&cache, &maps),
            Err(ConfigError::IndexFlagOnDirectory { index: 0, .. })
        ));
    }

    #[test]
    fn test_build_rejects_angled_start_out_of_range() {
        let config = SearchPathConfig {
            angled_start: Some(1),
            ..Default::default()
        };
        let cache = DiskFileCache::new();
        let maps = HeaderMapSet::new();
        assert!(matches!(
            config.build(&cache, &maps),
            Err(ConfigError::AngledStartOutOfRange { angled_start: 1, len: 0 })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::DuplicateEntry {
            first: 0,
            second: 2,
            name: "/inc".to_string(),
        };
        assert!(err.to_string().contains("/inc"));
        assert!(err.to_string().contains("0 and 2"));
    }
}
