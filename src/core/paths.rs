//! Path normalization utilities
//!
//! Include names are always spelled with '/' separators; these helpers split
//! them and map them onto native paths.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Join an include-style relative name onto a native base path
pub fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    base.join(relative.replace('/', std::path::MAIN_SEPARATOR_STR))
}

/// Split `<Framework>/<Rest>` into its two halves.
///
/// Returns `None` when there is no separator or either half is empty.
pub fn split_framework(name: &str) -> Option<(&str, &str)> {
    let (framework, rest) = name.split_once('/')?;
    if framework.is_empty() || rest.is_empty() {
        return None;
    }
    Some((framework, rest))
}

/// Split a file path into its parent directory and final component
pub fn split_parent(path: &Path) -> Option<(&Path, &str)> {
    let parent = path.parent()?;
    let file_name = path.file_name()?.to_str()?;
    Some((parent, file_name))
}

/// Directory name of a framework bundle: `Name.framework`
pub fn framework_bundle_name(framework: &str) -> String {
    format!("{}.framework", framework)
}
