//! Resolve command - answer include names from the command line

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::model::{DirCharacteristic, IncludeKind, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::fs::FileCache;
use crate::search::{Includer, PathRequest, SearchList};

/// Split `<a.h>` / `"a.h"` into the bare name and the kind its delimiters
/// select. Undelimited names return `None` for the kind.
pub fn parse_spelled(name: &str) -> (&str, Option<IncludeKind>) {
    if let Some(inner) = name.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        return (inner, Some(IncludeKind::Angled));
    }
    if let Some(inner) = name
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return (inner, Some(IncludeKind::Quoted));
    }
    (name, None)
}

/// Includer for a file path, or for a directory given directly
pub fn includer_for<F: FileCache + ?Sized>(
    list: &SearchList<'_, F>,
    path: &Path,
    system: bool,
) -> Result<Includer> {
    let dir = if path.is_dir() {
        path
    } else {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };
    let entry = list
        .file_cache()
        .stat_directory(dir)
        .with_context(|| format!("Includer directory not found: {}", dir.display()))?;
    let characteristic = if system {
        DirCharacteristic::System
    } else {
        DirCharacteristic::User
    };
    Ok(Includer::new(entry, characteristic))
}

/// Resolve each name and collect one item per name
pub fn resolve_names<F: FileCache + ?Sized>(
    list: &SearchList<'_, F>,
    names: &[String],
    default_kind: IncludeKind,
    includer: Option<Includer>,
) -> ResultSet {
    names
        .iter()
        .map(|spelled| {
            let (name, kind) = parse_spelled(spelled);
            let kind = kind.unwrap_or(default_kind);
            list.resolve(name, kind, includer, PathRequest::ALL)
                .to_result_item(name, kind, list.file_cache())
        })
        .collect()
}

pub fn run_resolve<F: FileCache + ?Sized>(
    list: &SearchList<'_, F>,
    names: &[String],
    kind: IncludeKind,
    from: Option<&Path>,
    includer_system: bool,
    config: RenderConfig,
) -> Result<()> {
    let includer = from
        .map(|path| includer_for(list, path, includer_system))
        .transpose()?;
    let result_set = resolve_names(list, names, kind, includer);

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
