//! Deps command - resolve the include directives of one source file
//!
//! Directives are found line by line with a regex. This is not a
//! preprocessor: conditionals, macros and comments spanning lines are not
//! understood.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::backends::resolve::includer_for;
use crate::core::model::{IncludeKind, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::fs::FileCache;
use crate::search::{Includer, PathRequest, SearchList};

/// `#include <a.h>`, `# include "a.h"`, `#import <A/A.h>`
pub static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*#\s*(?:include|import)\s*(?:<([^>]+)>|"([^"]+)")"#).expect("Invalid INCLUDE_RE regex")
});

/// One include directive found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// 1-indexed
    pub line: u32,
    pub name: String,
    pub kind: IncludeKind,
}

/// Find every include directive in `content`
pub fn scan_includes(content: &str) -> Vec<Directive> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let caps = INCLUDE_RE.captures(line)?;
            let (name, kind) = match (caps.get(1), caps.get(2)) {
                (Some(name), _) => (name, IncludeKind::Angled),
                (None, Some(name)) => (name, IncludeKind::Quoted),
                (None, None) => return None,
            };
            Some(Directive {
                line: index as u32 + 1,
                name: name.as_str().to_string(),
                kind,
            })
        })
        .collect()
}

/// Resolve directives in file order; quoted ones try `includer` first
pub fn resolve_directives<F: FileCache + ?Sized>(
    list: &SearchList<'_, F>,
    includer: Includer,
    directives: &[Directive],
) -> ResultSet {
    directives
        .iter()
        .map(|directive| {
            list.resolve(&directive.name, directive.kind, Some(includer), PathRequest::ALL)
                .to_result_item(&directive.name, directive.kind, list.file_cache())
                .with_line(directive.line)
        })
        .collect()
}

pub fn run_deps<F: FileCache + ?Sized>(
    list: &SearchList<'_, F>,
    file: &Path,
    config: RenderConfig,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read source file: {}", file.display()))?;
    let includer = includer_for(list, file, false)?;
    let directives = scan_includes(&content);
    let result_set = resolve_directives(list, includer, &directives);

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
