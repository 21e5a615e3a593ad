//! List command - the effective search list, in search order

use anyhow::Result;
use serde_json::json;

use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::fs::FileCache;
use crate::search::SearchList;

/// One entry item per search-path entry, then a summary item
pub fn list_entries<F: FileCache + ?Sized>(list: &SearchList<'_, F>) -> ResultSet {
    let mut result_set: ResultSet = list
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let quote_only = list.is_quote_only(index);
            ResultItem::entry(entry.name(), entry.dir_characteristic()).with_data(json!({
                "index": index,
                "lookup_type": entry.lookup_type(),
                "quote_only": quote_only,
                "angled": index >= list.angled_start() && !quote_only,
                "index_map": entry.is_index_header_map(),
            }))
        })
        .collect();

    result_set.push(ResultItem::stats(json!({
        "entries": list.len(),
        "angled_start": list.angled_start(),
        "system_frameworks": list.system_frameworks().sorted(),
        "fingerprint": list.fingerprint(),
    })));
    result_set
}

pub fn run_list<F: FileCache + ?Sized>(list: &SearchList<'_, F>, config: RenderConfig) -> Result<()> {
    let result_set = list_entries(list);

    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
