//! Lookup cache - per-session memo of resolution outcomes
//!
//! Two tables, both monotonic for the lifetime of the session:
//! - shared: keyed by spelled name and include kind. A search list's scan
//!   start index is a pure function of the include kind, so this is the same
//!   partitioning as keying by start index.
//! - includer: keyed by including directory and spelled name, for the
//!   quoted-include probe of the includer's own directory.
//!
//! Misses are cached exactly like hits.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::model::IncludeKind;
use crate::fs::DirectoryEntry;

/// A cached answer: `Some` for a hit, `None` for a remembered miss
pub type Outcome<V> = Option<V>;

#[derive(Debug, Clone, Copy)]
struct KindSlots<V> {
    angled: Option<Outcome<V>>,
    quoted: Option<Outcome<V>>,
}

impl<V> Default for KindSlots<V> {
    fn default() -> Self {
        Self {
            angled: None,
            quoted: None,
        }
    }
}

impl<V> KindSlots<V> {
    fn slot(&mut self, kind: IncludeKind) -> &mut Option<Outcome<V>> {
        match kind {
            IncludeKind::Angled => &mut self.angled,
            IncludeKind::Quoted => &mut self.quoted,
        }
    }
}

/// Memo of lookup outcomes, filled through `&self`
#[derive(Debug)]
pub struct LookupCache<V> {
    shared: RefCell<HashMap<Box<str>, KindSlots<V>>>,
    includer: RefCell<HashMap<DirectoryEntry, HashMap<Box<str>, Outcome<V>>>>,
}

impl<V> Default for LookupCache<V> {
    fn default() -> Self {
        Self {
            shared: RefCell::new(HashMap::new()),
            includer: RefCell::new(HashMap::new()),
        }
    }
}

impl<V: Copy> LookupCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome of a search-list scan, if this query was seen before
    pub fn get(&self, name: &str, kind: IncludeKind) -> Option<Outcome<V>> {
        let shared = self.shared.borrow();
        let slots = shared.get(name)?;
        match kind {
            IncludeKind::Angled => slots.angled,
            IncludeKind::Quoted => slots.quoted,
        }
    }

    pub fn insert(&self, name: &str, kind: IncludeKind, outcome: Outcome<V>) {
        let mut shared = self.shared.borrow_mut();
        if !shared.contains_key(name) {
            shared.insert(Box::from(name), KindSlots::default());
        }
        if let Some(slots) = shared.get_mut(name) {
            *slots.slot(kind) = Some(outcome);
        }
    }

    /// Cached outcome of probing an including directory
    pub fn get_includer(&self, dir: DirectoryEntry, name: &str) -> Option<Outcome<V>> {
        self.includer
            .borrow()
            .get(&dir)
            .and_then(|names| names.get(name))
            .copied()
    }

    pub fn insert_includer(&self, dir: DirectoryEntry, name: &str, outcome: Outcome<V>) {
        self.includer
            .borrow_mut()
            .entry(dir)
            .or_default()
            .insert(Box::from(name), outcome);
    }

    /// Total number of cached outcomes across both tables
    pub fn len(&self) -> usize {
        let shared: usize = self
            .shared
            .borrow()
            .values()
            .map(|slots| slots.angled.is_some() as usize + slots.quoted.is_some() as usize)
            .sum();
        let includer: usize = self.includer.borrow().values().map(HashMap::len).sum();
        shared + includer
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
