//! Identifier cache for the front end.
//! Interns identifier and literal text once and hands out stable `SymbolId`s;
//! every arena node and symbol table stores ids, never strings.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Stable handle for an interned identifier. Equal text always maps to the
/// same id for the lifetime of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Deduplicating identifier store. Must outlive every arena and symbol table
/// that holds ids issued by it.
#[derive(Debug, Default, Clone)]
pub struct IdCache {
    map: HashMap<String, SymbolId>,
    rev: Vec<String>,
    bytes: usize,
}

impl IdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the id it is already bound to if seen before.
    pub fn intern<S: AsRef<str>>(&mut self, text: S) -> SymbolId {
        let text = text.as_ref();
        if let Some(id) = self.map.get(text) {
            return *id;
        }
        let id = SymbolId(self.rev.len() as u32);
        self.bytes += text.len();
        self.rev.push(text.to_string());
        self.map.insert(text.to_string(), id);
        id
    }

    /// Original text for an id issued by this cache.
    pub fn resolve(&self, id: SymbolId) -> &str {
        &self.rev[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.rev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rev.is_empty()
    }

    /// Total bytes of interned text (deduplicated).
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let mut cache = IdCache::new();
        let a = cache.intern("main");
        let b = cache.intern("main");
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.resolve(a), "main");
    }

    #[test]
    fn distinct_text_distinct_ids() {
        let mut cache = IdCache::new();
        let a = cache.intern("x");
        let b = cache.intern("y");
        assert_ne!(a, b);
        assert_eq!(cache.resolve(a), "x");
        assert_eq!(cache.resolve(b), "y");
        assert_eq!(cache.bytes(), 2);
    }
}
