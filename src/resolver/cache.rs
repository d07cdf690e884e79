use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::CodeKind;

/// Process-lifetime memo of resolutions, including definitive misses.
///
/// Entries are inserted once per distinct `(kind, normalized input)` and never evicted.
#[derive(Debug, Default)]
pub struct CodeCache {
    entries: RwLock<HashMap<(CodeKind, String), Option<String>>>,
}

impl CodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(None)` is a cached miss.
    pub fn get(&self, kind: CodeKind, key: &str) -> Option<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&(kind, key.to_string())).cloned()
    }

    pub fn insert(&self, kind: CodeKind, key: &str, code: Option<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry((kind, key.to_string())).or_insert(code);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
