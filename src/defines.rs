//! Symbol set for `#define` / `#undef`
//!
//! Names are plain strings; only presence is ever tested, there is no value attached.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defines {
    names: BTreeSet<String>,
}

impl Defines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"DEBUG,EDITOR"`.
    ///
    /// Entries are trimmed and empty entries skipped. No further validation is done, so an entry
    /// like `A=1` is stored as is (and can never match a condition word).
    pub fn from_list(list: &str) -> Self {
        let mut defines = Self::new();
        for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            defines.insert(name);
        }
        defines
    }

    /// Insert a name, no-op if already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Remove a name, no-op if absent.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
