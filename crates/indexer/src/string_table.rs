//! Append-only string interning table
//!
//! Maps flag strings to compact integer ids. Entries are never removed; the
//! expected working set is the handful of distinct flag sets in one native
//! build, so total size is not a concern.

use std::collections::HashMap;

use serde::Serialize;

/// Identifier of an interned flag string.
///
/// Ids are assigned sequentially from 0 in first-seen order, so an id doubles
/// as an index into the table's id-ordered contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FlagsId(pub u32);

impl FlagsId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Insertion-ordered interning store for flag strings
#[derive(Debug, Default)]
pub struct StringTable {
    map: HashMap<String, FlagsId>,
    entries: Vec<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `value`, returning the existing id when the exact string was
    /// seen before and the next sequential id otherwise.
    pub fn intern(&mut self, value: &str) -> FlagsId {
        if let Some(id) = self.map.get(value) {
            return *id;
        }
        let id = FlagsId(self.entries.len() as u32);
        self.map.insert(value.to_string(), id);
        self.entries.push(value.to_string());
        id
    }

    /// Look up the string behind an id
    pub fn lookup(&self, id: FlagsId) -> Option<&str> {
        self.entries.get(id.0 as usize).map(String::as_str)
    }

    /// Number of distinct interned strings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (FlagsId, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, s)| (FlagsId(i as u32), s.as_str()))
    }

    /// Consume the table, yielding entries in id order
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_same_id() {
        let mut table = StringTable::new();
        let a = table.intern("-O2 -Wall");
        let b = table.intern("-O2 -Wall");

        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_distinct_strings_sequential_ids() {
        let mut table = StringTable::new();

        assert_eq!(table.intern("-O2"), FlagsId(0));
        assert_eq!(table.intern("-O0 -g"), FlagsId(1));
        assert_eq!(table.intern("-Os"), FlagsId(2));
        assert_eq!(table.intern("-O0 -g"), FlagsId(1));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_lookup_round_trip() {
        let mut table = StringTable::new();
        let id = table.intern("-DNDEBUG");

        assert_eq!(table.lookup(id), Some("-DNDEBUG"));
        assert_eq!(table.lookup(FlagsId(7)), None);
    }

    #[test]
    fn test_iter_in_id_order() {
        let mut table = StringTable::new();
        table.intern("b");
        table.intern("a");
        table.intern("c");

        let entries: Vec<&str> = table.iter().map(|(_, s)| s).collect();
        assert_eq!(entries, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_string_is_internable() {
        let mut table = StringTable::new();
        let id = table.intern("");

        assert_eq!(id, FlagsId(0));
        assert_eq!(table.lookup(id), Some(""));
    }
}
