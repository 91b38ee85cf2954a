//! Streaming visitor over compilation-database records
//!
//! The reader delivers one record at a time through the
//! [`CompileCommandsVisitor`] callbacks, in document order. The
//! [`IndexingVisitor`] consumes them into a `file -> interned flags id` map.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndk_compdb_core::NormalizeOptions;
use tracing::debug;

use crate::command::CommandInterner;
use crate::paths::canonicalize_entry;
use crate::string_table::{FlagsId, StringTable};

/// Callback consumer for one forward pass over a compilation database.
///
/// For every record in the array the reader fires `begin_command`, then the
/// field callbacks for whichever of `directory`/`file`/`command` the record
/// carries, then `end_command`. Missing fields simply mean the corresponding
/// callback is never fired for that record.
pub trait CompileCommandsVisitor {
    fn begin_command(&mut self);
    fn visit_directory(&mut self, directory: &str);
    fn visit_file(&mut self, file: &str);
    fn visit_command(&mut self, command: &str);
    fn end_command(&mut self);
}

/// Per-record scratch defaults when a field is absent.
const DEFAULT_FILE: &str = ".";
const DEFAULT_DIRECTORY: &str = ".";

/// Builds the `file -> flags id` index for one database.
///
/// Owns the run-private string table and command cache; a fresh visitor is
/// created per indexing run and never shared.
#[derive(Debug)]
pub struct IndexingVisitor {
    interner: CommandInterner,
    table: StringTable,
    mappings: BTreeMap<PathBuf, FlagsId>,

    // Scratch state for the record currently being visited.
    flags: String,
    file: String,
    directory: String,
}

impl IndexingVisitor {
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            interner: CommandInterner::new(options),
            table: StringTable::new(),
            mappings: BTreeMap::new(),
            flags: String::new(),
            file: DEFAULT_FILE.to_string(),
            directory: DEFAULT_DIRECTORY.to_string(),
        }
    }

    /// Accumulated index. Reading before the stream is fully consumed yields
    /// the records seen so far.
    pub fn mappings(&self) -> &BTreeMap<PathBuf, FlagsId> {
        &self.mappings
    }

    /// The interned flag strings backing the mappings
    pub fn string_table(&self) -> &StringTable {
        &self.table
    }

    /// Number of distinct raw command strings encountered
    pub fn distinct_raw_commands(&self) -> usize {
        self.interner.distinct_raw_commands()
    }

    /// Tear down into the final map and its backing table
    pub fn into_parts(self) -> (BTreeMap<PathBuf, FlagsId>, StringTable) {
        (self.mappings, self.table)
    }
}

impl CompileCommandsVisitor for IndexingVisitor {
    fn begin_command(&mut self) {
        self.flags.clear();
        self.file.clear();
        self.file.push_str(DEFAULT_FILE);
        self.directory.clear();
        self.directory.push_str(DEFAULT_DIRECTORY);
    }

    fn visit_directory(&mut self, directory: &str) {
        self.directory.clear();
        self.directory.push_str(directory);
    }

    fn visit_file(&mut self, file: &str) {
        self.file.clear();
        self.file.push_str(file);
    }

    fn visit_command(&mut self, command: &str) {
        let normalized = self.interner.normalized(command);
        self.flags.clear();
        self.flags.push_str(normalized);
    }

    fn end_command(&mut self) {
        let path = canonicalize_entry(Path::new(&self.directory), Path::new(&self.file));
        let id = self.table.intern(&self.flags);
        debug!(file = %path.display(), flags_id = id.as_u32(), "indexed record");
        // Duplicate file entries are allowed; the later record wins.
        self.mappings.insert(path, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit_record(visitor: &mut IndexingVisitor, directory: &str, command: &str, file: &str) {
        visitor.begin_command();
        visitor.visit_directory(directory);
        visitor.visit_command(command);
        visitor.visit_file(file);
        visitor.end_command();
    }

    #[test]
    fn test_shared_flags_intern_to_one_entry() {
        let mut visitor = IndexingVisitor::new(NormalizeOptions::default());
        visit_record(&mut visitor, "/p", "/usr/bin/gcc -c a.c -o a.o -O2", "a.c");
        visit_record(&mut visitor, "/p", "/usr/bin/gcc -c b.c -o b.o -O2", "b.c");

        assert_eq!(visitor.mappings().len(), 2);
        assert_eq!(visitor.string_table().len(), 1);
        assert_eq!(visitor.string_table().lookup(FlagsId(0)), Some("-O2"));
        assert_eq!(
            visitor.mappings().get(Path::new("/p/a.c")),
            Some(&FlagsId(0))
        );
        assert_eq!(
            visitor.mappings().get(Path::new("/p/b.c")),
            Some(&FlagsId(0))
        );
    }

    #[test]
    fn test_distinct_commands_distinct_ids() {
        let mut visitor = IndexingVisitor::new(NormalizeOptions::default());
        visit_record(&mut visitor, "/p", "cc -c a.c -o a.o -O2", "a.c");
        visit_record(&mut visitor, "/p", "cc -c b.c -o b.o -O0 -g", "b.c");
        visit_record(&mut visitor, "/p", "cc -c c.c -o c.o -Os", "c.c");

        assert_eq!(visitor.mappings().len(), 3);
        assert_eq!(visitor.string_table().len(), 3);
        assert_eq!(
            visitor.mappings().get(Path::new("/p/b.c")),
            Some(&FlagsId(1))
        );
    }

    #[test]
    fn test_duplicate_file_last_write_wins() {
        let mut visitor = IndexingVisitor::new(NormalizeOptions::default());
        visit_record(&mut visitor, "/p", "cc -c a.c -o a.o -O0", "a.c");
        visit_record(&mut visitor, "/p", "cc -c a.c -o a.o -O2", "a.c");

        assert_eq!(visitor.mappings().len(), 1);
        let id = *visitor.mappings().get(Path::new("/p/a.c")).unwrap();
        assert_eq!(visitor.string_table().lookup(id), Some("-O2"));
    }

    #[test]
    fn test_missing_fields_use_scratch_defaults() {
        let mut visitor = IndexingVisitor::new(NormalizeOptions::default());
        visitor.begin_command();
        visitor.end_command();

        // No file and no command: the record lands under the default path
        // with an empty flag string.
        assert_eq!(visitor.mappings().len(), 1);
        let (path, id) = visitor.mappings().iter().next().unwrap();
        assert!(!path.as_os_str().is_empty());
        assert_eq!(visitor.string_table().lookup(*id), Some(""));
    }

    #[test]
    fn test_scratch_resets_between_records() {
        let mut visitor = IndexingVisitor::new(NormalizeOptions::default());
        visit_record(&mut visitor, "/p", "cc -c a.c -o a.o -O2", "a.c");

        // Second record carries no command; its flags must not leak from the
        // first record.
        visitor.begin_command();
        visitor.visit_directory("/p");
        visitor.visit_file("b.c");
        visitor.end_command();

        let id = *visitor.mappings().get(Path::new("/p/b.c")).unwrap();
        assert_eq!(visitor.string_table().lookup(id), Some(""));
    }

    #[test]
    fn test_partial_mappings_mid_stream() {
        let mut visitor = IndexingVisitor::new(NormalizeOptions::default());
        visit_record(&mut visitor, "/p", "cc -c a.c -o a.o -O2", "a.c");
        assert_eq!(visitor.mappings().len(), 1);

        visitor.begin_command();
        visitor.visit_file("b.c");
        // Record still open; only the finished record is visible.
        assert_eq!(visitor.mappings().len(), 1);
    }
}
