//! ndk-compdb indexing engine
//!
//! Builds a deduplicated index over the compiler invocations of a
//! `compile_commands.json` database: each source file maps to a small integer
//! id identifying its normalized flag set, so files compiled with identical
//! flags share one interned entry.
//!
//! Processing is a single-threaded forward pass over the stream. Every
//! [`DatabaseIndexer`] run owns a private string table and command cache, so
//! indexing several databases concurrently only requires one indexer per
//! worker.

pub mod command;
pub mod paths;
pub mod reader;
pub mod string_table;
pub mod visitor;

pub use command::{normalize_command, CommandInterner};
pub use reader::{read_database, read_database_file, read_database_str, CommandRecord};
pub use string_table::{FlagsId, StringTable};
pub use visitor::{CompileCommandsVisitor, IndexingVisitor};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndk_compdb_core::{NormalizeOptions, Result};
use serde::Serialize;
use tracing::info;

/// Index of one compilation database.
///
/// `flags[id]` is the normalized flag string behind `FlagsId(id)`; together
/// with `mappings` it reconstructs, for any indexed source file, the
/// deduplicated compiler flags that apply to it.
#[derive(Debug, Serialize)]
pub struct IndexResult {
    /// Canonical absolute source path -> interned flags id
    pub mappings: BTreeMap<PathBuf, FlagsId>,
    /// Interned flag strings in id order
    pub flags: Vec<String>,
}

impl IndexResult {
    /// The deduplicated flag string for one source file
    pub fn flags_for(&self, file: &Path) -> Option<&str> {
        let id = self.mappings.get(file)?;
        self.flags.get(id.as_u32() as usize).map(String::as_str)
    }

    /// Number of indexed source files
    pub fn entry_count(&self) -> usize {
        self.mappings.len()
    }

    /// Number of distinct normalized flag sets
    pub fn flag_set_count(&self) -> usize {
        self.flags.len()
    }
}

/// Runs one indexing pass per database with run-private state
#[derive(Debug, Clone, Default)]
pub struct DatabaseIndexer {
    options: NormalizeOptions,
}

impl DatabaseIndexer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Index a database on disk
    pub fn index_file(&self, path: &Path) -> Result<IndexResult> {
        let mut visitor = IndexingVisitor::new(self.options.clone());
        let records = reader::read_database_file(path, &mut visitor)?;
        Ok(self.finish(records, visitor))
    }

    /// Index a database held in memory
    pub fn index_str(&self, json: &str) -> Result<IndexResult> {
        let mut visitor = IndexingVisitor::new(self.options.clone());
        let records = reader::read_database_str(json, &mut visitor)?;
        Ok(self.finish(records, visitor))
    }

    fn finish(&self, records: usize, visitor: IndexingVisitor) -> IndexResult {
        let (mappings, table) = visitor.into_parts();
        let flags = table.into_entries();
        info!(
            records,
            files = mappings.len(),
            flag_sets = flags.len(),
            "indexed compilation database"
        );
        IndexResult { mappings, flags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DB: &str = r#"[
        {"directory": "/p", "command": "/usr/bin/gcc -c a.c -o a.o -O2", "file": "a.c"},
        {"directory": "/p", "command": "/usr/bin/gcc -c b.c -o b.o -O2", "file": "b.c"}
    ]"#;

    #[test]
    fn test_index_deduplicates_flag_sets() {
        let result = DatabaseIndexer::default().index_str(SAMPLE_DB).unwrap();

        assert_eq!(result.entry_count(), 2);
        assert_eq!(result.flag_set_count(), 1);
        assert_eq!(result.flags_for(Path::new("/p/a.c")), Some("-O2"));
        assert_eq!(result.flags_for(Path::new("/p/b.c")), Some("-O2"));
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let indexer = DatabaseIndexer::default();
        let first = indexer.index_str(SAMPLE_DB).unwrap();
        let second = indexer
            .index_str(r#"[{"directory": "/q", "command": "cc -c x.c -o x.o -Os", "file": "x.c"}]"#)
            .unwrap();

        // Ids restart from 0 for each run.
        assert_eq!(first.mappings.get(Path::new("/p/a.c")), Some(&FlagsId(0)));
        assert_eq!(second.mappings.get(Path::new("/q/x.c")), Some(&FlagsId(0)));
        assert_eq!(second.flags, vec!["-Os"]);
    }

    #[test]
    fn test_flags_for_unknown_file() {
        let result = DatabaseIndexer::default().index_str(SAMPLE_DB).unwrap();
        assert_eq!(result.flags_for(Path::new("/p/missing.c")), None);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let result = DatabaseIndexer::default().index_str(SAMPLE_DB).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["flags"][0], "-O2");
        assert_eq!(json["mappings"]["/p/a.c"], 0);
    }
}
