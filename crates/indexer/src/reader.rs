//! Streaming reader for `compile_commands.json`
//!
//! Drives a [`CompileCommandsVisitor`] with one record at a time, in document
//! order, without buffering the whole array: the top-level sequence is walked
//! through a `DeserializeSeed`, so only the record currently being dispatched
//! is ever held in memory.
//!
//! The format is externally defined by CMake/ninja tooling: an array of
//! objects with string fields `directory`, `command` (or an `arguments`
//! array), and `file`. All fields are parsed permissively; a record missing a
//! field simply skips the corresponding callback. Malformed JSON syntax is
//! fatal and aborts the run.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ndk_compdb_core::{CompdbError, Result};
use serde::de::{DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use tracing::warn;

use crate::visitor::CompileCommandsVisitor;

/// One raw entry of the compilation database. Ephemeral; dispatched to the
/// visitor and dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommandRecord {
    pub directory: Option<String>,
    pub command: Option<String>,
    pub arguments: Option<Vec<String>>,
    pub file: Option<String>,
}

/// Stream a database from any reader into `visitor`, returning the number of
/// records dispatched.
pub fn read_database<R, V>(reader: R, visitor: &mut V) -> Result<usize>
where
    R: Read,
    V: CompileCommandsVisitor,
{
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let count = RecordStream { visitor }.deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(count)
}

/// Stream a database held in memory
pub fn read_database_str<V>(json: &str, visitor: &mut V) -> Result<usize>
where
    V: CompileCommandsVisitor,
{
    read_database(json.as_bytes(), visitor)
}

/// Stream a database from disk
pub fn read_database_file<V>(path: &Path, visitor: &mut V) -> Result<usize>
where
    V: CompileCommandsVisitor,
{
    if !path.is_file() {
        return Err(CompdbError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    read_database(BufReader::new(file), visitor)
}

fn dispatch<V: CompileCommandsVisitor>(record: CommandRecord, visitor: &mut V) {
    visitor.begin_command();

    if let Some(directory) = &record.directory {
        visitor.visit_directory(directory);
    }
    if let Some(file) = &record.file {
        visitor.visit_file(file);
    }
    // The convention allows either a single shell string or a pre-split
    // argument array; an explicit `command` wins when both are present.
    match (&record.command, &record.arguments) {
        (Some(command), _) => visitor.visit_command(command),
        (None, Some(arguments)) => {
            match shlex::try_join(arguments.iter().map(String::as_str)) {
                Ok(command) => visitor.visit_command(&command),
                Err(e) => warn!("skipping unquotable arguments array: {e}"),
            }
        }
        (None, None) => {}
    }

    visitor.end_command();
}

/// Seed walking the top-level array and firing visitor callbacks per element
struct RecordStream<'a, V> {
    visitor: &'a mut V,
}

impl<'de, V: CompileCommandsVisitor> DeserializeSeed<'de> for RecordStream<'_, V> {
    type Value = usize;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, V: CompileCommandsVisitor> Visitor<'de> for RecordStream<'_, V> {
    type Value = usize;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a compilation database array")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<usize, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut count = 0;
        while let Some(record) = seq.next_element::<CommandRecord>()? {
            dispatch(record, self.visitor);
            count += 1;
        }
        Ok(count)
    }
}
