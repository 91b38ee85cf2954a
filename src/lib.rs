//! ndk-compdb - compilation-database interning index for Android NDK builds
//!
//! Indexes the `compile_commands.json` databases that CMake/ninja produce for
//! Android native builds, collapsing per-source compiler invocations into a
//! deduplicated table of flag sets.
//!
//! ## Architecture
//!
//! The workspace is organized into specialized crates:
//!
//! - `ndk-compdb-core`: error model and configuration
//! - `ndk-compdb-indexer`: string table, command normalization, streaming
//!   database visitor
//!
//! The root crate adds the CLI surface and database discovery under an
//! Android project tree.

pub mod commands;
pub mod discovery;

// Re-export main components for library usage
pub use ndk_compdb_core as core;
pub use ndk_compdb_indexer as indexer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use ndk_compdb_core::{AppConfig, CompdbError, NormalizeOptions};
    pub use ndk_compdb_indexer::{DatabaseIndexer, FlagsId, IndexResult, StringTable};

    pub use crate::discovery::{discover_databases, DiscoveredDatabase};
}
