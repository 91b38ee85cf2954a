//! CLI commands for ndk-compdb
//!
//! Command structs with async execute methods, one per subcommand.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use ndk_compdb_core::AppConfig;
use ndk_compdb_indexer::{paths, DatabaseIndexer, IndexResult};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::info;

use crate::discovery;

/// JSON report emitted for one indexed database
#[derive(Debug, Serialize)]
pub struct DatabaseReport {
    /// The database this report was built from
    pub database: PathBuf,

    /// Indexed source files
    pub files: usize,

    /// Distinct normalized flag sets
    pub flag_sets: usize,

    #[serde(flatten)]
    pub index: IndexResult,
}

impl DatabaseReport {
    fn new(database: PathBuf, index: IndexResult) -> Self {
        Self {
            database,
            files: index.entry_count(),
            flag_sets: index.flag_set_count(),
            index,
        }
    }
}

/// Index command options
pub struct IndexCommand {
    /// Explicit database paths
    pub databases: Vec<PathBuf>,
    /// Project tree to scan for databases
    pub project: Option<PathBuf>,
    /// Write the report here instead of stdout
    pub output: Option<PathBuf>,
    /// Pretty-print the JSON report
    pub pretty: bool,
}

impl IndexCommand {
    /// Execute the index command
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        let databases = self.collect_databases()?;
        info!("Indexing {} compilation database(s)", databases.len());

        // One run-private indexer per database; instances share no state,
        // so databases index in parallel without locking.
        let mut set = JoinSet::new();
        for path in databases {
            let indexer = DatabaseIndexer::new(config.normalize.clone());
            set.spawn_blocking(move || {
                let index = indexer.index_file(&path)?;
                Ok::<_, ndk_compdb_core::CompdbError>(DatabaseReport::new(path, index))
            });
        }

        let mut reports = Vec::new();
        while let Some(joined) = set.join_next().await {
            reports.push(joined??);
        }
        reports.sort_by(|a, b| a.database.cmp(&b.database));

        let json = if self.pretty {
            serde_json::to_string_pretty(&reports)?
        } else {
            serde_json::to_string(&reports)?
        };

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, json).await?;
                info!("Report written to {}", path.display());
            }
            None => println!("{}", json),
        }

        Ok(())
    }

    fn collect_databases(&self) -> Result<Vec<PathBuf>> {
        let mut databases = self.databases.clone();

        if let Some(project) = &self.project {
            for found in discovery::discover_databases(project) {
                info!(
                    "Found database: {} (variant: {}, abi: {})",
                    found.path.display(),
                    found.variant.as_deref().unwrap_or("unknown"),
                    found.abi.map(|a| a.as_str()).unwrap_or("unknown"),
                );
                databases.push(found.path);
            }
        }

        if databases.is_empty() {
            return Err(anyhow!(
                "no compilation databases given; pass paths or --project <dir>"
            ));
        }
        Ok(databases)
    }
}

/// Flags lookup command options
pub struct FlagsCommand {
    /// Database to index
    pub database: PathBuf,
    /// Source file to look up
    pub file: PathBuf,
}

impl FlagsCommand {
    /// Print the deduplicated flags for one source file
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        let indexer = DatabaseIndexer::new(config.normalize.clone());
        let index = indexer.index_file(&self.database)?;

        let lookup = self.canonical_lookup_path()?;
        let flags = index
            .flags_for(&lookup)
            .or_else(|| index.flags_for(&self.file))
            .ok_or_else(|| {
                anyhow!(
                    "{} is not listed in {}",
                    self.file.display(),
                    self.database.display()
                )
            })?;

        println!("{}", flags);
        Ok(())
    }

    /// Mappings are keyed by canonical absolute paths; bring the queried
    /// path into the same form.
    fn canonical_lookup_path(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(paths::canonicalize_entry(&cwd, &self.file))
    }
}

/// Stats command options
pub struct StatsCommand {
    /// Database to index
    pub database: PathBuf,
}

impl StatsCommand {
    /// Print dedup statistics for one database
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        let indexer = DatabaseIndexer::new(config.normalize.clone());
        let index = indexer.index_file(&self.database)?;

        println!("Database: {}", self.database.display());
        println!("  Source files:       {}", index.entry_count());
        println!("  Distinct flag sets: {}", index.flag_set_count());
        if index.entry_count() > 0 {
            let ratio = index.flag_set_count() as f64 / index.entry_count() as f64;
            println!("  Dedup ratio:        {:.2}", ratio);
        }

        Ok(())
    }
}

/// Discover command options
pub struct DiscoverCommand {
    /// Project tree to scan
    pub project: PathBuf,
}

impl DiscoverCommand {
    /// List the compilation databases under a project tree
    pub async fn execute(&self) -> Result<()> {
        let found = discovery::discover_databases(&self.project);

        if found.is_empty() {
            println!(
                "No compilation databases under {}",
                self.project.display()
            );
        } else {
            for database in found {
                println!(
                    "{}  variant={}  abi={}",
                    database.path.display(),
                    database.variant.as_deref().unwrap_or("-"),
                    database.abi.map(|a| a.as_str()).unwrap_or("-"),
                );
            }
        }

        Ok(())
    }
}
