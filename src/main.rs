//! ndk-compdb - compilation-database interning index
//!
//! Command-line entry point: initializes logging, loads the configuration,
//! and dispatches to the subcommands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ndk_compdb::commands::{DiscoverCommand, FlagsCommand, IndexCommand, StatsCommand};
use ndk_compdb::core::{AppConfig, APP_NAME, VERSION};

#[derive(Parser)]
#[command(name = "ndk-compdb", version, about = "Index compile_commands.json databases from Android NDK builds")]
struct Cli {
    /// Use an alternate configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index one or more compilation databases into a JSON report
    Index {
        /// Database paths
        databases: Vec<PathBuf>,

        /// Scan a project tree for databases instead of naming them
        #[arg(long)]
        project: Option<PathBuf>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON regardless of configuration
        #[arg(long)]
        compact: bool,
    },

    /// Print the deduplicated compiler flags for one source file
    Flags {
        /// Database to index
        database: PathBuf,

        /// Source file to look up
        file: PathBuf,
    },

    /// Print dedup statistics for a database
    Stats {
        /// Database to index
        database: PathBuf,
    },

    /// List the compilation databases under a project tree
    Discover {
        /// Project tree to scan
        project: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("{} v{}", APP_NAME, VERSION);

    let config = load_or_create_config(cli.config.as_deref()).await?;

    match cli.command {
        Command::Index {
            databases,
            project,
            output,
            compact,
        } => {
            let command = IndexCommand {
                databases,
                project,
                output,
                pretty: !compact && config.output.pretty,
            };
            command.execute(&config).await
        }
        Command::Flags { database, file } => {
            FlagsCommand { database, file }.execute(&config).await
        }
        Command::Stats { database } => StatsCommand { database }.execute(&config).await,
        Command::Discover { project } => DiscoverCommand { project }.execute().await,
    }
}

/// Load the configuration, creating a default file on first run
async fn load_or_create_config(explicit: Option<&std::path::Path>) -> Result<AppConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_dir().join("config.toml"),
    };

    if config_path.exists() {
        info!("Loading configuration from {}", config_path.display());
        let content = tokio::fs::read_to_string(&config_path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    } else if explicit.is_some() {
        Err(anyhow::anyhow!(
            "configuration file not found: {}",
            config_path.display()
        ))
    } else {
        info!("Creating default configuration");
        let config = AppConfig::default();

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(&config)?;
        tokio::fs::write(&config_path, content).await?;

        Ok(config)
    }
}

/// Platform configuration directory for ndk-compdb
fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ndk-compdb")
}
