//! ndk-compdb core - shared types and configuration
//!
//! This crate provides the error model and the configuration surface shared
//! between the indexing engine and the command-line frontend.

pub mod config;
pub mod error;

pub use config::{AppConfig, NormalizeOptions, OutputConfig};
pub use error::{CompdbError, Result};

/// ndk-compdb version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "ndk-compdb";
