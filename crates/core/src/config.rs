//! Application configuration
//!
//! Manages tool settings including:
//! - Command normalization policy (which flags are stripped)
//! - Report output preferences

use serde::{Deserialize, Serialize};

/// Command normalization policy.
///
/// Controls which tokens are removed from a raw compiler command line before
/// it is interned. The executable (token 0) is always removed; each entry in
/// `strip_flags` removes the first occurrence of that flag together with the
/// argument token that follows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Flags whose first occurrence (plus the following argument token) is
    /// removed during normalization.
    pub strip_flags: Vec<String>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            // `-c <source>` and `-o <object>` vary per source file and would
            // otherwise defeat deduplication of identical flag sets.
            strip_flags: vec!["-c".to_string(), "-o".to_string()],
        }
    }
}

impl NormalizeOptions {
    /// Policy that only strips the executable token
    pub fn executable_only() -> Self {
        Self {
            strip_flags: Vec::new(),
        }
    }
}

/// Report output preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Application configuration, persisted as TOML in the user config directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Command normalization policy
    #[serde(default)]
    pub normalize: NormalizeOptions,

    /// Report output preferences
    #[serde(default)]
    pub output: OutputConfig,
}
