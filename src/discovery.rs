//! Compilation database discovery
//!
//! Locates `compile_commands.json` files under an Android project tree and
//! tags each hit with the build variant and target ABI inferred from its
//! path. CMake-driven NDK builds place one database per variant/ABI pair
//! under `<module>/.cxx/<variant>/<tag>/<abi>/compile_commands.json`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

/// Database file name defined by the CMake/ninja convention
pub const DATABASE_FILE_NAME: &str = "compile_commands.json";

/// Native build directory used by Android CMake builds
const CXX_DIR_NAME: &str = ".cxx";

/// Target ABI inferred from a database path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Abi {
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x86_64")]
    X86_64,
}

impl Abi {
    pub fn as_str(&self) -> &'static str {
        match self {
            Abi::Arm64V8a => "arm64-v8a",
            Abi::ArmeabiV7a => "armeabi-v7a",
            Abi::X86 => "x86",
            Abi::X86_64 => "x86_64",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Abi> {
        match name {
            "arm64-v8a" => Some(Abi::Arm64V8a),
            "armeabi-v7a" => Some(Abi::ArmeabiV7a),
            "x86" => Some(Abi::X86),
            "x86_64" => Some(Abi::X86_64),
            _ => None,
        }
    }
}

/// One located compilation database
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredDatabase {
    /// Path to the compile_commands.json file
    pub path: PathBuf,

    /// Build variant inferred from the `.cxx/<variant>` segment
    pub variant: Option<String>,

    /// Target ABI inferred from the parent directory name
    pub abi: Option<Abi>,
}

/// Walk `root` and collect every compilation database beneath it
pub fn discover_databases(root: &Path) -> Vec<DiscoveredDatabase> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && entry.file_name() == DATABASE_FILE_NAME {
            let database = classify(entry.path());
            debug!(
                path = %database.path.display(),
                variant = database.variant.as_deref().unwrap_or("?"),
                abi = database.abi.map(|a| a.as_str()).unwrap_or("?"),
                "discovered compilation database"
            );
            found.push(database);
        }
    }

    found
}

/// Infer variant and ABI from a database path
fn classify(path: &Path) -> DiscoveredDatabase {
    let abi = path
        .parent()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .and_then(Abi::from_dir_name);

    DiscoveredDatabase {
        path: path.to_path_buf(),
        variant: variant_from_path(path),
        abi,
    }
}

/// The path segment directly after `.cxx` names the build variant
fn variant_from_path(path: &Path) -> Option<String> {
    let mut components = path.components();
    while let Some(component) = components.next() {
        if component.as_os_str() == CXX_DIR_NAME {
            return components
                .next()
                .and_then(|c| c.as_os_str().to_str())
                .map(str::to_string);
        }
    }
    None
}
