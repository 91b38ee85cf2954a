//! Path canonicalization for compilation-database entries
//!
//! Entries may reference sources relative to the record's `directory`, and
//! generated sources may not exist on disk yet when the database is indexed,
//! so canonicalization is purely lexical: absolutize against the record
//! directory, then resolve `.` and `..` components without touching the
//! filesystem.

use std::path::{Component, Path, PathBuf};

/// Canonical absolute form of `file` within `directory`.
///
/// Falls back to the un-normalized joined path when lexical normalization
/// yields an empty path (e.g. `file` is `.` inside a relative directory).
pub fn canonicalize_entry(directory: &Path, file: &Path) -> PathBuf {
    let absolute = if file.is_absolute() {
        file.to_path_buf()
    } else {
        directory.join(file)
    };

    let normalized = normalize_lexically(&absolute);
    if normalized.as_os_str().is_empty() {
        absolute
    } else {
        normalized
    }
}

/// Resolve `.` and `..` components by a lexical walk.
///
/// `..` at the root stays at the root; `..` with no preceding component to
/// consume is kept, since dropping it would change what the path refers to.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}
