//! # Key Validation and Path Resolution
//!
//! A key maps to exactly one file directly under the store root. Keys are
//! checked twice: once syntactically, and once more after the path is built
//! and lexically normalized, so a key can never name a file outside the root.

use std::path::{Component, Path, PathBuf};

use super::errors::{StoreError, StoreResult};

/// Maximum key length in Unicode scalar values
pub const MAX_KEY_CHARS: usize = 256;

/// Record file extension
pub const RECORD_EXT: &str = "json";

/// Check a key without touching the filesystem.
pub fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(StoreError::InvalidKey(format!("{:?}", key)));
    }
    if key.contains(|c| c == '/' || c == '\\') {
        return Err(StoreError::InvalidKey(format!(
            "{:?} contains a path separator",
            key
        )));
    }
    let len = key.chars().count();
    if len > MAX_KEY_CHARS {
        return Err(StoreError::InvalidKey(format!(
            "length {} exceeds {}",
            len, MAX_KEY_CHARS
        )));
    }
    Ok(())
}

/// Resolve the record file for `key` under `root`.
///
/// `root` must already be normalized.
pub fn resolve_path(root: &Path, key: &str) -> StoreResult<PathBuf> {
    validate_key(key)?;

    let path = normalize(&root.join(format!("{}.{}", key, RECORD_EXT)));
    if path.parent() != Some(root) || !path.starts_with(root) {
        return Err(StoreError::InvalidKey(format!(
            "{:?} resolves outside the data directory",
            key
        )));
    }
    Ok(path)
}

/// Lexically normalize a path: drop `.`, fold `..` into its parent.
/// Does not consult the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
