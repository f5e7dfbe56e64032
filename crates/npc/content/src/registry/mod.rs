//! Hot-reloadable, directory-backed config registries.
//!
//! All four registries share the same shape: a directory of documents keyed
//! by file stem, an immutable in-memory snapshot for lookups, and a
//! `reload()` that re-reads the directory into a fresh map and publishes it
//! in a single step. Reload is triggered by an administrative action while
//! interaction traffic keeps reading, so lookups must never block on it and
//! must never observe a mix of old and new entries.

mod capes;
mod dialogs;
mod npcs;
mod skins;
mod store;

use std::path::Path;

pub use capes::CapeRegistry;
pub use dialogs::DialogRegistry;
pub use npcs::NpcRegistry;
pub use skins::SkinRegistry;
pub use store::SnapshotMap;

/// Common result type for per-entry parse routines.
pub type LoadResult<T> = anyhow::Result<T>;

/// File stem as a UTF-8 string, the registry key for every document.
pub(crate) fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
}

/// True when the path carries the given extension (ASCII, case-insensitive).
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
