//! Atomic write/delete helpers for registry-owned documents.
//!
//! Saves go through a temp file followed by a rename, so a concurrent reload
//! never observes a half-written document.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by operator-triggered saves and deletes.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize document {name}")]
    Serialize {
        name: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {path}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn document_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{name}.{extension}"))
}

/// Writes a serialized document to `<dir>/<name>.<extension>`, atomically
/// from a reader's perspective.
pub(crate) fn write_document(
    dir: &Path,
    name: &str,
    extension: &str,
    contents: &str,
) -> Result<(), PersistenceError> {
    fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = document_path(dir, name, extension);
    let temp_path = path.with_extension(format!("{extension}.tmp"));

    fs::write(&temp_path, contents).map_err(|source| PersistenceError::Write {
        path: temp_path.clone(),
        source,
    })?;
    fs::rename(&temp_path, &path).map_err(|source| PersistenceError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "saved document");
    Ok(())
}

/// Removes `<dir>/<name>.<extension>`; returns whether a file existed and was
/// removed.
pub(crate) fn delete_document(
    dir: &Path,
    name: &str,
    extension: &str,
) -> Result<bool, PersistenceError> {
    let path = document_path(dir, name, extension);
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path).map_err(|source| PersistenceError::Delete {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "deleted document");
    Ok(true)
}
