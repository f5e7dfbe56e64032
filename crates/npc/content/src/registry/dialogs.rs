//! Dialog registry: one TOML document per dialog.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use npc_core::DialogDescriptor;

use crate::persist::{self, PersistenceError};
use crate::registry::{LoadResult, SnapshotMap, file_stem, has_extension};

const EXTENSION: &str = "toml";

pub struct DialogRegistry {
    directory: PathBuf,
    entries: SnapshotMap<DialogDescriptor>,
}

impl DialogRegistry {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: SnapshotMap::new(),
        }
    }

    /// Re-reads the dialogs directory and publishes the result as the new
    /// snapshot. Corrupt entries are skipped with a warning; an unreadable
    /// directory publishes an empty snapshot.
    pub fn reload(&self) -> usize {
        let mut next = HashMap::new();

        match fs::read_dir(&self.directory) {
            Ok(read_dir) => {
                for entry in read_dir.flatten() {
                    let path = entry.path();
                    if !path.is_file() || !has_extension(&path, EXTENSION) {
                        continue;
                    }
                    match load_dialog(&path) {
                        Ok(dialog) => {
                            next.insert(dialog.name.clone(), Arc::new(dialog));
                        }
                        Err(error) => {
                            tracing::warn!(path = %path.display(), %error, "skipping dialog");
                        }
                    }
                }
            }
            Err(error) => {
                tracing::error!(
                    directory = %self.directory.display(),
                    %error,
                    "dialogs directory unreadable, publishing empty snapshot"
                );
            }
        }

        let count = next.len();
        self.entries.publish(next);
        tracing::info!(count, "loaded dialogs");
        count
    }

    pub fn get(&self, name: &str) -> Option<Arc<DialogDescriptor>> {
        self.entries.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.has(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.names()
    }

    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Registers a runtime-created dialog until the next file-backed reload.
    pub fn register(&self, dialog: DialogDescriptor) {
        self.entries.register(dialog.name.clone(), dialog);
    }

    pub fn remove(&self, name: &str) -> Option<Arc<DialogDescriptor>> {
        self.entries.remove(name)
    }

    /// Serializes the dialog to `<name>.toml`, overwriting any existing file.
    pub fn persist(&self, dialog: &DialogDescriptor) -> Result<(), PersistenceError> {
        let contents =
            toml::to_string_pretty(dialog).map_err(|source| PersistenceError::Serialize {
                name: dialog.name.clone(),
                source,
            })?;
        persist::write_document(&self.directory, &dialog.name, EXTENSION, &contents)
    }

    /// Removes the on-disk document; returns whether a file existed.
    pub fn delete_file(&self, name: &str) -> Result<bool, PersistenceError> {
        persist::delete_document(&self.directory, name, EXTENSION)
    }
}

fn load_dialog(path: &Path) -> LoadResult<DialogDescriptor> {
    let name = file_stem(path).context("dialog file name is not valid UTF-8")?;
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut dialog: DialogDescriptor = toml::from_str(&contents)
        .with_context(|| format!("parsing dialog {}", path.display()))?;
    dialog.name = name;
    Ok(dialog)
}
