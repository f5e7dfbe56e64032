//! Cape registry: one PNG per cape, decoded straight to an RGBA raster.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use npc_core::AssetImage;

use crate::decode;
use crate::registry::{LoadResult, SnapshotMap, file_stem, has_extension};

pub struct CapeRegistry {
    directory: PathBuf,
    entries: SnapshotMap<AssetImage>,
}

impl CapeRegistry {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: SnapshotMap::new(),
        }
    }

    /// Re-reads the capes directory and publishes the result as the new
    /// snapshot. Corrupt entries are skipped with a warning; an unreadable
    /// directory publishes an empty snapshot.
    pub fn reload(&self) -> usize {
        let mut next = HashMap::new();

        match fs::read_dir(&self.directory) {
            Ok(read_dir) => {
                for entry in read_dir.flatten() {
                    let path = entry.path();
                    if !path.is_file() || !has_extension(&path, "png") {
                        continue;
                    }
                    match load_cape(&path) {
                        Ok((name, cape)) => {
                            next.insert(name, Arc::new(cape));
                        }
                        Err(error) => {
                            tracing::warn!(path = %path.display(), %error, "skipping cape");
                        }
                    }
                }
            }
            Err(error) => {
                tracing::error!(
                    directory = %self.directory.display(),
                    %error,
                    "capes directory unreadable, publishing empty snapshot"
                );
            }
        }

        let count = next.len();
        self.entries.publish(next);
        tracing::info!(count, "loaded capes");
        count
    }

    pub fn get(&self, name: &str) -> Option<Arc<AssetImage>> {
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

    pub fn register(&self, name: impl Into<String>, cape: AssetImage) {
        self.entries.register(name, cape);
    }

    pub fn remove(&self, name: &str) -> Option<Arc<AssetImage>> {
        self.entries.remove(name)
    }
}

fn load_cape(path: &Path) -> LoadResult<(String, AssetImage)> {
    let name = file_stem(path).context("cape file name is not valid UTF-8")?;
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let cape = decode::decode_image(&bytes)?;
    Ok((name, cape))
}
