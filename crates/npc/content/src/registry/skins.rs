//! Skin registry: PNG files plus optional geometry decoded into descriptors.
//!
//! Two layouts are accepted under the skins directory:
//! - a flat `<name>.png` (or `<name>_slim.png`) with an optional sibling
//!   `<name>.json` geometry document;
//! - a folder `<name>/` containing `skin.png` or `skin_slim.png` and an
//!   optional `skin.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use npc_core::{ArmWidth, AssetImage, SkinDescriptor};

use crate::decode::{self, BUILTIN_GEOMETRY, RESOURCE_PATCH_WIDE};
use crate::registry::{LoadResult, SnapshotMap, file_stem, has_extension};

const SLIM_SUFFIX: &str = "_slim";

pub struct SkinRegistry {
    directory: PathBuf,
    entries: SnapshotMap<SkinDescriptor>,
    default_skin: Arc<SkinDescriptor>,
}

impl SkinRegistry {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: SnapshotMap::new(),
            default_skin: Arc::new(default_skin()),
        }
    }

    /// Re-reads the skins directory and publishes the result as the new
    /// snapshot. Corrupt entries are skipped with a warning; an unreadable
    /// directory publishes an empty snapshot, so the registry always reflects
    /// the directory's current content.
    pub fn reload(&self) -> usize {
        let mut next = HashMap::new();

        match fs::read_dir(&self.directory) {
            Ok(read_dir) => {
                for entry in read_dir.flatten() {
                    let path = entry.path();
                    let loaded = if path.is_dir() {
                        load_skin_folder(&path)
                    } else if has_extension(&path, "png") {
                        load_skin_file(&path)
                    } else {
                        continue;
                    };
                    match loaded {
                        Ok((name, descriptor)) => {
                            next.insert(name, Arc::new(descriptor));
                        }
                        Err(error) => {
                            tracing::warn!(path = %path.display(), %error, "skipping skin");
                        }
                    }
                }
            }
            Err(error) => {
                tracing::error!(
                    directory = %self.directory.display(),
                    %error,
                    "skins directory unreadable, publishing empty snapshot"
                );
            }
        }

        let count = next.len();
        self.entries.publish(next);
        tracing::info!(count, "loaded skins");
        count
    }

    pub fn get(&self, name: &str) -> Option<Arc<SkinDescriptor>> {
        self.entries.get(name)
    }

    /// Named skin, or the built-in default when the name is unknown.
    pub fn get_or_default(&self, name: &str) -> Arc<SkinDescriptor> {
        self.entries
            .get(name)
            .unwrap_or_else(|| Arc::clone(&self.default_skin))
    }

    pub fn default_skin(&self) -> Arc<SkinDescriptor> {
        Arc::clone(&self.default_skin)
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

    /// Registers a runtime-created skin until the next file-backed reload.
    pub fn register(&self, name: impl Into<String>, descriptor: SkinDescriptor) {
        self.entries.register(name, descriptor);
    }

    pub fn remove(&self, name: &str) -> Option<Arc<SkinDescriptor>> {
        self.entries.remove(name)
    }
}

/// Flat 64x64 stand-in used when an NPC references no skin or an unknown one.
fn default_skin() -> SkinDescriptor {
    SkinDescriptor::new(
        "default",
        ArmWidth::Wide,
        RESOURCE_PATCH_WIDE,
        BUILTIN_GEOMETRY,
        AssetImage::filled(64, 64, [139, 115, 98, 255]),
    )
}

/// Flat form: `<name>.png` / `<name>_slim.png` + optional `<name>.json`.
fn load_skin_file(path: &Path) -> LoadResult<(String, SkinDescriptor)> {
    let stem = file_stem(path).context("skin file name is not valid UTF-8")?;
    let (logical_name, arm_width) = match stem.strip_suffix(SLIM_SUFFIX) {
        Some(base) => (base.to_owned(), ArmWidth::Slim),
        None => (stem, ArmWidth::Wide),
    };

    let image_bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let geometry_path = path.with_file_name(format!("{logical_name}.json"));
    let geometry = read_optional(&geometry_path)?;

    let descriptor = decode::decode_skin(
        &image_bytes,
        geometry.as_deref(),
        &logical_name,
        arm_width,
    )?;
    Ok((logical_name, descriptor))
}

/// Folder form: `<name>/skin.png` or `<name>/skin_slim.png` + `skin.json`.
fn load_skin_folder(path: &Path) -> LoadResult<(String, SkinDescriptor)> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("skin folder name is not valid UTF-8")?
        .to_owned();

    let slim_path = path.join("skin_slim.png");
    let wide_path = path.join("skin.png");
    let (image_path, arm_width) = if slim_path.exists() {
        (slim_path, ArmWidth::Slim)
    } else if wide_path.exists() {
        (wide_path, ArmWidth::Wide)
    } else {
        anyhow::bail!("no skin.png or skin_slim.png in {}", path.display());
    };

    let image_bytes =
        fs::read(&image_path).with_context(|| format!("reading {}", image_path.display()))?;
    let geometry = read_optional(&path.join("skin.json"))?;

    let descriptor = decode::decode_skin(&image_bytes, geometry.as_deref(), &name, arm_width)?;
    Ok((name, descriptor))
}

fn read_optional(path: &Path) -> LoadResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Some(contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        let pixel = image::Rgba([200u8, 100, 50, 255]);
        image::RgbaImage::from_pixel(width, height, pixel)
            .save(path)
            .unwrap();
    }

    #[test]
    fn reload_picks_up_flat_and_folder_skins() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("guide.png"), 64, 64);
        write_png(&dir.path().join("scout_slim.png"), 64, 64);

        let folder = dir.path().join("keeper");
        fs::create_dir(&folder).unwrap();
        write_png(&folder.join("skin.png"), 64, 64);

        let registry = SkinRegistry::new(dir.path());
        assert_eq!(registry.reload(), 3);

        assert_eq!(registry.get("guide").unwrap().arm_width(), ArmWidth::Wide);
        assert_eq!(registry.get("scout").unwrap().arm_width(), ArmWidth::Slim);
        assert!(registry.has("keeper"));
        assert_eq!(
            registry.names(),
            vec!["guide".to_owned(), "keeper".to_owned(), "scout".to_owned()]
        );
    }

    #[test]
    fn sibling_geometry_changes_the_identifier() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("knight.png"), 64, 64);
        fs::write(
            dir.path().join("knight.json"),
            r#"{"format_version":"1.12.0","minecraft:geometry":[{"description":{"identifier":"geometry.knight"}}]}"#,
        )
        .unwrap();

        let registry = SkinRegistry::new(dir.path());
        registry.reload();

        let skin = registry.get("knight").unwrap();
        assert!(skin.id().starts_with("knight-"));
        assert_ne!(skin.id(), "knight");
    }

    #[test]
    fn corrupt_entry_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("good.png"), 64, 64);
        fs::write(dir.path().join("bad.png"), b"not a png").unwrap();

        let registry = SkinRegistry::new(dir.path());
        assert_eq!(registry.reload(), 1);
        assert!(registry.has("good"));
        assert!(!registry.has("bad"));
    }

    #[test]
    fn missing_directory_publishes_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SkinRegistry::new(dir.path().join("missing"));
        registry.register("leftover", default_skin());

        assert_eq!(registry.reload(), 0);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SkinRegistry::new(dir.path());
        registry.reload();

        let skin = registry.get_or_default("nope");
        assert_eq!(skin.id(), "default");
        assert!(registry.get("nope").is_none());
    }
}
