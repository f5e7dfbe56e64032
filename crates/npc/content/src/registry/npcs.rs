//! NPC definition registry: one TOML document per NPC.
//!
//! The definition name is the file stem everywhere: parse sets it from the
//! path, persist derives the file name from it, and the map key follows, so
//! storage identity stays consistent across reloads and saves.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use npc_core::NpcDefinition;

use crate::persist::{self, PersistenceError};
use crate::registry::{LoadResult, SnapshotMap, file_stem, has_extension};

const EXTENSION: &str = "toml";

pub struct NpcRegistry {
    directory: PathBuf,
    entries: SnapshotMap<NpcDefinition>,
}

impl NpcRegistry {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: SnapshotMap::new(),
        }
    }

    /// Re-reads the npcs directory and publishes the result as the new
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
                    match load_definition(&path) {
                        Ok(definition) => {
                            next.insert(definition.name.clone(), Arc::new(definition));
                        }
                        Err(error) => {
                            tracing::warn!(path = %path.display(), %error, "skipping NPC definition");
                        }
                    }
                }
            }
            Err(error) => {
                tracing::error!(
                    directory = %self.directory.display(),
                    %error,
                    "npcs directory unreadable, publishing empty snapshot"
                );
            }
        }

        let count = next.len();
        self.entries.publish(next);
        tracing::info!(count, "loaded NPC definitions");
        count
    }

    pub fn get(&self, name: &str) -> Option<Arc<NpcDefinition>> {
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

    /// Registers a runtime-created definition until the next reload.
    pub fn register(&self, definition: NpcDefinition) {
        self.entries.register(definition.name.clone(), definition);
    }

    pub fn remove(&self, name: &str) -> Option<Arc<NpcDefinition>> {
        self.entries.remove(name)
    }

    /// Serializes the definition to `<name>.toml`, overwriting any existing
    /// file.
    pub fn persist(&self, definition: &NpcDefinition) -> Result<(), PersistenceError> {
        let contents =
            toml::to_string_pretty(definition).map_err(|source| PersistenceError::Serialize {
                name: definition.name.clone(),
                source,
            })?;
        persist::write_document(&self.directory, &definition.name, EXTENSION, &contents)
    }

    /// Removes the on-disk document; returns whether a file existed.
    pub fn delete_file(&self, name: &str) -> Result<bool, PersistenceError> {
        persist::delete_document(&self.directory, name, EXTENSION)
    }
}

fn load_definition(path: &Path) -> LoadResult<NpcDefinition> {
    let name = file_stem(path).context("NPC file name is not valid UTF-8")?;
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut definition: NpcDefinition = toml::from_str(&contents)
        .with_context(|| format!("parsing NPC definition {}", path.display()))?;
    definition.name = name;
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use npc_core::{ActionKind, Anchor};

    use super::*;

    const GUIDE: &str = r#"
display_name = "&bTown Guide"
skin = "guide"
click_cooldown = 20

[position]
world = "main"
x = 10.0
y = 65.0
z = 10.0

[emote]
id = "wave"
interval = 200

[[actions]]
kind = "message"
value = "Hello {player_name}"

[[actions]]
kind = "command"
value = "/warp square"
as_actor = true
"#;

    #[test]
    fn reload_parses_definitions_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("guide.toml"), GUIDE).unwrap();

        let registry = NpcRegistry::new(dir.path());
        assert_eq!(registry.reload(), 1);

        let guide = registry.get("guide").unwrap();
        assert_eq!(guide.name, "guide");
        assert_eq!(guide.display_name, "&bTown Guide");
        assert_eq!(guide.position.world, "main");
        assert_eq!(guide.click_cooldown_ticks, 20);
        // Unspecified fields fall back to defaults.
        assert!(guide.show_name_tag);
        assert!(guide.look_at_viewer);
        assert_eq!(guide.scale, 1.0);
        assert!(guide.armor.is_empty());
        assert_eq!(guide.emote.interval_ticks, 200);

        assert_eq!(guide.actions.len(), 2);
        assert_eq!(guide.actions[0].kind, ActionKind::Message);
        assert_eq!(guide.actions[1].kind, ActionKind::Command);
        assert!(guide.actions[1].as_actor);
    }

    #[test]
    fn definition_without_position_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("nowhere.toml"), "display_name = \"Lost\"\n").unwrap();

        let registry = NpcRegistry::new(dir.path());
        assert_eq!(registry.reload(), 0);
    }

    #[test]
    fn persist_then_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let registry = NpcRegistry::new(dir.path());

        let mut definition = NpcDefinition::new(
            "smith",
            Anchor {
                world: "main".to_owned(),
                x: -3.5,
                y: 70.0,
                z: 12.0,
                yaw: 90.0,
                pitch: 0.0,
            },
        );
        definition.held_item = Some("minecraft:iron_sword".to_owned());
        definition.armor.chestplate = Some("minecraft:iron_chestplate".to_owned());

        registry.persist(&definition).unwrap();
        registry.reload();

        assert_eq!(registry.get("smith").as_deref(), Some(&definition));
    }

    #[test]
    fn reload_drops_entries_whose_files_vanished() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("guide.toml"), GUIDE).unwrap();

        let registry = NpcRegistry::new(dir.path());
        registry.reload();
        assert!(registry.has("guide"));

        fs::remove_file(dir.path().join("guide.toml")).unwrap();
        registry.reload();
        assert!(!registry.has("guide"));
        assert_eq!(registry.count(), 0);
    }
}
