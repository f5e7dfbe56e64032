//! Live-NPC tracking, interaction routing, and tick-driven upkeep.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use npc_content::{CapeRegistry, NpcRegistry, SkinRegistry};
use npc_core::{NpcDefinition, SkinDescriptor};

use crate::actions::ActionPipeline;
use crate::bridge::{ActorId, EngineBridge, EntityHandle, EntitySpec, PlaceholderResolver};
use crate::config::RuntimeConfig;
use crate::cooldown::CooldownTracker;
use crate::error::{NpcError, Result};
use crate::text;

/// Runtime pairing of a definition with the entity materialized from it.
struct LiveNpc {
    /// Definition captured at spawn time; a later registry edit takes effect
    /// on the next respawn, matching how the engine applies skin and armor.
    definition: Arc<NpcDefinition>,
    handle: EntityHandle,
    last_emote_tick: u64,
}

/// Tracks which definitions are currently materialized as live entities and
/// mediates every transition between them.
///
/// At most one live entity exists per definition name: spawning an
/// already-spawned name removes the old entity first. Entity handles never
/// leave this registry; all effects on them flow through the engine bridge.
pub struct NpcRuntime {
    definitions: Arc<NpcRegistry>,
    skins: Arc<SkinRegistry>,
    capes: Arc<CapeRegistry>,
    pipeline: ActionPipeline,
    cooldowns: CooldownTracker,
    engine: Arc<dyn EngineBridge>,
    placeholders: Arc<dyn PlaceholderResolver>,
    config: RuntimeConfig,
    live: RwLock<HashMap<String, LiveNpc>>,
}

impl NpcRuntime {
    pub fn new(
        definitions: Arc<NpcRegistry>,
        skins: Arc<SkinRegistry>,
        capes: Arc<CapeRegistry>,
        pipeline: ActionPipeline,
        engine: Arc<dyn EngineBridge>,
        placeholders: Arc<dyn PlaceholderResolver>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            definitions,
            skins,
            capes,
            pipeline,
            cooldowns: CooldownTracker::new(),
            engine,
            placeholders,
            config,
            live: RwLock::new(HashMap::new()),
        }
    }

    /// Materializes the named definition as a live entity.
    ///
    /// An already-spawned name is fully removed first; skin and armor are
    /// only applied at creation time, so there is never an in-place refresh.
    /// Failures (unknown definition, unknown world, engine rejection) are
    /// reported to the caller and not retried.
    pub fn spawn(&self, name: &str) -> Result<()> {
        let definition = self
            .definitions
            .get(name)
            .ok_or_else(|| NpcError::UnknownNpc(name.to_owned()))?;

        if self.is_spawned(name) {
            self.remove(name);
        }

        let spec = self.entity_spec(&definition);
        let handle = self.engine.spawn_entity(&spec).map_err(NpcError::Spawn)?;

        let mut live = self.live.write().unwrap_or_else(PoisonError::into_inner);
        live.insert(
            name.to_owned(),
            LiveNpc {
                definition,
                handle,
                last_emote_tick: 0,
            },
        );

        tracing::debug!(npc = name, %handle, "spawned NPC");
        Ok(())
    }

    /// Spawns every known definition, logging and skipping failures.
    /// Returns the number successfully spawned.
    pub fn spawn_all(&self) -> usize {
        let mut spawned = 0;
        for name in self.definitions.names() {
            match self.spawn(&name) {
                Ok(()) => spawned += 1,
                Err(error) => tracing::warn!(npc = %name, %error, "failed to spawn NPC"),
            }
        }
        spawned
    }

    /// Detaches and discards the live entity; no-op when not spawned.
    pub fn remove(&self, name: &str) -> bool {
        let removed = {
            let mut live = self.live.write().unwrap_or_else(PoisonError::into_inner);
            live.remove(name)
        };
        match removed {
            Some(npc) => {
                self.engine.despawn_entity(npc.handle);
                tracing::debug!(npc = name, handle = %npc.handle, "removed NPC");
                true
            }
            None => false,
        }
    }

    pub fn remove_all(&self) {
        let drained: Vec<String> = {
            let live = self.live.read().unwrap_or_else(PoisonError::into_inner);
            live.keys().cloned().collect()
        };
        for name in drained {
            self.remove(&name);
        }
    }

    /// Remove-then-spawn from the current definition; never an in-place
    /// mutation of a live handle.
    pub fn respawn(&self, name: &str) -> Result<()> {
        self.remove(name);
        self.spawn(name)
    }

    pub fn is_spawned(&self, name: &str) -> bool {
        self.live
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn spawned_names(&self) -> Vec<String> {
        let live = self.live.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = live.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn spawned_count(&self) -> usize {
        self.live
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The pipeline dialog-button callbacks re-enter on a press.
    pub fn pipeline(&self) -> &ActionPipeline {
        &self.pipeline
    }

    /// The live entity handle for a spawned name, if any.
    pub fn handle_of(&self, name: &str) -> Option<EntityHandle> {
        let live = self.live.read().unwrap_or_else(PoisonError::into_inner);
        live.get(name).map(|npc| npc.handle)
    }

    /// Reverse lookup from a live entity to its NPC name.
    ///
    /// A linear scan over currently spawned entries; fine while the number
    /// of simultaneously live NPCs stays small.
    pub fn resolve_by_entity(&self, handle: EntityHandle) -> Option<String> {
        let live = self.live.read().unwrap_or_else(PoisonError::into_inner);
        live.iter()
            .find(|(_, npc)| npc.handle == handle)
            .map(|(name, _)| name.clone())
    }

    /// Routes a click on a live entity: cooldown gate, record, then actions.
    /// Returns whether the interaction was accepted.
    pub fn handle_interact(&self, actor: &ActorId, handle: EntityHandle) -> bool {
        self.handle_interact_at(actor, handle, Instant::now())
    }

    /// [`Self::handle_interact`] with an explicit clock, for tests.
    pub fn handle_interact_at(&self, actor: &ActorId, handle: EntityHandle, now: Instant) -> bool {
        let Some(name) = self.resolve_by_entity(handle) else {
            return false;
        };
        let Some(definition) = ({
            let live = self.live.read().unwrap_or_else(PoisonError::into_inner);
            live.get(&name).map(|npc| Arc::clone(&npc.definition))
        }) else {
            return false;
        };

        if self
            .cooldowns
            .is_on_cooldown_at(actor, &name, definition.click_cooldown(), now)
        {
            tracing::debug!(npc = %name, %actor, "interaction suppressed by cooldown");
            return false;
        }
        self.cooldowns.record_at(actor, &name, now);

        tracing::debug!(npc = %name, %actor, actions = definition.actions.len(), "interaction accepted");
        self.pipeline.execute(actor, handle, &definition.actions);
        true
    }

    /// Periodic upkeep driven by the external scheduler.
    ///
    /// Per live NPC: individualized look-at updates, emote due-checks, and a
    /// periodic name/score-tag refresh so placeholder text stays current.
    /// Also runs the cooldown sweep on its own cadence. Never surfaces
    /// errors; background work logs and continues.
    pub fn tick(&self, current_tick: u64) {
        let refresh_tags = self.config.name_tag_refresh_ticks > 0
            && current_tick % self.config.name_tag_refresh_ticks == 0;

        {
            let mut live = self.live.write().unwrap_or_else(PoisonError::into_inner);
            for npc in live.values_mut() {
                let definition = Arc::clone(&npc.definition);

                if definition.look_at_viewer {
                    self.engine.face_viewers(npc.handle);
                }

                if definition.emote.is_enabled()
                    && current_tick.saturating_sub(npc.last_emote_tick)
                        >= definition.emote.interval_ticks
                {
                    npc.last_emote_tick = current_tick;
                    self.engine.play_emote(npc.handle, &definition.emote.id);
                }

                if refresh_tags {
                    let display_name =
                        text::colorize(&self.placeholders.resolve_server(&definition.display_name));
                    let score_tag =
                        text::colorize(&self.placeholders.resolve_server(&definition.score_tag));
                    self.engine
                        .refresh_name_tags(npc.handle, &display_name, &score_tag);
                }
            }
        }

        if self.config.sweep_interval_ticks > 0
            && current_tick % self.config.sweep_interval_ticks == 0
        {
            self.cooldowns.sweep(self.config.cooldown_retention);
        }
    }

    /// Spawns the not-yet-live definitions anchored in a newly loaded world.
    pub fn on_world_load(&self, world: &str) {
        for name in self.definitions.names() {
            if self.is_spawned(&name) {
                continue;
            }
            let Some(definition) = self.definitions.get(&name) else {
                continue;
            };
            if definition.position.world != world {
                continue;
            }
            if let Err(error) = self.spawn(&name) {
                tracing::warn!(npc = %name, %error, "failed to spawn NPC for loaded world");
            }
        }
    }

    /// Removes live NPCs anchored in a world that is unloading.
    pub fn on_world_unload(&self, world: &str) {
        let doomed: Vec<String> = {
            let live = self.live.read().unwrap_or_else(PoisonError::into_inner);
            live.iter()
                .filter(|(_, npc)| npc.definition.position.world == world)
                .map(|(name, _)| name.clone())
                .collect()
        };
        for name in &doomed {
            self.remove(name);
        }
        if !doomed.is_empty() {
            tracing::debug!(count = doomed.len(), world, "removed NPCs for unloading world");
        }
    }

    fn entity_spec(&self, definition: &NpcDefinition) -> EntitySpec {
        EntitySpec {
            world: definition.position.world.clone(),
            x: definition.position.x,
            y: definition.position.y,
            z: definition.position.z,
            yaw: definition.position.yaw,
            pitch: definition.position.pitch,
            display_name: text::colorize(&definition.display_name),
            show_name_tag: definition.show_name_tag,
            score_tag: definition.score_tag.clone(),
            scale: definition.scale,
            skin: self.resolve_skin(definition),
            held_item: definition.held_item.clone(),
            armor: definition.armor.clone(),
        }
    }

    /// Skin by name (default when empty or unknown), with the definition's
    /// cape attached when one is configured and present.
    fn resolve_skin(&self, definition: &NpcDefinition) -> Arc<SkinDescriptor> {
        let base = if definition.skin.is_empty() {
            self.skins.default_skin()
        } else if let Some(skin) = self.skins.get(&definition.skin) {
            skin
        } else {
            tracing::warn!(npc = %definition.name, skin = %definition.skin, "skin not found, using default");
            self.skins.default_skin()
        };

        if definition.cape.is_empty() {
            return base;
        }
        match self.capes.get(&definition.cape) {
            Some(cape) => Arc::new((*base).clone().with_cape((*cape).clone())),
            None => {
                tracing::warn!(npc = %definition.name, cape = %definition.cape, "cape not found");
                base
            }
        }
    }
}
