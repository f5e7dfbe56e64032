//! Administrative facade aggregating the registries and the live runtime.
//!
//! One instance per plugin, built at startup with the engine boundary
//! implementations injected. This is the surface an administrative command
//! layer talks to; the command parser itself lives in the host.

use std::fs;
use std::sync::Arc;

use npc_content::{CapeRegistry, DialogRegistry, NpcRegistry, PersistenceError, SkinRegistry};
use npc_core::{Anchor, DialogDescriptor, NpcDefinition};

use crate::actions::ActionPipeline;
use crate::bridge::{ActorId, EngineBridge, EntityHandle, PlaceholderResolver, PlayerGateway};
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::npc::NpcRuntime;

pub struct NpcService {
    skins: Arc<SkinRegistry>,
    capes: Arc<CapeRegistry>,
    dialogs: Arc<DialogRegistry>,
    definitions: Arc<NpcRegistry>,
    runtime: NpcRuntime,
}

impl NpcService {
    /// Builds the registries over `config`'s data directory (creating the
    /// directory layout if needed) and wires the runtime together.
    pub fn new(
        config: RuntimeConfig,
        engine: Arc<dyn EngineBridge>,
        gateway: Arc<dyn PlayerGateway>,
        placeholders: Arc<dyn PlaceholderResolver>,
    ) -> Result<Self> {
        for dir in config.registry_dirs() {
            fs::create_dir_all(&dir).map_err(|source| PersistenceError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        let skins = Arc::new(SkinRegistry::new(config.skins_dir()));
        let capes = Arc::new(CapeRegistry::new(config.capes_dir()));
        let dialogs = Arc::new(DialogRegistry::new(config.dialogs_dir()));
        let definitions = Arc::new(NpcRegistry::new(config.npcs_dir()));

        let pipeline = ActionPipeline::new(
            Arc::clone(&dialogs),
            gateway,
            Arc::clone(&placeholders),
        );
        let runtime = NpcRuntime::new(
            Arc::clone(&definitions),
            Arc::clone(&skins),
            Arc::clone(&capes),
            pipeline,
            engine,
            placeholders,
            config,
        );

        Ok(Self {
            skins,
            capes,
            dialogs,
            definitions,
            runtime,
        })
    }

    /// Full administrative reload: remove every live NPC, re-read all four
    /// registries from disk, then spawn every definition again.
    pub fn reload_all(&self) {
        tracing::info!("reloading all registries");
        self.runtime.remove_all();
        self.skins.reload();
        self.capes.reload();
        self.dialogs.reload();
        self.definitions.reload();
        self.runtime.spawn_all();
    }

    // ----- registry listings -------------------------------------------

    pub fn skin_names(&self) -> Vec<String> {
        self.skins.names()
    }

    pub fn cape_names(&self) -> Vec<String> {
        self.capes.names()
    }

    pub fn dialog_names(&self) -> Vec<String> {
        self.dialogs.names()
    }

    pub fn npc_names(&self) -> Vec<String> {
        self.definitions.names()
    }

    // ----- definitions -------------------------------------------------

    pub fn definition(&self, name: &str) -> Option<Arc<NpcDefinition>> {
        self.definitions.get(name)
    }

    pub fn has_npc(&self, name: &str) -> bool {
        self.definitions.has(name)
    }

    /// Persists the definition and registers it in the live snapshot.
    pub fn save_definition(&self, definition: NpcDefinition) -> Result<()> {
        self.definitions.persist(&definition)?;
        self.definitions.register(definition);
        Ok(())
    }

    /// Deletes an NPC: the live entity first, then the registry entry, then
    /// the on-disk document. Returns whether a file existed.
    pub fn delete_npc(&self, name: &str) -> Result<bool> {
        self.runtime.remove(name);
        self.definitions.remove(name);
        Ok(self.definitions.delete_file(name)?)
    }

    /// Position-only lookup for teleport-to-NPC helpers.
    pub fn teleport_target(&self, name: &str) -> Option<Anchor> {
        self.definitions
            .get(name)
            .map(|definition| definition.position.clone())
    }

    // ----- dialogs -----------------------------------------------------

    pub fn dialog(&self, name: &str) -> Option<Arc<DialogDescriptor>> {
        self.dialogs.get(name)
    }

    /// Persists the dialog and registers it in the live snapshot.
    pub fn save_dialog(&self, dialog: DialogDescriptor) -> Result<()> {
        self.dialogs.persist(&dialog)?;
        self.dialogs.register(dialog);
        Ok(())
    }

    pub fn delete_dialog(&self, name: &str) -> Result<bool> {
        self.dialogs.remove(name);
        Ok(self.dialogs.delete_file(name)?)
    }

    // ----- live runtime ------------------------------------------------

    pub fn spawn(&self, name: &str) -> Result<()> {
        self.runtime.spawn(name)
    }

    pub fn remove(&self, name: &str) -> bool {
        self.runtime.remove(name)
    }

    pub fn respawn(&self, name: &str) -> Result<()> {
        self.runtime.respawn(name)
    }

    /// Routes an incoming click event; returns whether it was accepted.
    pub fn handle_interact(&self, actor: &ActorId, handle: EntityHandle) -> bool {
        self.runtime.handle_interact(actor, handle)
    }

    /// Tick callback for the host scheduler.
    pub fn tick(&self, current_tick: u64) {
        self.runtime.tick(current_tick);
    }

    pub fn runtime(&self) -> &NpcRuntime {
        &self.runtime
    }

    pub fn skins(&self) -> &SkinRegistry {
        &self.skins
    }

    pub fn capes(&self) -> &CapeRegistry {
        &self.capes
    }

    pub fn dialogs(&self) -> &DialogRegistry {
        &self.dialogs
    }

    pub fn definitions(&self) -> &NpcRegistry {
        &self.definitions
    }
}
