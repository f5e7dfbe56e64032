//! Boundary traits the host engine implements for the NPC core.
//!
//! Everything the core needs from the engine flows through these traits,
//! injected at construction. Implementations live in the host plugin; tests
//! use recording mocks. All traits are `Send + Sync` because interaction
//! handling and administrative reloads arrive from different callers.

use std::fmt;
use std::sync::Arc;

use npc_core::{ArmorSlots, SkinDescriptor};
use thiserror::Error;
use uuid::Uuid;

/// Durable identity of an interacting player.
///
/// Backed by the account UUID so cooldown bookkeeping survives reconnects;
/// never a transient session handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque reference to a live in-world entity, minted by the engine.
///
/// Handles are owned exclusively by the NPC runtime registry; no other
/// component retains or mutates one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle(u64);

impl EntityHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Everything the engine needs to materialize one NPC entity.
///
/// Skin and armor are only applied at creation time by the engine, which is
/// why respawn is always expressed as remove-then-spawn.
#[derive(Clone, Debug)]
pub struct EntitySpec {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    /// Display name with color codes already expanded.
    pub display_name: String,
    pub show_name_tag: bool,
    pub score_tag: String,
    pub scale: f64,
    pub skin: Arc<SkinDescriptor>,
    pub held_item: Option<String>,
    pub armor: ArmorSlots,
}

/// On whose behalf a command is submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOrigin {
    Actor(ActorId),
    Server,
}

/// A dialog with title, body, and button labels already resolved for one
/// viewer. Button payloads stay as templates; they are resolved when the
/// button is pressed.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDialog {
    pub title: String,
    pub body: String,
    pub buttons: Vec<ResolvedButton>,
}

/// One button of a [`ResolvedDialog`]. The host hands this back to
/// [`crate::ActionPipeline::run_button`] when the viewer presses it.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedButton {
    pub label: String,
    pub commands: Vec<String>,
    pub message: Option<String>,
    pub as_actor: bool,
}

/// Errors from materializing an entity through the engine.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("unknown world: {0}")]
    UnknownWorld(String),

    #[error("engine rejected entity creation: {0}")]
    Rejected(String),
}

/// Entity lifecycle and per-entity effects provided by the host engine.
pub trait EngineBridge: Send + Sync {
    /// Creates the entity described by `spec` and returns its handle.
    fn spawn_entity(&self, spec: &EntitySpec) -> Result<EntityHandle, SpawnError>;

    /// Removes a previously created entity. Stale handles are ignored.
    fn despawn_entity(&self, handle: EntityHandle);

    /// Sends each nearby viewer an individualized orientation so the entity
    /// appears to look at them.
    fn face_viewers(&self, handle: EntityHandle);

    /// Broadcasts an emote animation to the entity's viewers.
    fn play_emote(&self, handle: EntityHandle, emote_id: &str);

    /// Pushes refreshed name-tag and score-tag text to viewers.
    fn refresh_name_tags(&self, handle: EntityHandle, display_name: &str, score_tag: &str);
}

/// Player-directed effects provided by the host engine.
pub trait PlayerGateway: Send + Sync {
    fn send_message(&self, actor: &ActorId, message: &str);

    /// Submits a command (without the leading prefix character); returns
    /// whether the engine accepted it.
    fn execute_command(&self, origin: CommandOrigin, command: &str) -> bool;

    /// Presents a fully resolved dialog attributed to the given entity.
    fn show_dialog(&self, actor: &ActorId, source: EntityHandle, dialog: ResolvedDialog);
}

/// Placeholder substitution delegated to an external service.
pub trait PlaceholderResolver: Send + Sync {
    /// Resolves placeholders in `template` against a specific actor.
    fn resolve(&self, actor: &ActorId, template: &str) -> String;

    /// Resolves placeholders with no actor context (name-tag refresh).
    fn resolve_server(&self, template: &str) -> String {
        template.to_owned()
    }
}

/// Pass-through resolver for hosts without a placeholder service.
pub struct IdentityResolver;

impl PlaceholderResolver for IdentityResolver {
    fn resolve(&self, _actor: &ActorId, template: &str) -> String {
        template.to_owned()
    }
}
