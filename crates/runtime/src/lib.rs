//! Interaction dispatch and live-NPC orchestration.
//!
//! This crate wires the config registries from `npc-content` into a running
//! plugin core: routing click events through cooldowns into the action
//! pipeline, materializing definitions as live entities through the engine
//! bridge, and driving tick-cadenced upkeep. The host engine is reached only
//! through the traits in [`bridge`], injected at construction.
//!
//! Modules are organized by responsibility:
//! - [`bridge`] declares the boundary the host engine implements
//! - [`npc`] tracks live entities and routes interactions
//! - [`actions`] executes declarative click-action lists
//! - [`cooldown`] bounds how often one actor can trigger one NPC
//! - [`service`] exposes the administrative facade
pub mod actions;
pub mod bridge;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod npc;
pub mod service;
pub mod text;

pub use actions::ActionPipeline;
pub use bridge::{
    ActorId, CommandOrigin, EngineBridge, EntityHandle, EntitySpec, IdentityResolver,
    PlaceholderResolver, PlayerGateway, ResolvedButton, ResolvedDialog, SpawnError,
};
pub use config::RuntimeConfig;
pub use cooldown::CooldownTracker;
pub use error::{NpcError, Result};
pub use npc::NpcRuntime;
pub use service::NpcService;
