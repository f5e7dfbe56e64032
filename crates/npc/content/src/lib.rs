//! Asset decoding, hot-reloadable config registries, and document persistence.
//!
//! This crate owns every file the plugin reads or writes:
//! - [`decode`] turns raw image bytes and optional geometry documents into
//!   validated [`npc_core::SkinDescriptor`]s and [`npc_core::AssetImage`]s.
//! - [`registry`] holds the four directory-backed registries (skins, capes,
//!   dialogs, NPC definitions). Lookups read an immutable snapshot; a reload
//!   builds a replacement map and publishes it in a single step, so readers
//!   never observe a partially loaded registry.
//! - [`persist`] provides the atomic write/delete helpers the dialog and NPC
//!   registries use for operator-triggered saves.
//!
//! Interaction dispatch and the live-entity registry live in the `runtime`
//! crate; nothing here touches the engine.
pub mod decode;
pub mod persist;
pub mod registry;

pub use decode::{
    BUILTIN_GEOMETRY, DecodeError, RESOURCE_PATCH_SLIM, RESOURCE_PATCH_WIDE, decode_image,
    decode_skin,
};
pub use persist::PersistenceError;
pub use registry::{CapeRegistry, DialogRegistry, NpcRegistry, SkinRegistry, SnapshotMap};
