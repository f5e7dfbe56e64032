//! Data model shared by the config registries and the NPC runtime.
//!
//! `npc-core` defines the validated, immutable descriptors that the rest of
//! the workspace moves around: raster assets, skins, dialog documents, and
//! declarative NPC definitions. Decoding and file I/O live in `npc-content`;
//! interaction dispatch lives in `runtime`. Types here carry their invariants
//! in their constructors and stay free of engine concerns.
pub mod asset;
pub mod dialog;
pub mod npc;
pub mod skin;

pub use asset::{AssetImage, AssetImageError, ArmWidth, RGBA_CHANNELS};
pub use dialog::{ButtonDescriptor, DialogDescriptor};
pub use npc::{
    ActionDefinition, ActionKind, Anchor, ArmorSlots, EmoteSpec, NpcDefinition, TICK_DURATION,
};
pub use skin::SkinDescriptor;
