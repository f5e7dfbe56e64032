//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine bridge and the persistence layer so
//! administrative callers receive one result type with specific,
//! human-readable reasons.

use thiserror::Error;

pub use crate::bridge::SpawnError;
pub use npc_content::PersistenceError;

pub type Result<T> = std::result::Result<T, NpcError>;

#[derive(Debug, Error)]
pub enum NpcError {
    #[error("unknown NPC definition: {0}")]
    UnknownNpc(String),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
