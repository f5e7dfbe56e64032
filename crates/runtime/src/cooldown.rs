//! Interaction cooldown bookkeeping keyed by durable actor identity.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::bridge::ActorId;

/// Time-indexed map of the last accepted interaction per (actor, NPC) pair.
///
/// The sweep is a coarse memory bound, not a correctness mechanism: each
/// NPC's cooldown is always evaluated against the live entry, regardless of
/// when the last sweep ran. Entries are keyed by durable actor identity so a
/// reconnect does not reset anyone's cooldown.
pub struct CooldownTracker {
    entries: RwLock<HashMap<(ActorId, String), Instant>>,
}

impl CooldownTracker {
    /// Retention window for the periodic sweep, independent of any single
    /// NPC's configured cooldown.
    pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60);

    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// True iff the pair interacted less than `cooldown` ago.
    pub fn is_on_cooldown(&self, actor: &ActorId, npc_name: &str, cooldown: Duration) -> bool {
        self.is_on_cooldown_at(actor, npc_name, cooldown, Instant::now())
    }

    /// [`Self::is_on_cooldown`] with an explicit clock, for tick-driven
    /// callers and tests.
    pub fn is_on_cooldown_at(
        &self,
        actor: &ActorId,
        npc_name: &str,
        cooldown: Duration,
        now: Instant,
    ) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&(*actor, npc_name.to_owned()))
            .is_some_and(|last| now.duration_since(*last) < cooldown)
    }

    /// Upserts the pair's timestamp to now.
    pub fn record(&self, actor: &ActorId, npc_name: &str) {
        self.record_at(actor, npc_name, Instant::now());
    }

    pub fn record_at(&self, actor: &ActorId, npc_name: &str, now: Instant) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert((*actor, npc_name.to_owned()), now);
    }

    /// Drops every entry older than the retention window.
    pub fn sweep(&self, retention: Duration) {
        self.sweep_at(retention, Instant::now());
    }

    pub fn sweep_at(&self, retention: Duration, now: Instant) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, last| now.duration_since(*last) <= retention);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new()
    }
}
