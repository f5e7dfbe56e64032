//! Copy-on-write snapshot store shared by every registry.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// An immutable map published through a single atomically swapped reference.
///
/// Readers clone the current `Arc` and then work lock-free against a frozen
/// snapshot; [`SnapshotMap::publish`] swaps in a fully built replacement in
/// one visible step. [`SnapshotMap::register`] and [`SnapshotMap::remove`]
/// are the only in-place mutations, and they copy-on-write when a reader
/// still holds the previous snapshot.
pub struct SnapshotMap<T> {
    entries: RwLock<Arc<HashMap<String, Arc<T>>>>,
}

impl<T> SnapshotMap<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// The current snapshot. A poisoned lock still guards a complete
    /// snapshot, so the value is recovered rather than propagated.
    pub fn snapshot(&self) -> Arc<HashMap<String, Arc<T>>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the whole snapshot in one step.
    pub fn publish(&self, entries: HashMap<String, Arc<T>>) {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(entries);
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.snapshot().get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.snapshot().contains_key(name)
    }

    /// All entry names, sorted for stable listings.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn count(&self) -> usize {
        self.snapshot().len()
    }

    /// Inserts or replaces a single entry in the live snapshot.
    pub fn register(&self, name: impl Into<String>, value: T) {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut guard).insert(name.into(), Arc::new(value));
    }

    /// Removes a single entry from the live snapshot.
    pub fn remove(&self, name: &str) -> Option<Arc<T>> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut guard).remove(name)
    }
}

impl<T> Default for SnapshotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn register_get_remove() {
        let map: SnapshotMap<u32> = SnapshotMap::new();
        assert_eq!(map.count(), 0);

        map.register("a", 1);
        map.register("b", 2);
        assert_eq!(map.get("a").as_deref(), Some(&1));
        assert!(map.has("b"));
        assert_eq!(map.names(), vec!["a".to_owned(), "b".to_owned()]);

        assert_eq!(map.remove("a").as_deref(), Some(&1));
        assert!(!map.has("a"));
        assert_eq!(map.count(), 1);
    }

    #[test]
    fn publish_replaces_wholesale() {
        let map: SnapshotMap<u32> = SnapshotMap::new();
        map.register("stale", 1);

        let mut next = HashMap::new();
        next.insert("fresh".to_owned(), Arc::new(2));
        map.publish(next);

        assert!(!map.has("stale"));
        assert_eq!(map.get("fresh").as_deref(), Some(&2));
    }

    #[test]
    fn snapshot_is_frozen_against_later_mutation() {
        let map: SnapshotMap<u32> = SnapshotMap::new();
        map.register("a", 1);

        let snapshot = map.snapshot();
        map.remove("a");
        map.register("b", 2);

        assert!(snapshot.contains_key("a"));
        assert!(!snapshot.contains_key("b"));
    }

    /// A reader polling during repeated publishes must always observe a key
    /// present in every generation, and never a half-swapped map.
    #[test]
    fn readers_never_observe_partial_reloads() {
        let map: Arc<SnapshotMap<u64>> = Arc::new(SnapshotMap::new());
        let stop = Arc::new(AtomicBool::new(false));

        let mut initial = HashMap::new();
        initial.insert("stable".to_owned(), Arc::new(0));
        initial.insert("marker-0".to_owned(), Arc::new(0));
        map.publish(initial);

        let reader = {
            let map = Arc::clone(&map);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let snapshot = map.snapshot();
                    let generation = *snapshot
                        .get("stable")
                        .expect("stable key must survive every publish")
                        .as_ref();
                    // Each generation carries a matching marker entry; seeing
                    // the stable key from one generation with the marker from
                    // another would mean a torn snapshot.
                    let marker = format!("marker-{generation}");
                    assert!(
                        snapshot.contains_key(&marker),
                        "snapshot mixed generations: stable={generation} without {marker}"
                    );
                }
            })
        };

        for generation in 1..500u64 {
            let mut next = HashMap::new();
            next.insert("stable".to_owned(), Arc::new(generation));
            next.insert(format!("marker-{generation}"), Arc::new(generation));
            map.publish(next);
        }

        stop.store(true, Ordering::Relaxed);
        reader.join().unwrap();
    }
}
