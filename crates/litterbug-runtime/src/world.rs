//! Shared world state read by the vision loop.
//!
//! Both handles are cheap to clone and safe to share across tasks. Writers
//! (the pose feed, item placement) take the lock briefly; readers copy out a
//! snapshot and release it before doing any geometry.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use litterbug_types::{Item, RobotPose};

// ────────────────────────────────────────────────────────────────────────────
// SharedPose
// ────────────────────────────────────────────────────────────────────────────

/// Latest robot pose. Last writer wins.
#[derive(Debug, Clone, Default)]
pub struct SharedPose {
    inner: Arc<RwLock<RobotPose>>,
}

impl SharedPose {
    pub fn new(initial: RobotPose) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Copy of the current pose.
    pub fn get(&self) -> RobotPose {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, pose: RobotPose) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = pose;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ItemRegistry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct RegistryState {
    items: BTreeMap<String, Item>,
    /// Every label ever registered; not pruned on removal.
    labels: BTreeSet<String>,
}

/// Known items keyed by id, plus the set of labels seen so far.
///
/// Iteration order is ascending by id so seeded scans are reproducible.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an item. Returns the previous item with the same id.
    pub fn insert(&self, item: Item) -> Option<Item> {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.labels.insert(item.label.clone());
        state.items.insert(item.id.clone(), item)
    }

    pub fn remove(&self, id: &str) -> Option<Item> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Item> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every item, ordered by id.
    pub fn snapshot(&self) -> Vec<Item> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .values()
            .cloned()
            .collect()
    }

    /// Every label ever registered, sorted.
    pub fn labels(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .labels
            .iter()
            .cloned()
            .collect()
    }

    /// Items and labels copied under a single lock acquisition.
    pub fn snapshot_with_labels(&self) -> (Vec<Item>, Vec<String>) {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        (
            state.items.values().cloned().collect(),
            state.labels.iter().cloned().collect(),
        )
    }
}
