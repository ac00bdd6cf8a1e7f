use crate::entity::IdentityKey;
use std::collections::{BTreeMap, HashMap};

/// What the reconciler remembers about one materialized root
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnownVisual {
    /// Attached children: child key -> sprite path it was attached with
    pub attached: BTreeMap<String, String>,
}

impl KnownVisual {
    pub fn has_child(&self, child: &str) -> bool {
        self.attached.contains_key(child)
    }
}

/// Per-family memory of materialized visuals.
///
/// Only the reconciler mutates it, during a pass. Entries are never
/// evicted: an entity that drops out of the snapshot keeps its visual.
#[derive(Clone, Debug, Default)]
pub struct KnownVisuals {
    visuals: HashMap<IdentityKey, KnownVisual>,
}

impl KnownVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &IdentityKey) -> Option<&KnownVisual> {
        self.visuals.get(key)
    }

    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.visuals.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub(crate) fn insert_root(&mut self, key: IdentityKey) {
        self.visuals.entry(key).or_default();
    }

    pub(crate) fn record_child(&mut self, key: &IdentityKey, child: &str, sprite_path: &str) {
        if let Some(visual) = self.visuals.get_mut(key) {
            visual
                .attached
                .insert(child.to_string(), sprite_path.to_string());
        }
    }

    pub(crate) fn forget_child(&mut self, key: &IdentityKey, child: &str) {
        if let Some(visual) = self.visuals.get_mut(key) {
            visual.attached.remove(child);
        }
    }
}
