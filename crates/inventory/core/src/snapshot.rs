//! Whole-collection mirroring and observer-side diffing.
//!
//! The authority pushes a full [`InventorySnapshot`] on every collection
//! mutation; observers diff the incoming snapshot against their previous
//! one to decide which change notifications to fire. No per-item deltas
//! travel on the wire.

use std::collections::HashMap;

use crate::item::ItemInstance;
use crate::types::{ItemId, OwnerId, RepresentationId};

/// Point-in-time mirror of one container's item collection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySnapshot {
    pub owner: OwnerId,
    /// Insertion-ordered; mirrors the authority's `items` exactly.
    pub items: Vec<ItemInstance>,
}

impl InventorySnapshot {
    pub fn new(owner: OwnerId, items: Vec<ItemInstance>) -> Self {
        Self { owner, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Differences between two collection mirrors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionDelta {
    pub added: Vec<ItemId>,
    pub removed: Vec<ItemId>,
    /// Items whose representation handle changed between the two mirrors.
    pub representation_changed: Vec<(ItemId, Option<RepresentationId>)>,
}

impl CollectionDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.representation_changed.is_empty()
    }

    /// Diffs two mirrors by item id.
    ///
    /// `added` preserves the insertion order of `after`; `removed` carries
    /// whatever ids vanished, order unspecified.
    pub fn between(before: &[ItemInstance], after: &[ItemInstance]) -> Self {
        let mut before_map: HashMap<ItemId, &ItemInstance> =
            before.iter().map(|item| (item.id(), item)).collect();
        let mut delta = CollectionDelta::default();

        for entry in after {
            match before_map.remove(&entry.id()) {
                Some(prev) => {
                    if prev.representation() != entry.representation() {
                        delta
                            .representation_changed
                            .push((entry.id(), entry.representation()));
                    }
                }
                None => delta.added.push(entry.id()),
            }
        }

        delta.removed.extend(before_map.into_keys());
        delta
    }
}
