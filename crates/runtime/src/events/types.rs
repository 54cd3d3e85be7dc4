//! Event types for different topics.

use inventory_core::{ItemId, OwnerId, RepresentationId};
use serde::{Deserialize, Serialize};

/// Fired after a side's collection mirror updates.
///
/// Both the authority and every remote peer fire this through the same
/// path, so code handling inventory changes behaves identically on either
/// side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEvent {
    pub owner: OwnerId,
    /// Items newly present relative to the previous mirror.
    pub added: Vec<ItemId>,
    /// Items no longer present relative to the previous mirror.
    pub removed: Vec<ItemId>,
    /// Collection size after the update.
    pub len: usize,
}

/// Fired when an item's world-representation handle changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepresentationEvent {
    pub item: ItemId,
    /// The new handle; `None` after despawn or external destruction.
    pub handle: Option<RepresentationId>,
}
