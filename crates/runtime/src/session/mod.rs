//! Authority and replica sessions.
//!
//! A session wires an [`inventory_core::InventoryContainer`] to the loopback
//! channels and the event bus, pre-threading the side's role so callers
//! never pass it by hand. [`AuthorityHost`] owns the canonical container and
//! drains forwarded requests; [`ReplicaPeer`] owns a mirror and drains
//! replication updates. Both publish the same event types through the same
//! bus paths, so observer code is side-agnostic.

mod authority;
mod replica;

pub use authority::AuthorityHost;
pub use replica::ReplicaPeer;

use inventory_core::{CollectionDelta, ItemId, OwnerId, RepresentationId};

use crate::events::{CollectionEvent, Event, EventBus, RepresentationEvent};

/// Publishes the events a collection diff implies.
///
/// Membership changes become one [`CollectionEvent`]; handle changes the
/// same mirror carried become one [`RepresentationEvent`] each.
fn publish_delta(bus: &EventBus, owner: OwnerId, delta: &CollectionDelta, len: usize) {
    if !delta.added.is_empty() || !delta.removed.is_empty() {
        bus.publish(Event::Collection(CollectionEvent {
            owner,
            added: delta.added.clone(),
            removed: delta.removed.clone(),
            len,
        }));
    }
    for (item, handle) in &delta.representation_changed {
        publish_representation(bus, *item, *handle);
    }
}

fn publish_representation(bus: &EventBus, item: ItemId, handle: Option<RepresentationId>) {
    bus.publish(Event::Representation(RepresentationEvent { item, handle }));
}
