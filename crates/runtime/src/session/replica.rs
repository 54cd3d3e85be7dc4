//! The remote (mirroring) side of an inventory session.

use tokio::sync::broadcast;
use tracing::debug;

use inventory_core::{
    InstanceKind, InventoryContainer, InventoryEnv, InventorySnapshot, ItemId, ItemInstance,
    NetRole, OwnerId, TemplateHandle,
};

use crate::channel::{LoopbackForwarder, MirrorInbox, MirrorUpdate};
use crate::error::Result;
use crate::events::{Event, EventBus, Topic};
use crate::session::{publish_delta, publish_representation};

/// A remote peer's view of one container.
///
/// Every mutating call forwards to the authority and returns immediately;
/// the local mirror changes only when [`ReplicaPeer::pump_mirror`] ingests
/// updates the authority pushed. Completion of a forwarded request is
/// observed through those mirrors, never through a reply.
pub struct ReplicaPeer {
    container: InventoryContainer,
    forwarder: LoopbackForwarder,
    mirror: MirrorInbox,
    bus: EventBus,
}

impl ReplicaPeer {
    pub(crate) fn connect(owner: OwnerId, forwarder: LoopbackForwarder, mirror: MirrorInbox) -> Self {
        Self {
            container: InventoryContainer::new(owner),
            forwarder,
            mirror,
            bus: EventBus::new(),
        }
    }

    /// Requests item creation from the authority.
    ///
    /// The new item appears in [`ReplicaPeer::items`] only after a later
    /// collection mirror delivers it.
    pub fn create_item(&mut self, template: TemplateHandle, kind: InstanceKind) -> Result<()> {
        let env = InventoryEnv::remote(&self.forwarder);
        self.container
            .create_item(NetRole::Remote, &env, template, kind)?;
        Ok(())
    }

    pub fn spawn_representation(&mut self, item: ItemId) -> Result<()> {
        let env = InventoryEnv::remote(&self.forwarder);
        self.container
            .spawn_representation(NetRole::Remote, &env, item)?;
        Ok(())
    }

    pub fn despawn_representation(&mut self, item: ItemId) -> Result<()> {
        let env = InventoryEnv::remote(&self.forwarder);
        self.container
            .despawn_representation(NetRole::Remote, &env, item)?;
        Ok(())
    }

    /// Ingests pending mirror updates and publishes change events.
    ///
    /// Returns how many updates were drained. Collection mirrors replace
    /// the local view wholesale and fire one collection event per
    /// non-empty membership diff; handle mirrors fire one representation
    /// event per actual change.
    pub fn pump_mirror(&mut self) -> Result<usize> {
        let updates = self.mirror.drain();
        let drained = updates.len();
        for update in updates {
            match update {
                MirrorUpdate::Collection(snapshot) => {
                    let len = snapshot.len();
                    let delta = self.container.apply_mirror(NetRole::Remote, snapshot)?;
                    debug!(
                        added = delta.added.len(),
                        removed = delta.removed.len(),
                        "collection mirror ingested"
                    );
                    publish_delta(&self.bus, self.container.owner(), &delta, len);
                }
                MirrorUpdate::Representation { item, handle } => {
                    let changed =
                        self.container
                            .apply_representation_mirror(NetRole::Remote, item, handle)?;
                    if changed {
                        publish_representation(&self.bus, item, handle);
                    }
                }
            }
        }
        Ok(drained)
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn owner(&self) -> OwnerId {
        self.container.owner()
    }

    pub fn items(&self) -> &[ItemInstance] {
        self.container.items()
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemInstance> {
        self.container.item(id)
    }

    pub fn is_spawned(&self, id: ItemId) -> bool {
        self.container.is_spawned(id)
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        self.container.snapshot()
    }

    /// Whether mirror updates are waiting to be pumped.
    pub fn has_pending_mirrors(&self) -> bool {
        !self.mirror.is_empty()
    }
}
