//! The authoritative side of an inventory session.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use inventory_core::{
    AlwaysEligible, CollectionDelta, Created, InstanceKind, InventoryConfig, InventoryContainer,
    InventoryEnv, InventoryRequest, InventorySnapshot, ItemId, ItemInstance, NetRole, OwnerId,
    ReplicationSink, RepresentationId, SpawnOutcome, SpawnPolicy, TemplateHandle, TemplateOracle,
    World,
};

use crate::channel::{
    LoopbackChannel, LoopbackForwarder, LoopbackReplication, MirrorInbox, MirrorUpdate,
    RequestInbox,
};
use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::session::{ReplicaPeer, publish_delta, publish_representation};

/// Owns the canonical container and every port the authority side needs.
///
/// The host pre-threads [`NetRole::Authority`] through the container API,
/// drains forwarded requests from connected replicas, and observes its own
/// mirrors through the same replication path the replicas use so event
/// handling is identical on both sides.
pub struct AuthorityHost {
    container: InventoryContainer,
    templates: Arc<dyn TemplateOracle>,
    world: Arc<dyn World>,
    policy: Arc<dyn SpawnPolicy>,
    replication: Arc<LoopbackReplication>,
    forwarder: LoopbackForwarder,
    requests: RequestInbox,
    /// The authority's own mirror inbox, registered like any replica's.
    hook_mirror: MirrorInbox,
    /// Last collection state seen by the hook path, for diffing.
    hook_items: Vec<ItemInstance>,
    bus: EventBus,
}

impl AuthorityHost {
    pub fn new(
        owner: OwnerId,
        templates: Arc<dyn TemplateOracle>,
        world: Arc<dyn World>,
    ) -> Self {
        Self::with_config(owner, InventoryConfig::default(), templates, world)
    }

    pub fn with_config(
        owner: OwnerId,
        config: InventoryConfig,
        templates: Arc<dyn TemplateOracle>,
        world: Arc<dyn World>,
    ) -> Self {
        let (forwarder, requests) = LoopbackChannel::pair();
        let replication = Arc::new(LoopbackReplication::new());
        let hook_mirror = replication.register_observer();
        Self {
            container: InventoryContainer::with_config(owner, config),
            templates,
            world,
            policy: Arc::new(AlwaysEligible),
            replication,
            forwarder,
            requests,
            hook_mirror,
            hook_items: Vec::new(),
            bus: EventBus::new(),
        }
    }

    /// Replaces the default always-eligible spawn policy.
    pub fn set_policy(&mut self, policy: Arc<dyn SpawnPolicy>) {
        self.policy = policy;
    }

    /// Wires a new remote peer into this host's channels.
    ///
    /// The peer shares the host's request queue and gets its own mirror
    /// inbox, so it sees every mirror pushed from this point on. Seed it
    /// with the current state so it does not start blind.
    pub fn connect_replica(&mut self) -> ReplicaPeer {
        let peer = ReplicaPeer::connect(
            self.container.owner(),
            self.forwarder.clone(),
            self.replication.register_observer(),
        );
        // Re-mirror the current collection so the new peer catches up.
        self.replication.mirror_collection(&self.container.snapshot());
        peer
    }

    fn env<'a>(
        templates: &'a Arc<dyn TemplateOracle>,
        world: &'a Arc<dyn World>,
        replication: &'a Arc<LoopbackReplication>,
        policy: &'a Arc<dyn SpawnPolicy>,
    ) -> InventoryEnv<'a> {
        InventoryEnv::authority(
            templates.as_ref(),
            world.as_ref(),
            replication.as_ref() as &dyn ReplicationSink,
            policy.as_ref(),
        )
    }

    /// Creates an item synchronously; the id is valid before this returns.
    pub fn create_item(&mut self, template: TemplateHandle, kind: InstanceKind) -> Result<ItemId> {
        let env = Self::env(&self.templates, &self.world, &self.replication, &self.policy);
        match self
            .container
            .create_item(NetRole::Authority, &env, template, kind)?
        {
            Created::Local(id) => Ok(id),
            Created::Forwarded => unreachable!("authority creation is always local"),
        }
    }

    pub fn spawn_representation(&mut self, item: ItemId) -> Result<RepresentationId> {
        let env = Self::env(&self.templates, &self.world, &self.replication, &self.policy);
        match self
            .container
            .spawn_representation(NetRole::Authority, &env, item)?
        {
            SpawnOutcome::Spawned(representation) => Ok(representation),
            SpawnOutcome::Forwarded => unreachable!("authority spawn is always local"),
        }
    }

    pub fn despawn_representation(&mut self, item: ItemId) -> Result<()> {
        let env = Self::env(&self.templates, &self.world, &self.replication, &self.policy);
        self.container
            .despawn_representation(NetRole::Authority, &env, item)?;
        Ok(())
    }

    pub fn remove_item(&mut self, item: ItemId) -> Result<ItemInstance> {
        let env = Self::env(&self.templates, &self.world, &self.replication, &self.policy);
        Ok(self.container.remove_item(NetRole::Authority, &env, item)?)
    }

    /// Forwarding point for the world's destruction callback.
    pub fn notify_external_destruction(&mut self, representation: RepresentationId) -> Option<ItemId> {
        let env = Self::env(&self.templates, &self.world, &self.replication, &self.policy);
        self.container
            .notify_external_destruction(NetRole::Authority, &env, representation)
    }

    /// Drains forwarded requests in arrival order and applies them.
    ///
    /// A rejected request is logged and dropped: the channel has no reply
    /// path, so the requester observes the outcome only through
    /// replication (or its absence).
    pub fn pump_requests(&mut self) -> usize {
        let requests = self.requests.drain();
        let drained = requests.len();
        for request in requests {
            debug!(request = %request, "applying forwarded request");
            if let Err(error) = self.apply_request(request) {
                warn!(%error, "forwarded request rejected; dropped without reply");
            }
        }
        drained
    }

    fn apply_request(&mut self, request: InventoryRequest) -> Result<()> {
        let env = Self::env(&self.templates, &self.world, &self.replication, &self.policy);
        match request {
            InventoryRequest::Create { template, kind } => {
                self.container
                    .create_item(NetRole::Authority, &env, template, kind)
                    .map(|_| ())
                    .map_err(RuntimeError::from)
            }
            InventoryRequest::Spawn { item } => self
                .container
                .spawn_representation(NetRole::Authority, &env, item)
                .map(|_| ())
                .map_err(RuntimeError::from),
            InventoryRequest::Despawn { item } => self
                .container
                .despawn_representation(NetRole::Authority, &env, item)
                .map(|_| ())
                .map_err(RuntimeError::from),
        }
    }

    /// Drains the host's own mirror inbox and publishes change events.
    ///
    /// This is the authority-side counterpart of the replica's
    /// `pump_mirror`: the canonical container is not touched (it is already
    /// current), only the hook cursor advances and events fire.
    pub fn pump_mirror(&mut self) -> usize {
        let updates = self.hook_mirror.drain();
        let drained = updates.len();
        for update in updates {
            match update {
                MirrorUpdate::Collection(InventorySnapshot { items, owner }) => {
                    let delta = CollectionDelta::between(&self.hook_items, &items);
                    publish_delta(&self.bus, owner, &delta, items.len());
                    self.hook_items = items;
                }
                MirrorUpdate::Representation { item, handle } => {
                    publish_representation(&self.bus, item, handle);
                }
            }
        }
        drained
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

    /// Whether forwarded requests are waiting to be pumped.
    pub fn has_pending_requests(&self) -> bool {
        !self.requests.is_empty()
    }
}
