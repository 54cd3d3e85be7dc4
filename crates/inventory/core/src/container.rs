//! The inventory container: authority-gated item lifecycle and mirroring.
//!
//! One [`InventoryContainer`] exists per owning actor on every side. On the
//! authority it is the canonical writer: creation appends, spawn/despawn
//! drive the per-item state machine, and every collection mutation pushes a
//! fresh whole-collection mirror through the replication sink. On a remote
//! side the same type holds the read-only mirror: mutating calls have no
//! local effect and are forwarded over the request channel instead, and
//! mirrors arriving from the authority are ingested via
//! [`InventoryContainer::apply_mirror`].

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::authority::NetRole;
use crate::config::InventoryConfig;
use crate::env::{EnvError, InventoryEnv, InventoryRequest};
use crate::item::{ContractViolation, DespawnError, ItemInitializer, ItemInstance, SpawnError};
use crate::snapshot::{CollectionDelta, InventorySnapshot};
use crate::types::{InstanceKind, ItemId, OwnerId, RepresentationId, TemplateHandle};

/// Outcome of a creation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Created {
    /// Authority fast path: the item exists now and is observable in
    /// [`InventoryContainer::items`] before the call returns.
    Local(ItemId),

    /// Remote path: the request was forwarded; the item becomes observable
    /// only through a later collection mirror.
    Forwarded,
}

/// Outcome of a spawn request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(RepresentationId),
    Forwarded,
}

/// Outcome of a despawn request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DespawnOutcome {
    Despawned,
    Forwarded,
}

/// Errors surfaced by item creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    #[error("inventory full ({max} items)")]
    ContainerFull { max: usize },

    #[error(transparent)]
    Contract(#[from] ContractViolation),

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Errors surfaced by item removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RemoveError {
    /// Removal is an authority-local operation; there is no forwarding
    /// payload for it.
    #[error("item removal requires authority")]
    NotAuthoritative,

    #[error("item {0} not found in container")]
    UnknownItem(ItemId),

    /// The item's live representation could not be released; the item
    /// stays in the container so the handle keeps an owner.
    #[error("representation release failed: {0}")]
    ReleaseFailed(#[from] DespawnError),
}

/// Errors surfaced when ingesting mirrored state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MirrorError {
    /// The authority's state is canonical; it never ingests a mirror.
    #[error("mirror application rejected: this side is the authority")]
    AuthorityIsCanonical,

    #[error("mirror owner {got} does not match container owner {expected}")]
    OwnerMismatch { expected: OwnerId, got: OwnerId },
}

/// Ordered collection of items belonging to one owner.
pub struct InventoryContainer {
    owner: OwnerId,
    config: InventoryConfig,
    /// Insertion-ordered canonical collection (authority) or mirror (remote).
    items: Vec<ItemInstance>,
    /// Items currently known to have a live representation. Derived state:
    /// reconstructible from each item's handle, never replicated itself.
    spawned: HashSet<ItemId>,
    next_item_id: u32,
}

impl InventoryContainer {
    pub fn new(owner: OwnerId) -> Self {
        Self::with_config(owner, InventoryConfig::default())
    }

    pub fn with_config(owner: OwnerId, config: InventoryConfig) -> Self {
        Self {
            owner,
            config,
            items: Vec::new(),
            spawned: HashSet::new(),
            next_item_id: 0,
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Read-only ordered view of the collection.
    ///
    /// Identical API on every side: current on the authority, possibly one
    /// replication interval behind on a remote side.
    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemInstance> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut ItemInstance> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Whether `id` is currently known to have a live representation.
    pub fn is_spawned(&self, id: ItemId) -> bool {
        self.spawned.contains(&id)
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot::new(self.owner, self.items.clone())
    }

    fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id = self.next_item_id.checked_add(1).expect("ItemId overflow");
        id
    }

    /// Creates an item from `template` as instance class `kind`.
    ///
    /// Authority: constructs the instance, appends it, mirrors the
    /// collection, and returns the new id synchronously. Remote: no local
    /// effect; the request is forwarded and the caller observes the item
    /// only through a later mirror.
    ///
    /// Template/kind compatibility is not verified here — honoring that
    /// pairing is the caller's contract.
    pub fn create_item(
        &mut self,
        role: NetRole,
        env: &InventoryEnv<'_>,
        template: TemplateHandle,
        kind: InstanceKind,
    ) -> Result<Created, CreateError> {
        debug!(role = %role, owner = %self.owner, template = %template, "create_item");

        if !role.is_authoritative() {
            debug!(template = %template, "forwarding create request to authority");
            env.forwarder()?
                .forward(InventoryRequest::Create { template, kind });
            return Ok(Created::Forwarded);
        }

        if self.items.len() >= self.config.max_items {
            warn!(owner = %self.owner, max = self.config.max_items, "create rejected: container full");
            return Err(CreateError::ContainerFull {
                max: self.config.max_items,
            });
        }

        let initializer = ItemInitializer::new(self.owner, template, kind);
        let id = self.allocate_item_id();
        let item = ItemInstance::create(id, &initializer, role)?;
        self.items.push(item);
        env.mirror_collection(&self.snapshot());
        Ok(Created::Local(id))
    }

    /// Spawns the world-representation of `item`.
    ///
    /// Authority-gated: a remote call is forwarded exactly like creation.
    /// A duplicate request (item already spawned) is an expected rejection:
    /// logged at warning level, no effect, never fatal.
    pub fn spawn_representation(
        &mut self,
        role: NetRole,
        env: &InventoryEnv<'_>,
        item: ItemId,
    ) -> Result<SpawnOutcome, SpawnError> {
        if !role.is_authoritative() {
            debug!(item = %item, "forwarding spawn request to authority");
            env.forwarder()?.forward(InventoryRequest::Spawn { item });
            return Ok(SpawnOutcome::Forwarded);
        }

        if self.spawned.contains(&item) {
            warn!(item = %item, "duplicate spawn request ignored");
            return Err(SpawnError::AlreadySpawned(item));
        }
        let Some(instance) = self.item_mut(item) else {
            warn!(item = %item, "spawn requested for unknown item");
            return Err(SpawnError::UnknownItem(item));
        };

        let representation = instance.spawn(role, env)?;
        self.spawned.insert(item);
        env.mirror_representation(item, Some(representation));
        Ok(SpawnOutcome::Spawned(representation))
    }

    /// Tears down the world-representation of `item`.
    ///
    /// Authority-gated and forwarded like spawn. Despawning an item with no
    /// live representation is an expected rejection.
    pub fn despawn_representation(
        &mut self,
        role: NetRole,
        env: &InventoryEnv<'_>,
        item: ItemId,
    ) -> Result<DespawnOutcome, DespawnError> {
        if !role.is_authoritative() {
            debug!(item = %item, "forwarding despawn request to authority");
            env.forwarder()?.forward(InventoryRequest::Despawn { item });
            return Ok(DespawnOutcome::Forwarded);
        }

        if !self.spawned.contains(&item) {
            warn!(item = %item, "despawn requested but item has no live representation");
            return Err(DespawnError::NotSpawned(item));
        }
        let Some(instance) = self.item_mut(item) else {
            warn!(item = %item, "despawn requested for unknown item");
            return Err(DespawnError::UnknownItem(item));
        };

        instance.despawn(role, env)?;
        self.spawned.remove(&item);
        env.mirror_representation(item, None);
        Ok(DespawnOutcome::Despawned)
    }

    /// Removes `item` from the container, releasing any live
    /// representation first, and mirrors the shrunken collection.
    ///
    /// A failed release aborts the removal: the item stays in the
    /// container as the handle's owner rather than orphaning a live
    /// representation.
    pub fn remove_item(
        &mut self,
        role: NetRole,
        env: &InventoryEnv<'_>,
        item: ItemId,
    ) -> Result<ItemInstance, RemoveError> {
        if !role.is_authoritative() {
            warn!(item = %item, "remove_item called on remote side; request dropped");
            return Err(RemoveError::NotAuthoritative);
        }

        if self.spawned.contains(&item)
            && let Err(error) = self.despawn_representation(role, env, item)
        {
            warn!(item = %item, %error, "removal aborted: representation release failed");
            return Err(RemoveError::ReleaseFailed(error));
        }

        let Some(index) = self.items.iter().position(|entry| entry.id() == item) else {
            warn!(item = %item, "remove requested for unknown item");
            return Err(RemoveError::UnknownItem(item));
        };
        let removed = self.items.remove(index);
        env.mirror_collection(&self.snapshot());
        debug!(item = %item, "item removed from container");
        Ok(removed)
    }

    /// Entry point for the world's external-destruction callback.
    ///
    /// Routes the destroyed handle to the owning item, clears it, updates
    /// the spawned set, and mirrors the cleared handle. Returns the owning
    /// item's id when one was found.
    pub fn notify_external_destruction(
        &mut self,
        role: NetRole,
        env: &InventoryEnv<'_>,
        representation: RepresentationId,
    ) -> Option<ItemId> {
        if !role.is_authoritative() {
            warn!(representation = %representation, "external destruction notified on remote side; ignored");
            return None;
        }

        let owning = self
            .items
            .iter_mut()
            .find(|item| item.representation() == Some(representation))?;
        let id = owning.id();
        owning.handle_representation_destroyed(representation);
        self.spawned.remove(&id);
        env.mirror_representation(id, None);
        Some(id)
    }

    /// Remote-side ingestion of a whole-collection mirror.
    ///
    /// Replaces the local mirror, rebuilds the spawned set from handle
    /// presence, and returns the diff against the previous mirror so the
    /// caller can fire its collection-changed hook.
    pub fn apply_mirror(
        &mut self,
        role: NetRole,
        snapshot: InventorySnapshot,
    ) -> Result<CollectionDelta, MirrorError> {
        if role.is_authoritative() {
            return Err(MirrorError::AuthorityIsCanonical);
        }
        if snapshot.owner != self.owner {
            return Err(MirrorError::OwnerMismatch {
                expected: self.owner,
                got: snapshot.owner,
            });
        }

        let delta = CollectionDelta::between(&self.items, &snapshot.items);
        self.items = snapshot.items;
        self.spawned = self
            .items
            .iter()
            .filter(|item| item.is_spawned())
            .map(|item| item.id())
            .collect();
        debug!(
            owner = %self.owner,
            added = delta.added.len(),
            removed = delta.removed.len(),
            "collection mirror applied"
        );
        Ok(delta)
    }

    /// Remote-side ingestion of a mirrored representation-handle change.
    ///
    /// Returns whether the local mirror changed. A handle arriving for an
    /// item the collection mirror has not delivered yet is tolerated —
    /// replication is unordered across the two update kinds — and reported
    /// as no change.
    pub fn apply_representation_mirror(
        &mut self,
        role: NetRole,
        item: ItemId,
        handle: Option<RepresentationId>,
    ) -> Result<bool, MirrorError> {
        if role.is_authoritative() {
            return Err(MirrorError::AuthorityIsCanonical);
        }

        let Some(instance) = self.item_mut(item) else {
            warn!(item = %item, "representation mirror for item not yet in collection mirror; dropped");
            return Ok(false);
        };
        let changed = instance.set_representation(handle);
        if changed {
            match handle {
                Some(_) => self.spawned.insert(item),
                None => self.spawned.remove(&item),
            };
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        RecordingForwarder, RecordingSink, StaticTemplates, StubWorld, sword_template,
        valuable_template,
    };

    const OWNER: OwnerId = OwnerId(7);
    const SWORD: TemplateHandle = TemplateHandle(1);
    const COIN: TemplateHandle = TemplateHandle(2);
    const KIND: InstanceKind = InstanceKind(1);

    struct Fixture {
        templates: StaticTemplates,
        world: StubWorld,
        forwarder: RecordingForwarder,
        sink: RecordingSink,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                templates: StaticTemplates::new(vec![
                    sword_template(SWORD),
                    valuable_template(COIN),
                ]),
                world: StubWorld::new(),
                forwarder: RecordingForwarder::default(),
                sink: RecordingSink::default(),
            }
        }

        fn env(&self) -> InventoryEnv<'_> {
            InventoryEnv::new(
                Some(&self.templates),
                Some(&self.world),
                Some(&self.forwarder),
                Some(&self.sink),
                None,
            )
        }
    }

    #[test]
    fn create_on_authority_is_synchronous() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);

        let created = container
            .create_item(NetRole::Authority, &fx.env(), SWORD, KIND)
            .unwrap();
        let Created::Local(id) = created else {
            panic!("authority create must be local");
        };

        assert_eq!(container.items().len(), 1);
        let item = container.item(id).unwrap();
        assert!(item.is_initialized());
        assert_eq!(item.owner(), OWNER);
        assert_eq!(item.template(), SWORD);
        // The mirror was pushed before the call returned.
        assert_eq!(fx.sink.collection_mirrors(), 1);
    }

    #[test]
    fn create_on_remote_forwards_without_local_effect() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);

        let created = container
            .create_item(NetRole::Remote, &fx.env(), SWORD, KIND)
            .unwrap();
        assert_eq!(created, Created::Forwarded);
        assert!(container.items().is_empty());
        assert_eq!(
            fx.forwarder.take(),
            vec![InventoryRequest::Create {
                template: SWORD,
                kind: KIND
            }]
        );
        assert_eq!(fx.sink.collection_mirrors(), 0);
    }

    #[test]
    fn create_rejects_when_full() {
        let fx = Fixture::new();
        let mut container =
            InventoryContainer::with_config(OWNER, InventoryConfig::with_max_items(1));

        container
            .create_item(NetRole::Authority, &fx.env(), COIN, KIND)
            .unwrap();
        assert_eq!(
            container.create_item(NetRole::Authority, &fx.env(), COIN, KIND),
            Err(CreateError::ContainerFull { max: 1 })
        );
        assert_eq!(container.items().len(), 1);
    }

    #[test]
    fn item_ids_are_never_reused() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);

        let Created::Local(first) = container
            .create_item(NetRole::Authority, &fx.env(), COIN, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };
        container
            .remove_item(NetRole::Authority, &fx.env(), first)
            .unwrap();
        let Created::Local(second) = container
            .create_item(NetRole::Authority, &fx.env(), COIN, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };
        assert_ne!(first, second);
    }

    #[test]
    fn spawn_is_idempotent_per_live_representation() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);
        let Created::Local(id) = container
            .create_item(NetRole::Authority, &fx.env(), SWORD, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };

        let first = container
            .spawn_representation(NetRole::Authority, &fx.env(), id)
            .unwrap();
        assert!(matches!(first, SpawnOutcome::Spawned(_)));
        assert_eq!(fx.world.live_count(), 1);

        // Second call: one warning, no second representation.
        assert_eq!(
            container.spawn_representation(NetRole::Authority, &fx.env(), id),
            Err(SpawnError::AlreadySpawned(id))
        );
        assert_eq!(fx.world.live_count(), 1);
        assert_eq!(fx.sink.representation_mirrors(), 1);
    }

    #[test]
    fn despawn_without_live_representation_is_a_no_op() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);
        let Created::Local(id) = container
            .create_item(NetRole::Authority, &fx.env(), SWORD, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };

        assert_eq!(
            container.despawn_representation(NetRole::Authority, &fx.env(), id),
            Err(DespawnError::NotSpawned(id))
        );
        assert!(!container.is_spawned(id));
    }

    #[test]
    fn spawn_then_despawn_round_trips_container_state() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);
        let Created::Local(id) = container
            .create_item(NetRole::Authority, &fx.env(), SWORD, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };

        container
            .spawn_representation(NetRole::Authority, &fx.env(), id)
            .unwrap();
        assert!(container.is_spawned(id));

        let outcome = container
            .despawn_representation(NetRole::Authority, &fx.env(), id)
            .unwrap();
        assert_eq!(outcome, DespawnOutcome::Despawned);
        assert!(!container.is_spawned(id));
        assert!(container.item(id).unwrap().representation().is_none());
        assert_eq!(fx.world.live_count(), 0);
    }

    #[test]
    fn remote_spawn_forwards_and_leaves_spawned_set_untouched() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);

        let outcome = container
            .spawn_representation(NetRole::Remote, &fx.env(), ItemId(0))
            .unwrap();
        assert_eq!(outcome, SpawnOutcome::Forwarded);
        assert_eq!(
            fx.forwarder.take(),
            vec![InventoryRequest::Spawn { item: ItemId(0) }]
        );
        assert_eq!(fx.world.live_count(), 0);
    }

    #[test]
    fn failed_spawn_does_not_mark_the_item_spawned() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);
        let Created::Local(id) = container
            .create_item(NetRole::Authority, &fx.env(), COIN, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };

        // COIN has no representation kind.
        assert_eq!(
            container.spawn_representation(NetRole::Authority, &fx.env(), id),
            Err(SpawnError::NoRepresentationKind(COIN))
        );
        assert!(!container.is_spawned(id));
        assert_eq!(fx.sink.representation_mirrors(), 0);
    }

    #[test]
    fn external_destruction_clears_spawned_membership() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);
        let Created::Local(id) = container
            .create_item(NetRole::Authority, &fx.env(), SWORD, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };
        let SpawnOutcome::Spawned(representation) = container
            .spawn_representation(NetRole::Authority, &fx.env(), id)
            .unwrap()
        else {
            panic!("expected spawned outcome");
        };

        assert!(fx.world.destroy_external(representation));
        assert_eq!(
            container.notify_external_destruction(NetRole::Authority, &fx.env(), representation),
            Some(id)
        );
        assert!(!container.is_spawned(id));
        assert!(container.item(id).unwrap().representation().is_none());

        // A later despawn is a no-op.
        assert_eq!(
            container.despawn_representation(NetRole::Authority, &fx.env(), id),
            Err(DespawnError::NotSpawned(id))
        );
    }

    #[test]
    fn remove_releases_the_representation_first() {
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);
        let Created::Local(id) = container
            .create_item(NetRole::Authority, &fx.env(), SWORD, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };
        container
            .spawn_representation(NetRole::Authority, &fx.env(), id)
            .unwrap();

        let removed = container
            .remove_item(NetRole::Authority, &fx.env(), id)
            .unwrap();
        assert_eq!(removed.id(), id);
        assert!(container.items().is_empty());
        assert_eq!(fx.world.live_count(), 0);
        assert!(!container.is_spawned(id));
    }

    #[test]
    fn refused_release_aborts_removal_without_orphaning_the_representation() {
        struct NoDespawn;
        impl crate::env::SpawnPolicy for NoDespawn {
            fn can_despawn(&self, _item: &ItemInstance) -> bool {
                false
            }
        }

        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);
        let Created::Local(id) = container
            .create_item(NetRole::Authority, &fx.env(), SWORD, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };
        container
            .spawn_representation(NetRole::Authority, &fx.env(), id)
            .unwrap();

        let policy = NoDespawn;
        let gated = InventoryEnv::new(
            Some(&fx.templates),
            Some(&fx.world),
            Some(&fx.forwarder),
            Some(&fx.sink),
            Some(&policy),
        );
        assert_eq!(
            container.remove_item(NetRole::Authority, &gated, id),
            Err(RemoveError::ReleaseFailed(DespawnError::NotEligible(id)))
        );
        // The item still owns the live handle.
        assert_eq!(container.items().len(), 1);
        assert!(container.is_spawned(id));
        assert_eq!(fx.world.live_count(), 1);

        // Removal goes through once the release is allowed.
        let removed = container
            .remove_item(NetRole::Authority, &fx.env(), id)
            .unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(fx.world.live_count(), 0);
    }

    #[test]
    fn mirror_application_is_rejected_on_the_authority() {
        let mut authority = InventoryContainer::new(OWNER);
        let snapshot = authority.snapshot();
        assert_eq!(
            authority.apply_mirror(NetRole::Authority, snapshot),
            Err(MirrorError::AuthorityIsCanonical)
        );
    }

    #[test]
    fn mirror_application_replaces_items_and_rebuilds_spawned_set() {
        let fx = Fixture::new();
        let mut authority = InventoryContainer::new(OWNER);
        let Created::Local(id) = authority
            .create_item(NetRole::Authority, &fx.env(), SWORD, KIND)
            .unwrap()
        else {
            panic!("expected local create");
        };
        authority
            .spawn_representation(NetRole::Authority, &fx.env(), id)
            .unwrap();

        let mut replica = InventoryContainer::new(OWNER);
        let delta = replica
            .apply_mirror(NetRole::Remote, authority.snapshot())
            .unwrap();
        assert_eq!(delta.added, vec![id]);
        assert_eq!(replica.items().len(), 1);
        assert!(replica.is_spawned(id));
    }

    #[test]
    fn mirror_with_wrong_owner_is_rejected() {
        let mut replica = InventoryContainer::new(OWNER);
        let foreign = InventorySnapshot::new(OwnerId(8), Vec::new());
        assert_eq!(
            replica.apply_mirror(NetRole::Remote, foreign),
            Err(MirrorError::OwnerMismatch {
                expected: OWNER,
                got: OwnerId(8)
            })
        );
    }

    #[test]
    fn representation_mirror_for_unknown_item_is_dropped() {
        let mut replica = InventoryContainer::new(OWNER);
        let changed = replica
            .apply_representation_mirror(NetRole::Remote, ItemId(3), Some(RepresentationId(1)))
            .unwrap();
        assert!(!changed);
    }

    #[test]
    fn mismatched_template_and_kind_is_accepted() {
        // Compatibility between template and instance kind is deliberately
        // unvalidated; this documents the current behavior.
        let fx = Fixture::new();
        let mut container = InventoryContainer::new(OWNER);
        let created = container
            .create_item(NetRole::Authority, &fx.env(), COIN, InstanceKind(999))
            .unwrap();
        assert!(matches!(created, Created::Local(_)));
    }
}
