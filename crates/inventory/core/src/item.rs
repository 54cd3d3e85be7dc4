//! Runtime item instances and the world-representation state machine.
//!
//! An [`ItemInstance`] is the per-ownership-slot runtime form of one item.
//! It binds a template and an owner exactly once at creation and then runs
//! a two-state machine (`NoRepresentation` ⇄ `Spawned`) for its
//! world-visible representation. Creation and both transitions are
//! authority-gated; a remote call is a normal, expected rejection, never a
//! failure of the system.

use tracing::{debug, error, warn};

use crate::authority::NetRole;
use crate::env::{EnvError, InventoryEnv};
use crate::types::{InstanceKind, ItemId, OwnerId, RepresentationId, TemplateHandle};

/// All data needed to create and initialize an [`ItemInstance`].
///
/// Fields are optional so a caller can assemble the initializer piecewise;
/// [`ItemInitializer::validate`] is the single place incompleteness is
/// caught. The template/kind pair is stored as given — compatibility
/// between the two is the caller's contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemInitializer {
    /// Actor that will own the new instance.
    pub owner: Option<OwnerId>,

    /// Template the instance is created from.
    pub template: Option<TemplateHandle>,

    /// Instance class requested by the caller.
    pub kind: Option<InstanceKind>,
}

impl ItemInitializer {
    pub fn new(owner: OwnerId, template: TemplateHandle, kind: InstanceKind) -> Self {
        Self {
            owner: Some(owner),
            template: Some(template),
            kind: Some(kind),
        }
    }

    /// Checks that every required reference is present.
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.owner.is_none() || self.template.is_none() || self.kind.is_none() {
            return Err(ContractViolation::IncompleteInitializer {
                has_owner: self.owner.is_some(),
                has_template: self.template.is_some(),
                has_kind: self.kind.is_some(),
            });
        }
        Ok(())
    }
}

/// A programming error: the creation contract was broken.
///
/// Correct external callers never trigger these — creation is routed
/// through the container, which forwards remote requests instead of
/// invoking the factory. Debug builds additionally assert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("item creation requires authority (called as {role})")]
    CreateWithoutAuthority { role: NetRole },

    #[error(
        "item initializer incomplete: owner set: {has_owner}, template set: {has_template}, kind set: {has_kind}"
    )]
    IncompleteInitializer {
        has_owner: bool,
        has_template: bool,
        has_kind: bool,
    },
}

/// Errors surfaced by the spawn transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    /// Expected rejection: a remote side reached the gate directly instead
    /// of forwarding.
    #[error("spawn requires authority")]
    NotAuthoritative,

    /// Expected rejection: duplicate spawn request.
    #[error("item {0} already has a live representation")]
    AlreadySpawned(ItemId),

    #[error("item {0} not found in container")]
    UnknownItem(ItemId),

    #[error("spawn rejected by eligibility policy for item {0}")]
    NotEligible(ItemId),

    #[error("unknown template {0}")]
    UnknownTemplate(TemplateHandle),

    /// The template is purely logical; the state machine stays put.
    #[error("template {0} reports no representation kind")]
    NoRepresentationKind(TemplateHandle),

    /// The world declined; prior state is retained.
    #[error("world declined to create a representation")]
    WorldRejected,

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Errors surfaced by the despawn transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DespawnError {
    #[error("despawn requires authority")]
    NotAuthoritative,

    /// Expected rejection: no live representation to destroy.
    #[error("item {0} has no live representation")]
    NotSpawned(ItemId),

    #[error("item {0} not found in container")]
    UnknownItem(ItemId),

    #[error("despawn rejected by eligibility policy for item {0}")]
    NotEligible(ItemId),

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Runtime representation of one item in one container.
///
/// Instances are created solely through the container's creation operation
/// and mirrored by value to observers; every initialized instance has its
/// template and owner bound.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    id: ItemId,
    template: TemplateHandle,
    owner: OwnerId,
    kind: InstanceKind,
    representation: Option<RepresentationId>,
    initialized: bool,
}

impl ItemInstance {
    /// Authority-only factory.
    ///
    /// Invoking this remotely or with an incomplete initializer is a
    /// contract violation, not a recoverable condition: debug builds
    /// assert, release builds return the violation.
    pub(crate) fn create(
        id: ItemId,
        initializer: &ItemInitializer,
        role: NetRole,
    ) -> Result<Self, ContractViolation> {
        debug_assert!(
            role.is_authoritative(),
            "ItemInstance::create called on a remote side; route through the container"
        );
        if !role.is_authoritative() {
            return Err(ContractViolation::CreateWithoutAuthority { role });
        }

        debug_assert!(
            initializer.validate().is_ok(),
            "ItemInstance::create called with incomplete initializer: {initializer:?}"
        );
        initializer.validate()?;

        // validate() guarantees presence of all three fields.
        let instance = Self {
            id,
            template: initializer.template.unwrap_or(TemplateHandle(0)),
            owner: initializer.owner.unwrap_or(OwnerId(0)),
            kind: initializer.kind.unwrap_or(InstanceKind(0)),
            representation: None,
            initialized: true,
        };
        debug!(item = %instance.id, template = %instance.template, owner = %instance.owner, "item instance created");
        Ok(instance)
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn template(&self) -> TemplateHandle {
        self.template
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn kind(&self) -> InstanceKind {
        self.kind
    }

    /// Live representation handle, present only in the `Spawned` state.
    pub fn representation(&self) -> Option<RepresentationId> {
        self.representation
    }

    pub fn is_spawned(&self) -> bool {
        self.representation.is_some()
    }

    /// True once creation has completed. An instance must never be
    /// externally observable while this is false.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// `NoRepresentation → Spawned`.
    ///
    /// Gated on authority and the spawn-eligibility policy. Looks up the
    /// template's representation kind, asks the world for a handle bound to
    /// the owner at the owner's placement (origin when unknown), and binds
    /// it. Any failure leaves the state machine where it was.
    pub(crate) fn spawn(
        &mut self,
        role: NetRole,
        env: &InventoryEnv<'_>,
    ) -> Result<RepresentationId, SpawnError> {
        if !role.is_authoritative() {
            warn!(item = %self.id, "spawn called on remote side; request dropped (must be on authority)");
            return Err(SpawnError::NotAuthoritative);
        }
        if self.representation.is_some() {
            warn!(item = %self.id, "spawn requested but a representation is already live");
            return Err(SpawnError::AlreadySpawned(self.id));
        }
        if !env.policy().can_spawn(self) {
            debug!(item = %self.id, "spawn rejected by eligibility policy");
            return Err(SpawnError::NotEligible(self.id));
        }

        let templates = env.templates()?;
        let Some(template) = templates.template(self.template) else {
            error!(item = %self.id, template = %self.template, "spawn failed: unknown template");
            return Err(SpawnError::UnknownTemplate(self.template));
        };
        let Some(kind) = template.representation else {
            error!(item = %self.id, template = %self.template, "spawn failed: template has no representation kind");
            return Err(SpawnError::NoRepresentationKind(self.template));
        };

        let world = env.world()?;
        let placement = world.owner_placement(self.owner).unwrap_or_default();
        let Some(representation) = world.create_representation(kind, self.owner, placement) else {
            error!(item = %self.id, representation_kind = %kind, "world declined to create a representation");
            return Err(SpawnError::WorldRejected);
        };

        self.representation = Some(representation);
        debug!(item = %self.id, representation = %representation, "world representation spawned");
        Ok(representation)
    }

    /// `Spawned → NoRepresentation`.
    ///
    /// Succeeds iff a live handle existed. The world not knowing the handle
    /// is tolerated: the handle is cleared regardless so the state machine
    /// cannot wedge on a stale reference.
    pub(crate) fn despawn(
        &mut self,
        role: NetRole,
        env: &InventoryEnv<'_>,
    ) -> Result<RepresentationId, DespawnError> {
        if !role.is_authoritative() {
            warn!(item = %self.id, "despawn called on remote side; request dropped (must be on authority)");
            return Err(DespawnError::NotAuthoritative);
        }
        if !env.policy().can_despawn(self) {
            debug!(item = %self.id, "despawn rejected by eligibility policy");
            return Err(DespawnError::NotEligible(self.id));
        }
        let Some(representation) = self.representation.take() else {
            warn!(item = %self.id, "despawn requested but no representation is live");
            return Err(DespawnError::NotSpawned(self.id));
        };

        if !env.world()?.destroy_representation(representation) {
            warn!(item = %self.id, representation = %representation, "world had no live representation; clearing stale handle");
        }
        debug!(item = %self.id, representation = %representation, "world representation despawned");
        Ok(representation)
    }

    /// Replica-side application of a mirrored handle change. Returns
    /// whether the stored handle actually changed.
    pub(crate) fn set_representation(&mut self, handle: Option<RepresentationId>) -> bool {
        if self.representation == handle {
            return false;
        }
        self.representation = handle;
        true
    }

    /// External-destruction callback.
    ///
    /// Invoked when the representation was torn down by a cause outside
    /// this subsystem. Clears the handle back to `NoRepresentation` and
    /// returns whether this item owned it. The sole transition that occurs
    /// without an explicit spawn/despawn call.
    pub(crate) fn handle_representation_destroyed(
        &mut self,
        representation: RepresentationId,
    ) -> bool {
        match self.representation {
            Some(live) if live == representation => {
                self.representation = None;
                debug!(item = %self.id, representation = %representation, "representation destroyed externally; state reset");
                true
            }
            _ => false,
        }
    }
}
