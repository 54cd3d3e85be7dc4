//! Ports onto the core's external collaborators.
//!
//! Templates, the world, the request channel, the replication channel, and
//! the spawn policy are all consumed through traits. The [`InventoryEnv`]
//! aggregate bundles them so container and item operations can access
//! everything they need without hard coupling to concrete implementations.
mod channel;
mod policy;
mod templates;
mod world;

pub use channel::{InventoryRequest, ReplicationSink, RequestForwarder};
pub use policy::{AlwaysEligible, SpawnPolicy};
pub use templates::{ItemTemplate, SwordData, TemplateKind, TemplateOracle};
pub use world::World;

use crate::snapshot::InventorySnapshot;
use crate::types::{ItemId, RepresentationId};

/// A collaborator required by an operation was not provided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("template oracle not available in environment")]
    TemplatesNotAvailable,

    #[error("world not available in environment")]
    WorldNotAvailable,

    #[error("request forwarder not available in environment")]
    ForwarderNotAvailable,
}

/// Aggregates the collaborator ports required by container and item
/// operations.
///
/// Each port is optional so a side only wires what it uses: an authority
/// needs templates, world, and replication; a remote side needs only the
/// forwarder. Accessors surface a typed error when an operation reaches
/// for a port its side did not provide.
#[derive(Clone, Copy)]
pub struct InventoryEnv<'a> {
    templates: Option<&'a dyn TemplateOracle>,
    world: Option<&'a dyn World>,
    forwarder: Option<&'a dyn RequestForwarder>,
    replication: Option<&'a dyn ReplicationSink>,
    policy: Option<&'a dyn SpawnPolicy>,
}

impl<'a> InventoryEnv<'a> {
    pub fn new(
        templates: Option<&'a dyn TemplateOracle>,
        world: Option<&'a dyn World>,
        forwarder: Option<&'a dyn RequestForwarder>,
        replication: Option<&'a dyn ReplicationSink>,
        policy: Option<&'a dyn SpawnPolicy>,
    ) -> Self {
        Self {
            templates,
            world,
            forwarder,
            replication,
            policy,
        }
    }

    /// Environment for an authoritative side with every port wired.
    pub fn authority(
        templates: &'a dyn TemplateOracle,
        world: &'a dyn World,
        replication: &'a dyn ReplicationSink,
        policy: &'a dyn SpawnPolicy,
    ) -> Self {
        Self::new(
            Some(templates),
            Some(world),
            None,
            Some(replication),
            Some(policy),
        )
    }

    /// Environment for a remote side: only the forwarder.
    pub fn remote(forwarder: &'a dyn RequestForwarder) -> Self {
        Self::new(None, None, Some(forwarder), None, None)
    }

    /// Returns the template oracle, or an error if not available.
    pub fn templates(&self) -> Result<&'a dyn TemplateOracle, EnvError> {
        self.templates.ok_or(EnvError::TemplatesNotAvailable)
    }

    /// Returns the world, or an error if not available.
    pub fn world(&self) -> Result<&'a dyn World, EnvError> {
        self.world.ok_or(EnvError::WorldNotAvailable)
    }

    /// Returns the request forwarder, or an error if not available.
    pub fn forwarder(&self) -> Result<&'a dyn RequestForwarder, EnvError> {
        self.forwarder.ok_or(EnvError::ForwarderNotAvailable)
    }

    /// Returns the spawn policy; defaults to [`AlwaysEligible`].
    pub fn policy(&self) -> &'a dyn SpawnPolicy {
        self.policy.unwrap_or(&AlwaysEligible)
    }

    /// Mirrors a collection snapshot if a replication sink is wired.
    ///
    /// Replication is a side effect, not a precondition: a container used
    /// standalone (single-process, no observers) mutates normally and the
    /// mirror is simply skipped.
    pub(crate) fn mirror_collection(&self, snapshot: &InventorySnapshot) {
        match self.replication {
            Some(sink) => sink.mirror_collection(snapshot),
            None => tracing::trace!("no replication sink configured; skipping collection mirror"),
        }
    }

    /// Mirrors a representation-handle change if a replication sink is wired.
    pub(crate) fn mirror_representation(&self, item: ItemId, handle: Option<RepresentationId>) {
        match self.replication {
            Some(sink) => sink.mirror_representation(item, handle),
            None => {
                tracing::trace!(item = %item, "no replication sink configured; skipping field mirror")
            }
        }
    }
}
