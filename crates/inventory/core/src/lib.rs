//! Authority-gated item lifecycle and replication core.
//!
//! `inventory-core` defines the canonical ownership and synchronization
//! contract for multiplayer inventory items: exactly one side is
//! authoritative for a container, remote sides forward mutation requests
//! over a reliable ordered channel, and the authority mirrors its whole
//! collection back to every observer. All external collaborators — item
//! templates, the world that instantiates representations, both channels,
//! and the spawn policy — enter through the trait ports in [`env`].
//!
//! The crate is pure and synchronous: no I/O, no async, no internal
//! locking. There is exactly one authoritative writer per container.
pub mod authority;
pub mod config;
pub mod container;
pub mod env;
pub mod item;
pub mod snapshot;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use authority::NetRole;
pub use config::InventoryConfig;
pub use container::{
    CreateError, Created, DespawnOutcome, InventoryContainer, MirrorError, RemoveError,
    SpawnOutcome,
};
pub use env::{
    AlwaysEligible, EnvError, InventoryEnv, InventoryRequest, ItemTemplate, ReplicationSink,
    RequestForwarder, SpawnPolicy, SwordData, TemplateKind, TemplateOracle, World,
};
pub use item::{
    ContractViolation, DespawnError, ItemInitializer, ItemInstance, SpawnError,
};
pub use snapshot::{CollectionDelta, InventorySnapshot};
pub use types::{
    InstanceKind, ItemId, OwnerId, Placement, RepresentationId, RepresentationKind, TemplateHandle,
};
