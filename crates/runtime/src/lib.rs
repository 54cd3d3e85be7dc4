//! Runtime orchestration for authority-gated inventories.
//!
//! This crate wires the pure `inventory-core` logic to in-process channel
//! implementations, sessions that pump them, and a topic-based event bus.
//! Consumers embed an [`AuthorityHost`] for the canonical side, connect any
//! number of [`ReplicaPeer`]s to it, and subscribe to change events on
//! either side.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the authority and replica session types
//! - [`channel`] provides the loopback request and replication channels
//! - [`events`] provides the topic-based event bus for change notifications
//! - [`oracle`] and [`world`] provide collaborator adapters for tests and
//!   local play
pub mod channel;
pub mod error;
pub mod events;
pub mod oracle;
pub mod session;
pub mod world;

pub use channel::{
    LoopbackChannel, LoopbackForwarder, LoopbackReplication, MirrorInbox, MirrorUpdate,
    RequestInbox,
};
pub use error::{Result, RuntimeError};
pub use events::{CollectionEvent, Event, EventBus, RepresentationEvent, Topic};
pub use oracle::TemplateOracleImpl;
pub use session::{AuthorityHost, ReplicaPeer};
pub use world::StubWorld;
