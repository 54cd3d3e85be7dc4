//! In-process implementations of the two logical channels.
//!
//! The core assumes a reliable ordered request channel toward the authority
//! and a best-effort replicated-state channel back out. The loopback
//! implementations here keep every peer in one process, which is what local
//! play and the test suite need; a networked transport would implement the
//! same two core traits.
mod loopback;

pub use loopback::{
    LoopbackChannel, LoopbackForwarder, LoopbackReplication, MirrorInbox, MirrorUpdate,
    RequestInbox,
};
