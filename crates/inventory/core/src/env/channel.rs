use core::fmt;

use crate::snapshot::InventorySnapshot;
use crate::types::{InstanceKind, ItemId, RepresentationId, TemplateHandle};

/// Wire payload for a request forwarded from a remote side to the authority.
///
/// Forwarding is one-way: there is no acknowledgement or failure signal back
/// to the origin. Completion is observed only through replication.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryRequest {
    /// Create an item from `template` as instance class `kind`.
    Create {
        template: TemplateHandle,
        kind: InstanceKind,
    },

    /// Spawn the world-representation of an existing item.
    Spawn { item: ItemId },

    /// Tear down the world-representation of an existing item.
    Despawn { item: ItemId },
}

impl InventoryRequest {
    pub fn kind_str(&self) -> &'static str {
        match self {
            InventoryRequest::Create { .. } => "create",
            InventoryRequest::Spawn { .. } => "spawn",
            InventoryRequest::Despawn { .. } => "despawn",
        }
    }
}

impl fmt::Display for InventoryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind_str())
    }
}

/// Reliable, ordered, one-way request channel toward the authority.
///
/// Requests forwarded from a single peer are delivered in the order sent,
/// at most once each. A request that never reaches the authority simply
/// never manifests as a state change.
pub trait RequestForwarder: Send + Sync {
    fn forward(&self, request: InventoryRequest);
}

/// Best-effort state mirror from the authority to every observer.
///
/// Invoked by the container on every authoritative mutation. Delivery is
/// not ordered relative to request forwarding; observers must not treat a
/// mirror as a synchronous confirmation of anything they sent.
pub trait ReplicationSink: Send + Sync {
    /// Whole-collection mirror, pushed whenever `items` changes.
    fn mirror_collection(&self, snapshot: &InventorySnapshot);

    /// Per-item representation-handle mirror, pushed whenever a handle
    /// changes without the collection itself changing.
    fn mirror_representation(&self, item: ItemId, handle: Option<RepresentationId>);
}
