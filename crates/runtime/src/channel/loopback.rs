//! Loopback channels for in-memory authority/observer communication.
//!
//! Keeps every side in the same process without touching a network stack.
//! Forwarded requests are bincode-encoded at the seam so the payload types
//! stay wire-clean; mirror updates fan out by value to every registered
//! observer inbox.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{error, warn};

use inventory_core::{
    InventoryRequest, InventorySnapshot, ItemId, ReplicationSink, RepresentationId,
    RequestForwarder,
};

type FrameQueue = Arc<Mutex<VecDeque<Vec<u8>>>>;

/// Factory for the request-forwarding side of the loopback wiring.
pub struct LoopbackChannel;

impl LoopbackChannel {
    /// Creates a connected forwarder/inbox pair.
    ///
    /// The forwarder is cheap to clone; clones share the same queue, so
    /// requests from any number of peers arrive in one ordered stream.
    pub fn pair() -> (LoopbackForwarder, RequestInbox) {
        let queue: FrameQueue = Arc::default();
        (
            LoopbackForwarder {
                queue: Arc::clone(&queue),
            },
            RequestInbox { queue },
        )
    }
}

/// Sending half: implements the core's reliable ordered forwarder port.
#[derive(Clone)]
pub struct LoopbackForwarder {
    queue: FrameQueue,
}

impl RequestForwarder for LoopbackForwarder {
    fn forward(&self, request: InventoryRequest) {
        let frame = match bincode::serialize(&request) {
            Ok(frame) => frame,
            Err(err) => {
                error!(%err, kind = request.kind_str(), "failed to encode forwarded request; dropped");
                return;
            }
        };
        match self.queue.lock() {
            Ok(mut queue) => queue.push_back(frame),
            Err(_) => warn!("request queue poisoned; forwarded request dropped"),
        }
    }
}

/// Receiving half: drained by the authority.
pub struct RequestInbox {
    queue: FrameQueue,
}

impl RequestInbox {
    /// Drains pending requests in arrival order.
    ///
    /// Frames that fail to decode are dropped with an error log — there is
    /// no ack path to report them back on.
    pub fn drain(&self) -> Vec<InventoryRequest> {
        let frames = match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => {
                warn!("request queue poisoned; pending requests lost");
                return Vec::new();
            }
        };
        frames
            .into_iter()
            .filter_map(|frame| match bincode::deserialize(&frame) {
                Ok(request) => Some(request),
                Err(err) => {
                    error!(%err, "failed to decode forwarded request; dropped");
                    None
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().map(|queue| queue.is_empty()).unwrap_or(true)
    }
}

/// One state update traveling from the authority to an observer.
#[derive(Clone, Debug)]
pub enum MirrorUpdate {
    /// Whole-collection mirror.
    Collection(InventorySnapshot),

    /// Per-item representation-handle mirror.
    Representation {
        item: ItemId,
        handle: Option<RepresentationId>,
    },
}

type UpdateQueue = Arc<Mutex<VecDeque<MirrorUpdate>>>;

/// Fan-out replication sink delivering every mirror to every observer.
///
/// The authority registers its own inbox alongside the remote peers', so
/// both sides run the identical notification path after a mirror update.
#[derive(Default)]
pub struct LoopbackReplication {
    observers: Mutex<Vec<UpdateQueue>>,
}

impl LoopbackReplication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer and returns its inbox.
    pub fn register_observer(&self) -> MirrorInbox {
        let queue: UpdateQueue = Arc::default();
        match self.observers.lock() {
            Ok(mut observers) => observers.push(Arc::clone(&queue)),
            Err(_) => warn!("replication observer list poisoned; observer will see no mirrors"),
        }
        MirrorInbox { queue }
    }

    fn broadcast(&self, update: MirrorUpdate) {
        match self.observers.lock() {
            Ok(observers) => {
                for observer in observers.iter() {
                    if let Ok(mut queue) = observer.lock() {
                        queue.push_back(update.clone());
                    }
                }
            }
            // Replication is best-effort; a poisoned list drops the update.
            Err(_) => warn!("replication observer list poisoned; mirror dropped"),
        }
    }
}

impl ReplicationSink for LoopbackReplication {
    fn mirror_collection(&self, snapshot: &InventorySnapshot) {
        self.broadcast(MirrorUpdate::Collection(snapshot.clone()));
    }

    fn mirror_representation(&self, item: ItemId, handle: Option<RepresentationId>) {
        self.broadcast(MirrorUpdate::Representation { item, handle });
    }
}

/// An observer's queue of undelivered mirror updates.
pub struct MirrorInbox {
    queue: UpdateQueue,
}

impl MirrorInbox {
    /// Drains pending updates in arrival order.
    pub fn drain(&self) -> Vec<MirrorUpdate> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue).into(),
            Err(_) => {
                warn!("mirror inbox poisoned; pending updates lost");
                Vec::new()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().map(|queue| queue.is_empty()).unwrap_or(true)
    }
}
