//! In-memory [`inventory_core::World`] for tests and local demos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use inventory_core::{OwnerId, Placement, RepresentationId, RepresentationKind, World};

#[derive(Default)]
struct StubWorldState {
    next_id: u64,
    live: HashMap<RepresentationId, Placement>,
    placements: HashMap<OwnerId, Placement>,
    refuse_spawns: bool,
}

/// World stub with a monotonic handle allocator.
///
/// Records which representations are live and where, can be told to refuse
/// spawns, and supports destroying a representation from outside the
/// inventory subsystem so external-destruction handling is exercisable
/// without a real world.
#[derive(Default)]
pub struct StubWorld {
    inner: Mutex<StubWorldState>,
}

impl StubWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StubWorldState> {
        self.inner.lock().expect("stub world lock poisoned")
    }

    pub fn set_owner_placement(&self, owner: OwnerId, placement: Placement) {
        self.state().placements.insert(owner, placement);
    }

    /// Makes every subsequent `create_representation` call fail.
    pub fn refuse_spawns(&self, refuse: bool) {
        self.state().refuse_spawns = refuse;
    }

    pub fn live_count(&self) -> usize {
        self.state().live.len()
    }

    pub fn is_live(&self, representation: RepresentationId) -> bool {
        self.state().live.contains_key(&representation)
    }

    pub fn placement_of(&self, representation: RepresentationId) -> Option<Placement> {
        self.state().live.get(&representation).copied()
    }

    /// Destroys a representation from outside the inventory subsystem.
    ///
    /// The caller is expected to route the destruction back through
    /// `notify_external_destruction`, the way a real world's destruction
    /// callback would.
    pub fn destroy_external(&self, representation: RepresentationId) -> bool {
        self.state().live.remove(&representation).is_some()
    }
}

impl World for StubWorld {
    fn create_representation(
        &self,
        _kind: RepresentationKind,
        _owner: OwnerId,
        placement: Placement,
    ) -> Option<RepresentationId> {
        let mut state = self.state();
        if state.refuse_spawns {
            return None;
        }
        let id = RepresentationId(state.next_id);
        state.next_id += 1;
        state.live.insert(id, placement);
        Some(id)
    }

    fn destroy_representation(&self, representation: RepresentationId) -> bool {
        self.state().live.remove(&representation).is_some()
    }

    fn owner_placement(&self, owner: OwnerId) -> Option<Placement> {
        self.state().placements.get(&owner).copied()
    }
}
