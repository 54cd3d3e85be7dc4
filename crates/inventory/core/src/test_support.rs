//! Shared in-memory collaborator stubs for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::env::{
    InventoryRequest, ItemTemplate, ReplicationSink, RequestForwarder, SwordData, TemplateKind,
    TemplateOracle,
};
use crate::snapshot::InventorySnapshot;
use crate::types::{
    ItemId, OwnerId, Placement, RepresentationId, RepresentationKind, TemplateHandle,
};

pub(crate) fn sword_template(handle: TemplateHandle) -> ItemTemplate {
    ItemTemplate::new(
        handle,
        "Steel Sword",
        "A plain steel sword.",
        120,
        TemplateKind::Sword(SwordData {
            base_damage: 12,
            crit_chance: 0.05,
            crit_multiplier: 1.5,
            attack_speed: 1.1,
        }),
        Some(RepresentationKind(1)),
    )
}

pub(crate) fn valuable_template(handle: TemplateHandle) -> ItemTemplate {
    ItemTemplate::new(
        handle,
        "Gold Coin",
        "Currency. Spends itself eventually.",
        1,
        TemplateKind::Valuable,
        None,
    )
}

pub(crate) struct StaticTemplates {
    templates: HashMap<TemplateHandle, ItemTemplate>,
}

impl StaticTemplates {
    pub(crate) fn new(templates: Vec<ItemTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.handle, template))
                .collect(),
        }
    }
}

impl TemplateOracle for StaticTemplates {
    fn template(&self, handle: TemplateHandle) -> Option<ItemTemplate> {
        self.templates.get(&handle).cloned()
    }
}

#[derive(Default)]
struct StubWorldState {
    next_id: u64,
    live: HashMap<RepresentationId, Placement>,
    placements: HashMap<OwnerId, Placement>,
    refuse_spawns: bool,
}

/// In-memory world recording live representations.
#[derive(Default)]
pub(crate) struct StubWorld {
    inner: Mutex<StubWorldState>,
}

impl StubWorld {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_owner_placement(&self, owner: OwnerId, placement: Placement) {
        self.inner.lock().unwrap().placements.insert(owner, placement);
    }

    pub(crate) fn refuse_spawns(&self, refuse: bool) {
        self.inner.lock().unwrap().refuse_spawns = refuse;
    }

    pub(crate) fn live_count(&self) -> usize {
        self.inner.lock().unwrap().live.len()
    }

    pub(crate) fn is_live(&self, representation: RepresentationId) -> bool {
        self.inner.lock().unwrap().live.contains_key(&representation)
    }

    pub(crate) fn placement_of(&self, representation: RepresentationId) -> Option<Placement> {
        self.inner.lock().unwrap().live.get(&representation).copied()
    }

    /// Destroys a representation from outside the inventory subsystem.
    pub(crate) fn destroy_external(&self, representation: RepresentationId) -> bool {
        self.inner.lock().unwrap().live.remove(&representation).is_some()
    }
}

impl crate::env::World for StubWorld {
    fn create_representation(
        &self,
        _kind: RepresentationKind,
        _owner: OwnerId,
        placement: Placement,
    ) -> Option<RepresentationId> {
        let mut inner = self.inner.lock().unwrap();
        if inner.refuse_spawns {
            return None;
        }
        let id = RepresentationId(inner.next_id);
        inner.next_id += 1;
        inner.live.insert(id, placement);
        Some(id)
    }

    fn destroy_representation(&self, representation: RepresentationId) -> bool {
        self.inner.lock().unwrap().live.remove(&representation).is_some()
    }

    fn owner_placement(&self, owner: OwnerId) -> Option<Placement> {
        self.inner.lock().unwrap().placements.get(&owner).copied()
    }
}

/// Records forwarded requests for assertions.
#[derive(Default)]
pub(crate) struct RecordingForwarder {
    requests: Mutex<Vec<InventoryRequest>>,
}

impl RecordingForwarder {
    pub(crate) fn take(&self) -> Vec<InventoryRequest> {
        std::mem::take(&mut self.requests.lock().unwrap())
    }
}

impl RequestForwarder for RecordingForwarder {
    fn forward(&self, request: InventoryRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

/// Counts mirror pushes for assertions.
#[derive(Default)]
pub(crate) struct RecordingSink {
    collections: Mutex<Vec<InventorySnapshot>>,
    representations: Mutex<Vec<(ItemId, Option<RepresentationId>)>>,
}

impl RecordingSink {
    pub(crate) fn collection_mirrors(&self) -> usize {
        self.collections.lock().unwrap().len()
    }

    pub(crate) fn representation_mirrors(&self) -> usize {
        self.representations.lock().unwrap().len()
    }
}

impl ReplicationSink for RecordingSink {
    fn mirror_collection(&self, snapshot: &InventorySnapshot) {
        self.collections.lock().unwrap().push(snapshot.clone());
    }

    fn mirror_representation(&self, item: ItemId, handle: Option<RepresentationId>) {
        self.representations.lock().unwrap().push((item, handle));
    }
}
