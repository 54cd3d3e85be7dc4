use crate::item::ItemInstance;

/// Pluggable eligibility checks gating the representation state machine.
///
/// Replaces per-item-kind virtual overrides with a strategy passed through
/// the environment: the default is always-eligible, and a game layers its
/// own conditions (stunned owners, cursed items) without a class hierarchy.
pub trait SpawnPolicy: Send + Sync {
    fn can_spawn(&self, _item: &ItemInstance) -> bool {
        true
    }

    fn can_despawn(&self, _item: &ItemInstance) -> bool {
        true
    }
}

/// Default policy: every transition is eligible.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysEligible;

impl SpawnPolicy for AlwaysEligible {}
