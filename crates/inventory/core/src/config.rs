/// Inventory configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryConfig {
    /// Upper bound on items held by one container.
    pub max_items: usize,
}

impl InventoryConfig {
    // ===== compile-time constants =====
    /// Default maximum number of items per container.
    pub const MAX_ITEMS: usize = 64;

    pub fn new() -> Self {
        Self {
            max_items: Self::MAX_ITEMS,
        }
    }

    pub fn with_max_items(max_items: usize) -> Self {
        Self { max_items }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new()
    }
}
