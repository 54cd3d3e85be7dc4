//! Minimal [`inventory_core::TemplateOracle`] backed by an in-memory map.
use inventory_core::{ItemTemplate, TemplateHandle, TemplateOracle};
use std::collections::HashMap;

/// TemplateOracle implementation with static template definitions
pub struct TemplateOracleImpl {
    templates: HashMap<TemplateHandle, ItemTemplate>,
}

impl TemplateOracleImpl {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Builds an oracle from a loaded or built-in catalog.
    pub fn from_catalog(catalog: impl IntoIterator<Item = ItemTemplate>) -> Self {
        let mut oracle = Self::new();
        for template in catalog {
            oracle.add_template(template);
        }
        oracle
    }

    /// Add a template definition
    pub fn add_template(&mut self, template: ItemTemplate) {
        self.templates.insert(template.handle, template);
    }
}

impl Default for TemplateOracleImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateOracle for TemplateOracleImpl {
    fn template(&self, handle: TemplateHandle) -> Option<ItemTemplate> {
        self.templates.get(&handle).cloned()
    }
}
