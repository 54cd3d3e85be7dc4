//! RON template-catalog loader.

use std::path::Path;

use inventory_core::ItemTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// On-disk shape of a catalog: one RON document holding the template list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub templates: Vec<ItemTemplate>,
}

/// Reads [`TemplateCatalog`] files.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Loads every template from the RON catalog at `path`.
    ///
    /// Duplicate handles are not rejected here; whichever oracle consumes
    /// the list decides how to resolve them.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemTemplate>> {
        let content = read_file(path)?;
        let catalog: TemplateCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("malformed template catalog {}: {}", path.display(), e))?;

        Ok(catalog.templates)
    }
}
