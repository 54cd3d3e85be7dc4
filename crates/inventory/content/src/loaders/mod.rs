//! File loaders turning on-disk catalogs into template lists.

pub mod templates;

pub use templates::{TemplateCatalog, TemplateLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("could not read catalog file {}: {}", path.display(), e))
}
