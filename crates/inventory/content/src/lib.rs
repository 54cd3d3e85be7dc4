//! Static item-template content.
//!
//! Templates are immutable configuration consumed by the core through its
//! oracle port. This crate provides the file loaders that turn RON catalogs
//! into template lists, plus a small built-in catalog for demos and tests.
pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::default_catalog;

#[cfg(feature = "loaders")]
pub use loaders::{LoadResult, TemplateCatalog, TemplateLoader};
