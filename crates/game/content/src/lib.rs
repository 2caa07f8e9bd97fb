//! Data-driven combat content and loaders.
//!
//! This crate holds the static definition catalogs the combat rules read
//! through [`combat_core::DefinitionOracle`], and loaders for the data files:
//! - NPC templates, spells, weapons and ammunition (RON)
//! - Combat timing and tuning (TOML)
//!
//! Content is consumed by runtime oracles and never appears in world state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{AmmoDefinition, CatalogError, ContentCatalog};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogFile, CatalogLoader, ConfigLoader, ContentFactory, LoadResult};
