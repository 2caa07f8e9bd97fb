//! Content factory for building oracles from a data directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::catalog::ContentCatalog;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// └── catalog.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The bundled `data/` directory of this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load combat configuration from `combat.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        if !path.exists() {
            tracing::debug!("{} not found, using default combat config", path.display());
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load definitions from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let path = self.data_dir.join("catalog.ron");
        CatalogLoader::load(&path)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
