//! Definition catalog loader.

use std::path::Path;

use combat_core::{NpcDefinition, SpellDefinition, WeaponDefinition};
use serde::{Deserialize, Serialize};

use crate::catalog::{AmmoDefinition, ContentCatalog};
use crate::loaders::{LoadResult, read_file};

/// Catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub npcs: Vec<NpcDefinition>,
    #[serde(default)]
    pub spells: Vec<SpellDefinition>,
    #[serde(default)]
    pub weapons: Vec<WeaponDefinition>,
    #[serde(default)]
    pub ammo: Vec<AmmoDefinition>,
}

/// Loader for definition catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and validate a catalog. Duplicate ids within one table are rejected.
    pub fn load(path: &Path) -> LoadResult<ContentCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<ContentCatalog> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        Self::build(file)
    }

    pub fn build(file: CatalogFile) -> LoadResult<ContentCatalog> {
        let mut catalog = ContentCatalog::new();
        for npc in file.npcs {
            if npc.hits == 0 {
                anyhow::bail!("npc {} ({}) has no hit points", npc.id, npc.name);
            }
            catalog.add_npc(npc)?;
        }
        for spell in file.spells {
            catalog.add_spell(spell)?;
        }
        for weapon in file.weapons {
            catalog.add_weapon(weapon)?;
        }
        for ammo in file.ammo {
            catalog.add_ammo(ammo)?;
        }

        tracing::debug!("loaded catalog with {} definitions", catalog.len());
        Ok(catalog)
    }
}
