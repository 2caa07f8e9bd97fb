//! In-memory definition catalog.

use std::collections::BTreeMap;

use combat_core::{
    DefinitionOracle, ErrorSeverity, GameError, NpcDefinition, SpellDefinition, WeaponDefinition,
};

/// Per-ammunition ranged cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoDefinition {
    pub item: u32,
    pub max_hit: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate {kind} definition {id}")]
    Duplicate { kind: &'static str, id: u32 },
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Duplicate { .. } => "CATALOG_DUPLICATE_ID",
        }
    }
}

/// NPC, spell, weapon and ammunition definitions keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentCatalog {
    npcs: BTreeMap<u32, NpcDefinition>,
    spells: BTreeMap<u32, SpellDefinition>,
    weapons: BTreeMap<u32, WeaponDefinition>,
    ammo: BTreeMap<u32, AmmoDefinition>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_npc(&mut self, definition: NpcDefinition) -> Result<(), CatalogError> {
        insert_unique(&mut self.npcs, "npc", definition.id, definition)
    }

    pub fn add_spell(&mut self, definition: SpellDefinition) -> Result<(), CatalogError> {
        insert_unique(&mut self.spells, "spell", definition.id, definition)
    }

    pub fn add_weapon(&mut self, definition: WeaponDefinition) -> Result<(), CatalogError> {
        insert_unique(&mut self.weapons, "weapon", definition.id, definition)
    }

    pub fn add_ammo(&mut self, definition: AmmoDefinition) -> Result<(), CatalogError> {
        insert_unique(&mut self.ammo, "ammo", definition.item, definition)
    }

    pub fn npcs(&self) -> impl Iterator<Item = &NpcDefinition> {
        self.npcs.values()
    }

    pub fn spells(&self) -> impl Iterator<Item = &SpellDefinition> {
        self.spells.values()
    }

    pub fn len(&self) -> usize {
        self.npcs.len() + self.spells.len() + self.weapons.len() + self.ammo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<u32, T>,
    kind: &'static str,
    id: u32,
    value: T,
) -> Result<(), CatalogError> {
    if map.contains_key(&id) {
        return Err(CatalogError::Duplicate { kind, id });
    }
    map.insert(id, value);
    Ok(())
}

impl DefinitionOracle for ContentCatalog {
    fn npc(&self, id: u32) -> Option<&NpcDefinition> {
        self.npcs.get(&id)
    }

    fn spell(&self, id: u32) -> Option<&SpellDefinition> {
        self.spells.get(&id)
    }

    fn weapon(&self, id: u32) -> Option<&WeaponDefinition> {
        self.weapons.get(&id)
    }

    fn ammo_max_hit(&self, item: u32) -> Option<u32> {
        self.ammo.get(&item).map(|ammo| ammo.max_hit)
    }
}
