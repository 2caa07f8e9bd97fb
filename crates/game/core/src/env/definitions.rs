//! Static definition catalogs: NPC templates, spells, weapons, ammunition.

use crate::stats::{EquipmentBonuses, Levels, Stat};

/// Template an autonomous entity is spawned (and respawned) from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcDefinition {
    pub id: u32,
    pub name: String,
    pub accuracy: u32,
    pub strength: u32,
    pub defense: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magic: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ranged: u32,
    /// Maximum (and respawn) hit points.
    pub hits: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: EquipmentBonuses,
    /// Attack speed as a multiple of the 6-tick base swing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_speed: f64,
    /// Ticks between corpse removal and respawn; `None` uses the configured default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub respawn_ticks: Option<u32>,
    /// Attack range in tiles; anything above 1 marks a ranged profile.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_range: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub projectile: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub auto_cast_spell: Option<u32>,
}

impl NpcDefinition {
    /// Minimal melee definition; handy for tests and tooling.
    pub fn melee(id: u32, name: impl Into<String>, level: u32, hits: u32) -> Self {
        Self {
            id,
            name: name.into(),
            accuracy: level,
            strength: level,
            defense: level,
            magic: 1,
            ranged: 1,
            hits,
            bonuses: EquipmentBonuses::default(),
            attack_speed: 1.0,
            respawn_ticks: None,
            attack_range: 1,
            projectile: None,
            auto_cast_spell: None,
        }
    }

    pub fn levels(&self) -> Levels {
        Levels::from_pairs(&[
            (Stat::Accuracy, self.accuracy),
            (Stat::Strength, self.strength),
            (Stat::Defense, self.defense),
            (Stat::Magic, self.magic),
            (Stat::Ranged, self.ranged),
            (Stat::Hits, self.hits),
        ])
    }

    /// True when the definition declares any ranged capability.
    pub fn has_ranged_profile(&self) -> bool {
        self.attack_range > 1 || self.bonuses.range > 1 || self.projectile.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellKind {
    /// Direct damage.
    Combat,
    /// Stat drains / binds; may deal no damage.
    Status,
    /// Teleports, enchantments; never usable in combat.
    Utility,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellDefinition {
    pub id: u32,
    pub name: String,
    pub kind: SpellKind,
    pub max_damage: u32,
    /// Whether the cast must win a magic accuracy roll before dealing damage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub accuracy_gated: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_experience: u64,
}

impl SpellDefinition {
    pub fn is_offensive(&self) -> bool {
        matches!(self.kind, SpellKind::Combat | SpellKind::Status)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangedWeapon {
    pub range: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponDefinition {
    pub id: u32,
    /// Ticks between swings; non-positive falls back to the default speed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_speed: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ranged: Option<RangedWeapon>,
}

/// Read-only lookup over all definition catalogs.
///
/// Missing entries are never errors: callers fall back to defaults or 0 damage.
pub trait DefinitionOracle {
    fn npc(&self, id: u32) -> Option<&NpcDefinition>;

    fn spell(&self, id: u32) -> Option<&SpellDefinition>;

    fn weapon(&self, id: u32) -> Option<&WeaponDefinition>;

    /// Per-ammunition cap on ranged max hit.
    fn ammo_max_hit(&self, item: u32) -> Option<u32>;
}
