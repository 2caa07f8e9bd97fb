use super::common::{EntityRef, Position};
use crate::env::NpcDefinition;
use crate::state::lifecycle::CombatState;
use crate::stats::{EquipmentBonuses, Levels};

/// Autonomous combat entity.
///
/// Combat levels and bonuses are copied from the [`NpcDefinition`] at spawn
/// so status effects can drain them without touching the catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npc {
    pub id: u32,
    pub definition: u32,
    pub position: Position,
    pub spawn: Position,
    pub current_hp: u32,
    pub max_hp: u32,
    pub levels: Levels,
    pub bonuses: EquipmentBonuses,
    pub combat_delay: u32,
    pub state: CombatState,
    /// False for one-shot / instanced entities.
    pub respawns: bool,
    /// Owning player of an instanced entity.
    pub owner: Option<u32>,
    /// Loot table used instead of the definition's own.
    pub loot_override: Option<u32>,
}

impl Npc {
    pub fn spawn(id: u32, definition: &NpcDefinition, spawn: Position) -> Self {
        Self {
            id,
            definition: definition.id,
            position: spawn,
            spawn,
            current_hp: definition.hits,
            max_hp: definition.hits,
            levels: definition.levels(),
            bonuses: definition.bonuses.clone(),
            combat_delay: 0,
            state: CombatState::Idle,
            respawns: true,
            owner: None,
            loot_override: None,
        }
    }

    /// One-shot entity scoped to `owner`; never respawns.
    pub fn instanced(id: u32, definition: &NpcDefinition, spawn: Position, owner: u32) -> Self {
        Self {
            respawns: false,
            owner: Some(owner),
            ..Self::spawn(id, definition, spawn)
        }
    }

    pub fn entity(&self) -> EntityRef {
        EntityRef::npc(self.id)
    }

    /// Fresh instance of the same definition, keeping instance-level flags.
    pub fn respawned(&self, definition: &NpcDefinition) -> Self {
        Self {
            respawns: self.respawns,
            owner: self.owner,
            loot_override: self.loot_override,
            ..Self::spawn(self.id, definition, self.spawn)
        }
    }
}
