use strum::EnumCount;

use super::common::{EntityRef, Position};
use crate::state::lifecycle::CombatState;
use crate::stats::{CombatStyle, EquipmentBonuses, Levels, Stat};

/// Accumulated experience per stat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Experience([u64; Stat::COUNT]);

impl Experience {
    pub fn get(&self, stat: Stat) -> u64 {
        self.0[stat.index()]
    }

    pub fn add(&mut self, stat: Stat, amount: u64) {
        let slot = &mut self.0[stat.index()];
        *slot = slot.saturating_add(amount);
    }
}

/// An in-flight timed action (skilling, eating, ...) that death cancels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedAction {
    pub action: u32,
    pub ticks_remaining: u32,
}

/// Player-controlled combat entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: u32,
    pub position: Position,
    /// Boosted Hits is the current hit point counter, actual Hits the maximum.
    pub levels: Levels,
    pub bonuses: EquipmentBonuses,
    pub style: CombatStyle,
    /// Ticks remaining before the next attack.
    pub combat_delay: u32,
    pub state: CombatState,
    pub weapon: Option<u32>,
    /// Spell chosen for casting; cleared when a cast is cancelled.
    pub selected_spell: Option<u32>,
    pub auto_retaliate: bool,
    pub pending_action: Option<TimedAction>,
    pub experience: Experience,
}

impl Player {
    pub fn new(id: u32, position: Position, levels: Levels) -> Self {
        Self {
            id,
            position,
            levels,
            bonuses: EquipmentBonuses::default(),
            style: CombatStyle::default(),
            combat_delay: 0,
            state: CombatState::Idle,
            weapon: None,
            selected_spell: None,
            auto_retaliate: true,
            pending_action: None,
            experience: Experience::default(),
        }
    }

    pub fn entity(&self) -> EntityRef {
        EntityRef::player(self.id)
    }

    pub fn hits(&self) -> u32 {
        self.levels.boosted(Stat::Hits)
    }

    pub fn max_hits(&self) -> u32 {
        self.levels.actual(Stat::Hits)
    }

    pub fn set_hits(&mut self, hp: u32) {
        self.levels.set_boosted(Stat::Hits, hp);
    }

    /// Full heal and boost reset, used on revival.
    pub fn restore(&mut self) {
        self.levels.restore();
    }
}
