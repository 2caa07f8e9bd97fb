//! Recording loot and teleport services.
//!
//! Loot table resolution and movement live outside the combat runtime; these
//! collaborators keep a log of the requests for downstream systems to drain.
use combat_core::{EntityRef, LootService, Position, TeleportService};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootRecord {
    /// Corpse loot for an NPC definition.
    Npc {
        definition: u32,
        position: Position,
        killer: Option<EntityRef>,
        override_table: Option<u32>,
    },
    /// A spent projectile that landed.
    Projectile {
        item: u32,
        position: Position,
        owner: u32,
    },
    /// Item-loss resolution for a dead player.
    PlayerDeath {
        player: u32,
        killer: Option<EntityRef>,
        position: Position,
    },
}

#[derive(Clone, Debug, Default)]
pub struct LootRecorder {
    records: Vec<LootRecord>,
}

impl LootRecorder {
    pub fn records(&self) -> &[LootRecord] {
        &self.records
    }

    pub fn drain(&mut self) -> Vec<LootRecord> {
        std::mem::take(&mut self.records)
    }
}

impl LootService for LootRecorder {
    fn drop_loot(
        &mut self,
        definition: u32,
        position: Position,
        killer: Option<EntityRef>,
        override_table: Option<u32>,
    ) {
        tracing::debug!("loot for definition {} at {}", definition, position);
        self.records.push(LootRecord::Npc {
            definition,
            position,
            killer,
            override_table,
        });
    }

    fn drop_projectile(&mut self, item: u32, position: Position, owner: u32) {
        self.records.push(LootRecord::Projectile {
            item,
            position,
            owner,
        });
    }

    fn resolve_player_death(&mut self, player: u32, killer: Option<EntityRef>, position: Position) {
        self.records.push(LootRecord::PlayerDeath {
            player,
            killer,
            position,
        });
    }
}

#[derive(Clone, Debug, Default)]
pub struct TeleportRecorder {
    moves: Vec<(u32, Position)>,
}

impl TeleportRecorder {
    pub fn moves(&self) -> &[(u32, Position)] {
        &self.moves
    }
}

impl TeleportService for TeleportRecorder {
    fn respawn_player(&mut self, player: u32, position: Position) {
        self.moves.push((player, position));
    }
}
