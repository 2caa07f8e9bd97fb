//! Notifications emitted by the combat core.
//!
//! Every notification carries a position so the broadcast layer can scope
//! delivery to viewers; serialization is not done here.

use crate::combat::AttackMode;
use crate::state::{EntityRef, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    DamageDealt {
        attacker: EntityRef,
        victim: EntityRef,
        amount: u32,
        mode: AttackMode,
        position: Position,
    },
    HitpointsChanged {
        entity: EntityRef,
        current: u32,
        max: u32,
        position: Position,
    },
    ProjectileFired {
        attacker: EntityRef,
        victim: EntityRef,
        /// Ammunition item or spell id.
        projectile: Option<u32>,
        mode: AttackMode,
        position: Position,
    },
    NpcDied {
        npc: u32,
        definition: u32,
        killer: Option<EntityRef>,
        position: Position,
    },
    NpcRemoved {
        npc: u32,
        position: Position,
    },
    NpcReadded {
        npc: u32,
        position: Position,
    },
    PlayerDied {
        player: u32,
        killer: Option<EntityRef>,
        position: Position,
    },
    PlayerRespawned {
        player: u32,
        position: Position,
    },
    PlayerMessage {
        player: u32,
        text: String,
    },
}

impl CombatEvent {
    pub fn position(&self) -> Option<Position> {
        match self {
            CombatEvent::DamageDealt { position, .. }
            | CombatEvent::HitpointsChanged { position, .. }
            | CombatEvent::ProjectileFired { position, .. }
            | CombatEvent::NpcDied { position, .. }
            | CombatEvent::NpcRemoved { position, .. }
            | CombatEvent::NpcReadded { position, .. }
            | CombatEvent::PlayerDied { position, .. }
            | CombatEvent::PlayerRespawned { position, .. } => Some(*position),
            CombatEvent::PlayerMessage { .. } => None,
        }
    }
}

/// Receiver of combat notifications.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}
