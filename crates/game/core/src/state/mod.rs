//! Authoritative combat state.
//!
//! [`World`] owns the live player and autonomous-entity collections plus the
//! per-tick dying sets. It is passed explicitly into every combat phase; the
//! resolver only mutates records already present, and only the death manager
//! moves ids across the live/dead boundary.
pub mod lifecycle;
pub mod types;

use std::collections::BTreeMap;

pub use lifecycle::{CombatState, LifecycleError, LifecycleEvent};
pub use types::{EntityKind, EntityRef, Experience, Npc, Player, Position, Tick, TimedAction};

use crate::stats::{Combatant, CombatantMut};

/// Entities that reached 0 HP this tick, keyed by id, with killer attribution.
///
/// `None` as killer means a non-attributable death.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DyingSets {
    pub npcs: BTreeMap<u32, Option<EntityRef>>,
    pub players: BTreeMap<u32, Option<EntityRef>>,
}

impl DyingSets {
    /// Records a death; the first recorded killer for an id is kept.
    pub fn mark(&mut self, victim: EntityRef, killer: Option<EntityRef>) {
        let set = match victim.kind {
            EntityKind::Player => &mut self.players,
            EntityKind::Npc => &mut self.npcs,
        };
        set.entry(victim.id).or_insert(killer);
    }

    pub fn contains(&self, entity: EntityRef) -> bool {
        match entity.kind {
            EntityKind::Player => self.players.contains_key(&entity.id),
            EntityKind::Npc => self.npcs.contains_key(&entity.id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty() && self.players.is_empty()
    }

    /// Drains both sets, leaving them empty.
    pub fn take(&mut self) -> DyingSets {
        std::mem::take(self)
    }
}

/// Live combat entities and this tick's dying sets.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub players: BTreeMap<u32, Player>,
    pub npcs: BTreeMap<u32, Npc>,
    pub dying: DyingSets,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connecting player; returns the record it replaced, if any.
    pub fn insert_player(&mut self, player: Player) -> Option<Player> {
        self.players.insert(player.id, player)
    }

    pub fn remove_player(&mut self, id: u32) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn insert_npc(&mut self, npc: Npc) -> Option<Npc> {
        self.npcs.insert(npc.id, npc)
    }

    pub fn remove_npc(&mut self, id: u32) -> Option<Npc> {
        self.npcs.remove(&id)
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn npc(&self, id: u32) -> Option<&Npc> {
        self.npcs.get(&id)
    }

    pub fn npc_mut(&mut self, id: u32) -> Option<&mut Npc> {
        self.npcs.get_mut(&id)
    }

    pub fn combatant(&self, entity: EntityRef) -> Option<Combatant<'_>> {
        match entity.kind {
            EntityKind::Player => self.players.get(&entity.id).map(Combatant::Player),
            EntityKind::Npc => self.npcs.get(&entity.id).map(Combatant::Npc),
        }
    }

    pub fn combatant_mut(&mut self, entity: EntityRef) -> Option<CombatantMut<'_>> {
        match entity.kind {
            EntityKind::Player => self.players.get_mut(&entity.id).map(CombatantMut::Player),
            EntityKind::Npc => self.npcs.get_mut(&entity.id).map(CombatantMut::Npc),
        }
    }

    pub fn position_of(&self, entity: EntityRef) -> Option<Position> {
        match entity.kind {
            EntityKind::Player => self.players.get(&entity.id).map(|p| p.position),
            EntityKind::Npc => self.npcs.get(&entity.id).map(|n| n.position),
        }
    }

    pub fn state_of(&self, entity: EntityRef) -> Option<CombatState> {
        match entity.kind {
            EntityKind::Player => self.players.get(&entity.id).map(|p| p.state),
            EntityKind::Npc => self.npcs.get(&entity.id).map(|n| n.state),
        }
    }

    pub fn state_mut(&mut self, entity: EntityRef) -> Option<&mut CombatState> {
        match entity.kind {
            EntityKind::Player => self.players.get_mut(&entity.id).map(|p| &mut p.state),
            EntityKind::Npc => self.npcs.get_mut(&entity.id).map(|n| &mut n.state),
        }
    }

    /// Present, in an alive lifecycle state and not already marked dying.
    pub fn is_alive(&self, entity: EntityRef) -> bool {
        self.state_of(entity).is_some_and(CombatState::is_alive) && !self.dying.contains(entity)
    }

    /// Applies a lifecycle event to a live entity.
    ///
    /// Returns `None` when the entity is not in the live collections.
    pub fn transition(
        &mut self,
        entity: EntityRef,
        event: LifecycleEvent,
    ) -> Option<Result<CombatState, LifecycleError>> {
        self.state_mut(entity).map(|state| state.apply(event))
    }
}
