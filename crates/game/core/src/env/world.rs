//! World-facing collaborators: target tables, geometry, zones and visibility.

use crate::state::{EntityRef, Npc, Player, Position};

/// Target / aggro selection, owned outside the combat core.
///
/// Holds at most one target per entity. Players target NPCs or players;
/// NPC entries are their aggro target.
pub trait TargetingOracle {
    fn target_of(&self, entity: EntityRef) -> Option<EntityRef>;

    fn set_target(&mut self, entity: EntityRef, target: EntityRef);

    fn clear_target(&mut self, entity: EntityRef);

    /// Clears every target pointing at `victim`; returns who was targeting it.
    fn clear_targets_on(&mut self, victim: EntityRef) -> Vec<EntityRef>;

    /// All `(player id, target)` pairs, ordered by player id.
    fn player_targets(&self) -> Vec<(u32, EntityRef)>;
}

/// Line-of-sight and edge-clearance geometry.
pub trait LineOfSightOracle {
    fn has_line_of_sight(&self, from: Position, to: Position) -> bool;

    /// True when a wall or fence stands between two adjacent tiles.
    fn is_melee_edge_blocked(&self, from: Position, to: Position) -> bool;
}

/// Player-versus-player zones.
pub trait PvpZoneOracle {
    /// PvP tier at a position (e.g. wilderness depth), `None` outside PvP areas.
    fn pvp_tier(&self, position: Position) -> Option<u32>;
}

/// Interaction permission between a player and an autonomous entity.
pub trait InteractionPolicy {
    fn can_attack(&self, player: &Player, npc: &Npc) -> bool;
}

/// Spatial index used for visibility-scoped delivery.
pub trait VisibilityIndex {
    fn viewers(&self, position: Position) -> Vec<EntityRef>;

    fn add_or_update(&mut self, entity: EntityRef, position: Position);

    fn remove(&mut self, entity: EntityRef);
}
