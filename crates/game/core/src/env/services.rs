//! Inventory, loot and teleport services the core calls into.

use crate::state::{EntityRef, Position};

/// Ammunition currently equipped by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmmoStack {
    pub item: u32,
    pub count: u32,
}

/// Inventory/equipment bookkeeping.
pub trait InventoryService {
    fn equipped_ammo(&self, player: u32) -> Option<AmmoStack>;

    /// Removes one unit; false if none was left.
    fn consume_ammo(&mut self, player: u32, item: u32) -> bool;

    fn has_reagents(&self, player: u32, spell: u32) -> bool;

    /// Removes the reagents for one cast; false (and nothing removed) when short.
    fn consume_reagents(&mut self, player: u32, spell: u32) -> bool;
}

/// Ground-item and death-drop hooks.
pub trait LootService {
    /// Rolls an autonomous entity's loot table at `position`.
    fn drop_loot(
        &mut self,
        definition: u32,
        position: Position,
        killer: Option<EntityRef>,
        override_table: Option<u32>,
    );

    fn drop_projectile(&mut self, item: u32, position: Position, owner: u32);

    /// Decides what a dead player keeps and drops the rest.
    fn resolve_player_death(&mut self, player: u32, killer: Option<EntityRef>, position: Position);
}

/// Relocation of players; emits its own position-change notification.
pub trait TeleportService {
    fn respawn_player(&mut self, player: u32, position: Position);
}
