//! Equipped ammunition and reagent stock implementing [`combat_core::InventoryService`].
use std::collections::BTreeMap;

use combat_core::{AmmoStack, InventoryService};

#[derive(Clone, Debug, Default)]
pub struct InventoryBook {
    ammo: BTreeMap<u32, AmmoStack>,
    /// Remaining casts per `(player, spell)`.
    reagents: BTreeMap<(u32, u32), u32>,
}

impl InventoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equips a stack, or unequips with `None`.
    pub fn set_ammo(&mut self, player: u32, stack: Option<AmmoStack>) {
        match stack {
            Some(stack) => {
                self.ammo.insert(player, stack);
            }
            None => {
                self.ammo.remove(&player);
            }
        }
    }

    pub fn grant_reagents(&mut self, player: u32, spell: u32, casts: u32) {
        let stock = self.reagents.entry((player, spell)).or_default();
        *stock = stock.saturating_add(casts);
    }

    pub fn casts_left(&self, player: u32, spell: u32) -> u32 {
        self.reagents.get(&(player, spell)).copied().unwrap_or(0)
    }

    /// Drops everything a player carries.
    pub fn clear(&mut self, player: u32) {
        self.ammo.remove(&player);
        self.reagents.retain(|(owner, _), _| *owner != player);
    }
}

impl InventoryService for InventoryBook {
    fn equipped_ammo(&self, player: u32) -> Option<AmmoStack> {
        self.ammo.get(&player).copied()
    }

    fn consume_ammo(&mut self, player: u32, item: u32) -> bool {
        match self.ammo.get_mut(&player) {
            Some(stack) if stack.item == item && stack.count > 0 => {
                stack.count -= 1;
                true
            }
            _ => false,
        }
    }

    fn has_reagents(&self, player: u32, spell: u32) -> bool {
        self.casts_left(player, spell) > 0
    }

    fn consume_reagents(&mut self, player: u32, spell: u32) -> bool {
        match self.reagents.get_mut(&(player, spell)) {
            Some(casts) if *casts > 0 => {
                *casts -= 1;
                true
            }
            _ => false,
        }
    }
}
