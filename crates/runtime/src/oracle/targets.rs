//! Target registry implementing [`combat_core::TargetingOracle`].
use std::collections::BTreeMap;

use combat_core::{EntityRef, TargetingOracle};

/// Who is attacking whom, keyed by attacker.
#[derive(Clone, Debug, Default)]
pub struct TargetRegistry {
    targets: BTreeMap<EntityRef, EntityRef>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every engagement involving `entity`, either side.
    pub fn forget(&mut self, entity: EntityRef) {
        self.targets
            .retain(|attacker, target| *attacker != entity && *target != entity);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl TargetingOracle for TargetRegistry {
    fn target_of(&self, entity: EntityRef) -> Option<EntityRef> {
        self.targets.get(&entity).copied()
    }

    fn set_target(&mut self, entity: EntityRef, target: EntityRef) {
        self.targets.insert(entity, target);
    }

    fn clear_target(&mut self, entity: EntityRef) {
        self.targets.remove(&entity);
    }

    fn clear_targets_on(&mut self, victim: EntityRef) -> Vec<EntityRef> {
        let attackers: Vec<EntityRef> = self
            .targets
            .iter()
            .filter(|(_, target)| **target == victim)
            .map(|(attacker, _)| *attacker)
            .collect();
        for attacker in &attackers {
            self.targets.remove(attacker);
        }
        attackers
    }

    fn player_targets(&self) -> Vec<(u32, EntityRef)> {
        self.targets
            .iter()
            .filter(|(attacker, _)| attacker.is_player())
            .map(|(attacker, target)| (attacker.id, *target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_a_victim_returns_its_attackers() {
        let mut registry = TargetRegistry::new();
        let npc = EntityRef::npc(9);
        registry.set_target(EntityRef::player(1), npc);
        registry.set_target(EntityRef::player(2), npc);
        registry.set_target(npc, EntityRef::player(1));

        let cleared = registry.clear_targets_on(npc);

        assert_eq!(cleared, vec![EntityRef::player(1), EntityRef::player(2)]);
        assert_eq!(registry.player_targets(), vec![]);
        assert_eq!(registry.target_of(npc), Some(EntityRef::player(1)));
    }

    #[test]
    fn forget_removes_both_directions() {
        let mut registry = TargetRegistry::new();
        registry.set_target(EntityRef::player(1), EntityRef::player(2));
        registry.set_target(EntityRef::player(2), EntityRef::player(1));
        registry.set_target(EntityRef::player(3), EntityRef::npc(1));

        registry.forget(EntityRef::player(2));

        assert_eq!(registry.len(), 1);
    }
}
