//! Attack speed (ticks between attacks).

use crate::config::CombatConfig;
use crate::env::{DefinitionOracle, NpcDefinition, WeaponDefinition};
use crate::stats::Combatant;

/// Base swing the NPC speed multiplier scales.
pub const BASE_SWING_TICKS: f64 = 6.0;

/// `round(multiplier * 6)`, falling back to the default when non-positive.
pub fn npc_attack_speed(definition: Option<&NpcDefinition>, config: &CombatConfig) -> u32 {
    let ticks = definition
        .map(|def| (def.attack_speed * BASE_SWING_TICKS).round())
        .unwrap_or(0.0);
    if ticks >= 1.0 {
        ticks as u32
    } else {
        config.default_attack_speed
    }
}

pub fn player_attack_speed(weapon: Option<&WeaponDefinition>, config: &CombatConfig) -> u32 {
    match weapon {
        Some(weapon) if weapon.attack_speed > 0 => weapon.attack_speed as u32,
        _ => config.default_attack_speed,
    }
}

/// Attack speed of either entity kind; always at least one tick.
pub fn attack_speed(
    entity: Combatant<'_>,
    definitions: &dyn DefinitionOracle,
    config: &CombatConfig,
) -> u32 {
    let ticks = match entity {
        Combatant::Player(player) => {
            let weapon = player.weapon.and_then(|id| definitions.weapon(id));
            player_attack_speed(weapon, config)
        }
        Combatant::Npc(npc) => npc_attack_speed(definitions.npc(npc.definition), config),
    };
    ticks.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npc_multiplier_scales_base_swing() {
        let config = CombatConfig::default();
        let mut def = NpcDefinition::melee(1, "rat", 1, 2);
        def.attack_speed = 0.7;
        assert_eq!(npc_attack_speed(Some(&def), &config), 4);
        def.attack_speed = 1.0;
        assert_eq!(npc_attack_speed(Some(&def), &config), 6);
        def.attack_speed = 0.0;
        assert_eq!(npc_attack_speed(Some(&def), &config), 6);
        assert_eq!(npc_attack_speed(None, &config), 6);
    }

    #[test]
    fn player_speed_falls_back_on_missing_or_non_positive() {
        let config = CombatConfig::default();
        let fast = WeaponDefinition {
            id: 4,
            attack_speed: 4,
            ranged: None,
        };
        let broken = WeaponDefinition {
            id: 5,
            attack_speed: -2,
            ranged: None,
        };
        assert_eq!(player_attack_speed(Some(&fast), &config), 4);
        assert_eq!(player_attack_speed(Some(&broken), &config), 6);
        assert_eq!(player_attack_speed(None, &config), 6);
    }
}
