//! Damage rolls for melee, ranged and magic.
//!
//! Every function floors at each intermediate step in the order shown in its
//! formula block. None of them fail: missing catalog data yields 0 damage.

use super::hit::check_hit;
use crate::env::{CombatRng, SpellDefinition};
use crate::stats::{BonusKind, CombatStats, Stat, style_bonus};

/// Flat constant added to a player's effective level.
pub const PLAYER_LEVEL_OFFSET: u64 = 8;

/// Constant style bonus every autonomous entity gets.
pub const NPC_STYLE_BONUS: u64 = 1;

/// Opposed rolls feeding [`check_hit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackRolls {
    pub attack: u64,
    pub defense: u64,
}

impl AttackRolls {
    pub fn lands(&self, rng: &mut dyn CombatRng) -> bool {
        check_hit(self.attack, self.defense, rng.next_f64())
    }
}

/// Effective level of `stat`.
///
/// # Formula
///
/// ```text
/// player: boosted + style_bonus(style, stat) + 8
/// npc:    boosted + 1 + 8
/// ```
pub fn effective_level(entity: &dyn CombatStats, stat: Stat) -> u64 {
    let style = match entity.combat_style() {
        Some(style) => u64::from(style_bonus(style, stat)),
        None => NPC_STYLE_BONUS,
    };
    u64::from(entity.boosted_level(stat)) + style + PLAYER_LEVEL_OFFSET
}

/// `bonus + 64`, never below zero.
fn bonus_factor(entity: &dyn CombatStats, kind: BonusKind) -> u64 {
    (i64::from(entity.bonus(kind)) + 64).max(0) as u64
}

fn gear_scaled(level: u64, factor: u64, multiplier: f64) -> u64 {
    ((level * factor) as f64 * multiplier).floor().max(0.0) as u64
}

/// Physical defense roll shared by melee and ranged.
pub fn defense_roll(target: &dyn CombatStats) -> u64 {
    effective_level(target, Stat::Defense) * bonus_factor(target, BonusKind::Defense)
}

/// # Formula
///
/// ```text
/// attack  = floor(eff_accuracy * (accuracy_bonus + 64) * gear_factor)
/// defense = eff_defense * (defense_bonus + 64)
/// ```
pub fn melee_rolls(attacker: &dyn CombatStats, target: &dyn CombatStats) -> AttackRolls {
    let multiplier = attacker.accuracy_multiplier_against(target.entity());
    AttackRolls {
        attack: gear_scaled(
            effective_level(attacker, Stat::Accuracy),
            bonus_factor(attacker, BonusKind::Accuracy),
            multiplier,
        ),
        defense: defense_roll(target),
    }
}

/// `floor((eff_strength * (strength_bonus + 64) + 320) / 640)`
pub fn melee_max_hit(attacker: &dyn CombatStats) -> u32 {
    let strength = effective_level(attacker, Stat::Strength);
    ((strength * bonus_factor(attacker, BonusKind::Strength) + 320) / 640) as u32
}

/// Melee swing: miss yields 0, a hit rolls uniformly in `[0, max_hit]`.
pub fn melee_damage(
    attacker: &dyn CombatStats,
    target: &dyn CombatStats,
    rng: &mut dyn CombatRng,
) -> u32 {
    if !melee_rolls(attacker, target).lands(rng) {
        return 0;
    }
    roll_up_to(melee_max_hit(attacker), 0, rng)
}

/// # Formula
///
/// ```text
/// attack  = floor(eff_ranged * (range_bonus + 64) * gear_factor)
/// defense = eff_defense * (defense_bonus + 64)
/// ```
pub fn ranged_rolls(attacker: &dyn CombatStats, target: &dyn CombatStats) -> AttackRolls {
    let multiplier = attacker.accuracy_multiplier_against(target.entity());
    AttackRolls {
        attack: gear_scaled(
            effective_level(attacker, Stat::Ranged),
            bonus_factor(attacker, BonusKind::Range),
            multiplier,
        ),
        defense: defense_roll(target),
    }
}

/// `floor(0.5 + eff_ranged * (range_bonus + 64) / 640)`, capped by the
/// ammunition's own maximum when one is known.
pub fn ranged_max_hit(attacker: &dyn CombatStats, ammo_cap: Option<u32>) -> u32 {
    let ranged = effective_level(attacker, Stat::Ranged);
    let raw = (0.5 + (ranged * bonus_factor(attacker, BonusKind::Range)) as f64 / 640.0).floor();
    let max_hit = raw as u32;
    match ammo_cap {
        Some(cap) => max_hit.min(cap),
        None => max_hit,
    }
}

pub fn ranged_damage(
    attacker: &dyn CombatStats,
    target: &dyn CombatStats,
    ammo_cap: Option<u32>,
    rng: &mut dyn CombatRng,
) -> u32 {
    if !ranged_rolls(attacker, target).lands(rng) {
        return 0;
    }
    roll_up_to(ranged_max_hit(attacker, ammo_cap), 0, rng)
}

/// Magic defense level of the target.
///
/// # Formula
///
/// ```text
/// player: floor(0.7 * boosted_magic + 0.3 * (boosted_defense + style_bonus)) + 8
/// npc:    magic + 9
/// ```
pub fn magic_defense_level(target: &dyn CombatStats) -> u64 {
    match target.combat_style() {
        Some(style) => {
            let magic = f64::from(target.boosted_level(Stat::Magic));
            let defense = f64::from(
                target.boosted_level(Stat::Defense) + style_bonus(style, Stat::Defense),
            );
            (0.7 * magic + 0.3 * defense).floor() as u64 + PLAYER_LEVEL_OFFSET
        }
        None => effective_level(target, Stat::Magic),
    }
}

/// # Formula
///
/// ```text
/// attack  = eff_magic * (magic_bonus + 64)
/// defense = magic_defense_level * (target_magic_bonus + 64)
/// ```
pub fn magic_rolls(attacker: &dyn CombatStats, target: &dyn CombatStats) -> AttackRolls {
    AttackRolls {
        attack: effective_level(attacker, Stat::Magic) * bonus_factor(attacker, BonusKind::Magic),
        defense: magic_defense_level(target) * bonus_factor(target, BonusKind::Magic),
    }
}

/// Unconditional cast: uniform in `[1, max_damage]`, 0 for unknown spells or
/// spells that deal no damage.
pub fn magic_damage_flat(spell: Option<&SpellDefinition>, rng: &mut dyn CombatRng) -> u32 {
    match spell {
        Some(spell) if spell.max_damage > 0 => roll_up_to(spell.max_damage, 1, rng),
        _ => 0,
    }
}

/// Cast against a target; accuracy-gated spells must win [`magic_rolls`] first.
pub fn magic_damage(
    attacker: &dyn CombatStats,
    target: &dyn CombatStats,
    spell: Option<&SpellDefinition>,
    rng: &mut dyn CombatRng,
) -> u32 {
    let Some(definition) = spell else {
        return 0;
    };
    if definition.accuracy_gated && !magic_rolls(attacker, target).lands(rng) {
        return 0;
    }
    magic_damage_flat(spell, rng)
}

fn roll_up_to(max_hit: u32, floor: u32, rng: &mut dyn CombatRng) -> u32 {
    if max_hit < floor {
        return 0;
    }
    rng.range_inclusive(i64::from(floor), i64::from(max_hit)) as u32
}

/// Outcome of applying a raw roll to a victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedDamage {
    /// `min(raw, current_hp)`.
    pub dealt: u32,
    pub remaining_hp: u32,
}

impl AppliedDamage {
    pub const fn is_fatal(&self) -> bool {
        self.remaining_hp == 0
    }
}

/// Caps `raw` at the victim's hit points; HP never goes below zero.
pub fn apply_damage(current_hp: u32, raw: u32) -> AppliedDamage {
    let dealt = raw.min(current_hp);
    AppliedDamage {
        dealt,
        remaining_hp: current_hp - dealt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{NpcDefinition, SpellKind};
    use crate::state::{Npc, Player, Position};
    use crate::stats::{CombatStyle, EquipmentBonuses, Levels};
    use crate::testing::ScriptedRng;

    fn player(level: u32) -> Player {
        Player::new(1, Position::new(0, 10, 10), Levels::uniform(level))
    }

    fn npc(level: u32, hits: u32) -> Npc {
        Npc::spawn(7, &NpcDefinition::melee(3, "guard", level, hits), Position::new(0, 11, 10))
    }

    fn spell(max_damage: u32, accuracy_gated: bool) -> SpellDefinition {
        SpellDefinition {
            id: 1,
            name: "bolt".into(),
            kind: SpellKind::Combat,
            max_damage,
            accuracy_gated,
            base_experience: 10,
        }
    }

    #[test]
    fn effective_levels_use_style_and_offsets() {
        let mut attacker = player(40);
        attacker.style = CombatStyle::Accurate;
        assert_eq!(effective_level(&attacker, Stat::Accuracy), 40 + 3 + 8);
        attacker.style = CombatStyle::Controlled;
        assert_eq!(effective_level(&attacker, Stat::Accuracy), 40 + 1 + 8);
        assert_eq!(effective_level(&npc(30, 20), Stat::Defense), 39);
    }

    #[test]
    fn melee_rolls_follow_formula() {
        let mut attacker = player(40);
        attacker.style = CombatStyle::Accurate;
        attacker.bonuses = EquipmentBonuses::default().with(BonusKind::Accuracy, 16);
        let target = npc(30, 20);

        let rolls = melee_rolls(&attacker, &target);
        assert_eq!(rolls.attack, 51 * 80);
        assert_eq!(rolls.defense, 39 * 64);
    }

    #[test]
    fn gear_factor_only_applies_against_npcs() {
        let mut attacker = player(40);
        attacker.bonuses.accuracy_multiplier = 1.5;
        let npc_target = npc(30, 20);
        let player_target = player(40);

        let base = effective_level(&attacker, Stat::Accuracy) * 64;
        assert_eq!(melee_rolls(&attacker, &npc_target).attack, (base as f64 * 1.5) as u64);
        assert_eq!(melee_rolls(&attacker, &player_target).attack, base);
    }

    #[test]
    fn negative_bonus_clamps_at_zero() {
        let mut attacker = player(10);
        attacker.bonuses = EquipmentBonuses::default().with(BonusKind::Accuracy, -100);
        assert_eq!(melee_rolls(&attacker, &npc(1, 1)).attack, 0);
    }

    #[test]
    fn melee_max_hit_formula() {
        let mut attacker = player(99);
        attacker.style = CombatStyle::Aggressive;
        attacker.bonuses = EquipmentBonuses::default().with(BonusKind::Strength, 82);
        // (110 * 146 + 320) / 640 = 25.59
        assert_eq!(melee_max_hit(&attacker), 25);
    }

    #[test]
    fn melee_miss_deals_nothing() {
        let attacker = player(1);
        let target = npc(99, 50);
        let mut rng = ScriptedRng::new([0.99, 0.99]);
        assert_eq!(melee_damage(&attacker, &target, &mut rng), 0);
    }

    #[test]
    fn melee_hit_rolls_within_max() {
        let mut attacker = player(99);
        attacker.style = CombatStyle::Aggressive;
        let target = npc(1, 50);
        let max = melee_max_hit(&attacker);
        let mut rng = ScriptedRng::new([0.0, 0.999]);
        assert_eq!(melee_damage(&attacker, &target, &mut rng), max);
    }

    #[test]
    fn ranged_max_hit_rounds_and_caps() {
        let mut attacker = player(70);
        attacker.style = CombatStyle::Rapid;
        attacker.bonuses = EquipmentBonuses::default().with(BonusKind::Range, 30);
        // floor(0.5 + 81 * 94 / 640) = floor(12.396) = 12
        assert_eq!(ranged_max_hit(&attacker, None), 12);
        assert_eq!(ranged_max_hit(&attacker, Some(8)), 8);
    }

    #[test]
    fn player_magic_defense_weights_magic_and_defense() {
        let mut target = player(1);
        target.levels.set_actual(Stat::Magic, 60);
        target.levels.set_actual(Stat::Defense, 40);
        target.style = CombatStyle::Defensive;
        // floor(0.7 * 60 + 0.3 * 43) + 8 = floor(54.9) + 8
        assert_eq!(magic_defense_level(&target), 62);
        assert_eq!(magic_defense_level(&npc(30, 10)), 1 + 9);
    }

    #[test]
    fn flat_magic_rolls_from_one() {
        let bolt = spell(10, false);
        let mut rng = ScriptedRng::new([0.0]);
        assert_eq!(magic_damage_flat(Some(&bolt), &mut rng), 1);
        let mut rng = ScriptedRng::new([0.999]);
        assert_eq!(magic_damage_flat(Some(&bolt), &mut rng), 10);
    }

    #[test]
    fn missing_spell_deals_nothing() {
        let mut rng = ScriptedRng::new([0.5]);
        assert_eq!(magic_damage_flat(None, &mut rng), 0);
        assert_eq!(magic_damage(&player(50), &npc(1, 10), None, &mut rng), 0);
        assert_eq!(magic_damage_flat(Some(&spell(0, false)), &mut rng), 0);
    }

    #[test]
    fn gated_magic_can_miss() {
        let bolt = spell(10, true);
        let mut rng = ScriptedRng::new([0.999, 0.5]);
        assert_eq!(magic_damage(&player(1), &npc(1, 10), Some(&bolt), &mut rng), 0);
    }

    #[test]
    fn apply_damage_caps_at_current_hp() {
        let applied = apply_damage(5, 12);
        assert_eq!(applied.dealt, 5);
        assert_eq!(applied.remaining_hp, 0);
        assert!(applied.is_fatal());

        let applied = apply_damage(20, 7);
        assert_eq!(applied, AppliedDamage { dealt: 7, remaining_hp: 13 });
    }
}
