//! Experience awarded to player attackers.

use super::mode::AttackMode;
use crate::state::Player;
use crate::stats::{CombatStyle, Stat};

/// Experience per point of melee or ranged damage.
pub const COMBAT_XP_PER_DAMAGE: u64 = 4;

/// Experience per point of magic damage, on top of the spell's base.
pub const MAGIC_XP_PER_DAMAGE: u64 = 2;

/// Stat/amount pairs earned by one attack.
///
/// # Formula
///
/// ```text
/// melee:  4 * dmg split evenly over the style's focus stats
/// ranged: 4 * dmg to Ranged
/// magic:  base_experience + 2 * dmg to Magic
/// all:    floor(4 * dmg / 3) to Hits
/// ```
pub fn experience_for(
    mode: AttackMode,
    style: CombatStyle,
    spell_base: u64,
    damage: u32,
) -> Vec<(Stat, u64)> {
    let damage = u64::from(damage);
    let mut awards = Vec::new();

    match mode {
        AttackMode::Melee => {
            let stats: Vec<Stat> = style
                .focus()
                .stats()
                .filter(|stat| *stat != Stat::Ranged)
                .collect();
            let stats = if stats.is_empty() {
                vec![Stat::Accuracy, Stat::Defense, Stat::Strength]
            } else {
                stats
            };
            let share = COMBAT_XP_PER_DAMAGE * damage / stats.len() as u64;
            awards.extend(stats.into_iter().map(|stat| (stat, share)));
        }
        AttackMode::Ranged => awards.push((Stat::Ranged, COMBAT_XP_PER_DAMAGE * damage)),
        AttackMode::Magic => awards.push((Stat::Magic, spell_base + MAGIC_XP_PER_DAMAGE * damage)),
    }

    if damage > 0 {
        awards.push((Stat::Hits, COMBAT_XP_PER_DAMAGE * damage / 3));
    }
    awards.retain(|(_, amount)| *amount > 0);
    awards
}

/// Credits `experience_for` to the player.
pub fn award_experience(player: &mut Player, mode: AttackMode, spell_base: u64, damage: u32) {
    for (stat, amount) in experience_for(mode, player.style, spell_base, damage) {
        player.experience.add(stat, amount);
    }
}
