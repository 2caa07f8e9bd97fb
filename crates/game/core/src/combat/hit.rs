//! Hit chance from opposed accuracy/defense rolls.

/// Probability an attack lands.
///
/// # Formula
///
/// ```text
/// attack > defense:  1 - (defense + 2) / (2 * (attack + 1))
/// otherwise:         attack / (2 * (defense + 1))
/// ```
pub fn hit_chance(attack_roll: u64, defense_roll: u64) -> f64 {
    let attack = attack_roll as f64;
    let defense = defense_roll as f64;
    if attack_roll > defense_roll {
        1.0 - (defense + 2.0) / (2.0 * (attack + 1.0))
    } else {
        attack / (2.0 * (defense + 1.0))
    }
}

/// True when a uniform `[0, 1)` draw falls under the hit chance.
pub fn check_hit(attack_roll: u64, defense_roll: u64, draw: f64) -> bool {
    draw < hit_chance(attack_roll, defense_roll)
}
