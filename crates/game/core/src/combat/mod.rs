//! Damage calculator.
//!
//! Pure functions for hit chance, damage rolls, attack speed and experience,
//! plus the kill-credit ledger. Randomness is drawn only through
//! [`CombatRng`](crate::env::CombatRng).

pub mod damage;
pub mod experience;
pub mod hit;
pub mod ledger;
pub mod mode;
pub mod speed;

pub use damage::{
    AppliedDamage, AttackRolls, apply_damage, effective_level, magic_damage, magic_damage_flat,
    magic_rolls, melee_damage, melee_max_hit, melee_rolls, ranged_damage, ranged_max_hit,
    ranged_rolls,
};
pub use experience::{award_experience, experience_for};
pub use hit::{check_hit, hit_chance};
pub use ledger::{DamageLedger, DamageLedgers};
pub use mode::{AttackMode, AttackPlan};
pub use speed::{attack_speed, npc_attack_speed, player_attack_speed};
