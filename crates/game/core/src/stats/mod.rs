//! Combat stat provider.
//!
//! Levels, equipment bonuses and combat styles, plus [`CombatStats`], the one
//! read surface the damage calculator uses for players and autonomous
//! entities alike.

pub mod bonus;
pub mod levels;
pub mod provider;
pub mod style;

pub use bonus::{BonusKind, EquipmentBonuses};
pub use levels::{Levels, Stat, combat_level};
pub use provider::{CombatStats, Combatant, CombatantMut, HitpointsMut};
pub use style::{CombatStyle, StyleFocus, style_bonus};
