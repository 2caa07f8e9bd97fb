//! Per-entity combat lifecycle.
//!
//! Every combat entity carries exactly one [`CombatState`]. All changes go
//! through [`CombatState::transition`], so "is this entity attackable / in
//! combat / dead" is answered in one place instead of by cross-checking
//! cooldowns, target tables and dying sets.

use crate::combat::AttackMode;
use crate::error::{ErrorSeverity, GameError};

/// Combat lifecycle of a single entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatState {
    /// Not engaged in combat.
    #[default]
    Idle,
    /// Has a target but has not committed to an attack mode yet.
    Engaging,
    /// Combat-active in the given mode.
    Attacking(AttackMode),
    /// Reached 0 HP this tick; waiting for death processing.
    Dying,
    /// Death processed; death animation / death timer running.
    Dead,
    /// Corpse removed; waiting for the respawn timer.
    Respawning,
}

/// Inputs to the lifecycle state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Engage,
    Attack(AttackMode),
    Disengage,
    Killed,
    /// Death processing found hit points left; back to the living.
    Recover,
    DeathProcessed,
    BeginRespawn,
    Revive,
}

/// Rejected lifecycle transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("illegal lifecycle transition {event:?} from {from:?}")]
pub struct LifecycleError {
    pub from: CombatState,
    pub event: LifecycleEvent,
}

impl GameError for LifecycleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "LIFECYCLE_ILLEGAL_TRANSITION"
    }
}

impl CombatState {
    /// The single authoritative transition function.
    pub fn transition(self, event: LifecycleEvent) -> Result<CombatState, LifecycleError> {
        use CombatState::*;
        use LifecycleEvent as E;

        let next = match (self, event) {
            (Idle | Engaging | Attacking(_), E::Engage) => Engaging,
            (Idle | Engaging | Attacking(_), E::Attack(mode)) => Attacking(mode),
            (Idle | Engaging | Attacking(_), E::Disengage) => Idle,
            (Idle | Engaging | Attacking(_), E::Killed) => Dying,
            (Dying, E::DeathProcessed) => Dead,
            (Dying, E::Recover) => Idle,
            (Dead, E::BeginRespawn) => Respawning,
            (Dead | Respawning, E::Revive) => Idle,
            (from, event) => return Err(LifecycleError { from, event }),
        };
        Ok(next)
    }

    /// Applies `event` in place; the state is untouched on error.
    pub fn apply(&mut self, event: LifecycleEvent) -> Result<CombatState, LifecycleError> {
        let next = self.transition(event)?;
        *self = next;
        Ok(next)
    }

    /// True for the three combat-active states.
    pub const fn is_combat_active(self) -> bool {
        matches!(self, CombatState::Attacking(_))
    }

    /// False once the entity has reached 0 HP, until it is revived.
    pub const fn is_alive(self) -> bool {
        matches!(
            self,
            CombatState::Idle | CombatState::Engaging | CombatState::Attacking(_)
        )
    }

    pub const fn attack_mode(self) -> Option<AttackMode> {
        match self {
            CombatState::Attacking(mode) => Some(mode),
            _ => None,
        }
    }
}
