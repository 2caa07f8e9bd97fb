//! Error types for attack attempts and death bookkeeping.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatState, EntityRef};

/// Expected negative outcomes of one attack attempt.
///
/// These are ordinary branches of a tick, never failures of it: the resolver
/// settles each one (message, target reset) and moves on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("attacker is not in a combat-active state ({0:?})")]
    NotCombatActive(CombatState),

    #[error("attacker on cooldown for {remaining} more ticks")]
    OnCooldown { remaining: u32 },

    #[error("entity {0} has no target")]
    NoTarget(EntityRef),

    #[error("entity {0} is not in the live collections")]
    TargetMissing(EntityRef),

    #[error("entity {0} is already dying or dead")]
    ParticipantDead(EntityRef),

    #[error("{attacker} may not attack {target}")]
    PermissionDenied {
        attacker: EntityRef,
        target: EntityRef,
    },

    #[error("target out of range (distance {distance:?}, range {range})")]
    OutOfRange { distance: Option<u32>, range: u32 },

    #[error("no line of sight to target")]
    NoLineOfSight,

    #[error("a barrier blocks the melee attack")]
    EdgeBlocked,

    #[error("player {0} has no ammunition")]
    OutOfAmmo(u32),

    #[error("player {player} lacks reagents for spell {spell}")]
    MissingReagents { player: u32, spell: u32 },

    #[error("both players must stand in a PvP zone")]
    PvpNotAllowed,

    #[error("combat level difference {difference} exceeds bracket {allowed}")]
    LevelBracket { difference: u32, allowed: u32 },
}

impl AttackError {
    /// Message shown to the attacking player, if any.
    pub fn player_message(&self) -> Option<&'static str> {
        match self {
            AttackError::PermissionDenied { .. } => Some("You can't attack that."),
            AttackError::OutOfAmmo(_) => Some("You have no ammunition left."),
            AttackError::MissingReagents { .. } => {
                Some("You do not have enough runes to cast this spell.")
            }
            AttackError::PvpNotAllowed => Some("You can only attack other players in a PvP zone."),
            AttackError::LevelBracket { .. } => {
                Some("Your level difference is too great to attack that player.")
            }
            _ => None,
        }
    }

    /// Whether the attacker's target is cleared and their state reset to idle.
    pub fn cancels_engagement(&self) -> bool {
        matches!(
            self,
            AttackError::TargetMissing(_)
                | AttackError::ParticipantDead(_)
                | AttackError::PermissionDenied { .. }
                | AttackError::OutOfAmmo(_)
                | AttackError::PvpNotAllowed
                | AttackError::LevelBracket { .. }
        )
    }
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        use AttackError::*;
        match self {
            NotCombatActive(_) | OnCooldown { .. } | NoTarget(_) | OutOfRange { .. }
            | NoLineOfSight | EdgeBlocked => ErrorSeverity::Recoverable,
            TargetMissing(_)
            | ParticipantDead(_)
            | PermissionDenied { .. }
            | OutOfAmmo(_)
            | MissingReagents { .. }
            | PvpNotAllowed
            | LevelBracket { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use AttackError::*;
        match self {
            NotCombatActive(_) => "ATTACK_NOT_COMBAT_ACTIVE",
            OnCooldown { .. } => "ATTACK_ON_COOLDOWN",
            NoTarget(_) => "ATTACK_NO_TARGET",
            TargetMissing(_) => "ATTACK_TARGET_MISSING",
            ParticipantDead(_) => "ATTACK_PARTICIPANT_DEAD",
            PermissionDenied { .. } => "ATTACK_PERMISSION_DENIED",
            OutOfRange { .. } => "ATTACK_OUT_OF_RANGE",
            NoLineOfSight => "ATTACK_NO_LINE_OF_SIGHT",
            EdgeBlocked => "ATTACK_EDGE_BLOCKED",
            OutOfAmmo(_) => "ATTACK_OUT_OF_AMMO",
            MissingReagents { .. } => "ATTACK_MISSING_REAGENTS",
            PvpNotAllowed => "ATTACK_PVP_NOT_ALLOWED",
            LevelBracket { .. } => "ATTACK_LEVEL_BRACKET",
        }
    }
}

/// Data-integrity anomalies; logged and skipped for the tick.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("{entity} marked dying with {hp} hit points left")]
    StillHasHitpoints { entity: EntityRef, hp: u32 },

    #[error("{0} is due to respawn but is already live")]
    AlreadyLive(EntityRef),

    #[error("{entity} references unknown definition {definition}")]
    MissingDefinition { entity: EntityRef, definition: u32 },
}

impl GameError for IntegrityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            IntegrityError::StillHasHitpoints { .. } => "INTEGRITY_STILL_HAS_HITPOINTS",
            IntegrityError::AlreadyLive(_) => "INTEGRITY_ALREADY_LIVE",
            IntegrityError::MissingDefinition { .. } => "INTEGRITY_MISSING_DEFINITION",
        }
    }
}
