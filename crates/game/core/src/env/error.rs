//! Collaborator availability errors.

use crate::error::{ErrorSeverity, GameError};

/// A required collaborator was not provided when building a [`CombatEnv`].
///
/// Optional collaborators (line of sight, PvP zones, interaction policy) never
/// produce this error; their absence is treated permissively.
///
/// [`CombatEnv`]: super::CombatEnv
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("DefinitionOracle not available")]
    DefinitionsNotAvailable,

    #[error("TargetingOracle not available")]
    TargetingNotAvailable,

    #[error("InventoryService not available")]
    InventoryNotAvailable,

    #[error("VisibilityIndex not available")]
    VisibilityNotAvailable,

    #[error("LootService not available")]
    LootNotAvailable,

    #[error("TeleportService not available")]
    TeleportNotAvailable,

    #[error("EventSink not available")]
    EventsNotAvailable,

    #[error("CombatRng not available")]
    RngNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            DefinitionsNotAvailable => "ORACLE_DEFINITIONS_NOT_AVAILABLE",
            TargetingNotAvailable => "ORACLE_TARGETING_NOT_AVAILABLE",
            InventoryNotAvailable => "ORACLE_INVENTORY_NOT_AVAILABLE",
            VisibilityNotAvailable => "ORACLE_VISIBILITY_NOT_AVAILABLE",
            LootNotAvailable => "ORACLE_LOOT_NOT_AVAILABLE",
            TeleportNotAvailable => "ORACLE_TELEPORT_NOT_AVAILABLE",
            EventsNotAvailable => "ORACLE_EVENTS_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}
