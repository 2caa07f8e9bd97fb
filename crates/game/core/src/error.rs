//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`AttackError`, `LifecycleError`, `OracleError`)
//! live next to the code that produces them and share the [`GameError`]
//! classification defined here.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: expected negative outcome; may succeed on a later tick
/// - **Validation**: invalid request, should not be retried unchanged
/// - **Internal**: unexpected state inconsistency, logged and skipped
/// - **Fatal**: the combat core cannot run (e.g. missing required collaborator)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: attacker on cooldown, target out of range.
    Recoverable,

    /// Examples: target missing, PvP outside a PvP zone.
    Validation,

    /// Examples: dying entity still has hit points, illegal lifecycle transition.
    Internal,

    /// Examples: required collaborator not wired into the env.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
