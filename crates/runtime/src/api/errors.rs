//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content loading and combat
//! commands so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::{AttackError, EntityRef, OracleError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("tick worker command channel closed")]
    CommandChannelClosed,

    #[error("tick worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("tick worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a content catalog before building")]
    MissingCatalog,

    #[error("failed to load content: {0}")]
    Content(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Attack(#[from] AttackError),

    #[error("{0} is already in the world")]
    DuplicateEntity(EntityRef),

    #[error("{0} is not in the world")]
    UnknownEntity(EntityRef),

    #[error("unknown npc definition {0}")]
    UnknownDefinition(u32),

    #[error("failed to install tracing subscriber: {0}")]
    Logging(String),
}
