//! Runtime orchestration for the tick-synchronized combat rules.
//!
//! This crate wires in-memory collaborators, a topic event bus, and a tokio
//! tick worker into a cohesive runtime API. Consumers embed [`Runtime`] to
//! drive ticks, subscribe to events, and interact with the world through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] provides the collaborator implementations
//! - [`logging`] installs a tracing subscriber
//! - workers keep background tasks internal to the crate
pub mod api;
pub mod events;
pub mod logging;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, Notification, TickEvent, Topic};
pub use logging::init_tracing;
pub use oracle::{
    GridVisibility, InventoryBook, LootRecord, LootRecorder, OpenLineOfSight, OracleManager,
    OwnershipPolicy, PvpZone, RectPvpZones, TargetRegistry, TeleportRecorder,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, TICK_INTERVAL};
