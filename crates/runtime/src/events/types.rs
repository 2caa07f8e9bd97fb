//! Event payloads published on the bus.

use serde::{Deserialize, Serialize};

use combat_core::{CombatEvent, EntityRef, Tick};

/// A combat-core notification stamped with its tick and the players who can see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub tick: Tick,
    pub event: CombatEvent,
    /// Players in view of the event position (or the recipient of a message).
    pub viewers: Vec<EntityRef>,
}

/// Per-tick summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    pub tick: Tick,
    pub attacks: usize,
    pub kills: usize,
}
