//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::EnumCount;
use tokio::sync::broadcast;

use super::types::{Notification, TickEvent};
use combat_core::CombatEvent;

/// Topics for event routing
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::EnumCount,
    strum::Display,
)]
pub enum Topic {
    /// Damage, hit point and projectile notifications
    Combat,
    /// Deaths, removals, respawns
    Lifecycle,
    /// Text for individual players
    Messages,
    /// Tick boundaries
    Tick,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Combat(Notification),
    Lifecycle(Notification),
    Message(Notification),
    Tick(TickEvent),
}

impl Event {
    /// Wraps a combat-core event under its topic.
    pub fn from_notification(notification: Notification) -> Self {
        match notification.event {
            CombatEvent::DamageDealt { .. }
            | CombatEvent::HitpointsChanged { .. }
            | CombatEvent::ProjectileFired { .. } => Event::Combat(notification),
            CombatEvent::NpcDied { .. }
            | CombatEvent::NpcRemoved { .. }
            | CombatEvent::NpcReadded { .. }
            | CombatEvent::PlayerDied { .. }
            | CombatEvent::PlayerRespawned { .. } => Event::Lifecycle(notification),
            CombatEvent::PlayerMessage { .. } => Event::Message(notification),
        }
    }

    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Lifecycle(_) => Topic::Lifecycle,
            Event::Message(_) => Topic::Messages,
            Event::Tick(_) => Topic::Tick,
        }
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Event::Combat(n) | Event::Lifecycle(n) | Event::Message(n) => Some(n),
            Event::Tick(_) => None,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels for every topic exist from construction,
/// so publishing and subscribing never take a lock.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; Topic::COUNT]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = std::array::from_fn(|_| broadcast::channel(capacity.max(1)).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        &self.channels[topic as usize]
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
