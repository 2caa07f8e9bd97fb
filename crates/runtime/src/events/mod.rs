//! Topic-based event routing for combat notifications.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{Notification, TickEvent};
