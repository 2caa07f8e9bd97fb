pub mod common;
pub mod npc;
pub mod player;

pub use common::{EntityKind, EntityRef, Position, Tick};
pub use npc::Npc;
pub use player::{Experience, Player, TimedAction};
