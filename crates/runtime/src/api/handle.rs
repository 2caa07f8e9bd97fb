//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! spawning entities, engaging targets, stepping ticks, and streaming events
//! from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{AmmoStack, AttackMode, EntityRef, Player, Position, TickSummary, World};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::LootRecord;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Add a player to the world.
    pub async fn spawn_player(&self, player: Player) -> Result<()> {
        self.request(|reply| Command::SpawnPlayer {
            player: Box::new(player),
            reply,
        })
        .await?
    }

    /// Spawn an NPC from a catalog definition at its spawn point.
    pub async fn spawn_npc(&self, id: u32, definition: u32, position: Position) -> Result<()> {
        self.request(|reply| Command::SpawnNpc {
            id,
            definition,
            position,
            owner: None,
            reply,
        })
        .await?
    }

    /// Spawn a one-shot NPC only `owner` may attack.
    pub async fn spawn_instanced_npc(
        &self,
        id: u32,
        definition: u32,
        position: Position,
        owner: u32,
    ) -> Result<()> {
        self.request(|reply| Command::SpawnNpc {
            id,
            definition,
            position,
            owner: Some(owner),
            reply,
        })
        .await?
    }

    pub async fn remove_player(&self, player: u32) -> Result<()> {
        self.request(|reply| Command::RemovePlayer { player, reply })
            .await?
    }

    /// Point a player at a target; attacks start on the next tick.
    pub async fn engage(&self, player: u32, target: EntityRef) -> Result<AttackMode> {
        self.request(|reply| Command::Engage {
            player,
            target,
            reply,
        })
        .await?
    }

    pub async fn disengage(&self, player: u32) -> Result<()> {
        self.request(|reply| Command::Disengage { player, reply })
            .await
    }

    /// Kill a player outside combat (falls, poison). Returns false if they were
    /// absent or already dead.
    pub async fn mark_player_dying(&self, player: u32, killer: Option<EntityRef>) -> Result<bool> {
        self.request(|reply| Command::MarkPlayerDying {
            player,
            killer,
            reply,
        })
        .await
    }

    pub async fn set_ammo(&self, player: u32, stack: Option<AmmoStack>) -> Result<()> {
        self.request(|reply| Command::SetAmmo {
            player,
            stack,
            reply,
        })
        .await
    }

    pub async fn grant_reagents(&self, player: u32, spell: u32, casts: u32) -> Result<()> {
        self.request(|reply| Command::GrantReagents {
            player,
            spell,
            casts,
            reply,
        })
        .await
    }

    /// Run one tick now, independent of the interval.
    pub async fn step(&self) -> Result<TickSummary> {
        self.request(|reply| Command::Step { reply }).await?
    }

    /// Query the current world (read-only snapshot)
    pub async fn query_world(&self) -> Result<World> {
        self.request(|reply| Command::QueryWorld { reply }).await
    }

    /// Take the loot requests recorded since the last drain.
    pub async fn drain_loot(&self) -> Result<Vec<LootRecord>> {
        self.request(|reply| Command::DrainLoot { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - damage, hit points, projectiles
    /// - `Topic::Lifecycle` - deaths, removals, respawns
    /// - `Topic::Messages` - text for individual players
    /// - `Topic::Tick` - one summary per tick
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
