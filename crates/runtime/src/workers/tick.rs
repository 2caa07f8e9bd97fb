//! Tick worker that owns the authoritative [`World`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs
//! [`CombatSystem::tick`] on every interval tick (or on `Step`), and publishes
//! the resulting notifications on the [`EventBus`].

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use combat_core::{
    AmmoStack, AttackMode, CombatEvent, CombatSystem, DefinitionOracle, EntityRef, LifecycleEvent,
    Npc, Player, Position, TargetingOracle, Tick, TickSummary, VisibilityIndex, World,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, Notification, TickEvent};
use crate::oracle::{LootRecord, OracleManager};

/// Commands that can be sent to the tick worker
pub enum Command {
    SpawnPlayer {
        player: Box<Player>,
        reply: oneshot::Sender<Result<()>>,
    },
    SpawnNpc {
        id: u32,
        definition: u32,
        position: Position,
        /// Owner of an instanced, non-respawning entity.
        owner: Option<u32>,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Removes a player who logged out, with every engagement on them.
    RemovePlayer {
        player: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    Engage {
        player: u32,
        target: EntityRef,
        reply: oneshot::Sender<Result<AttackMode>>,
    },
    Disengage {
        player: u32,
        reply: oneshot::Sender<()>,
    },
    /// Non-combat fatal damage: zeroes hit points and marks the player dying.
    MarkPlayerDying {
        player: u32,
        killer: Option<EntityRef>,
        reply: oneshot::Sender<bool>,
    },
    SetAmmo {
        player: u32,
        stack: Option<AmmoStack>,
        reply: oneshot::Sender<()>,
    },
    GrantReagents {
        player: u32,
        spell: u32,
        casts: u32,
        reply: oneshot::Sender<()>,
    },
    /// Runs one tick immediately.
    Step {
        reply: oneshot::Sender<Result<TickSummary>>,
    },
    QueryWorld {
        reply: oneshot::Sender<World>,
    },
    DrainLoot {
        reply: oneshot::Sender<Vec<LootRecord>>,
    },
    Shutdown,
}

/// Background task that drives combat ticks.
pub struct TickWorker {
    world: World,
    system: CombatSystem,
    oracles: OracleManager,
    command_rx: mpsc::Receiver<Command>,
    bus: EventBus,
    tick_interval: Option<Duration>,
}

impl TickWorker {
    pub fn new(
        system: CombatSystem,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        bus: EventBus,
        tick_interval: Option<Duration>,
    ) -> Self {
        Self {
            world: World::new(),
            system,
            oracles,
            command_rx,
            bus,
            tick_interval,
        }
    }

    /// Main worker loop. Without an interval, ticks only advance on `Step`.
    pub async fn run(mut self) {
        let mut interval = self.tick_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::Shutdown) | None => break,
                        Some(cmd) => self.handle_command(cmd),
                    }
                }
                _ = next_tick(&mut interval) => {
                    if let Err(err) = self.step() {
                        tracing::error!("tick {} failed: {}", self.system.now(), err);
                    }
                }
            }
        }
        tracing::debug!("tick worker stopped at {}", self.system.now());
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SpawnPlayer { player, reply } => {
                let _ = reply.send(self.spawn_player(*player));
            }
            Command::SpawnNpc {
                id,
                definition,
                position,
                owner,
                reply,
            } => {
                let _ = reply.send(self.spawn_npc(id, definition, position, owner));
            }
            Command::RemovePlayer { player, reply } => {
                let _ = reply.send(self.remove_player(player));
            }
            Command::Engage {
                player,
                target,
                reply,
            } => {
                let _ = reply.send(self.engage(player, target));
            }
            Command::Disengage { player, reply } => {
                self.disengage(player);
                let _ = reply.send(());
            }
            Command::MarkPlayerDying {
                player,
                killer,
                reply,
            } => {
                let _ = reply.send(self.mark_player_dying(player, killer));
            }
            Command::SetAmmo {
                player,
                stack,
                reply,
            } => {
                self.oracles.inventory.set_ammo(player, stack);
                let _ = reply.send(());
            }
            Command::GrantReagents {
                player,
                spell,
                casts,
                reply,
            } => {
                self.oracles.inventory.grant_reagents(player, spell, casts);
                let _ = reply.send(());
            }
            Command::Step { reply } => {
                let _ = reply.send(self.step());
            }
            Command::QueryWorld { reply } => {
                let _ = reply.send(self.world.clone());
            }
            Command::DrainLoot { reply } => {
                let _ = reply.send(self.oracles.loot.drain());
            }
            Command::Shutdown => {}
        }
    }

    fn spawn_player(&mut self, player: Player) -> Result<()> {
        let entity = player.entity();
        if self.world.player(player.id).is_some() {
            return Err(RuntimeError::DuplicateEntity(entity));
        }
        self.oracles.visibility.add_or_update(entity, player.position);
        tracing::debug!("{} joined at {}", entity, player.position);
        self.world.insert_player(player);
        Ok(())
    }

    fn spawn_npc(
        &mut self,
        id: u32,
        definition: u32,
        position: Position,
        owner: Option<u32>,
    ) -> Result<()> {
        let entity = EntityRef::npc(id);
        let dead = self.system.deaths().dead_npc(id).is_some();
        if self.world.npc(id).is_some() || dead {
            return Err(RuntimeError::DuplicateEntity(entity));
        }
        let template = self
            .oracles
            .catalog
            .npc(definition)
            .ok_or(RuntimeError::UnknownDefinition(definition))?;
        let npc = match owner {
            Some(owner) => Npc::instanced(id, template, position, owner),
            None => Npc::spawn(id, template, position),
        };
        self.oracles.visibility.add_or_update(entity, position);
        tracing::debug!("{} ({}) spawned at {}", entity, template.name, position);
        self.world.insert_npc(npc);
        Ok(())
    }

    fn remove_player(&mut self, id: u32) -> Result<()> {
        let entity = EntityRef::player(id);
        self.system
            .remove_player(&mut self.world, id)
            .ok_or(RuntimeError::UnknownEntity(entity))?;
        self.oracles.targets.forget(entity);
        self.oracles.visibility.remove(entity);
        self.oracles.inventory.clear(id);
        tracing::debug!("{} left", entity);
        Ok(())
    }

    fn engage(&mut self, player: u32, target: EntityRef) -> Result<AttackMode> {
        let mut events = Vec::new();
        let result = {
            let mut env = self.oracles.as_combat_env(&mut events)?;
            self.system.engage(&mut self.world, &mut env, player, target)
        };
        self.publish(events);
        Ok(result?)
    }

    fn disengage(&mut self, player: u32) {
        let entity = EntityRef::player(player);
        self.oracles.targets.clear_target(entity);
        if self.world.is_alive(entity) {
            if let Some(Err(err)) = self
                .world
                .transition(entity, LifecycleEvent::Disengage)
            {
                tracing::debug!("{} disengage ignored: {}", entity, err);
            }
        }
    }

    fn mark_player_dying(&mut self, player: u32, killer: Option<EntityRef>) -> bool {
        if let Some(record) = self.world.player_mut(player) {
            if record.state.is_alive() {
                record.set_hits(0);
            }
        }
        let mut events = Vec::new();
        let marked = match self.oracles.as_combat_env(&mut events) {
            Ok(mut env) => self
                .system
                .mark_player_dying(&mut self.world, &mut env, player, killer),
            Err(err) => {
                tracing::error!("cannot mark player#{} dying: {}", player, err);
                false
            }
        };
        self.publish(events);
        marked
    }

    fn step(&mut self) -> Result<TickSummary> {
        let mut events = Vec::new();
        let summary = {
            let mut env = self.oracles.as_combat_env(&mut events)?;
            self.system.tick(&mut self.world, &mut env)
        };

        let tick = summary.tick;
        self.publish_at(tick, events);
        self.bus.publish(Event::Tick(TickEvent {
            tick,
            attacks: summary.attacks.len(),
            kills: summary.kills().count(),
        }));
        Ok(summary)
    }

    /// Events produced between ticks belong to the upcoming tick.
    fn publish(&self, events: Vec<CombatEvent>) {
        self.publish_at(self.system.now(), events);
    }

    fn publish_at(&self, tick: Tick, events: Vec<CombatEvent>) {
        for event in events {
            let viewers = match (&event, event.position()) {
                (CombatEvent::PlayerMessage { player, .. }, _) => vec![EntityRef::player(*player)],
                (_, Some(position)) => self.oracles.visibility.viewers(position),
                (_, None) => Vec::new(),
            };
            self.bus.publish(Event::from_notification(Notification {
                tick,
                event,
                viewers,
            }));
        }
    }
}

async fn next_tick(interval: &mut Option<tokio::time::Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
