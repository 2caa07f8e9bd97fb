//! Death and respawn bookkeeping.
//!
//! NPCs leave the live collection the tick they die and come back through a
//! [`DeadNpcRecord`]; players stay in the live collection in a dead lifecycle
//! state and are revived from a [`DeadPlayerRecord`].

use std::collections::BTreeMap;

use super::errors::IntegrityError;
use super::resolver::set_state;
use crate::config::CombatConfig;
use crate::env::{CombatEnv, CombatEvent};
use crate::error::GameError;
use crate::state::{CombatState, EntityRef, LifecycleEvent, Npc, Position, Tick, World};

/// Snapshot of an NPC taken at death plus its timers.
#[derive(Clone, Debug, PartialEq)]
pub struct DeadNpcRecord {
    /// Frozen state at the moment of death.
    pub npc: Npc,
    pub death_tick: Tick,
    /// Loot drop and visibility removal.
    pub remove_at: Tick,
    /// `None` for entities that do not respawn.
    pub respawn_at: Option<Tick>,
    pub spawn: Position,
    pub max_hp: u32,
    pub death_position: Position,
    pub killer: Option<EntityRef>,
    pub removed: bool,
}

impl DeadNpcRecord {
    pub fn respawns(&self) -> bool {
        self.respawn_at.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeadPlayerRecord {
    pub player: u32,
    pub revive_at: Tick,
    pub death_position: Position,
    pub killer: Option<EntityRef>,
}

/// Owner of every dead record; the only writer moving ids between the live
/// and dead collections.
#[derive(Clone, Debug)]
pub struct DeathManager {
    config: CombatConfig,
    npcs: BTreeMap<u32, DeadNpcRecord>,
    players: BTreeMap<u32, DeadPlayerRecord>,
}

impl DeathManager {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            npcs: BTreeMap::new(),
            players: BTreeMap::new(),
        }
    }

    pub fn dead_npc(&self, id: u32) -> Option<&DeadNpcRecord> {
        self.npcs.get(&id)
    }

    pub fn dead_player(&self, id: u32) -> Option<&DeadPlayerRecord> {
        self.players.get(&id)
    }

    pub fn dead_npcs(&self) -> impl Iterator<Item = &DeadNpcRecord> {
        self.npcs.values()
    }

    pub fn dead_players(&self) -> impl Iterator<Item = &DeadPlayerRecord> {
        self.players.values()
    }

    /// Entry point for non-combat fatal damage.
    ///
    /// Returns false when the player is absent or already dying or dead.
    pub fn mark_player_dying(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        id: u32,
        killer: Option<EntityRef>,
    ) -> bool {
        let entity = EntityRef::player(id);
        if !world.is_alive(entity) {
            return false;
        }
        world.dying.mark(entity, killer);
        set_state(world, entity, LifecycleEvent::Killed);
        env.targeting.clear_target(entity);
        for former in env.targeting.clear_targets_on(entity) {
            if world.is_alive(former) {
                set_state(world, former, LifecycleEvent::Disengage);
            }
        }
        tracing::info!("{} marked dying (killer {:?})", entity, killer);
        true
    }

    /// Drops every death record held for a player leaving the world.
    pub fn forget_player(&mut self, world: &mut World, id: u32) {
        world.dying.players.remove(&id);
        if self.players.remove(&id).is_some() {
            tracing::debug!("{} left while dead", EntityRef::player(id));
        }
    }

    /// Drains this tick's dying sets. A second call in the same tick is a no-op.
    pub fn process_death(&mut self, world: &mut World, env: &mut CombatEnv<'_>, now: Tick) {
        let dying = world.dying.take();

        for (id, killer) in dying.npcs {
            self.npc_died(world, env, now, id, killer);
        }
        for (id, killer) in dying.players {
            self.player_died(world, env, now, id, killer);
        }
    }

    /// Advances corpse-removal, respawn and revive timers.
    pub fn process_respawns(&mut self, world: &mut World, env: &mut CombatEnv<'_>, now: Tick) {
        let ids: Vec<u32> = self.npcs.keys().copied().collect();
        for id in ids {
            self.advance_npc(world, env, now, id);
        }

        let due: Vec<u32> = self
            .players
            .values()
            .filter(|record| now >= record.revive_at)
            .map(|record| record.player)
            .collect();
        for id in due {
            if let Some(record) = self.players.remove(&id) {
                self.revive_player(world, env, record);
            }
        }
    }

    fn npc_died(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        now: Tick,
        id: u32,
        killer: Option<EntityRef>,
    ) {
        let entity = EntityRef::npc(id);
        let Some(npc) = world.npc(id) else {
            tracing::trace!("{} already gone, skipping death", entity);
            return;
        };
        if npc.current_hp > 0 {
            let hp = npc.current_hp;
            log_integrity(&IntegrityError::StillHasHitpoints { entity, hp });
            recover(world, entity);
            return;
        }
        let Some(mut npc) = world.remove_npc(id) else {
            return;
        };
        enter_dead(&mut npc.state, entity);

        env.targeting.clear_target(entity);
        env.targeting.clear_targets_on(entity);
        env.emit(CombatEvent::NpcDied {
            npc: id,
            definition: npc.definition,
            killer,
            position: npc.position,
        });

        let remove_at = now + u64::from(self.config.death_animation_ticks);
        let respawn_at = npc.respawns.then(|| {
            let ticks = env
                .definitions
                .npc(npc.definition)
                .and_then(|def| def.respawn_ticks)
                .unwrap_or(self.config.default_respawn_ticks);
            remove_at + u64::from(ticks)
        });

        tracing::info!(
            "{} died at {} (killer {:?}), removal at {}, respawn at {:?}",
            entity,
            npc.position,
            killer,
            remove_at,
            respawn_at
        );

        self.npcs.insert(
            id,
            DeadNpcRecord {
                death_tick: now,
                remove_at,
                respawn_at,
                spawn: npc.spawn,
                max_hp: npc.max_hp,
                death_position: npc.position,
                killer,
                removed: false,
                npc,
            },
        );
    }

    fn player_died(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        now: Tick,
        id: u32,
        killer: Option<EntityRef>,
    ) {
        let entity = EntityRef::player(id);
        let Some(player) = world.player_mut(id) else {
            tracing::trace!("{} already gone, skipping death", entity);
            return;
        };
        let hp = player.hits();
        if hp > 0 {
            log_integrity(&IntegrityError::StillHasHitpoints { entity, hp });
            recover(world, entity);
            return;
        }

        enter_dead(&mut player.state, entity);
        player.pending_action = None;
        let position = player.position;

        env.targeting.clear_target(entity);
        env.loot.resolve_player_death(id, killer, position);
        env.emit(CombatEvent::PlayerDied {
            player: id,
            killer,
            position,
        });

        let revive_at = now + u64::from(self.config.player_death_ticks);
        tracing::info!(
            "{} died at {} (killer {:?}), revive at {}",
            entity,
            position,
            killer,
            revive_at
        );
        self.players.insert(
            id,
            DeadPlayerRecord {
                player: id,
                revive_at,
                death_position: position,
                killer,
            },
        );
    }

    fn advance_npc(&mut self, world: &mut World, env: &mut CombatEnv<'_>, now: Tick, id: u32) {
        let Some(record) = self.npcs.get_mut(&id) else {
            return;
        };
        let entity = EntityRef::npc(id);

        if !record.removed && now >= record.remove_at {
            record.removed = true;
            env.visibility.remove(entity);
            env.loot.drop_loot(
                record.npc.definition,
                record.death_position,
                record.killer,
                record.npc.loot_override,
            );
            env.emit(CombatEvent::NpcRemoved {
                npc: id,
                position: record.death_position,
            });
            if let Err(err) = record.npc.state.apply(LifecycleEvent::BeginRespawn) {
                tracing::warn!("{}: {} [{}]", entity, err, err.error_code());
            }

            if !record.respawns() {
                tracing::info!("{} removed permanently", entity);
                self.npcs.remove(&id);
                return;
            }
        }

        if !record.removed || record.respawn_at.is_none_or(|at| now < at) {
            return;
        }

        let Some(record) = self.npcs.remove(&id) else {
            return;
        };
        if world.npc(id).is_some() {
            log_integrity(&IntegrityError::AlreadyLive(entity));
            return;
        }

        let npc = match env.definitions.npc(record.npc.definition) {
            Some(definition) => record.npc.respawned(definition),
            None => {
                log_integrity(&IntegrityError::MissingDefinition {
                    entity,
                    definition: record.npc.definition,
                });
                restore_from_snapshot(&record)
            }
        };

        env.targeting.clear_target(entity);
        env.visibility.add_or_update(entity, npc.position);
        env.emit(CombatEvent::NpcReadded {
            npc: id,
            position: npc.position,
        });
        tracing::info!("{} respawned at {}", entity, npc.position);
        world.insert_npc(npc);
    }

    fn revive_player(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        record: DeadPlayerRecord,
    ) {
        let entity = EntityRef::player(record.player);
        let destination = self.config.respawn_area.random_point(env.rng);
        let Some(player) = world.player_mut(record.player) else {
            tracing::debug!("{} left before reviving", entity);
            return;
        };

        player.restore();
        player.combat_delay = 0;
        player.pending_action = None;

        env.teleport.respawn_player(record.player, destination);
        player.position = destination;
        env.visibility.add_or_update(entity, destination);

        if player.state == CombatState::Dead {
            if let Err(err) = player.state.apply(LifecycleEvent::BeginRespawn) {
                tracing::warn!("{}: {} [{}]", entity, err, err.error_code());
            }
        }
        if let Err(err) = player.state.apply(LifecycleEvent::Revive) {
            tracing::warn!("{}: {} [{}]", entity, err, err.error_code());
            player.state = CombatState::Idle;
        }

        env.emit(CombatEvent::PlayerRespawned {
            player: record.player,
            position: destination,
        });
        tracing::info!("{} revived at {}", entity, destination);
    }
}

/// Drives a freshly killed entity to `Dead`, entering `Dying` first if the
/// kill bypassed the resolver.
fn enter_dead(state: &mut CombatState, entity: EntityRef) {
    if state.is_alive() {
        if let Err(err) = state.apply(LifecycleEvent::Killed) {
            tracing::warn!("{}: {} [{}]", entity, err, err.error_code());
        }
    }
    if let Err(err) = state.apply(LifecycleEvent::DeathProcessed) {
        tracing::warn!("{}: {} [{}]", entity, err, err.error_code());
        *state = CombatState::Dead;
    }
}

/// Puts an entity wrongly marked dying back among the living.
fn recover(world: &mut World, entity: EntityRef) {
    if world.state_of(entity) == Some(CombatState::Dying) {
        set_state(world, entity, LifecycleEvent::Recover);
    }
}

fn restore_from_snapshot(record: &DeadNpcRecord) -> Npc {
    let mut npc = record.npc.clone();
    npc.position = record.spawn;
    npc.current_hp = record.max_hp;
    npc.levels.restore();
    npc.combat_delay = 0;
    npc.state = CombatState::Idle;
    npc
}

fn log_integrity(err: &IntegrityError) {
    tracing::warn!("{} [{}], skipping", err, err.error_code());
}
