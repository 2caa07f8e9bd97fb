//! Per-tick combat resolution.
//!
//! Pass order is fixed: cooldown decrement, player vs NPC, player vs player,
//! then NPC vs anything. Every attempt either executes an attack or yields an
//! [`AttackError`] that [`CombatResolver::settle`] turns into a message and,
//! for cancelling errors, a target reset.

use std::collections::{BTreeMap, BTreeSet};

use super::errors::AttackError;
use crate::combat::{
    self, AttackMode, AttackPlan, DamageLedgers, apply_damage, attack_speed, award_experience,
};
use crate::config::CombatConfig;
use crate::env::{CombatEnv, CombatEvent};
use crate::error::GameError;
use crate::state::{CombatState, EntityRef, LifecycleEvent, Npc, Player, Position, World};
use crate::stats::{CombatStats, Combatant, HitpointsMut, combat_level};

/// Result of one executed attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: EntityRef,
    pub victim: EntityRef,
    pub mode: AttackMode,
    /// Damage rolled before the hit point cap.
    pub raw: u32,
    pub dealt: u32,
    pub remaining_hp: u32,
    /// Kill credit, set when the attack was fatal.
    pub killer: Option<EntityRef>,
}

impl AttackReport {
    pub fn is_kill(&self) -> bool {
        self.killer.is_some()
    }
}

/// Combat scheduler; owns the kill-credit ledgers.
#[derive(Clone, Debug)]
pub struct CombatResolver {
    config: CombatConfig,
    ledgers: DamageLedgers,
}

impl CombatResolver {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            ledgers: DamageLedgers::default(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn ledgers(&self) -> &DamageLedgers {
        &self.ledgers
    }

    /// Drops kill-credit state for an entity that died outside combat.
    pub fn forget(&mut self, victim: EntityRef) {
        self.ledgers.clear(victim);
    }

    /// Points a player at a target and enters the matching combat-active state.
    pub fn engage(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        player: u32,
        target: EntityRef,
    ) -> Result<AttackMode, AttackError> {
        let attacker = EntityRef::player(player);
        let plan = {
            let record = world
                .player(player)
                .ok_or(AttackError::TargetMissing(attacker))?;
            if !world.is_alive(attacker) {
                return Err(AttackError::ParticipantDead(attacker));
            }
            if target == attacker {
                return Err(AttackError::PermissionDenied { attacker, target });
            }
            match world.combatant(target) {
                None => return Err(AttackError::TargetMissing(target)),
                Some(_) if !world.is_alive(target) => {
                    return Err(AttackError::ParticipantDead(target));
                }
                Some(Combatant::Npc(npc)) if !env.can_interact(record, npc) => {
                    return Err(AttackError::PermissionDenied { attacker, target });
                }
                Some(_) => {}
            }
            player_plan(record, env, &self.config)
        };

        env.targeting.set_target(attacker, target);
        set_state(world, attacker, LifecycleEvent::Attack(plan.mode));
        tracing::debug!("{} engages {} ({})", attacker, target, plan.mode);
        Ok(plan.mode)
    }

    /// Cooldown decrement, then the player vs NPC and player vs player passes.
    pub fn process_player_combat(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
    ) -> Vec<AttackReport> {
        decrement_cooldowns(world);

        let targets = env.targeting.player_targets();
        let mut reports = Vec::new();

        for &(id, target) in &targets {
            if !target.is_npc() {
                continue;
            }
            match self.try_player_vs_npc(world, env, id, target.id) {
                Ok(report) => reports.push(report),
                Err(err) => self.settle(world, env, EntityRef::player(id), err),
            }
        }

        let directed: BTreeMap<u32, EntityRef> = targets.iter().copied().collect();
        let pairs: BTreeSet<(u32, u32)> = targets
            .iter()
            .filter(|(id, target)| target.is_player() && target.id != *id)
            .map(|&(id, target)| (id.min(target.id), id.max(target.id)))
            .collect();

        for (low, high) in pairs {
            for (from, to) in [(low, high), (high, low)] {
                let victim = EntityRef::player(to);
                let still_targeted =
                    env.targeting.target_of(EntityRef::player(from)) == Some(victim);
                if directed.get(&from) != Some(&victim) || !still_targeted {
                    continue;
                }
                match self.try_player_vs_player(world, env, from, to) {
                    Ok(report) => reports.push(report),
                    Err(err) => self.settle(world, env, EntityRef::player(from), err),
                }
            }
        }

        reports
    }

    /// NPC vs anything pass.
    pub fn process_npc_combat(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
    ) -> Vec<AttackReport> {
        let ids: Vec<u32> = world.npcs.keys().copied().collect();
        let mut reports = Vec::new();
        for id in ids {
            match self.try_npc_attack(world, env, id) {
                Ok(report) => reports.push(report),
                Err(AttackError::NoTarget(_)) => {}
                Err(err) => self.settle(world, env, EntityRef::npc(id), err),
            }
        }
        reports
    }

    pub fn try_player_vs_npc(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        player_id: u32,
        npc_id: u32,
    ) -> Result<AttackReport, AttackError> {
        let attacker = EntityRef::player(player_id);
        let victim = EntityRef::npc(npc_id);

        let plan = {
            let player = world
                .player(player_id)
                .ok_or(AttackError::TargetMissing(attacker))?;
            ready_to_attack(player.state, player.combat_delay)?;
            let npc = world.npc(npc_id).ok_or(AttackError::TargetMissing(victim))?;
            if !world.is_alive(victim) {
                return Err(AttackError::ParticipantDead(victim));
            }
            if !env.can_interact(player, npc) {
                return Err(AttackError::PermissionDenied {
                    attacker,
                    target: victim,
                });
            }
            let plan = player_plan(player, env, &self.config);
            check_reach(env, player.position, npc.position, &plan)?;
            plan
        };

        let had_aggro = env.targeting.target_of(victim).is_some();
        let report = self.execute_attack(world, env, attacker, victim, plan)?;
        if !had_aggro && world.is_alive(victim) {
            self.npc_retaliate(world, env, npc_id, attacker);
        }
        Ok(report)
    }

    pub fn try_player_vs_player(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        from: u32,
        to: u32,
    ) -> Result<AttackReport, AttackError> {
        let attacker = EntityRef::player(from);
        let victim = EntityRef::player(to);

        let plan = {
            let player = world
                .player(from)
                .ok_or(AttackError::TargetMissing(attacker))?;
            ready_to_attack(player.state, player.combat_delay)?;
            let target = world.player(to).ok_or(AttackError::TargetMissing(victim))?;
            if !world.is_alive(victim) {
                return Err(AttackError::ParticipantDead(victim));
            }
            check_pvp_bracket(env, player, target)?;
            let plan = player_plan(player, env, &self.config);
            check_reach(env, player.position, target.position, &plan)?;
            plan
        };

        let report = self.execute_attack(world, env, attacker, victim, plan)?;
        if world.is_alive(victim) {
            self.auto_retaliate(world, env, to, attacker);
        }
        Ok(report)
    }

    pub fn try_npc_attack(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        npc_id: u32,
    ) -> Result<AttackReport, AttackError> {
        let aggressor = EntityRef::npc(npc_id);

        let (target, plan) = {
            let npc = world
                .npc(npc_id)
                .ok_or(AttackError::TargetMissing(aggressor))?;
            if !world.is_alive(aggressor) {
                return Err(AttackError::ParticipantDead(aggressor));
            }
            let target = env
                .targeting
                .target_of(aggressor)
                .ok_or(AttackError::NoTarget(aggressor))?;
            if npc.combat_delay > 0 {
                return Err(AttackError::OnCooldown {
                    remaining: npc.combat_delay,
                });
            }
            let target_position = world
                .position_of(target)
                .ok_or(AttackError::TargetMissing(target))?;
            if !world.is_alive(target) {
                return Err(AttackError::ParticipantDead(target));
            }
            let plan = npc_plan(npc, env, &self.config);
            check_reach(env, npc.position, target_position, &plan)?;
            (target, plan)
        };

        let report = self.execute_attack(world, env, aggressor, target, plan)?;
        if target.is_player() && world.is_alive(target) {
            self.auto_retaliate(world, env, target.id, aggressor);
        }
        Ok(report)
    }

    /// Shared attack execution for all three passes.
    pub fn execute_attack(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        attacker: EntityRef,
        victim: EntityRef,
        plan: AttackPlan,
    ) -> Result<AttackReport, AttackError> {
        if !world.is_alive(attacker) {
            return Err(AttackError::ParticipantDead(attacker));
        }
        if !world.is_alive(victim) {
            return Err(AttackError::ParticipantDead(victim));
        }
        let attacker_position = world
            .position_of(attacker)
            .ok_or(AttackError::TargetMissing(attacker))?;
        let victim_position = world
            .position_of(victim)
            .ok_or(AttackError::TargetMissing(victim))?;

        let plan = if attacker.is_player() {
            self.secure_resources(world, env, attacker.id, plan, victim_position)?
        } else {
            plan
        };
        set_state(world, attacker, LifecycleEvent::Attack(plan.mode));

        let (raw, current_hp, max_hp) = {
            let (Some(source), Some(target)) = (world.combatant(attacker), world.combatant(victim))
            else {
                return Err(AttackError::TargetMissing(victim));
            };
            let raw = roll_damage(&source, &target, &plan, env);
            (raw, target.current_hp(), target.max_hp())
        };
        let applied = apply_damage(current_hp, raw);

        if plan.mode != AttackMode::Melee {
            env.emit(CombatEvent::ProjectileFired {
                attacker,
                victim,
                projectile: plan.projectile.or(plan.spell),
                mode: plan.mode,
                position: attacker_position,
            });
        }
        env.emit(CombatEvent::DamageDealt {
            attacker,
            victim,
            amount: applied.dealt,
            mode: plan.mode,
            position: victim_position,
        });
        env.emit(CombatEvent::HitpointsChanged {
            entity: victim,
            current: applied.remaining_hp,
            max: max_hp,
            position: victim_position,
        });
        if let Some(mut target) = world.combatant_mut(victim) {
            target.set_current_hp(applied.remaining_hp);
        }

        if plan.mode == AttackMode::Ranged && attacker.is_player() {
            self.spend_ammo(env, attacker.id, plan.projectile, victim_position);
        }

        if attacker.is_player() && applied.dealt > 0 {
            self.ledgers.record(victim, attacker, applied.dealt);
        }

        let killer = applied
            .is_fatal()
            .then(|| self.mark_killed(world, env, attacker, victim));

        if attacker.is_player() {
            let spell_base = plan
                .spell
                .and_then(|spell| env.definitions.spell(spell))
                .map_or(0, |spell| spell.base_experience);
            if let Some(player) = world.player_mut(attacker.id) {
                award_experience(player, plan.mode, spell_base, applied.dealt);
            }
        }

        let speed = world
            .combatant(attacker)
            .map_or(self.config.default_attack_speed, |source| {
                attack_speed(source, env.definitions, &self.config)
            });
        if let Some(mut source) = world.combatant_mut(attacker) {
            *source.combat_delay_mut() = speed;
        }

        if victim.is_npc() {
            if let Some(mut credited) = killer.and_then(|killer| world.combatant_mut(killer)) {
                *credited.combat_delay_mut() = 1;
            }
        }

        tracing::debug!(
            "{} hit {} for {} ({} rolled, {} mode), {} hp left",
            attacker,
            victim,
            applied.dealt,
            raw,
            plan.mode,
            applied.remaining_hp
        );

        Ok(AttackReport {
            attacker,
            victim,
            mode: plan.mode,
            raw,
            dealt: applied.dealt,
            remaining_hp: applied.remaining_hp,
            killer,
        })
    }

    /// Turns a failed attempt into messages and, if it cancels, a target reset.
    pub fn settle(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        attacker: EntityRef,
        err: AttackError,
    ) {
        if err.cancels_engagement() {
            env.targeting.clear_target(attacker);
            if world.is_alive(attacker) {
                set_state(world, attacker, LifecycleEvent::Disengage);
            }
            tracing::debug!("{} disengages: {} [{}]", attacker, err, err.error_code());
        } else {
            tracing::trace!("{} holds: {}", attacker, err);
        }

        if attacker.is_player() {
            if let Some(text) = err.player_message() {
                env.message(attacker.id, text);
            }
        }
    }

    /// Reagent and ammunition checks for player attackers.
    ///
    /// A cast the player cannot pay for is cancelled and the mode recomputed;
    /// the downgraded attack proceeds only if it can still reach the target.
    fn secure_resources(
        &self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        player_id: u32,
        plan: AttackPlan,
        target: Position,
    ) -> Result<AttackPlan, AttackError> {
        let mut plan = plan;

        if let (AttackMode::Magic, Some(spell)) = (plan.mode, plan.spell) {
            if env.inventory.consume_reagents(player_id, spell) {
                return Ok(plan);
            }
            let player = world
                .player_mut(player_id)
                .ok_or(AttackError::TargetMissing(EntityRef::player(player_id)))?;
            player.selected_spell = None;
            plan = player_plan(player, env, &self.config);
            if check_reach(env, player.position, target, &plan).is_err() {
                return Err(AttackError::MissingReagents {
                    player: player_id,
                    spell,
                });
            }
            tracing::debug!(
                "player#{} lacks reagents for spell {}, falling back to {}",
                player_id,
                spell,
                plan.mode
            );
        }

        if plan.mode == AttackMode::Ranged {
            match env.inventory.equipped_ammo(player_id) {
                Some(stack) if stack.count > 0 => plan.projectile = Some(stack.item),
                _ => return Err(AttackError::OutOfAmmo(player_id)),
            }
        }

        Ok(plan)
    }

    fn spend_ammo(
        &self,
        env: &mut CombatEnv<'_>,
        player_id: u32,
        projectile: Option<u32>,
        landing: Position,
    ) {
        let Some(item) = projectile else {
            return;
        };
        if env.rng.next_f64() >= self.config.ammo_break_chance {
            return;
        }
        if !env.inventory.consume_ammo(player_id, item) {
            return;
        }
        if env.rng.next_f64() < self.config.projectile_drop_chance {
            env.loot.drop_projectile(item, landing, player_id);
        }
    }

    /// Death marking: kill credit, dying set, lifecycle, target cleanup.
    fn mark_killed(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        attacker: EntityRef,
        victim: EntityRef,
    ) -> EntityRef {
        let killer = self.ledgers.top_contributor(victim).unwrap_or(attacker);
        self.ledgers.clear(victim);

        world.dying.mark(victim, Some(killer));
        set_state(world, victim, LifecycleEvent::Killed);

        env.targeting.clear_target(victim);
        for former in env.targeting.clear_targets_on(victim) {
            if world.is_alive(former) {
                set_state(world, former, LifecycleEvent::Disengage);
            }
        }

        tracing::info!("{} killed by {} (last hit {})", victim, killer, attacker);
        killer
    }

    fn npc_retaliate(
        &self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        npc_id: u32,
        attacker: EntityRef,
    ) {
        let Some(npc) = world.npc_mut(npc_id) else {
            return;
        };
        let plan = npc_plan(npc, env, &self.config);
        npc.combat_delay = self.config.retaliate_delay_ticks;
        let entity = npc.entity();

        env.targeting.set_target(entity, attacker);
        set_state(world, entity, LifecycleEvent::Attack(plan.mode));
        tracing::debug!(
            "{} retaliates against {} in {} ticks",
            entity,
            attacker,
            self.config.retaliate_delay_ticks
        );
    }

    fn auto_retaliate(
        &self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        player_id: u32,
        attacker: EntityRef,
    ) {
        let entity = EntityRef::player(player_id);
        let Some(player) = world.player(player_id) else {
            return;
        };
        if !player.auto_retaliate || env.targeting.target_of(entity).is_some() {
            return;
        }
        let plan = player_plan(player, env, &self.config);
        env.targeting.set_target(entity, attacker);
        set_state(world, entity, LifecycleEvent::Attack(plan.mode));
        tracing::debug!("{} auto-retaliates against {}", entity, attacker);
    }
}

/// Every live entity's cooldown drops by one, floored at zero.
pub fn decrement_cooldowns(world: &mut World) {
    for player in world.players.values_mut() {
        player.combat_delay = player.combat_delay.saturating_sub(1);
    }
    for npc in world.npcs.values_mut() {
        npc.combat_delay = npc.combat_delay.saturating_sub(1);
    }
}

fn ready_to_attack(state: CombatState, combat_delay: u32) -> Result<(), AttackError> {
    if !state.is_combat_active() {
        return Err(AttackError::NotCombatActive(state));
    }
    if combat_delay > 0 {
        return Err(AttackError::OnCooldown {
            remaining: combat_delay,
        });
    }
    Ok(())
}

/// Spell selection wins, then a ranged weapon, else melee.
pub fn player_plan(player: &Player, env: &CombatEnv<'_>, config: &CombatConfig) -> AttackPlan {
    if let Some(spell) = player
        .selected_spell
        .and_then(|id| env.definitions.spell(id))
        .filter(|spell| spell.is_offensive())
    {
        return AttackPlan::magic(config.magic_range, spell.id);
    }

    let ranged = player
        .weapon
        .and_then(|id| env.definitions.weapon(id))
        .and_then(|weapon| weapon.ranged);
    match ranged {
        Some(weapon) => {
            let range = if weapon.range > 0 {
                weapon.range
            } else {
                config.ranged_range
            };
            let ammo = env.inventory.equipped_ammo(player.id).map(|stack| stack.item);
            AttackPlan::ranged(range, ammo)
        }
        None => AttackPlan::melee(),
    }
}

/// Magic when an offensive auto-cast spell resolves, then a ranged profile,
/// else melee.
pub fn npc_plan(npc: &Npc, env: &CombatEnv<'_>, config: &CombatConfig) -> AttackPlan {
    let Some(definition) = env.definitions.npc(npc.definition) else {
        return AttackPlan::melee();
    };

    if let Some(spell) = definition
        .auto_cast_spell
        .and_then(|id| env.definitions.spell(id))
        .filter(|spell| spell.is_offensive())
    {
        return AttackPlan::magic(config.magic_range, spell.id);
    }

    if definition.has_ranged_profile() {
        let range = if definition.attack_range > 1 {
            definition.attack_range
        } else {
            config.ranged_range
        };
        return AttackPlan::ranged(range, definition.projectile);
    }

    AttackPlan::melee()
}

/// Distance, edge and line-of-sight gates for a plan.
pub fn check_reach(
    env: &CombatEnv<'_>,
    from: Position,
    to: Position,
    plan: &AttackPlan,
) -> Result<(), AttackError> {
    let distance = from.chebyshev_distance(to);
    let out_of_range = AttackError::OutOfRange {
        distance,
        range: plan.range,
    };
    let Some(distance) = distance else {
        return Err(out_of_range);
    };

    match plan.mode {
        AttackMode::Melee => {
            if distance != 1 {
                return Err(out_of_range);
            }
            if env.melee_edge_blocked(from, to) {
                return Err(AttackError::EdgeBlocked);
            }
        }
        AttackMode::Ranged | AttackMode::Magic => {
            if distance > plan.range {
                return Err(out_of_range);
            }
            if !env.has_line_of_sight(from, to) {
                return Err(AttackError::NoLineOfSight);
            }
        }
    }
    Ok(())
}

/// Both players in a PvP zone, combat levels within the shallower tier.
fn check_pvp_bracket(
    env: &CombatEnv<'_>,
    attacker: &Player,
    victim: &Player,
) -> Result<(), AttackError> {
    let (Some(own_tier), Some(victim_tier)) =
        (env.pvp_tier(attacker.position), env.pvp_tier(victim.position))
    else {
        return Err(AttackError::PvpNotAllowed);
    };
    let difference = combat_level(&attacker.levels).abs_diff(combat_level(&victim.levels));
    let allowed = own_tier.min(victim_tier);
    if difference > allowed {
        return Err(AttackError::LevelBracket {
            difference,
            allowed,
        });
    }
    Ok(())
}

fn roll_damage(
    source: &Combatant<'_>,
    target: &Combatant<'_>,
    plan: &AttackPlan,
    env: &mut CombatEnv<'_>,
) -> u32 {
    match plan.mode {
        AttackMode::Melee => combat::melee_damage(source, target, env.rng),
        AttackMode::Ranged => {
            let cap = plan
                .projectile
                .and_then(|item| env.definitions.ammo_max_hit(item));
            combat::ranged_damage(source, target, cap, env.rng)
        }
        AttackMode::Magic => {
            let spell = plan.spell.and_then(|id| env.definitions.spell(id));
            combat::magic_damage(source, target, spell, env.rng)
        }
    }
}

/// Applies a lifecycle event, logging illegal transitions instead of failing.
pub(crate) fn set_state(world: &mut World, entity: EntityRef, event: LifecycleEvent) {
    if let Some(Err(err)) = world.transition(entity, event) {
        tracing::warn!("{}: {} [{}]", entity, err, err.error_code());
    }
}
