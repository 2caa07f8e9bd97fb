//! Tick orchestration for combat and death processing.
//!
//! [`CombatSystem`] runs the four per-tick phases in their required order:
//! player combat, NPC combat, death processing, respawn timers. The world and
//! collaborators are passed in explicitly on every call.

mod death;
mod errors;
mod resolver;

pub use death::{DeadNpcRecord, DeadPlayerRecord, DeathManager};
pub use errors::{AttackError, IntegrityError};
pub use resolver::{
    AttackReport, CombatResolver, check_reach, decrement_cooldowns, npc_plan, player_plan,
};

use crate::combat::AttackMode;
use crate::config::CombatConfig;
use crate::env::CombatEnv;
use crate::state::{EntityRef, Player, Tick, World};

/// Attacks executed during one call to [`CombatSystem::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tick: Tick,
    pub attacks: Vec<AttackReport>,
}

impl TickSummary {
    pub fn kills(&self) -> impl Iterator<Item = &AttackReport> {
        self.attacks.iter().filter(|report| report.is_kill())
    }
}

/// Combat resolver plus death manager behind one tick counter.
#[derive(Clone, Debug)]
pub struct CombatSystem {
    resolver: CombatResolver,
    deaths: DeathManager,
    now: Tick,
}

impl CombatSystem {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            resolver: CombatResolver::new(config.clone()),
            deaths: DeathManager::new(config),
            now: Tick::ZERO,
        }
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn config(&self) -> &CombatConfig {
        self.resolver.config()
    }

    pub fn resolver(&self) -> &CombatResolver {
        &self.resolver
    }

    pub fn deaths(&self) -> &DeathManager {
        &self.deaths
    }

    pub fn engage(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        player: u32,
        target: EntityRef,
    ) -> Result<AttackMode, AttackError> {
        self.resolver.engage(world, env, player, target)
    }

    pub fn process_player_combat(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
    ) -> Vec<AttackReport> {
        self.resolver.process_player_combat(world, env)
    }

    pub fn process_npc_combat(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
    ) -> Vec<AttackReport> {
        self.resolver.process_npc_combat(world, env)
    }

    pub fn process_death(&mut self, world: &mut World, env: &mut CombatEnv<'_>) {
        self.deaths.process_death(world, env, self.now);
    }

    pub fn process_respawns(&mut self, world: &mut World, env: &mut CombatEnv<'_>) {
        self.deaths.process_respawns(world, env, self.now);
    }

    /// Non-combat fatal damage; the caller has already zeroed the player's HP.
    pub fn mark_player_dying(
        &mut self,
        world: &mut World,
        env: &mut CombatEnv<'_>,
        player: u32,
        killer: Option<EntityRef>,
    ) -> bool {
        let marked = self.deaths.mark_player_dying(world, env, player, killer);
        if marked {
            self.resolver.forget(EntityRef::player(player));
        }
        marked
    }

    /// Takes a player out of the world along with any pending death, revive
    /// timer and damage ledger, so a later rejoin under the same id starts clean.
    pub fn remove_player(&mut self, world: &mut World, player: u32) -> Option<Player> {
        let removed = world.remove_player(player)?;
        self.deaths.forget_player(world, player);
        self.resolver.forget(EntityRef::player(player));
        Some(removed)
    }

    /// Runs all four phases for the current tick, then advances the counter.
    pub fn tick(&mut self, world: &mut World, env: &mut CombatEnv<'_>) -> TickSummary {
        let tick = self.now;
        let mut attacks = self.process_player_combat(world, env);
        attacks.extend(self.process_npc_combat(world, env));
        self.process_death(world, env);
        self.process_respawns(world, env);
        self.now = self.now + 1;

        tracing::trace!("tick {} resolved {} attacks", tick, attacks.len());
        TickSummary { tick, attacks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        AmmoStack, CombatEvent, NpcDefinition, RangedWeapon, SpellDefinition, SpellKind,
        WeaponDefinition,
    };
    use crate::state::{CombatState, Position};
    use crate::stats::{BonusKind, CombatStyle, EquipmentBonuses, Levels, Stat};
    use crate::testing::{FakeLineOfSight, FakeZones, Harness, OwnerPolicy};

    fn pos(x: i32, y: i32) -> Position {
        Position::new(0, x, y)
    }

    /// Aggressive style with a strength bonus; accuracy easily beats level-1 defense.
    fn arm(h: &mut Harness, player: u32, strength_bonus: i32) {
        let record = h.world.player_mut(player).unwrap();
        record.style = CombatStyle::Aggressive;
        record.bonuses = EquipmentBonuses::default().with(BonusKind::Strength, strength_bonus);
    }

    fn goblin_fight(hits: u32) -> (Harness, EntityRef) {
        let mut h = Harness::new();
        h.define_npc(NpcDefinition::melee(1, "goblin", 1, hits));
        h.spawn_player(1, pos(10, 10), 99);
        let npc = h.spawn_npc(10, 1, pos(11, 10));
        arm(&mut h, 1, 16);
        h.engage(1, npc);
        (h, npc)
    }

    #[test]
    fn fatal_hit_is_capped_and_marks_dying() {
        let (mut h, npc) = goblin_fight(5);
        // hit, then 12 of a 14 max hit
        h.rng.push([0.0, 0.85]);

        let reports = h.run(|system, world, env| system.process_player_combat(world, env));

        assert_eq!(reports.len(), 1);
        let report = reports[0];
        assert_eq!(report.raw, 12);
        assert_eq!(report.dealt, 5);
        assert_eq!(report.remaining_hp, 0);
        assert_eq!(report.killer, Some(EntityRef::player(1)));
        assert_eq!(h.world.dying.npcs.get(&10), Some(&Some(EntityRef::player(1))));
        assert_eq!(h.world.npc(10).unwrap().state, CombatState::Dying);
        assert_eq!(h.targets.targets.get(&EntityRef::player(1)), None);
        assert_eq!(h.world.player(1).unwrap().state, CombatState::Idle);

        assert!(h.events.contains(&CombatEvent::DamageDealt {
            attacker: EntityRef::player(1),
            victim: npc,
            amount: 5,
            mode: AttackMode::Melee,
            position: pos(11, 10),
        }));
        assert!(h.events.contains(&CombatEvent::HitpointsChanged {
            entity: npc,
            current: 0,
            max: 5,
            position: pos(11, 10),
        }));
    }

    #[test]
    fn kill_credit_goes_to_top_contributor() {
        let mut h = Harness::new();
        h.define_npc(NpcDefinition::melee(1, "ogre", 1, 41));
        h.spawn_player(1, pos(10, 10), 99);
        h.spawn_player(2, pos(12, 10), 99);
        let npc = h.spawn_npc(10, 1, pos(11, 10));
        arm(&mut h, 1, 200);
        arm(&mut h, 2, 200);
        h.engage(1, npc);
        h.engage(2, npc);
        // P1 deals 30, P2 deals 10, later P2 lands the final point.
        h.rng.push([0.0, 0.66, 0.0, 0.22, 0.0, 0.5]);

        let first = h.tick();
        assert_eq!(first.attacks.len(), 2);
        assert_eq!(first.attacks[0].dealt, 30);
        assert_eq!(first.attacks[1].dealt, 10);
        assert_eq!(h.world.npc(10).unwrap().current_hp, 1);

        h.targets.targets.remove(&EntityRef::player(1));
        let later = h.tick_n(6);
        let kill = later
            .iter()
            .flat_map(|summary| summary.kills())
            .next()
            .copied()
            .unwrap();

        assert_eq!(kill.attacker, EntityRef::player(2));
        assert_eq!(kill.killer, Some(EntityRef::player(1)));
        assert_eq!(h.system.deaths().dead_npc(10).unwrap().killer, Some(EntityRef::player(1)));
        assert!(h.events.contains(&CombatEvent::NpcDied {
            npc: 10,
            definition: 1,
            killer: Some(EntityRef::player(1)),
            position: pos(11, 10),
        }));
        // fast follow-up for the credited player
        assert_eq!(h.world.player(1).unwrap().combat_delay, 1);
        assert_eq!(h.world.player(2).unwrap().combat_delay, 6);
    }

    #[test]
    fn cooldowns_decrement_before_attacks() {
        let (mut h, _) = goblin_fight(50);
        h.world.player_mut(1).unwrap().combat_delay = 3;
        h.world.npc_mut(10).unwrap().combat_delay = 0;

        let reports = h.run(|system, world, env| system.process_player_combat(world, env));
        assert!(reports.is_empty());
        assert_eq!(h.world.player(1).unwrap().combat_delay, 2);
        assert_eq!(h.world.npc(10).unwrap().combat_delay, 0);

        // a cooldown reaching zero this tick attacks this tick
        h.world.player_mut(1).unwrap().combat_delay = 1;
        h.rng.push([0.0, 0.5]);
        let reports = h.run(|system, world, env| system.process_player_combat(world, env));
        assert_eq!(reports.len(), 1);
    }

    #[test]
    fn npc_retaliates_after_fixed_delay() {
        let (mut h, npc) = goblin_fight(50);
        h.rng.push([0.0, 0.0]);

        h.tick();
        assert_eq!(h.targets.targets.get(&npc), Some(&EntityRef::player(1)));
        let goblin = h.world.npc(10).unwrap();
        assert_eq!(goblin.combat_delay, 6);
        assert_eq!(goblin.state, CombatState::Attacking(AttackMode::Melee));
    }

    #[test]
    fn npc_attack_triggers_player_auto_retaliate() {
        let mut h = Harness::new();
        h.define_npc(NpcDefinition::melee(1, "wolf", 10, 20));
        h.spawn_player(1, pos(10, 10), 20);
        let npc = h.spawn_npc(10, 1, pos(10, 11));
        h.targets.targets.insert(npc, EntityRef::player(1));
        h.rng.push([0.0, 0.0]);

        let summary = h.tick();
        assert_eq!(summary.attacks.len(), 1);
        assert_eq!(summary.attacks[0].attacker, npc);
        assert_eq!(h.targets.targets.get(&EntityRef::player(1)), Some(&npc));
        assert_eq!(
            h.world.player(1).unwrap().state,
            CombatState::Attacking(AttackMode::Melee)
        );
    }

    fn wind_strike() -> SpellDefinition {
        SpellDefinition {
            id: 7,
            name: "wind strike".into(),
            kind: SpellKind::Combat,
            max_damage: 2,
            accuracy_gated: false,
            base_experience: 11,
        }
    }

    fn bow() -> WeaponDefinition {
        WeaponDefinition {
            id: 50,
            attack_speed: 5,
            ranged: Some(RangedWeapon { range: 7 }),
        }
    }

    /// Player 1 at (10,10) hunted by an NPC of `definition` from `distance` tiles east.
    fn hunted_by(definition: NpcDefinition, distance: i32) -> (Harness, EntityRef) {
        let mut h = Harness::new();
        h.definitions.spells.insert(7, wind_strike());
        let id = definition.id;
        h.define_npc(definition);
        h.spawn_player(1, pos(10, 10), 30);
        let npc = h.spawn_npc(10, id, pos(10 + distance, 10));
        h.targets.targets.insert(npc, EntityRef::player(1));
        (h, npc)
    }

    #[test]
    fn npc_auto_cast_beats_projectile() {
        let wizard = NpcDefinition {
            auto_cast_spell: Some(7),
            projectile: Some(19),
            attack_range: 6,
            ..NpcDefinition::melee(1, "dark wizard", 20, 30)
        };
        let (mut h, npc) = hunted_by(wizard, 5);
        h.rng.push([0.999]);

        let summary = h.tick();

        assert_eq!(summary.attacks.len(), 1);
        assert_eq!(summary.attacks[0].attacker, npc);
        assert_eq!(summary.attacks[0].mode, AttackMode::Magic);
        assert_eq!(summary.attacks[0].raw, 2);
        assert!(h.events.contains(&CombatEvent::ProjectileFired {
            attacker: npc,
            victim: EntityRef::player(1),
            projectile: Some(7),
            mode: AttackMode::Magic,
            position: pos(15, 10),
        }));
    }

    #[test]
    fn ranged_profile_npcs_attack_from_a_distance() {
        let mut h = Harness::new();
        let archer = NpcDefinition {
            projectile: Some(19),
            ..NpcDefinition::melee(1, "goblin archer", 10, 30)
        };
        let mut slinger = NpcDefinition::melee(2, "slinger", 10, 30);
        slinger.bonuses.range = 5;
        let brute = NpcDefinition::melee(3, "brute", 10, 30);
        for definition in [archer, slinger, brute] {
            h.define_npc(definition);
        }
        for (id, y) in [(1, 10), (2, 30), (3, 50)] {
            h.spawn_player(id, pos(10, y), 30);
            let npc = h.spawn_npc(10 + id, id, pos(15, y));
            h.targets.targets.insert(npc, EntityRef::player(id));
        }

        let summary = h.tick();

        let attackers: Vec<(EntityRef, AttackMode)> = summary
            .attacks
            .iter()
            .map(|report| (report.attacker, report.mode))
            .collect();
        assert_eq!(
            attackers,
            vec![
                (EntityRef::npc(11), AttackMode::Ranged),
                (EntityRef::npc(12), AttackMode::Ranged),
            ]
        );
        let projectiles: Vec<Option<u32>> = h
            .events
            .iter()
            .filter_map(|event| match event {
                CombatEvent::ProjectileFired { projectile, .. } => Some(*projectile),
                _ => None,
            })
            .collect();
        assert_eq!(projectiles, vec![Some(19), None]);
        // melee brute out of reach keeps its target
        assert_eq!(
            h.targets.targets.get(&EntityRef::npc(13)),
            Some(&EntityRef::player(3))
        );
    }

    #[test]
    fn ranged_attack_waits_for_line_of_sight() {
        let mut h = Harness::new();
        h.define_npc(NpcDefinition::melee(1, "goblin", 1, 50));
        h.definitions.weapons.insert(50, bow());
        h.definitions.ammo.insert(80, 3);
        h.spawn_player(1, pos(10, 10), 99);
        let npc = h.spawn_npc(10, 1, pos(14, 10));
        h.world.player_mut(1).unwrap().weapon = Some(50);
        h.inventory.ammo.insert(1, AmmoStack { item: 80, count: 10 });
        h.los = Some(FakeLineOfSight {
            blind: true,
            ..FakeLineOfSight::default()
        });
        h.engage(1, npc);

        let summary = h.tick();

        assert!(summary.attacks.is_empty());
        assert_eq!(h.targets.targets.get(&EntityRef::player(1)), Some(&npc));
        assert_eq!(
            h.world.player(1).unwrap().state,
            CombatState::Attacking(AttackMode::Ranged)
        );
        assert_eq!(h.inventory.ammo[&1].count, 10);
        assert!(h.messages_for(1).is_empty());

        if let Some(los) = h.los.as_mut() {
            los.blind = false;
        }
        h.rng.push([0.0, 0.999, 0.9, 0.9]);
        let summary = h.tick();
        assert_eq!(summary.attacks.len(), 1);
        assert_eq!(summary.attacks[0].mode, AttackMode::Ranged);
    }

    #[test]
    fn magic_cast_waits_for_line_of_sight_without_spending_reagents() {
        let (mut h, npc) = goblin_fight(50);
        h.definitions.spells.insert(7, wind_strike());
        h.world.player_mut(1).unwrap().selected_spell = Some(7);
        h.inventory.reagents.insert((1, 7), 1);
        h.los = Some(FakeLineOfSight {
            blind: true,
            ..FakeLineOfSight::default()
        });

        assert!(h.tick().attacks.is_empty());
        assert_eq!(h.inventory.reagents[&(1, 7)], 1);
        assert_eq!(h.world.player(1).unwrap().selected_spell, Some(7));
        assert_eq!(h.targets.targets.get(&EntityRef::player(1)), Some(&npc));
    }

    #[test]
    fn ranged_attack_without_ammo_disengages() {
        let mut h = Harness::new();
        h.define_npc(NpcDefinition::melee(1, "goblin", 1, 20));
        h.definitions.weapons.insert(
            50,
            WeaponDefinition {
                id: 50,
                attack_speed: 5,
                ranged: Some(RangedWeapon { range: 7 }),
            },
        );
        h.spawn_player(1, pos(10, 10), 40);
        let npc = h.spawn_npc(10, 1, pos(13, 10));
        h.world.player_mut(1).unwrap().weapon = Some(50);
        h.inventory.ammo.insert(1, AmmoStack { item: 80, count: 0 });
        assert_eq!(
            h.run(|system, world, env| system.engage(world, env, 1, npc)),
            Ok(AttackMode::Ranged)
        );

        let summary = h.tick();

        assert!(summary.attacks.is_empty());
        assert_eq!(h.targets.targets.get(&EntityRef::player(1)), None);
        assert_eq!(h.world.player(1).unwrap().state, CombatState::Idle);
        assert_eq!(h.world.npc(10).unwrap().current_hp, 20);
        assert_eq!(h.messages_for(1), vec!["You have no ammunition left."]);
        assert!(h.events_matching(|e| matches!(e, CombatEvent::DamageDealt { .. })).is_empty());
    }

    #[test]
    fn ranged_attack_spends_and_drops_ammo() {
        let mut h = Harness::new();
        h.define_npc(NpcDefinition::melee(1, "goblin", 1, 50));
        h.definitions.weapons.insert(
            50,
            WeaponDefinition {
                id: 50,
                attack_speed: 5,
                ranged: Some(RangedWeapon { range: 7 }),
            },
        );
        h.definitions.ammo.insert(80, 3);
        h.spawn_player(1, pos(10, 10), 99);
        let npc = h.spawn_npc(10, 1, pos(14, 10));
        h.world.player_mut(1).unwrap().weapon = Some(50);
        h.inventory.ammo.insert(1, AmmoStack { item: 80, count: 10 });
        h.engage(1, npc);
        // hit, max damage, ammo breaks, projectile drops
        h.rng.push([0.0, 0.999, 0.1, 0.1]);

        let summary = h.tick();

        assert_eq!(summary.attacks[0].mode, AttackMode::Ranged);
        assert_eq!(summary.attacks[0].dealt, 3);
        assert_eq!(h.inventory.ammo[&1].count, 9);
        assert_eq!(h.loot.projectiles, vec![(80, pos(14, 10), 1)]);
        assert_eq!(h.world.player(1).unwrap().combat_delay, 5);
        assert!(h.world.player(1).unwrap().experience.get(Stat::Ranged) > 0);
    }

    #[test]
    fn missing_reagents_downgrade_to_melee_when_adjacent() {
        let (mut h, _) = goblin_fight(50);
        h.definitions.spells.insert(
            7,
            SpellDefinition {
                id: 7,
                name: "wind strike".into(),
                kind: SpellKind::Combat,
                max_damage: 2,
                accuracy_gated: false,
                base_experience: 11,
            },
        );
        h.world.player_mut(1).unwrap().selected_spell = Some(7);
        h.rng.push([0.0, 0.5]);

        let summary = h.tick();

        assert_eq!(summary.attacks[0].mode, AttackMode::Melee);
        assert_eq!(h.world.player(1).unwrap().selected_spell, None);
        assert_eq!(h.world.player(1).unwrap().experience.get(Stat::Magic), 0);
    }

    #[test]
    fn magic_cast_consumes_reagents_and_awards_base_experience() {
        let (mut h, _) = goblin_fight(50);
        h.definitions.spells.insert(
            7,
            SpellDefinition {
                id: 7,
                name: "wind strike".into(),
                kind: SpellKind::Combat,
                max_damage: 2,
                accuracy_gated: false,
                base_experience: 11,
            },
        );
        h.world.player_mut(1).unwrap().selected_spell = Some(7);
        h.inventory.reagents.insert((1, 7), 1);
        h.rng.push([0.999]);

        let summary = h.tick();

        assert_eq!(summary.attacks[0].mode, AttackMode::Magic);
        assert_eq!(summary.attacks[0].dealt, 2);
        assert_eq!(h.inventory.reagents[&(1, 7)], 0);
        assert_eq!(h.world.player(1).unwrap().experience.get(Stat::Magic), 11 + 4);
        let casts = h.events_matching(|e| {
            matches!(e, CombatEvent::ProjectileFired { projectile: Some(7), .. })
        });
        assert_eq!(casts.len(), 1);
    }

    #[test]
    fn permission_denial_messages_and_resets() {
        let (mut h, npc) = goblin_fight(50);
        h.policy = Some(OwnerPolicy);
        h.world.npc_mut(10).unwrap().owner = Some(2);

        let summary = h.tick();

        assert!(summary.attacks.is_empty());
        assert_eq!(h.targets.targets.get(&EntityRef::player(1)), None);
        assert_eq!(h.world.player(1).unwrap().state, CombatState::Idle);
        assert_eq!(h.messages_for(1), vec!["You can't attack that."]);
        assert_eq!(
            h.run(|system, world, env| system.engage(world, env, 1, npc)),
            Err(AttackError::PermissionDenied {
                attacker: EntityRef::player(1),
                target: npc
            })
        );
    }

    #[test]
    fn barriers_block_adjacent_melee_without_disengaging() {
        let (mut h, npc) = goblin_fight(50);
        let mut los = crate::testing::FakeLineOfSight::default();
        los.blocked_edges.insert((pos(10, 10), pos(11, 10)));
        h.los = Some(los);

        let summary = h.tick();

        assert!(summary.attacks.is_empty());
        assert_eq!(h.targets.targets.get(&EntityRef::player(1)), Some(&npc));
    }

    #[test]
    fn melee_requires_exact_adjacency() {
        let (mut h, _) = goblin_fight(50);
        h.world.npc_mut(10).unwrap().position = pos(12, 10);
        assert!(h.tick().attacks.is_empty());
        h.world.npc_mut(10).unwrap().position = pos(10, 10);
        assert!(h.tick().attacks.is_empty());
    }

    fn duel(level_a: u32, level_b: u32) -> Harness {
        let mut h = Harness::new();
        h.spawn_player(1, pos(10, 10), level_a);
        h.spawn_player(2, pos(11, 10), level_b);
        h.engage(1, EntityRef::player(2));
        h.engage(2, EntityRef::player(1));
        h
    }

    #[test]
    fn pvp_needs_a_pvp_zone() {
        let mut h = duel(30, 30);
        let summary = h.tick();
        assert!(summary.attacks.is_empty());
        assert_eq!(h.world.player(1).unwrap().state, CombatState::Idle);
        assert_eq!(h.targets.targets.get(&EntityRef::player(1)), None);
    }

    #[test]
    fn pvp_enforces_level_bracket() {
        let mut h = duel(20, 60);
        h.zones = Some(FakeZones(5));
        assert!(h.tick().attacks.is_empty());
        assert_eq!(h.messages_for(1).len(), 1);
    }

    #[test]
    fn pvp_lower_id_strikes_first() {
        let mut h = duel(30, 30);
        h.zones = Some(FakeZones(10));
        h.rng.push([0.0, 0.5, 0.0, 0.5]);

        let summary = h.tick();

        assert_eq!(summary.attacks.len(), 2);
        assert_eq!(summary.attacks[0].attacker, EntityRef::player(1));
        assert_eq!(summary.attacks[1].attacker, EntityRef::player(2));
        assert_eq!(
            h.system.resolver().ledgers().top_contributor(EntityRef::player(2)),
            Some(EntityRef::player(1))
        );
    }

    #[test]
    fn removing_a_player_drops_their_damage_ledger() {
        let mut h = duel(30, 30);
        h.zones = Some(FakeZones(10));
        h.rng.push([0.0, 0.5, 0.0, 0.5]);
        h.tick();
        assert!(h.system.resolver().ledgers().get(EntityRef::player(1)).is_some());

        let removed = h.system.remove_player(&mut h.world, 1);

        assert_eq!(removed.map(|player| player.id), Some(1));
        assert!(h.world.player(1).is_none());
        assert!(h.system.resolver().ledgers().get(EntityRef::player(1)).is_none());
        assert!(h.system.remove_player(&mut h.world, 1).is_none());
    }

    #[test]
    fn dead_targets_are_not_attacked_again() {
        let (mut h, npc) = goblin_fight(5);
        h.spawn_player(2, pos(12, 10), 99);
        arm(&mut h, 2, 16);
        h.engage(2, npc);
        h.rng.push([0.0, 0.85]);

        let summary = h.tick();

        assert_eq!(summary.attacks.len(), 1);
        assert!(h.world.npc(10).is_none());
        assert_eq!(h.targets.targets.get(&EntityRef::player(2)), None);
        assert_eq!(h.world.player(2).unwrap().state, CombatState::Idle);
    }

    #[test]
    fn non_combat_death_runs_player_pipeline() {
        let mut h = Harness::new();
        h.spawn_player(1, pos(10, 10), 30);
        h.world.player_mut(1).unwrap().set_hits(0);

        let marked = h.run(|system, world, env| system.mark_player_dying(world, env, 1, None));
        assert!(marked);
        assert_eq!(h.world.player(1).unwrap().state, CombatState::Dying);

        h.tick_n(4);
        assert_eq!(h.world.player(1).unwrap().state, CombatState::Dead);
        assert!(h.teleport.moves.is_empty());

        h.tick();
        let player = h.world.player(1).unwrap();
        assert_eq!(player.state, CombatState::Idle);
        assert_eq!(player.hits(), 30);
        assert_eq!(h.teleport.moves.len(), 1);
        assert!(crate::testing::RESPAWN_AREA.contains(player.position));
        assert_eq!(player.levels, Levels::uniform(30));
    }

    #[test]
    fn tick_counter_advances() {
        let mut h = Harness::new();
        assert_eq!(h.tick().tick, Tick::ZERO);
        assert_eq!(h.tick().tick, Tick::new(1));
        assert_eq!(h.system.now(), Tick::new(2));
    }
}
