//! In-memory collaborators and a scripted RNG for unit tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::config::{CombatConfig, RespawnArea};
use crate::engine::{CombatSystem, TickSummary};
use crate::env::{
    AmmoStack, CombatEnv, CombatEvent, CombatRng, DefinitionOracle, InteractionPolicy,
    InventoryService, LineOfSightOracle, LootService, NpcDefinition, PvpZoneOracle,
    SpellDefinition, TargetingOracle, TeleportService, VisibilityIndex, WeaponDefinition,
};
use crate::state::{EntityRef, Npc, Player, Position, World};
use crate::stats::Levels;

/// Replays a fixed draw sequence, then repeats `fallback`.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    draws: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0.0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, draws: impl IntoIterator<Item = f64>) {
        self.draws.extend(draws);
    }
}

impl CombatRng for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeDefinitions {
    pub npcs: BTreeMap<u32, NpcDefinition>,
    pub spells: BTreeMap<u32, SpellDefinition>,
    pub weapons: BTreeMap<u32, WeaponDefinition>,
    pub ammo: BTreeMap<u32, u32>,
}

impl DefinitionOracle for FakeDefinitions {
    fn npc(&self, id: u32) -> Option<&NpcDefinition> {
        self.npcs.get(&id)
    }

    fn spell(&self, id: u32) -> Option<&SpellDefinition> {
        self.spells.get(&id)
    }

    fn weapon(&self, id: u32) -> Option<&WeaponDefinition> {
        self.weapons.get(&id)
    }

    fn ammo_max_hit(&self, item: u32) -> Option<u32> {
        self.ammo.get(&item).copied()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeTargets {
    pub targets: BTreeMap<EntityRef, EntityRef>,
}

impl TargetingOracle for FakeTargets {
    fn target_of(&self, entity: EntityRef) -> Option<EntityRef> {
        self.targets.get(&entity).copied()
    }

    fn set_target(&mut self, entity: EntityRef, target: EntityRef) {
        self.targets.insert(entity, target);
    }

    fn clear_target(&mut self, entity: EntityRef) {
        self.targets.remove(&entity);
    }

    fn clear_targets_on(&mut self, victim: EntityRef) -> Vec<EntityRef> {
        let attackers: Vec<EntityRef> = self
            .targets
            .iter()
            .filter(|(_, target)| **target == victim)
            .map(|(attacker, _)| *attacker)
            .collect();
        for attacker in &attackers {
            self.targets.remove(attacker);
        }
        attackers
    }

    fn player_targets(&self) -> Vec<(u32, EntityRef)> {
        self.targets
            .iter()
            .filter(|(entity, _)| entity.is_player())
            .map(|(entity, target)| (entity.id, *target))
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeInventory {
    pub ammo: BTreeMap<u32, AmmoStack>,
    /// Remaining casts per `(player, spell)`.
    pub reagents: BTreeMap<(u32, u32), u32>,
}

impl InventoryService for FakeInventory {
    fn equipped_ammo(&self, player: u32) -> Option<AmmoStack> {
        self.ammo.get(&player).copied()
    }

    fn consume_ammo(&mut self, player: u32, item: u32) -> bool {
        match self.ammo.get_mut(&player) {
            Some(stack) if stack.item == item && stack.count > 0 => {
                stack.count -= 1;
                true
            }
            _ => false,
        }
    }

    fn has_reagents(&self, player: u32, spell: u32) -> bool {
        self.reagents.get(&(player, spell)).is_some_and(|n| *n > 0)
    }

    fn consume_reagents(&mut self, player: u32, spell: u32) -> bool {
        match self.reagents.get_mut(&(player, spell)) {
            Some(casts) if *casts > 0 => {
                *casts -= 1;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeVisibility {
    pub visible: BTreeMap<EntityRef, Position>,
    pub removals: Vec<EntityRef>,
}

impl VisibilityIndex for FakeVisibility {
    fn viewers(&self, position: Position) -> Vec<EntityRef> {
        self.visible
            .iter()
            .filter(|(entity, at)| {
                entity.is_player() && at.chebyshev_distance(position).is_some_and(|d| d <= 15)
            })
            .map(|(entity, _)| *entity)
            .collect()
    }

    fn add_or_update(&mut self, entity: EntityRef, position: Position) {
        self.visible.insert(entity, position);
    }

    fn remove(&mut self, entity: EntityRef) {
        self.visible.remove(&entity);
        self.removals.push(entity);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LootDrop {
    pub definition: u32,
    pub position: Position,
    pub killer: Option<EntityRef>,
    pub override_table: Option<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct FakeLoot {
    pub drops: Vec<LootDrop>,
    pub projectiles: Vec<(u32, Position, u32)>,
    pub player_deaths: Vec<(u32, Option<EntityRef>, Position)>,
}

impl LootService for FakeLoot {
    fn drop_loot(
        &mut self,
        definition: u32,
        position: Position,
        killer: Option<EntityRef>,
        override_table: Option<u32>,
    ) {
        self.drops.push(LootDrop {
            definition,
            position,
            killer,
            override_table,
        });
    }

    fn drop_projectile(&mut self, item: u32, position: Position, owner: u32) {
        self.projectiles.push((item, position, owner));
    }

    fn resolve_player_death(&mut self, player: u32, killer: Option<EntityRef>, position: Position) {
        self.player_deaths.push((player, killer, position));
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeTeleport {
    pub moves: Vec<(u32, Position)>,
}

impl TeleportService for FakeTeleport {
    fn respawn_player(&mut self, player: u32, position: Position) {
        self.moves.push((player, position));
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeLineOfSight {
    pub blocked_edges: BTreeSet<(Position, Position)>,
    pub blind: bool,
}

impl LineOfSightOracle for FakeLineOfSight {
    fn has_line_of_sight(&self, _from: Position, _to: Position) -> bool {
        !self.blind
    }

    fn is_melee_edge_blocked(&self, from: Position, to: Position) -> bool {
        self.blocked_edges.contains(&(from, to)) || self.blocked_edges.contains(&(to, from))
    }
}

/// Uniform PvP tier everywhere.
#[derive(Clone, Copy, Debug)]
pub struct FakeZones(pub u32);

impl PvpZoneOracle for FakeZones {
    fn pvp_tier(&self, _position: Position) -> Option<u32> {
        Some(self.0)
    }
}

/// Instanced NPCs may only be attacked by their owner.
#[derive(Clone, Copy, Debug, Default)]
pub struct OwnerPolicy;

impl InteractionPolicy for OwnerPolicy {
    fn can_attack(&self, player: &Player, npc: &Npc) -> bool {
        npc.owner.is_none_or(|owner| owner == player.id)
    }
}

/// Fully wired world, combat system and fakes.
pub struct Harness {
    pub world: World,
    pub system: CombatSystem,
    pub definitions: FakeDefinitions,
    pub targets: FakeTargets,
    pub inventory: FakeInventory,
    pub visibility: FakeVisibility,
    pub loot: FakeLoot,
    pub teleport: FakeTeleport,
    pub events: Vec<CombatEvent>,
    pub rng: ScriptedRng,
    pub los: Option<FakeLineOfSight>,
    pub zones: Option<FakeZones>,
    pub policy: Option<OwnerPolicy>,
}

pub const RESPAWN_AREA: RespawnArea = RespawnArea {
    level: 0,
    min_x: 100,
    min_y: 100,
    max_x: 104,
    max_y: 104,
};

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CombatConfig::default().with_respawn_area(RESPAWN_AREA))
    }

    pub fn with_config(config: CombatConfig) -> Self {
        Self {
            world: World::new(),
            system: CombatSystem::new(config),
            definitions: FakeDefinitions::default(),
            targets: FakeTargets::default(),
            inventory: FakeInventory::default(),
            visibility: FakeVisibility::default(),
            loot: FakeLoot::default(),
            teleport: FakeTeleport::default(),
            events: Vec::new(),
            rng: ScriptedRng::new([]),
            los: None,
            zones: None,
            policy: None,
        }
    }

    pub fn run<R>(
        &mut self,
        f: impl FnOnce(&mut CombatSystem, &mut World, &mut CombatEnv<'_>) -> R,
    ) -> R {
        let Harness {
            world,
            system,
            definitions,
            targets,
            inventory,
            visibility,
            loot,
            teleport,
            events,
            rng,
            los,
            zones,
            policy,
        } = self;

        let mut builder = CombatEnv::builder()
            .definitions(&*definitions)
            .targeting(targets)
            .inventory(inventory)
            .visibility(visibility)
            .loot(loot)
            .teleport(teleport)
            .events(events)
            .rng(rng);
        if let Some(los) = los.as_ref() {
            builder = builder.line_of_sight(los);
        }
        if let Some(zones) = zones.as_ref() {
            builder = builder.pvp_zones(zones);
        }
        if let Some(policy) = policy.as_ref() {
            builder = builder.interaction(policy);
        }
        let mut env = builder.build().expect("harness wires every collaborator");
        f(system, world, &mut env)
    }

    pub fn tick(&mut self) -> TickSummary {
        self.run(|system, world, env| system.tick(world, env))
    }

    pub fn tick_n(&mut self, n: u64) -> Vec<TickSummary> {
        (0..n).map(|_| self.tick()).collect()
    }

    pub fn define_npc(&mut self, definition: NpcDefinition) {
        self.definitions.npcs.insert(definition.id, definition);
    }

    pub fn spawn_player(&mut self, id: u32, position: Position, level: u32) -> EntityRef {
        self.world
            .insert_player(Player::new(id, position, Levels::uniform(level)));
        self.visibility
            .add_or_update(EntityRef::player(id), position);
        EntityRef::player(id)
    }

    pub fn spawn_npc(&mut self, id: u32, definition: u32, position: Position) -> EntityRef {
        let def = self
            .definitions
            .npcs
            .get(&definition)
            .expect("npc definition registered");
        self.world.insert_npc(Npc::spawn(id, def, position));
        self.visibility.add_or_update(EntityRef::npc(id), position);
        EntityRef::npc(id)
    }

    pub fn engage(&mut self, player: u32, target: EntityRef) {
        self.run(|system, world, env| system.engage(world, env, player, target))
            .expect("engagement accepted");
    }

    pub fn events_matching(&self, pred: impl Fn(&CombatEvent) -> bool) -> Vec<&CombatEvent> {
        self.events.iter().filter(|event| pred(event)).collect()
    }

    pub fn messages_for(&self, player: u32) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                CombatEvent::PlayerMessage { player: to, text } if *to == player => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }
}
