//! Deterministic combat rules for a tick-synchronized multiplayer world.
//!
//! `combat-core` resolves attacks between players and autonomous entities once
//! per tick and drives both through death and respawn. It owns no I/O: every
//! external concern (targeting, geometry, inventory, loot, teleport,
//! visibility, randomness) is reached through the traits in [`env`], and all
//! state lives in an explicitly passed [`state::World`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use combat::{AttackMode, AttackPlan, DamageLedger};
pub use config::{CombatConfig, RespawnArea};
pub use engine::{
    AttackError, AttackReport, CombatResolver, CombatSystem, DeadNpcRecord, DeadPlayerRecord,
    DeathManager, IntegrityError, TickSummary,
};
pub use env::{
    AmmoStack, CombatEnv, CombatEnvBuilder, CombatEvent, CombatRng, DefinitionOracle,
    EventSink, InteractionPolicy, InventoryService, LineOfSightOracle, LootService,
    NpcDefinition, OracleError, PcgRng, PvpZoneOracle, RangedWeapon, SpellDefinition, SpellKind,
    TargetingOracle, TeleportService, VisibilityIndex, WeaponDefinition,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    CombatState, DyingSets, EntityKind, EntityRef, LifecycleError, LifecycleEvent, Npc, Player,
    Position, Tick, World,
};
pub use stats::{BonusKind, CombatStats, CombatStyle, EquipmentBonuses, Levels, Stat};
