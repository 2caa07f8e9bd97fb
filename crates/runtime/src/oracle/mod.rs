//! In-memory collaborators for the combat rules.
//!
//! Static content sits behind an `Arc` and is shared; everything else is
//! mutable per-world state owned by the tick worker. [`OracleManager`] bundles
//! them and lends out a [`CombatEnv`] for each tick or command.
mod geometry;
mod inventory;
mod policy;
mod services;
mod targets;
mod visibility;

use std::sync::Arc;

use combat_content::ContentCatalog;
use combat_core::{CombatEnv, CombatEvent, OracleError, PcgRng};

pub use geometry::{OpenLineOfSight, PvpZone, RectPvpZones};
pub use inventory::InventoryBook;
pub use policy::OwnershipPolicy;
pub use services::{LootRecord, LootRecorder, TeleportRecorder};
pub use targets::TargetRegistry;
pub use visibility::{GridVisibility, VIEW_DISTANCE};

/// Manages all collaborator implementations and provides unified access
pub struct OracleManager {
    pub(crate) catalog: Arc<ContentCatalog>,
    pub(crate) targets: TargetRegistry,
    pub(crate) visibility: GridVisibility,
    pub(crate) geometry: OpenLineOfSight,
    pub(crate) zones: RectPvpZones,
    pub(crate) policy: Option<OwnershipPolicy>,
    pub(crate) inventory: InventoryBook,
    pub(crate) loot: LootRecorder,
    pub(crate) teleport: TeleportRecorder,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(catalog: Arc<ContentCatalog>, seed: u64) -> Self {
        Self {
            catalog,
            targets: TargetRegistry::new(),
            visibility: GridVisibility::default(),
            geometry: OpenLineOfSight::new(),
            zones: RectPvpZones::default(),
            policy: Some(OwnershipPolicy),
            inventory: InventoryBook::new(),
            loot: LootRecorder::default(),
            teleport: TeleportRecorder::default(),
            rng: PcgRng::new(seed),
        }
    }

    pub fn with_visibility(mut self, visibility: GridVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_geometry(mut self, geometry: OpenLineOfSight) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_zones(mut self, zones: RectPvpZones) -> Self {
        self.zones = zones;
        self
    }

    /// `None` lets anyone attack instanced entities.
    pub fn with_policy(mut self, policy: Option<OwnershipPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// Converts the manager into a [`CombatEnv`] writing events to `events`.
    pub fn as_combat_env<'a>(
        &'a mut self,
        events: &'a mut Vec<CombatEvent>,
    ) -> Result<CombatEnv<'a>, OracleError> {
        let mut builder = CombatEnv::builder()
            .definitions(self.catalog.as_ref())
            .targeting(&mut self.targets)
            .inventory(&mut self.inventory)
            .visibility(&mut self.visibility)
            .loot(&mut self.loot)
            .teleport(&mut self.teleport)
            .events(events)
            .rng(&mut self.rng)
            .line_of_sight(&self.geometry);
        if !self.zones.is_empty() {
            builder = builder.pvp_zones(&self.zones);
        }
        if let Some(policy) = self.policy.as_ref() {
            builder = builder.interaction(policy);
        }
        builder.build()
    }
}
