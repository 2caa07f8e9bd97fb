//! Collaborators the combat core consumes.
//!
//! Definition catalogs, targeting tables, geometry, inventory, loot, teleport,
//! visibility and randomness are all owned outside the core. The [`CombatEnv`]
//! aggregate bundles them so the resolver and death manager can reach
//! everything they need without hard coupling to concrete implementations.
mod definitions;
mod error;
mod events;
mod rng;
mod services;
mod world;

pub use definitions::{
    DefinitionOracle, NpcDefinition, RangedWeapon, SpellDefinition, SpellKind, WeaponDefinition,
};
pub use error::OracleError;
pub use events::{CombatEvent, EventSink};
pub use rng::{CombatRng, PcgRng};
pub use services::{AmmoStack, InventoryService, LootService, TeleportService};
pub use world::{
    InteractionPolicy, LineOfSightOracle, PvpZoneOracle, TargetingOracle, VisibilityIndex,
};

use crate::state::{Npc, Player, Position};

/// Collaborators available to one tick of combat processing.
///
/// Required collaborators are plain references; the optional ones default
/// permissively when absent (LOS clear, no edge blocking, interaction
/// allowed) except PvP zones, whose absence disables PvP entirely.
pub struct CombatEnv<'a> {
    pub definitions: &'a dyn DefinitionOracle,
    pub targeting: &'a mut dyn TargetingOracle,
    pub inventory: &'a mut dyn InventoryService,
    pub visibility: &'a mut dyn VisibilityIndex,
    pub loot: &'a mut dyn LootService,
    pub teleport: &'a mut dyn TeleportService,
    pub events: &'a mut dyn EventSink,
    pub rng: &'a mut dyn CombatRng,
    pub line_of_sight: Option<&'a dyn LineOfSightOracle>,
    pub pvp_zones: Option<&'a dyn PvpZoneOracle>,
    pub interaction: Option<&'a dyn InteractionPolicy>,
}

impl<'a> CombatEnv<'a> {
    pub fn builder() -> CombatEnvBuilder<'a> {
        CombatEnvBuilder::default()
    }

    pub fn has_line_of_sight(&self, from: Position, to: Position) -> bool {
        self.line_of_sight
            .is_none_or(|los| los.has_line_of_sight(from, to))
    }

    pub fn melee_edge_blocked(&self, from: Position, to: Position) -> bool {
        self.line_of_sight
            .is_some_and(|los| los.is_melee_edge_blocked(from, to))
    }

    pub fn can_interact(&self, player: &Player, npc: &Npc) -> bool {
        self.interaction
            .is_none_or(|policy| policy.can_attack(player, npc))
    }

    pub fn pvp_tier(&self, position: Position) -> Option<u32> {
        self.pvp_zones.and_then(|zones| zones.pvp_tier(position))
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.events.emit(event);
    }

    pub fn message(&mut self, player: u32, text: impl Into<String>) {
        self.events.emit(CombatEvent::PlayerMessage {
            player,
            text: text.into(),
        });
    }
}

/// Builder for [`CombatEnv`]; `build` fails on the first missing required
/// collaborator.
#[derive(Default)]
pub struct CombatEnvBuilder<'a> {
    definitions: Option<&'a dyn DefinitionOracle>,
    targeting: Option<&'a mut dyn TargetingOracle>,
    inventory: Option<&'a mut dyn InventoryService>,
    visibility: Option<&'a mut dyn VisibilityIndex>,
    loot: Option<&'a mut dyn LootService>,
    teleport: Option<&'a mut dyn TeleportService>,
    events: Option<&'a mut dyn EventSink>,
    rng: Option<&'a mut dyn CombatRng>,
    line_of_sight: Option<&'a dyn LineOfSightOracle>,
    pvp_zones: Option<&'a dyn PvpZoneOracle>,
    interaction: Option<&'a dyn InteractionPolicy>,
}

impl<'a> CombatEnvBuilder<'a> {
    pub fn definitions(mut self, definitions: &'a dyn DefinitionOracle) -> Self {
        self.definitions = Some(definitions);
        self
    }

    pub fn targeting(mut self, targeting: &'a mut dyn TargetingOracle) -> Self {
        self.targeting = Some(targeting);
        self
    }

    pub fn inventory(mut self, inventory: &'a mut dyn InventoryService) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn visibility(mut self, visibility: &'a mut dyn VisibilityIndex) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn loot(mut self, loot: &'a mut dyn LootService) -> Self {
        self.loot = Some(loot);
        self
    }

    pub fn teleport(mut self, teleport: &'a mut dyn TeleportService) -> Self {
        self.teleport = Some(teleport);
        self
    }

    pub fn events(mut self, events: &'a mut dyn EventSink) -> Self {
        self.events = Some(events);
        self
    }

    pub fn rng(mut self, rng: &'a mut dyn CombatRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn line_of_sight(mut self, los: &'a dyn LineOfSightOracle) -> Self {
        self.line_of_sight = Some(los);
        self
    }

    pub fn pvp_zones(mut self, zones: &'a dyn PvpZoneOracle) -> Self {
        self.pvp_zones = Some(zones);
        self
    }

    pub fn interaction(mut self, policy: &'a dyn InteractionPolicy) -> Self {
        self.interaction = Some(policy);
        self
    }

    /// # Errors
    ///
    /// Returns the [`OracleError`] naming the first required collaborator
    /// that was not provided.
    pub fn build(self) -> Result<CombatEnv<'a>, OracleError> {
        Ok(CombatEnv {
            definitions: self.definitions.ok_or(OracleError::DefinitionsNotAvailable)?,
            targeting: self.targeting.ok_or(OracleError::TargetingNotAvailable)?,
            inventory: self.inventory.ok_or(OracleError::InventoryNotAvailable)?,
            visibility: self.visibility.ok_or(OracleError::VisibilityNotAvailable)?,
            loot: self.loot.ok_or(OracleError::LootNotAvailable)?,
            teleport: self.teleport.ok_or(OracleError::TeleportNotAvailable)?,
            events: self.events.ok_or(OracleError::EventsNotAvailable)?,
            rng: self.rng.ok_or(OracleError::RngNotAvailable)?,
            line_of_sight: self.line_of_sight,
            pvp_zones: self.pvp_zones,
            interaction: self.interaction,
        })
    }
}
