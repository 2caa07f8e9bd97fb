//! Static geometry: melee barriers and PvP zones.
//!
//! Line of sight itself is not modelled; ranged and magic attacks always see
//! their target.
use std::collections::BTreeSet;

use combat_core::{LineOfSightOracle, Position, PvpZoneOracle};

/// Open terrain with optional barriers between adjacent tiles.
#[derive(Clone, Debug, Default)]
pub struct OpenLineOfSight {
    barriers: BTreeSet<(Position, Position)>,
}

impl OpenLineOfSight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks melee across the edge between two tiles, both directions.
    pub fn add_barrier(&mut self, a: Position, b: Position) {
        self.barriers.insert(ordered(a, b));
    }

    pub fn with_barrier(mut self, a: Position, b: Position) -> Self {
        self.add_barrier(a, b);
        self
    }
}

fn ordered(a: Position, b: Position) -> (Position, Position) {
    if a <= b { (a, b) } else { (b, a) }
}

impl LineOfSightOracle for OpenLineOfSight {
    fn has_line_of_sight(&self, _from: Position, _to: Position) -> bool {
        true
    }

    fn is_melee_edge_blocked(&self, from: Position, to: Position) -> bool {
        self.barriers.contains(&ordered(from, to))
    }
}

/// Axis-aligned PvP area with its level-bracket tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PvpZone {
    pub level: u8,
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    pub tier: u32,
}

impl PvpZone {
    pub fn contains(&self, position: Position) -> bool {
        position.level == self.level
            && (self.min_x..=self.max_x).contains(&position.x)
            && (self.min_y..=self.max_y).contains(&position.y)
    }
}

/// PvP zones; the first zone containing a position decides its tier.
#[derive(Clone, Debug, Default)]
pub struct RectPvpZones {
    zones: Vec<PvpZone>,
}

impl RectPvpZones {
    pub fn new(zones: Vec<PvpZone>) -> Self {
        Self { zones }
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl PvpZoneOracle for RectPvpZones {
    fn pvp_tier(&self, position: Position) -> Option<u32> {
        self.zones
            .iter()
            .find(|zone| zone.contains(position))
            .map(|zone| zone.tier)
    }
}
