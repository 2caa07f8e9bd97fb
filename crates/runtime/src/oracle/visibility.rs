//! Grid visibility implementing [`combat_core::VisibilityIndex`].
use std::collections::BTreeMap;

use combat_core::{EntityRef, Position, VisibilityIndex};

/// Default Chebyshev view distance.
pub const VIEW_DISTANCE: u32 = 15;

/// Positions of every visible entity; players within `view_distance` on the
/// same level see an event.
#[derive(Clone, Debug)]
pub struct GridVisibility {
    positions: BTreeMap<EntityRef, Position>,
    view_distance: u32,
}

impl GridVisibility {
    pub fn new(view_distance: u32) -> Self {
        Self {
            positions: BTreeMap::new(),
            view_distance,
        }
    }

    pub fn position(&self, entity: EntityRef) -> Option<Position> {
        self.positions.get(&entity).copied()
    }

    pub fn contains(&self, entity: EntityRef) -> bool {
        self.positions.contains_key(&entity)
    }
}

impl Default for GridVisibility {
    fn default() -> Self {
        Self::new(VIEW_DISTANCE)
    }
}

impl VisibilityIndex for GridVisibility {
    fn viewers(&self, position: Position) -> Vec<EntityRef> {
        self.positions
            .iter()
            .filter(|(entity, at)| {
                entity.is_player()
                    && at
                        .chebyshev_distance(position)
                        .is_some_and(|distance| distance <= self.view_distance)
            })
            .map(|(entity, _)| *entity)
            .collect()
    }

    fn add_or_update(&mut self, entity: EntityRef, position: Position) {
        self.positions.insert(entity, position);
    }

    fn remove(&mut self, entity: EntityRef) {
        self.positions.remove(&entity);
    }
}
