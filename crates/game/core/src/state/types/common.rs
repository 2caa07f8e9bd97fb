use std::fmt;

/// Which of the two entity collections an entity lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// Player-controlled entity.
    Player,
    /// Autonomous (non-player) entity.
    Npc,
}

/// Identity of a combat participant, used as attacker/target in every event
/// and in damage-credit bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: u32,
}

impl EntityRef {
    pub const fn player(id: u32) -> Self {
        Self {
            kind: EntityKind::Player,
            id,
        }
    }

    pub const fn npc(id: u32) -> Self {
        Self {
            kind: EntityKind::Npc,
            id,
        }
    }

    #[inline]
    pub const fn is_player(self) -> bool {
        matches!(self.kind, EntityKind::Player)
    }

    #[inline]
    pub const fn is_npc(self) -> bool {
        matches!(self.kind, EntityKind::Npc)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntityKind::Player => write!(f, "player#{}", self.id),
            EntityKind::Npc => write!(f, "npc#{}", self.id),
        }
    }
}

/// Tile position on a given map level (plane).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub level: u8,
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(level: u8, x: i32, y: i32) -> Self {
        Self { level, x, y }
    }

    /// Chessboard distance between two tiles, or `None` across levels.
    pub fn chebyshev_distance(self, other: Position) -> Option<u32> {
        if self.level != other.level {
            return None;
        }
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        Some(dx.max(dy))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, L{})", self.x, self.y, self.level)
    }
}

/// Discrete simulation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Ticks from `self` until `deadline`, zero once the deadline has passed.
    pub fn until(self, deadline: Tick) -> u64 {
        deadline.0.saturating_sub(self.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
