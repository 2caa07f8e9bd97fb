/// How an attack is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum AttackMode {
    Melee,
    Ranged,
    Magic,
}

/// Resolved mode and range for one attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackPlan {
    pub mode: AttackMode,
    /// Maximum Chebyshev distance; melee is always 1.
    pub range: u32,
    pub spell: Option<u32>,
    /// Ammunition item for ranged attempts.
    pub projectile: Option<u32>,
}

impl AttackPlan {
    pub const fn melee() -> Self {
        Self {
            mode: AttackMode::Melee,
            range: 1,
            spell: None,
            projectile: None,
        }
    }

    pub const fn ranged(range: u32, projectile: Option<u32>) -> Self {
        Self {
            mode: AttackMode::Ranged,
            range,
            spell: None,
            projectile,
        }
    }

    pub const fn magic(range: u32, spell: u32) -> Self {
        Self {
            mode: AttackMode::Magic,
            range,
            spell: Some(spell),
            projectile: None,
        }
    }
}
