//! Equipment-derived combat bonuses.

/// Bonus columns exposed by worn equipment (or an NPC definition).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusKind {
    Accuracy,
    Strength,
    Defense,
    Magic,
    Range,
}

/// Numeric equipment bonuses. Absent bonuses are zero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquipmentBonuses {
    pub accuracy: i32,
    pub strength: i32,
    pub defense: i32,
    pub magic: i32,
    pub range: i32,
    /// Accuracy multiplier applied against autonomous targets (slayer-style
    /// gear). `1.0` when nothing special is worn.
    pub accuracy_multiplier: f64,
}

impl EquipmentBonuses {
    pub fn get(&self, kind: BonusKind) -> i32 {
        match kind {
            BonusKind::Accuracy => self.accuracy,
            BonusKind::Strength => self.strength,
            BonusKind::Defense => self.defense,
            BonusKind::Magic => self.magic,
            BonusKind::Range => self.range,
        }
    }

    pub fn set(&mut self, kind: BonusKind, value: i32) {
        match kind {
            BonusKind::Accuracy => self.accuracy = value,
            BonusKind::Strength => self.strength = value,
            BonusKind::Defense => self.defense = value,
            BonusKind::Magic => self.magic = value,
            BonusKind::Range => self.range = value,
        }
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, kind: BonusKind, value: i32) -> Self {
        self.set(kind, value);
        self
    }
}

impl Default for EquipmentBonuses {
    fn default() -> Self {
        Self {
            accuracy: 0,
            strength: 0,
            defense: 0,
            magic: 0,
            range: 0,
            accuracy_multiplier: 1.0,
        }
    }
}
