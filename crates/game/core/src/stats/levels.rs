//! Skill levels: the XP-derived "actual" value and the temporarily modified
//! "boosted" value for every combat-relevant stat.

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Combat-relevant skills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    Accuracy,
    Defense,
    Strength,
    Hits,
    Ranged,
    Prayer,
    Magic,
}

impl Stat {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Actual and boosted levels for every [`Stat`].
///
/// For players the boosted Hits level is the current hit point counter and
/// the actual Hits level is the maximum.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Levels {
    actual: [u32; Stat::COUNT],
    boosted: [u32; Stat::COUNT],
}

impl Levels {
    /// Every stat at the same level, boosted equal to actual.
    pub fn uniform(level: u32) -> Self {
        Self {
            actual: [level; Stat::COUNT],
            boosted: [level; Stat::COUNT],
        }
    }

    /// Level 1 everywhere except the listed stats.
    pub fn from_pairs(pairs: &[(Stat, u32)]) -> Self {
        let mut levels = Self::uniform(1);
        for &(stat, level) in pairs {
            levels.set_actual(stat, level);
        }
        levels
    }

    pub fn actual(&self, stat: Stat) -> u32 {
        self.actual[stat.index()]
    }

    pub fn boosted(&self, stat: Stat) -> u32 {
        self.boosted[stat.index()]
    }

    /// Sets both the actual and the boosted level.
    pub fn set_actual(&mut self, stat: Stat, level: u32) {
        self.actual[stat.index()] = level;
        self.boosted[stat.index()] = level;
    }

    pub fn set_boosted(&mut self, stat: Stat, level: u32) {
        self.boosted[stat.index()] = level;
    }

    /// Drops all boosts and drains.
    pub fn restore(&mut self) {
        self.boosted = self.actual;
    }

    pub fn iter_actual(&self) -> impl Iterator<Item = (Stat, u32)> + '_ {
        Stat::iter().map(|stat| (stat, self.actual(stat)))
    }
}

impl Default for Levels {
    fn default() -> Self {
        Self::uniform(1)
    }
}

/// Combat level derived from actual levels.
///
/// ```text
/// base   = 0.25 × (defense + hits + ⌊prayer / 2⌋)
/// melee  = 0.325 × (accuracy + strength)
/// ranged = 0.325 × ⌊1.5 × ranged⌋
/// magic  = 0.325 × ⌊1.5 × magic⌋
/// level  = ⌊base + max(melee, ranged, magic)⌋
/// ```
pub fn combat_level(levels: &Levels) -> u32 {
    let defense = levels.actual(Stat::Defense) as f64;
    let hits = levels.actual(Stat::Hits) as f64;
    let prayer = (levels.actual(Stat::Prayer) / 2) as f64;
    let base = 0.25 * (defense + hits + prayer);

    let melee = 0.325 * (levels.actual(Stat::Accuracy) + levels.actual(Stat::Strength)) as f64;
    let ranged = 0.325 * (levels.actual(Stat::Ranged) as f64 * 1.5).floor();
    let magic = 0.325 * (levels.actual(Stat::Magic) as f64 * 1.5).floor();

    (base + melee.max(ranged).max(magic)).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_account_is_level_three() {
        let levels = Levels::from_pairs(&[(Stat::Hits, 10)]);
        // 0.25 × (1 + 10 + 0) + 0.325 × 2 = 2.75 + 0.65 = 3.4
        assert_eq!(combat_level(&levels), 3);
    }

    #[test]
    fn maxed_melee_account() {
        let levels = Levels::uniform(99);
        // 0.25 × (99 + 99 + 49) + 0.325 × 198 = 61.75 + 64.35 = 126.1
        assert_eq!(combat_level(&levels), 126);
    }

    #[test]
    fn restore_drops_boosts() {
        let mut levels = Levels::uniform(50);
        levels.set_boosted(Stat::Strength, 58);
        levels.set_boosted(Stat::Defense, 40);
        levels.restore();
        assert_eq!(levels.boosted(Stat::Strength), 50);
        assert_eq!(levels.boosted(Stat::Defense), 50);
    }
}
