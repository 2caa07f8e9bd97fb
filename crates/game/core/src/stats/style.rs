//! Combat style selection and the stat focus each style trains.

use bitflags::bitflags;

use super::levels::Stat;

bitflags! {
    /// Stats favoured by a combat style.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StyleFocus: u8 {
        const ACCURACY = 1 << 0;
        const STRENGTH = 1 << 1;
        const DEFENSE = 1 << 2;
        const RANGED = 1 << 3;
    }
}

impl StyleFocus {
    /// Focus flag for a stat, empty for stats no style trains.
    pub const fn of(stat: Stat) -> Self {
        match stat {
            Stat::Accuracy => Self::ACCURACY,
            Stat::Strength => Self::STRENGTH,
            Stat::Defense => Self::DEFENSE,
            Stat::Ranged => Self::RANGED,
            Stat::Hits | Stat::Prayer | Stat::Magic => Self::empty(),
        }
    }

    /// Stats in this focus, in [`Stat`] order.
    pub fn stats(self) -> impl Iterator<Item = Stat> {
        [Stat::Accuracy, Stat::Defense, Stat::Strength, Stat::Ranged]
            .into_iter()
            .filter(move |stat| self.contains(Self::of(*stat)))
    }
}

/// Player-selected combat style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatStyle {
    /// Trains accuracy, strength and defense evenly.
    #[default]
    Controlled,
    Accurate,
    Aggressive,
    Defensive,
    /// Ranged-only focus.
    Rapid,
    /// Ranged and defense.
    Longrange,
}

impl CombatStyle {
    pub const fn focus(self) -> StyleFocus {
        match self {
            Self::Controlled => StyleFocus::ACCURACY
                .union(StyleFocus::STRENGTH)
                .union(StyleFocus::DEFENSE),
            Self::Accurate => StyleFocus::ACCURACY,
            Self::Aggressive => StyleFocus::STRENGTH,
            Self::Defensive => StyleFocus::DEFENSE,
            Self::Rapid => StyleFocus::RANGED,
            Self::Longrange => StyleFocus::RANGED.union(StyleFocus::DEFENSE),
        }
    }
}

/// Invisible level bonus a style grants to `stat`.
///
/// 3 when the style favours that stat exclusively, 1 when it is one of
/// several favoured stats, 0 otherwise.
pub fn style_bonus(style: CombatStyle, stat: Stat) -> u32 {
    let flag = StyleFocus::of(stat);
    let focus = style.focus();
    if flag.is_empty() || !focus.contains(flag) {
        0
    } else if focus == flag {
        3
    } else {
        1
    }
}
