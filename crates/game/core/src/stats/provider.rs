//! Polymorphic read surface over both kinds of combat entity.
//!
//! The damage calculator and resolver only ever see [`CombatStats`]; the
//! player/autonomous split is a [`Combatant`] sum type rather than a shape
//! check at each call site.

use super::bonus::BonusKind;
use super::levels::Stat;
use super::style::CombatStyle;
use crate::state::{EntityRef, Npc, Player, Position};

/// Combat attributes of an entity.
pub trait CombatStats {
    fn entity(&self) -> EntityRef;

    fn position(&self) -> Position;

    /// XP-derived level.
    fn level(&self, stat: Stat) -> u32;

    /// Potion/prayer-adjusted level.
    fn boosted_level(&self, stat: Stat) -> u32;

    fn bonus(&self, kind: BonusKind) -> i32;

    /// Selected style; autonomous entities have none.
    fn combat_style(&self) -> Option<CombatStyle>;

    fn current_hp(&self) -> u32;

    fn max_hp(&self) -> u32;

    /// Gear-based accuracy multiplier against `target`.
    fn accuracy_multiplier_against(&self, _target: EntityRef) -> f64 {
        1.0
    }
}

/// Hit point mutation, the only stat change the resolver performs.
pub trait HitpointsMut {
    fn set_current_hp(&mut self, hp: u32);
}

impl CombatStats for Player {
    fn entity(&self) -> EntityRef {
        EntityRef::player(self.id)
    }

    fn position(&self) -> Position {
        self.position
    }

    fn level(&self, stat: Stat) -> u32 {
        self.levels.actual(stat)
    }

    fn boosted_level(&self, stat: Stat) -> u32 {
        self.levels.boosted(stat)
    }

    fn bonus(&self, kind: BonusKind) -> i32 {
        self.bonuses.get(kind)
    }

    fn combat_style(&self) -> Option<CombatStyle> {
        Some(self.style)
    }

    fn current_hp(&self) -> u32 {
        self.hits()
    }

    fn max_hp(&self) -> u32 {
        self.max_hits()
    }

    fn accuracy_multiplier_against(&self, target: EntityRef) -> f64 {
        if target.is_npc() {
            self.bonuses.accuracy_multiplier
        } else {
            1.0
        }
    }
}

impl HitpointsMut for Player {
    fn set_current_hp(&mut self, hp: u32) {
        self.set_hits(hp);
    }
}

impl CombatStats for Npc {
    fn entity(&self) -> EntityRef {
        EntityRef::npc(self.id)
    }

    fn position(&self) -> Position {
        self.position
    }

    fn level(&self, stat: Stat) -> u32 {
        self.levels.actual(stat)
    }

    fn boosted_level(&self, stat: Stat) -> u32 {
        self.levels.boosted(stat)
    }

    fn bonus(&self, kind: BonusKind) -> i32 {
        self.bonuses.get(kind)
    }

    fn combat_style(&self) -> Option<CombatStyle> {
        None
    }

    fn current_hp(&self) -> u32 {
        self.current_hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }
}

impl HitpointsMut for Npc {
    fn set_current_hp(&mut self, hp: u32) {
        self.current_hp = hp;
    }
}

/// Borrowed view of either entity kind.
#[derive(Clone, Copy, Debug)]
pub enum Combatant<'a> {
    Player(&'a Player),
    Npc(&'a Npc),
}

impl Combatant<'_> {
    fn stats(&self) -> &dyn CombatStats {
        match self {
            Combatant::Player(player) => *player,
            Combatant::Npc(npc) => *npc,
        }
    }
}

impl CombatStats for Combatant<'_> {
    fn entity(&self) -> EntityRef {
        self.stats().entity()
    }

    fn position(&self) -> Position {
        self.stats().position()
    }

    fn level(&self, stat: Stat) -> u32 {
        self.stats().level(stat)
    }

    fn boosted_level(&self, stat: Stat) -> u32 {
        self.stats().boosted_level(stat)
    }

    fn bonus(&self, kind: BonusKind) -> i32 {
        self.stats().bonus(kind)
    }

    fn combat_style(&self) -> Option<CombatStyle> {
        self.stats().combat_style()
    }

    fn current_hp(&self) -> u32 {
        self.stats().current_hp()
    }

    fn max_hp(&self) -> u32 {
        self.stats().max_hp()
    }

    fn accuracy_multiplier_against(&self, target: EntityRef) -> f64 {
        self.stats().accuracy_multiplier_against(target)
    }
}

/// Mutable view of either entity kind.
#[derive(Debug)]
pub enum CombatantMut<'a> {
    Player(&'a mut Player),
    Npc(&'a mut Npc),
}

impl CombatantMut<'_> {
    pub fn combat_delay_mut(&mut self) -> &mut u32 {
        match self {
            CombatantMut::Player(player) => &mut player.combat_delay,
            CombatantMut::Npc(npc) => &mut npc.combat_delay,
        }
    }

    pub fn current_hp(&self) -> u32 {
        match self {
            CombatantMut::Player(player) => player.hits(),
            CombatantMut::Npc(npc) => npc.current_hp,
        }
    }
}

impl HitpointsMut for CombatantMut<'_> {
    fn set_current_hp(&mut self, hp: u32) {
        match self {
            CombatantMut::Player(player) => player.set_current_hp(hp),
            CombatantMut::Npc(npc) => npc.set_current_hp(hp),
        }
    }
}
