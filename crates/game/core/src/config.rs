use crate::env::CombatRng;
use crate::state::Position;

/// Rectangle players are revived in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RespawnArea {
    pub level: u8,
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl RespawnArea {
    /// Uniform point inside the rectangle, bounds inclusive.
    pub fn random_point(&self, rng: &mut dyn CombatRng) -> Position {
        let x = rng.range_inclusive(i64::from(self.min_x), i64::from(self.max_x));
        let y = rng.range_inclusive(i64::from(self.min_y), i64::from(self.max_y));
        Position::new(self.level, x as i32, y as i32)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.level == self.level
            && (self.min_x..=self.max_x).contains(&position.x)
            && (self.min_y..=self.max_y).contains(&position.y)
    }
}

impl Default for RespawnArea {
    fn default() -> Self {
        Self {
            level: 0,
            min_x: 120,
            min_y: 648,
            max_x: 126,
            max_y: 652,
        }
    }
}

/// Combat timing and tuning parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Ticks a corpse stays visible before loot drops and it is removed.
    pub death_animation_ticks: u32,
    /// Respawn delay for definitions that declare none.
    pub default_respawn_ticks: u32,
    /// Ticks between a player's death and their revival.
    pub player_death_ticks: u32,
    /// Initial delay before a freshly aggroed NPC swings back.
    pub retaliate_delay_ticks: u32,
    pub default_attack_speed: u32,
    /// Range for ranged attacks whose weapon or definition declares none.
    pub ranged_range: u32,
    pub magic_range: u32,
    /// Chance one unit of ammunition is consumed per ranged attack.
    pub ammo_break_chance: f64,
    /// Chance a consumed projectile lands on the ground.
    pub projectile_drop_chance: f64,
    pub respawn_area: RespawnArea,
}

impl CombatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DEATH_ANIMATION_TICKS: u32 = 2;
    pub const DEFAULT_RESPAWN_TICKS: u32 = 50;
    pub const DEFAULT_PLAYER_DEATH_TICKS: u32 = 4;
    pub const DEFAULT_RETALIATE_DELAY_TICKS: u32 = 6;
    pub const DEFAULT_ATTACK_SPEED: u32 = 6;
    pub const DEFAULT_RANGED_RANGE: u32 = 7;
    pub const DEFAULT_MAGIC_RANGE: u32 = 8;
    pub const DEFAULT_AMMO_BREAK_CHANCE: f64 = 0.5;
    pub const DEFAULT_PROJECTILE_DROP_CHANCE: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            death_animation_ticks: Self::DEFAULT_DEATH_ANIMATION_TICKS,
            default_respawn_ticks: Self::DEFAULT_RESPAWN_TICKS,
            player_death_ticks: Self::DEFAULT_PLAYER_DEATH_TICKS,
            retaliate_delay_ticks: Self::DEFAULT_RETALIATE_DELAY_TICKS,
            default_attack_speed: Self::DEFAULT_ATTACK_SPEED,
            ranged_range: Self::DEFAULT_RANGED_RANGE,
            magic_range: Self::DEFAULT_MAGIC_RANGE,
            ammo_break_chance: Self::DEFAULT_AMMO_BREAK_CHANCE,
            projectile_drop_chance: Self::DEFAULT_PROJECTILE_DROP_CHANCE,
            respawn_area: RespawnArea::default(),
        }
    }

    pub fn with_respawn_area(mut self, respawn_area: RespawnArea) -> Self {
        self.respawn_area = respawn_area;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    #[test]
    fn respawn_points_stay_inside_area() {
        let area = RespawnArea::default();
        let mut rng = PcgRng::new(3);
        for _ in 0..200 {
            assert!(area.contains(area.random_point(&mut rng)));
        }
    }

    #[test]
    fn defaults_match_observed_timings() {
        let config = CombatConfig::default();
        assert_eq!(config.death_animation_ticks, 2);
        assert_eq!(config.default_respawn_ticks, 50);
        assert_eq!(config.player_death_ticks, 4);
        assert_eq!(config.retaliate_delay_ticks, 6);
    }
}
