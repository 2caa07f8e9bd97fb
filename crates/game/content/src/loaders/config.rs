//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`CombatConfig`] from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(0.0..=1.0).contains(&config.ammo_break_chance)
            || !(0.0..=1.0).contains(&config.projectile_drop_chance)
        {
            anyhow::bail!("ammunition chances must lie in [0, 1]");
        }
        let area = &config.respawn_area;
        if area.min_x > area.max_x || area.min_y > area.max_y {
            anyhow::bail!("respawn area bounds are inverted");
        }

        tracing::debug!(
            "loaded combat config: death animation {} ticks, respawn {} ticks",
            config.death_animation_ticks,
            config.default_respawn_ticks
        );
        Ok(config)
    }
}
