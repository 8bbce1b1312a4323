//! Game configuration (arena, match, audio). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square arena in world units. Respawn positions are
    /// drawn from the `[-map_size/2, map_size/2]` range on both axes.
    #[serde(default = "default_map_size")]
    pub map_size: f32,
    /// Hit points a vehicle spawns (and respawns) with.
    #[serde(default = "default_max_health")]
    pub max_health: f32,
    /// Delay between death and the respawn countdown elapsing, in milliseconds.
    #[serde(default = "default_respawn_delay_ms")]
    pub respawn_delay_ms: u64,
    /// Fixed simulation rate in ticks per second.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Match length in seconds for the headless demo runner.
    #[serde(default = "default_match_seconds")]
    pub match_seconds: f32,
    /// Total number of seats, including the local player.
    #[serde(default = "default_player_count")]
    pub player_count: usize,
    /// Enable audio output. The simulation runs identically either way.
    #[serde(default)]
    pub sound_enabled: bool,
    /// World seed: terrain, respawn positions and debris scatter derive from it.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_map_size() -> f32 {
    200.0
}
fn default_max_health() -> f32 {
    100.0
}
fn default_respawn_delay_ms() -> u64 {
    5000
}
fn default_tick_hz() -> u32 {
    60
}
fn default_match_seconds() -> f32 {
    30.0
}
fn default_player_count() -> usize {
    4
}
fn default_seed() -> u64 {
    0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_size: default_map_size(),
            max_health: default_max_health(),
            respawn_delay_ms: default_respawn_delay_ms(),
            tick_hz: default_tick_hz(),
            match_seconds: default_match_seconds(),
            player_count: default_player_count(),
            sound_enabled: false,
            seed: default_seed(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    pub fn respawn_delay_secs(&self) -> f32 {
        self.respawn_delay_ms as f32 / 1000.0
    }

    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_hz as f32
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_arena_rules() {
        let c = GameConfig::default();
        assert_eq!(c.respawn_delay_ms, 5000);
        assert!((c.respawn_delay_secs() - 5.0).abs() < f32::EPSILON);
        assert!((c.tick_dt() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let c: GameConfig = ron::from_str("(map_size: 64.0)").unwrap();
        assert_eq!(c.map_size, 64.0);
        assert_eq!(c.max_health, 100.0);
        assert_eq!(c.player_count, 4);
    }
}
