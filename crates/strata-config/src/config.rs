//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub world: WorldConfig,
    pub noise: NoiseConfig,
    pub physics: PhysicsConfig,
    pub debug: DebugConfig,
}

/// World shape and scheduling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Terrain seed. Also seeds block ticks.
    pub seed: u32,
    /// Horizontal size in chunks.
    pub radius: u32,
    /// Chunk layers stacked from y = 0.
    pub vertical_chunks: u32,
    /// Chunks remeshed per tick.
    pub rebuild_budget: u32,
    /// Noise worker threads (0 = one per CPU).
    pub worker_threads: u32,
}

/// One fractal noise channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelConfig {
    pub scale: f64,
    pub octaves: u32,
    pub lacunarity: f64,
    pub persistence: f64,
}

/// Terrain noise channels and seam blending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    pub height: ChannelConfig,
    pub temperature: ChannelConfig,
    pub humidity: ChannelConfig,
    /// Width in columns of the band blended across the wrap seam.
    pub blend_width: u32,
}

/// Entity movement and interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Highest ledge climbed without jumping.
    pub step_height: f32,
    /// Ground search distance below each bottom corner when sneaking.
    pub ledge_probe: f32,
    /// Refuse moves that would walk off a ledge.
    pub prevent_ledge_fall: bool,
    /// Block targeting distance.
    pub reach: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "strata_world=trace").
    pub log_level: String,
    /// Ticks the headless demo runs before exiting.
    pub demo_ticks: u32,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            radius: 8,
            vertical_chunks: 16,
            rebuild_budget: 100,
            worker_threads: 0,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            scale: 0.01,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            height: ChannelConfig {
                scale: 0.01,
                octaves: 5,
                ..Default::default()
            },
            temperature: ChannelConfig {
                scale: 0.004,
                octaves: 3,
                ..Default::default()
            },
            humidity: ChannelConfig {
                scale: 0.005,
                octaves: 3,
                ..Default::default()
            },
            blend_width: 8,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            step_height: 1.0,
            ledge_probe: 0.1,
            prevent_ledge_fall: false,
            reach: 5.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            demo_ticks: 200,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("radius: 8"));
        assert!(ron_str.contains("rebuild_budget: 100"));
        assert!(ron_str.contains("step_height: 1.0"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(world: (seed: 42), debug: ())").unwrap();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.radius, 8, "missing field inside a section");
        assert_eq!(config.noise, NoiseConfig::default());
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn test_partial_channel_keeps_other_defaults() {
        let config: Config = ron::from_str("(noise: (height: (octaves: 7)))").unwrap();
        assert_eq!(config.noise.height.octaves, 7);
        assert_eq!(config.noise.height.scale, 0.01);
        assert_eq!(config.noise.temperature, NoiseConfig::default().temperature);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = 1234;
        config.physics.prevent_ledge_fall = true;
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("strata");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.world.rebuild_budget = 25;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.world.rebuild_budget), Some(25));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// world settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
