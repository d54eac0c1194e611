//! `loam.toml`: seed, asset paths, streaming radius and worker count.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use loam_blocks::BlockRegistry;
use loam_world::WorldGenConfig;

use crate::ConfigError;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub world: WorldSettings,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSettings {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Block catalog; the built-in one when unset.
    #[serde(default)]
    pub blocks: Option<PathBuf>,
    /// Worldgen catalog; the built-in biomes when unset.
    #[serde(default)]
    pub worldgen: Option<PathBuf>,
    /// Overrides the active biome named by the worldgen file.
    #[serde(default)]
    pub biome: Option<String>,
}

fn default_seed() -> u64 {
    42
}

impl WorldSettings {
    pub fn anchor_paths(&mut self, base: &Path) {
        for p in [&mut self.blocks, &mut self.worldgen].into_iter().flatten() {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            blocks: None,
            worldgen: None,
            biome: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StreamingConfig {
    /// Radius in chunks around the observer's chunk.
    #[serde(default = "default_render_distance")]
    pub render_distance: f32,
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
    #[serde(default = "default_max_new_chunks")]
    pub max_new_chunks_per_tick: usize,
    /// Observer heights below this are reported for a respawn.
    #[serde(default = "default_floor_y")]
    pub floor_y: f32,
}

fn default_render_distance() -> f32 {
    4.0
}
fn default_epsilon() -> f32 {
    0.1
}
fn default_max_new_chunks() -> usize {
    8
}
fn default_floor_y() -> f32 {
    -10.0
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            render_distance: default_render_distance(),
            epsilon: default_epsilon(),
            max_new_chunks_per_tick: default_max_new_chunks(),
            floor_y: default_floor_y(),
        }
    }
}

impl StreamingConfig {
    pub fn with_render_distance(mut self, render_distance: f32) -> Self {
        self.render_distance = render_distance;
        self
    }

    /// Chunks at most this far from the observer's chunk are kept and created.
    #[inline]
    pub fn keep_radius(&self) -> f32 {
        self.render_distance - self.epsilon
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.epsilon >= 0.0) {
            return Err(ConfigError::Invalid("streaming.epsilon must be non-negative"));
        }
        if !(self.keep_radius() >= 0.0) {
            return Err(ConfigError::Invalid(
                "streaming.render_distance must be at least streaming.epsilon",
            ));
        }
        if self.max_new_chunks_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "streaming.max_new_chunks_per_tick must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SchedulerSettings {
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

fn default_max_in_flight() -> usize {
    4
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads `path`; relative asset paths in it are taken from its directory.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        let mut cfg = Self::from_toml_str(&s)?;
        if let Some(dir) = path.parent() {
            cfg.world.anchor_paths(dir);
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.streaming.validate()?;
        if self.scheduler.max_in_flight == 0 {
            return Err(ConfigError::Invalid("scheduler.max_in_flight must be positive"));
        }
        Ok(())
    }

    pub fn load_registry(&self) -> Result<BlockRegistry, ConfigError> {
        match &self.world.blocks {
            Some(path) => Ok(BlockRegistry::load_from_path(path)?),
            None => Ok(BlockRegistry::builtin()),
        }
    }

    pub fn load_worldgen(&self) -> Result<WorldGenConfig, ConfigError> {
        let cfg = match &self.world.worldgen {
            Some(path) => WorldGenConfig::load_from_path(path)?,
            None => WorldGenConfig::default(),
        };
        Ok(match &self.world.biome {
            Some(name) => cfg.with_biome(name.clone()),
            None => cfg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.world.seed, 42);
        assert_eq!(cfg.streaming, StreamingConfig::default());
        assert_eq!(cfg.scheduler.max_in_flight, 4);
        assert!((cfg.streaming.keep_radius() - 3.9).abs() < 1e-6);
    }

    #[test]
    fn sections_override_fields() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [world]
            seed = 7
            biome = "plains"
            [streaming]
            render_distance = 2.0
            [scheduler]
            max_in_flight = 1
            "#,
        )
        .unwrap();
        assert_eq!(cfg.world.seed, 7);
        assert_eq!(cfg.streaming.render_distance, 2.0);
        assert_eq!(cfg.streaming.epsilon, 0.1);
        assert_eq!(cfg.scheduler.max_in_flight, 1);
        assert_eq!(cfg.load_worldgen().unwrap().biome, "plains");
    }

    #[test]
    fn radius_below_epsilon_is_rejected() {
        let err = EngineConfig::from_toml_str("[streaming]\nrender_distance = 0.05\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = EngineConfig::from_toml_str("[scheduler]\nmax_in_flight = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn relative_asset_paths_follow_the_config_file() {
        let mut world = WorldSettings {
            blocks: Some(PathBuf::from("assets/blocks.toml")),
            worldgen: Some(PathBuf::from("/srv/loam/worldgen.toml")),
            ..WorldSettings::default()
        };
        world.anchor_paths(Path::new("/etc/loam"));
        assert_eq!(world.blocks, Some(PathBuf::from("/etc/loam/assets/blocks.toml")));
        assert_eq!(world.worldgen, Some(PathBuf::from("/srv/loam/worldgen.toml")));
    }

    proptest::proptest! {
        #[test]
        fn keep_radius_tracks_render_distance(rd in 0.1f32..32.0, eps in 0.0f32..0.1) {
            let cfg = StreamingConfig { render_distance: rd, epsilon: eps, ..StreamingConfig::default() };
            proptest::prop_assert!(cfg.validate().is_ok());
            proptest::prop_assert!(cfg.keep_radius() <= rd);
            proptest::prop_assert!(rd - cfg.keep_radius() <= eps + 1e-4);
        }
    }
}
