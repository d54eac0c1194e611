use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::biome::{HeightBlend, RockLine};
use crate::{CHUNK_HEIGHT, WorldGenError};

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_biome")]
    pub biome: String,
    #[serde(default = "builtin_biomes")]
    pub biomes: HashMap<String, BiomeDef>,
    #[serde(default)]
    pub surface: SurfaceNames,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            biome: default_biome(),
            biomes: builtin_biomes(),
            surface: SurfaceNames::default(),
        }
    }
}

fn default_biome() -> String {
    "mountains".into()
}

impl WorldGenConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, WorldGenError> {
        let cfg: WorldGenConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, WorldGenError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Checks every catalog entry. The active name is resolved lazily.
    pub fn validate(&self) -> Result<(), WorldGenError> {
        for (name, def) in &self.biomes {
            def.validate()
                .map_err(|reason| WorldGenError::InvalidBiome {
                    name: name.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    pub fn with_biome(mut self, name: impl Into<String>) -> Self {
        self.biome = name.into();
        self
    }

    pub fn biome_def(&self, name: &str) -> Result<&BiomeDef, WorldGenError> {
        self.biomes
            .get(name)
            .ok_or_else(|| WorldGenError::UnknownBiome(name.to_string()))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BiomeDef {
    pub min_y: i32,
    pub max_y: i32,
    #[serde(default = "default_soil_depth")]
    pub soil_depth: u32,
    pub blend: HeightBlend,
    #[serde(default)]
    pub rock_line: Option<RockLine>,
}

fn default_soil_depth() -> u32 {
    3
}

impl BiomeDef {
    fn validate(&self) -> Result<(), &'static str> {
        if self.min_y < 0 || self.max_y < self.min_y {
            return Err("min_y must be non-negative and not above max_y");
        }
        if self.max_y as usize > CHUNK_HEIGHT {
            return Err("max_y exceeds the world height");
        }
        if let Some(rl) = self.rock_line {
            if rl.max < rl.min || !(rl.scale > 0.0) {
                return Err("rock_line needs min <= max and a positive scale");
            }
        }
        self.blend.validate()
    }

    /// Column height for a normalised fraction, clamped to the world.
    #[inline]
    pub fn target_y(&self, frac: f32) -> i32 {
        let span = (self.max_y - self.min_y) as f32;
        let y = self.min_y + (frac * span) as i32;
        y.clamp(0, CHUNK_HEIGHT as i32)
    }
}

/// Block names used to fill a column, resolved against the registry.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SurfaceNames {
    #[serde(default = "default_cover")]
    pub cover: String,
    #[serde(default = "default_soil")]
    pub soil: String,
    #[serde(default = "default_rock")]
    pub rock: String,
}

fn default_cover() -> String {
    "grass".into()
}
fn default_soil() -> String {
    "dirt".into()
}
fn default_rock() -> String {
    "stone".into()
}

impl Default for SurfaceNames {
    fn default() -> Self {
        Self {
            cover: default_cover(),
            soil: default_soil(),
            rock: default_rock(),
        }
    }
}

pub fn builtin_biomes() -> HashMap<String, BiomeDef> {
    let mut m = HashMap::new();
    m.insert(
        "mountains".to_string(),
        BiomeDef {
            min_y: 10,
            max_y: 256,
            soil_depth: 3,
            blend: HeightBlend::OctaveSum {
                octaves: 8,
                scale: 8.0,
                lacunarity: 2.0,
                persistence: 0.4,
            },
            rock_line: Some(RockLine {
                min: 110,
                max: 130,
                scale: 4.0,
            }),
        },
    );
    m.insert(
        "plains".to_string(),
        BiomeDef {
            min_y: 40,
            max_y: 80,
            soil_depth: 3,
            blend: HeightBlend::OctaveSum {
                octaves: 4,
                scale: 8.0,
                lacunarity: 2.0,
                persistence: 0.5,
            },
            rock_line: None,
        },
    );
    m.insert(
        "hills".to_string(),
        BiomeDef {
            min_y: 30,
            max_y: 120,
            soil_depth: 3,
            blend: HeightBlend::DualAverage {
                scale: 6.0,
                seed_divisor: 1.123,
                scale_divisor: 1.456,
            },
            rock_line: None,
        },
    );
    m.insert(
        "valleys".to_string(),
        BiomeDef {
            min_y: 20,
            max_y: 160,
            soil_depth: 3,
            blend: HeightBlend::DualRemap {
                scale: 6.0,
                seed_divisor: 1.123,
                scale_divisor: 1.456,
            },
            rock_line: None,
        },
    );
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_validates() {
        let cfg = WorldGenConfig::default();
        cfg.validate().unwrap();
        for name in ["mountains", "plains", "hills", "valleys"] {
            assert!(cfg.biome_def(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn target_y_clamps_to_world() {
        let def = builtin_biomes().remove("mountains").unwrap();
        assert_eq!(def.target_y(0.0), 10);
        assert_eq!(def.target_y(1.0), 256);
        assert_eq!(def.target_y(2.0), 256);
        assert_eq!(def.target_y(-1.0), 0);
    }

    #[test]
    fn toml_overrides_catalog() {
        let src = r#"
            biome = "flat"
            [biomes.flat]
            min_y = 5
            max_y = 6
            blend = { kind = "octave_sum", octaves = 1, scale = 8.0 }
        "#;
        let cfg = WorldGenConfig::from_toml_str(src).unwrap();
        assert_eq!(cfg.biome, "flat");
        assert_eq!(cfg.biomes.len(), 1);
        let def = cfg.biome_def("flat").unwrap();
        assert_eq!(def.soil_depth, 3);
        assert_eq!(
            def.blend,
            HeightBlend::OctaveSum {
                octaves: 1,
                scale: 8.0,
                lacunarity: 2.0,
                persistence: 0.5
            }
        );
        assert_eq!(cfg.surface, SurfaceNames::default());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let src = r#"
            [biomes.bad]
            min_y = 50
            max_y = 10
            blend = { kind = "dual_average", scale = 6.0 }
        "#;
        let err = WorldGenConfig::from_toml_str(src).unwrap_err();
        assert!(matches!(err, WorldGenError::InvalidBiome { .. }));
    }
}
