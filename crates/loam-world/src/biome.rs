//! Height blends and the rock-line rule that make up a biome.

use serde::Deserialize;

use crate::noise::NoiseField;
use crate::ChunkCoord;

/// How a column's normalised height is derived from noise.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightBlend {
    /// Layered octave sum, already in `[0, 1]`.
    OctaveSum {
        octaves: u32,
        scale: f32,
        #[serde(default = "default_lacunarity")]
        lacunarity: f32,
        #[serde(default = "default_persistence")]
        persistence: f32,
    },
    /// Mean of two plain layers.
    DualAverage {
        scale: f32,
        #[serde(default = "default_seed_divisor")]
        seed_divisor: f32,
        #[serde(default = "default_scale_divisor")]
        scale_divisor: f32,
    },
    /// Two plain layers summed, then remapped by [`remap_dual`].
    DualRemap {
        scale: f32,
        #[serde(default = "default_seed_divisor")]
        seed_divisor: f32,
        #[serde(default = "default_scale_divisor")]
        scale_divisor: f32,
    },
}

fn default_lacunarity() -> f32 {
    2.0
}
fn default_persistence() -> f32 {
    0.5
}
fn default_seed_divisor() -> f32 {
    1.123
}
fn default_scale_divisor() -> f32 {
    1.456
}

impl HeightBlend {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        match *self {
            HeightBlend::OctaveSum { octaves, scale, .. } => {
                if octaves == 0 {
                    return Err("octave_sum needs at least one octave");
                }
                if !(scale > 0.0) {
                    return Err("scale must be positive");
                }
            }
            HeightBlend::DualAverage {
                scale,
                seed_divisor,
                scale_divisor,
            }
            | HeightBlend::DualRemap {
                scale,
                seed_divisor,
                scale_divisor,
            } => {
                if !(scale > 0.0 && seed_divisor > 0.0 && scale_divisor > 0.0) {
                    return Err("scale and divisors must be positive");
                }
            }
        }
        Ok(())
    }

    /// Second field needed by the dual blends, built once per chunk.
    pub(crate) fn secondary_field(&self, primary: &NoiseField) -> Option<NoiseField> {
        match *self {
            HeightBlend::OctaveSum { .. } => None,
            HeightBlend::DualAverage { seed_divisor, .. }
            | HeightBlend::DualRemap { seed_divisor, .. } => {
                Some(primary.scaled_offset(seed_divisor))
            }
        }
    }

    /// Normalised height of one column. Dual blends derive the second field
    /// from `primary` when `secondary` is `None`.
    pub fn height_fraction(
        &self,
        primary: &NoiseField,
        secondary: Option<&NoiseField>,
        chunk: ChunkCoord,
        lx: usize,
        lz: usize,
    ) -> f32 {
        match *self {
            HeightBlend::OctaveSum {
                octaves,
                scale,
                lacunarity,
                persistence,
            } => primary.octave_sum(chunk, lx, lz, octaves, scale, lacunarity, persistence),
            HeightBlend::DualAverage {
                scale,
                seed_divisor,
                scale_divisor,
            } => {
                let (a, b) = dual_layers(
                    primary,
                    secondary,
                    chunk,
                    (lx, lz),
                    scale,
                    seed_divisor,
                    scale_divisor,
                );
                (a + b) / 2.0
            }
            HeightBlend::DualRemap {
                scale,
                seed_divisor,
                scale_divisor,
            } => {
                let (a, b) = dual_layers(
                    primary,
                    secondary,
                    chunk,
                    (lx, lz),
                    scale,
                    seed_divisor,
                    scale_divisor,
                );
                remap_dual(a, b)
            }
        }
    }
}

fn dual_layers(
    primary: &NoiseField,
    secondary: Option<&NoiseField>,
    chunk: ChunkCoord,
    (lx, lz): (usize, usize),
    scale: f32,
    seed_divisor: f32,
    scale_divisor: f32,
) -> (f32, f32) {
    let a = primary.plain(chunk, lx, lz, scale);
    let built;
    let second = match secondary {
        Some(field) => field,
        None => {
            built = primary.scaled_offset(seed_divisor);
            &built
        }
    };
    let b = second.plain(chunk, lx, lz, scale / scale_divisor);
    (a, b)
}

/// Nonlinear dual-noise remap. Sums above 1 fold toward 0, the rest compress
/// toward 1; the jump at exactly 1 is part of the biome's look.
#[inline]
pub fn remap_dual(a: f32, b: f32) -> f32 {
    let t = a + b;
    if t > 1.0 {
        t.fract() / 5.0
    } else {
        1.0 - (1.0 - t) / 3.0
    }
}

/// Altitude band above which a column turns to bare rock.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct RockLine {
    pub min: i32,
    pub max: i32,
    #[serde(default = "default_rock_scale")]
    pub scale: f32,
}

fn default_rock_scale() -> f32 {
    4.0
}

impl RockLine {
    /// `rockiness` is a centred sample in `[-0.5, 0.5]`.
    #[inline]
    pub fn threshold(&self, rockiness: f32) -> f32 {
        self.min as f32 + (self.max - self.min) as f32 * rockiness + 0.5
    }

    #[inline]
    pub fn is_rock(&self, target_y: i32, rockiness: f32) -> bool {
        target_y as f32 > self.threshold(rockiness)
    }
}
