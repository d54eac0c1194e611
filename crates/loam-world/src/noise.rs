//! Seeded 2D coherent noise addressed by chunk and local column.
//!
//! Every sampler maps a column to noise space as
//! `(offset + chunk + local / 16) * frequency / scale`, so neighbouring chunks
//! see one continuous field and the same inputs always give the same value.

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::{CHUNK_SIZE_X, CHUNK_SIZE_Z, ChunkCoord};

const OFFSET_MIN: f32 = 1.0;
const OFFSET_SPAN: f32 = 9_999.0;

pub struct NoiseField {
    noise_seed: i32,
    offset: [f32; 2],
    perlin: FastNoiseLite,
}

impl NoiseField {
    pub fn new(world_seed: u64) -> Self {
        let ox = unit_f32(splitmix64(world_seed));
        let oz = unit_f32(splitmix64(world_seed ^ 0x5851_F42D_4C95_7F2D));
        Self::with_offset(
            world_seed as u32 as i32,
            [
                OFFSET_MIN + ox * OFFSET_SPAN,
                OFFSET_MIN + oz * OFFSET_SPAN,
            ],
        )
    }

    fn with_offset(noise_seed: i32, offset: [f32; 2]) -> Self {
        let mut perlin = FastNoiseLite::with_seed(noise_seed);
        perlin.set_noise_type(Some(NoiseType::Perlin));
        perlin.set_frequency(Some(1.0));
        Self {
            noise_seed,
            offset,
            perlin,
        }
    }

    /// A second field over the same lattice whose offset is divided by `divisor`.
    pub fn scaled_offset(&self, divisor: f32) -> NoiseField {
        Self::with_offset(
            self.noise_seed,
            [self.offset[0] / divisor, self.offset[1] / divisor],
        )
    }

    #[inline]
    pub fn offset(&self) -> [f32; 2] {
        self.offset
    }

    /// Coherent noise in `[0, 1]`.
    #[inline]
    pub fn raw(&self, x: f32, y: f32) -> f32 {
        ((self.perlin.get_noise_2d(x, y) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    #[inline]
    fn noise_pos(
        &self,
        chunk: ChunkCoord,
        lx: usize,
        lz: usize,
        scale: f32,
        frequency: f32,
    ) -> (f32, f32) {
        let x = self.offset[0] + chunk.cx as f32 + lx as f32 / CHUNK_SIZE_X as f32;
        let z = self.offset[1] + chunk.cz as f32 + lz as f32 / CHUNK_SIZE_Z as f32;
        (x * frequency / scale, z * frequency / scale)
    }

    /// Un-centred value in `[0, 1]` at frequency 1.
    #[inline]
    pub fn plain(&self, chunk: ChunkCoord, lx: usize, lz: usize, scale: f32) -> f32 {
        let (x, y) = self.noise_pos(chunk, lx, lz, scale, 1.0);
        self.raw(x, y)
    }

    /// Centred sample in `[-amplitude / 2, amplitude / 2]`.
    #[inline]
    pub fn sample(
        &self,
        chunk: ChunkCoord,
        lx: usize,
        lz: usize,
        scale: f32,
        frequency: f32,
        amplitude: f32,
    ) -> f32 {
        let (x, y) = self.noise_pos(chunk, lx, lz, scale, frequency);
        (self.raw(x, y) - 0.5) * amplitude
    }

    /// Normalised sum of `octaves` layers, re-centred to `[0, 1]`.
    pub fn octave_sum(
        &self,
        chunk: ChunkCoord,
        lx: usize,
        lz: usize,
        octaves: u32,
        scale: f32,
        lacunarity: f32,
        persistence: f32,
    ) -> f32 {
        let mut result = 0.0;
        let mut divider = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        for _ in 0..octaves {
            result += self.sample(chunk, lx, lz, scale, frequency, amplitude);
            divider += amplitude;
            frequency *= lacunarity;
            amplitude *= persistence;
        }
        if divider > 0.0 {
            result /= divider;
        }
        result + 0.5
    }
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Top 24 bits as a float in `[0, 1)`.
#[inline]
fn unit_f32(h: u64) -> f32 {
    (h >> 40) as f32 / (1u64 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_stay_in_classic_range() {
        for seed in [0u64, 1, 42, u64::MAX, 0xDEAD_BEEF] {
            let f = NoiseField::new(seed);
            for o in f.offset() {
                assert!((OFFSET_MIN..OFFSET_MIN + OFFSET_SPAN).contains(&o), "{o}");
            }
        }
    }

    #[test]
    fn scaled_offset_divides_both_axes() {
        let f = NoiseField::new(7);
        let g = f.scaled_offset(2.0);
        assert_eq!(g.offset()[0], f.offset()[0] / 2.0);
        assert_eq!(g.offset()[1], f.offset()[1] / 2.0);
    }

    #[test]
    fn zero_octaves_is_the_midpoint() {
        let f = NoiseField::new(3);
        assert_eq!(f.octave_sum(ChunkCoord::new(0, 0), 0, 0, 0, 8.0, 2.0, 0.5), 0.5);
    }
}
