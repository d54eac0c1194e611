use crate::column_plan::{ChunkColumnPlan, build_chunk_column_plan};
use crate::worldgen::{BiomeDef, WorldGenConfig};
use crate::{ChunkCoord, NoiseField, WorldGenError};

/// Seeded terrain source shared read-only by every generation worker.
pub struct World {
    pub seed: u64,
    noise: NoiseField,
    config: WorldGenConfig,
}

impl World {
    pub fn new(seed: u64, config: WorldGenConfig) -> Self {
        Self {
            seed,
            noise: NoiseField::new(seed),
            config,
        }
    }

    pub fn with_defaults(seed: u64) -> Self {
        Self::new(seed, WorldGenConfig::default())
    }

    #[inline]
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    #[inline]
    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    pub fn biome_name(&self) -> &str {
        &self.config.biome
    }

    pub fn active_biome(&self) -> Result<&BiomeDef, WorldGenError> {
        self.config.biome_def(&self.config.biome)
    }

    pub fn column_plan(&self, coord: ChunkCoord) -> Result<ChunkColumnPlan, WorldGenError> {
        build_chunk_column_plan(self, coord)
    }
}
