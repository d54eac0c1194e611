//! World extents, coordinates, noise sampling, and biome height planning.
#![forbid(unsafe_code)]

pub mod biome;
mod chunk_coord;
mod column_plan;
mod error;
pub mod noise;
mod world;
pub mod worldgen;

pub use biome::{HeightBlend, RockLine};
pub use chunk_coord::ChunkCoord;
pub use column_plan::{ChunkColumnPlan, ColumnInfo, ColumnLayer, build_chunk_column_plan};
pub use error::WorldGenError;
pub use noise::NoiseField;
pub use world::World;
pub use worldgen::{BiomeDef, SurfaceNames, WorldGenConfig};

pub const CHUNK_SIZE_X: usize = 16;
pub const CHUNK_SIZE_Z: usize = 16;
pub const CHUNK_HEIGHT: usize = 256;
