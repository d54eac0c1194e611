//! CPU chunk mesher: culled per-face quads with atlas UVs.
#![forbid(unsafe_code)]

mod build;
mod face;
mod mesh_build;
mod neighbors;

pub use build::{MeshError, build_chunk_mesh};
pub use face::Face;
pub use mesh_build::{MeshBuffers, compute_normals};
pub use neighbors::ChunkNeighbors;

/// Atlas size of one face tile.
pub const FACE_TILE: f32 = 0.0625;
