use loam_chunk::ChunkBuf;
use loam_geom::Vec3;
use loam_mesh_cpu::MeshBuffers;
use loam_world::{CHUNK_SIZE_X, CHUNK_SIZE_Z, ChunkCoord};

use crate::PresentHandle;

/// Lifecycle of a live chunk. Destroyed chunks leave the map entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkPhase {
    /// Handed to the scheduler, no grid yet.
    Requested,
    /// A worker owns the job.
    Generating,
    /// Grid and mesh collected, not yet presented.
    Ready,
    /// Mesh presented.
    Active,
}

#[derive(Debug)]
pub struct ChunkState {
    pub coord: ChunkCoord,
    pub phase: ChunkPhase,
    pub buf: Option<ChunkBuf>,
    pub mesh: Option<MeshBuffers>,
    pub(crate) handle: Option<PresentHandle>,
    /// The current mesh hides faces against at least one neighbour grid.
    pub(crate) seams_culled: bool,
    /// Times this chunk has been meshed, streaming and edits together.
    pub mesh_count: u32,
}

impl ChunkState {
    pub(crate) fn requested(coord: ChunkCoord) -> Self {
        Self {
            coord,
            phase: ChunkPhase::Requested,
            buf: None,
            mesh: None,
            handle: None,
            seams_culled: false,
            mesh_count: 0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == ChunkPhase::Active
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, ChunkPhase::Requested | ChunkPhase::Generating)
    }

    #[inline]
    pub fn handle(&self) -> Option<PresentHandle> {
        self.handle
    }

    /// World-space position of the chunk's local origin.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        chunk_origin(self.coord)
    }
}

#[inline]
pub(crate) fn chunk_origin(coord: ChunkCoord) -> Vec3 {
    Vec3::new(
        (coord.cx * CHUNK_SIZE_X as i32) as f32,
        0.0,
        (coord.cz * CHUNK_SIZE_Z as i32) as f32,
    )
}
