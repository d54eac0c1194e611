use loam_blocks::{Block, BlockId, BlockRegistry};
use loam_chunk::ChunkBuf;
use loam_geom::Vec2;
use loam_world::ChunkCoord;
use thiserror::Error;

use crate::{ChunkNeighbors, Face, MeshBuffers};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("chunk {coord}: block id {id} at ({x}, {y}, {z}) is not registered")]
    UnknownBlock {
        coord: ChunkCoord,
        id: BlockId,
        x: usize,
        y: usize,
        z: usize,
    },
}

/// Cell across `face` from `(x, y, z)`, looking into a neighbour chunk at the
/// lateral borders. `None` means nothing is there.
#[inline]
fn neighbor_cell(
    buf: &ChunkBuf,
    neighbors: &ChunkNeighbors,
    face: Face,
    x: usize,
    y: usize,
    z: usize,
) -> Option<Block> {
    let (dx, dy, dz) = face.delta();
    let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
    if buf.in_bounds(nx, ny, nz) {
        return Some(buf.get_local(nx as usize, ny as usize, nz as usize));
    }
    let nb = neighbors.across(face)?;
    nb.get_checked(
        nx.rem_euclid(nb.sx as i32),
        ny,
        nz.rem_euclid(nb.sz as i32),
    )
}

/// Builds the culled surface of `buf`.
///
/// A face is emitted when the cell across it does not occlude: it is air, it
/// is a non-opaque block, or it lies outside the chunk with no neighbour loaded
/// on that side.
pub fn build_chunk_mesh(
    buf: &ChunkBuf,
    neighbors: &ChunkNeighbors,
    reg: &BlockRegistry,
) -> Result<MeshBuffers, MeshError> {
    let mut mesh = MeshBuffers::default();
    // Roughly a top face and one side per column.
    mesh.reserve_quads(buf.sx * buf.sz * 2);
    for z in 0..buf.sz {
        for y in 0..buf.sy {
            for x in 0..buf.sx {
                let here = buf.get_local(x, y, z);
                if here.is_air() {
                    continue;
                }
                let Some(ty) = reg.get(here.id) else {
                    return Err(MeshError::UnknownBlock {
                        coord: buf.coord,
                        id: here.id,
                        x,
                        y,
                        z,
                    });
                };
                let atlas = Vec2::from(ty.uv_offset);
                for face in Face::ALL {
                    let covered = neighbor_cell(buf, neighbors, face, x, y, z)
                        .is_some_and(|nb| reg.occludes(nb));
                    if covered {
                        continue;
                    }
                    let corners = face.corners(x as f32, y as f32, z as f32);
                    let uvs = face.uv_rect().map(|uv| atlas + Vec2::from(uv));
                    mesh.add_quad(corners, uvs);
                }
            }
        }
    }
    log::trace!(
        "meshed chunk {} quads={} neighbours={}",
        buf.coord,
        mesh.quad_count(),
        neighbors.loaded_count()
    );
    Ok(mesh)
}
