use loam_blocks::Block;
use loam_geom::Vec3;
use loam_mesh_cpu::{ChunkNeighbors, build_chunk_mesh};
use loam_world::{CHUNK_HEIGHT, CHUNK_SIZE_X, CHUNK_SIZE_Z, ChunkCoord};

use super::WorldManager;
use crate::presentation::MeshPresenter;

impl<P: MeshPresenter> WorldManager<P> {
    /// Block at a world cell, if its chunk is loaded and generated.
    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        let coord = ChunkCoord::from_block(wx, wz);
        self.chunks.get(&coord)?.buf.as_ref()?.get_world(wx, wy, wz)
    }

    /// Highest non-air cell of a loaded column.
    pub fn surface_y(&self, wx: i32, wz: i32) -> Option<i32> {
        (0..CHUNK_HEIGHT as i32)
            .rev()
            .find(|&y| self.block_at(wx, y, wz).is_some_and(|b| !b.is_air()))
    }

    /// [`place_block`](Self::place_block) at the cell containing `pos`.
    pub fn place_block_at(&mut self, pos: Vec3, block: Block) -> bool {
        self.place_block(
            pos.x.floor() as i32,
            pos.y.floor() as i32,
            pos.z.floor() as i32,
            block,
        )
    }

    /// Writes one cell and re-meshes synchronously, along with any loaded
    /// neighbour sharing the edited boundary. Unloaded chunks, heights outside
    /// the world and unregistered ids are logged and ignored.
    pub fn place_block(&mut self, wx: i32, wy: i32, wz: i32, block: Block) -> bool {
        if wy < 0 || wy >= CHUNK_HEIGHT as i32 {
            log::warn!("place_block at ({wx}, {wy}, {wz}) ignored: y outside 0..{CHUNK_HEIGHT}");
            return false;
        }
        if !self.reg.contains(block) {
            log::warn!("place_block at ({wx}, {wy}, {wz}) ignored: unknown block id {}", block.id);
            return false;
        }
        let coord = ChunkCoord::from_block(wx, wz);
        let Some(state) = self.chunks.get_mut(&coord) else {
            log::warn!("place_block at ({wx}, {wy}, {wz}) ignored: chunk {coord} is not loaded");
            return false;
        };
        let Some(buf) = state.buf.as_mut() else {
            log::warn!("place_block at ({wx}, {wy}, {wz}) ignored: chunk {coord} is still generating");
            return false;
        };
        if !buf.set_world(wx, wy, wz, block) {
            return false;
        }
        log::debug!(target: "stream", "placed block {} at ({wx}, {wy}, {wz})", block.id);

        self.remesh(coord);
        let (lx, lz) = ChunkCoord::local_of(wx, wz);
        let mut touched = Vec::with_capacity(2);
        if lx == 0 {
            touched.push(coord.offset(-1, 0));
        } else if lx == CHUNK_SIZE_X - 1 {
            touched.push(coord.offset(1, 0));
        }
        if lz == 0 {
            touched.push(coord.offset(0, -1));
        } else if lz == CHUNK_SIZE_Z - 1 {
            touched.push(coord.offset(0, 1));
        }
        for n in touched {
            if self.chunks.get(&n).is_some_and(|c| c.buf.is_some()) {
                self.remesh(n);
            }
        }
        true
    }

    /// Rebuilds a chunk's mesh against its loaded neighbours and re-presents it.
    pub fn remesh(&mut self, coord: ChunkCoord) -> bool {
        let grid = |c: ChunkCoord| self.chunks.get(&c).and_then(|s| s.buf.as_ref());
        let Some(buf) = grid(coord) else {
            return false;
        };
        let neighbors = ChunkNeighbors {
            neg_x: grid(coord.offset(-1, 0)),
            pos_x: grid(coord.offset(1, 0)),
            neg_z: grid(coord.offset(0, -1)),
            pos_z: grid(coord.offset(0, 1)),
        };
        let mesh = match build_chunk_mesh(buf, &neighbors, &self.reg) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::warn!(target: "stream", "re-mesh of {coord} failed: {e}");
                return false;
            }
        };
        let seams_culled = neighbors.loaded_count() > 0;
        if let Some(state) = self.chunks.get_mut(&coord) {
            state.mesh = Some(mesh);
            state.seams_culled = seams_culled;
            state.mesh_count += 1;
        }
        self.present(coord);
        true
    }
}
