//! Chunk block grids and the column fill that generates them.
#![forbid(unsafe_code)]

use loam_blocks::{Block, BlockRegistry, RegistryError};
use loam_world::{
    CHUNK_HEIGHT, CHUNK_SIZE_X, CHUNK_SIZE_Z, ChunkCoord, ColumnLayer, World, WorldGenError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    WorldGen(#[from] WorldGenError),
    #[error("surface block: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<Block>,
}

impl ChunkBuf {
    /// All-air grid with the standard chunk extents.
    pub fn empty(coord: ChunkCoord) -> Self {
        Self::from_blocks_local(coord, CHUNK_SIZE_X, CHUNK_HEIGHT, CHUNK_SIZE_Z, Vec::new())
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.sx
            && (y as usize) < self.sy
            && (z as usize) < self.sz
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    /// Like [`get_local`](Self::get_local), but out-of-range cells read as `None`.
    #[inline]
    pub fn get_checked(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, block: Block) {
        let i = self.idx(x, y, z);
        self.blocks[i] = block;
    }

    #[inline]
    fn base(&self) -> (i32, i32) {
        (
            self.coord.cx * self.sx as i32,
            self.coord.cz * self.sz as i32,
        )
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (base_x, base_z) = self.base();
        if wy < 0 || wy >= self.sy as i32 {
            return false;
        }
        wx >= base_x && wx < base_x + self.sx as i32 && wz >= base_z && wz < base_z + self.sz as i32
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (base_x, base_z) = self.base();
        Some(self.get_local(
            (wx - base_x) as usize,
            wy as usize,
            (wz - base_z) as usize,
        ))
    }

    /// Writes a world-space cell. Returns false when it lies outside this chunk.
    pub fn set_world(&mut self, wx: i32, wy: i32, wz: i32, block: Block) -> bool {
        if !self.contains_world(wx, wy, wz) {
            return false;
        }
        let (base_x, base_z) = self.base();
        self.set_local(
            (wx - base_x) as usize,
            wy as usize,
            (wz - base_z) as usize,
            block,
        );
        true
    }

    pub fn from_blocks_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        blocks: Vec<Block>,
    ) -> Self {
        let mut b = blocks;
        let expect = sx * sy * sz;
        if b.len() != expect {
            b.resize(expect, Block::AIR);
        }
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: b,
        }
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_air())
    }

    pub fn occupancy(&self) -> ChunkOccupancy {
        if self.has_non_air() {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub buf: ChunkBuf,
    pub occupancy: ChunkOccupancy,
    /// Highest filled column in the chunk.
    pub top_y: i32,
}

/// Fills one chunk from the world's active biome.
pub fn generate_chunk_buffer(
    world: &World,
    coord: ChunkCoord,
    reg: &BlockRegistry,
) -> Result<ChunkGenerateResult, GenerateError> {
    let plan = world.column_plan(coord)?;
    let names = &world.config().surface;
    let cover = reg.require(&names.cover)?;
    let soil = reg.require(&names.soil)?;
    let rock = reg.require(&names.rock)?;

    let (sx, sy, sz) = (CHUNK_SIZE_X, CHUNK_HEIGHT, CHUNK_SIZE_Z);
    let mut blocks = vec![Block::AIR; sx * sy * sz];
    let mut has_blocks = false;
    for z in 0..sz {
        for x in 0..sx {
            let column = plan.column(x, z);
            let top = column.height.clamp(0, sy as i32) as usize;
            for y in 0..top {
                let block = match column.layer_at(y as i32, plan.soil_depth) {
                    ColumnLayer::Air => Block::AIR,
                    ColumnLayer::Cover => cover,
                    ColumnLayer::Soil => soil,
                    ColumnLayer::Rock => rock,
                };
                if !block.is_air() {
                    has_blocks = true;
                }
                blocks[(y * sz + z) * sx + x] = block;
            }
        }
    }

    Ok(ChunkGenerateResult {
        buf: ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks,
        },
        occupancy: if has_blocks {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        },
        top_y: plan.max_height(),
    })
}
