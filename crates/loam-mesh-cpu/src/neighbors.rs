use loam_chunk::ChunkBuf;

use crate::Face;

/// Loaded lateral neighbours of the chunk being meshed. Missing sides read as empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkNeighbors<'a> {
    pub neg_x: Option<&'a ChunkBuf>,
    pub pos_x: Option<&'a ChunkBuf>,
    pub neg_z: Option<&'a ChunkBuf>,
    pub pos_z: Option<&'a ChunkBuf>,
}

impl<'a> ChunkNeighbors<'a> {
    #[inline]
    pub const fn none() -> Self {
        Self {
            neg_x: None,
            pos_x: None,
            neg_z: None,
            pos_z: None,
        }
    }

    /// Neighbour chunk across `face`; vertical faces never have one.
    #[inline]
    pub fn across(&self, face: Face) -> Option<&'a ChunkBuf> {
        match face {
            Face::NegX => self.neg_x,
            Face::PosX => self.pos_x,
            Face::NegZ => self.neg_z,
            Face::PosZ => self.pos_z,
            Face::PosY | Face::NegY => None,
        }
    }

    pub fn loaded_count(&self) -> usize {
        [self.neg_x, self.pos_x, self.neg_z, self.pos_z]
            .iter()
            .filter(|n| n.is_some())
            .count()
    }
}
