use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CHUNK_SIZE_X, CHUNK_SIZE_Z};

/// Position of a chunk column on the infinite XZ grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx) - i64::from(other.cx);
        let dz = i64::from(self.cz) - i64::from(other.cz);
        dx.saturating_mul(dx).saturating_add(dz.saturating_mul(dz))
    }

    /// Euclidean distance in chunk units.
    #[inline]
    pub fn distance(self, other: ChunkCoord) -> f32 {
        (self.distance_sq(other) as f64).sqrt() as f32
    }

    /// Chunk containing the world block column `(wx, wz)`.
    #[inline]
    pub fn from_block(wx: i32, wz: i32) -> Self {
        Self {
            cx: wx.div_euclid(CHUNK_SIZE_X as i32),
            cz: wz.div_euclid(CHUNK_SIZE_Z as i32),
        }
    }

    /// Chunk containing a continuous world position.
    #[inline]
    pub fn from_position(x: f32, z: f32) -> Self {
        Self {
            cx: (x / CHUNK_SIZE_X as f32).floor() as i32,
            cz: (z / CHUNK_SIZE_Z as f32).floor() as i32,
        }
    }

    /// Local column of a world block column inside its chunk.
    #[inline]
    pub fn local_of(wx: i32, wz: i32) -> (usize, usize) {
        (
            wx.rem_euclid(CHUNK_SIZE_X as i32) as usize,
            wz.rem_euclid(CHUNK_SIZE_Z as i32) as usize,
        )
    }

    /// World block coordinates of local cell `(0, 0)`.
    #[inline]
    pub fn origin_block(self) -> (i32, i32) {
        (
            self.cx * CHUNK_SIZE_X as i32,
            self.cz * CHUNK_SIZE_Z as i32,
        )
    }

    /// The four axis neighbours: -X, +X, -Z, +Z.
    #[inline]
    pub fn neighbors4(self) -> [ChunkCoord; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.cx, self.cz)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}
