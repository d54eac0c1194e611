use loam_geom::Vec3;

use crate::FACE_TILE;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    /// Emission order used by the mesher.
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }

    /// Faces on the chunk's lateral sides; only these consult neighbour chunks.
    #[inline]
    pub fn is_lateral(self) -> bool {
        !matches!(self, Face::PosY | Face::NegY)
    }

    /// Quad corners for the cell at `(x, y, z)`. Triangles `(0,1,3)` and
    /// `(3,1,2)` wind counter-clockwise seen from outside the cell.
    pub fn corners(self, x: f32, y: f32, z: f32) -> [Vec3; 4] {
        let (x1, y1, z1) = (x + 1.0, y + 1.0, z + 1.0);
        match self {
            Face::PosX => [
                Vec3::new(x1, y, z),
                Vec3::new(x1, y1, z),
                Vec3::new(x1, y1, z1),
                Vec3::new(x1, y, z1),
            ],
            Face::NegX => [
                Vec3::new(x, y, z1),
                Vec3::new(x, y1, z1),
                Vec3::new(x, y1, z),
                Vec3::new(x, y, z),
            ],
            Face::PosY => [
                Vec3::new(x, y1, z1),
                Vec3::new(x1, y1, z1),
                Vec3::new(x1, y1, z),
                Vec3::new(x, y1, z),
            ],
            Face::NegY => [
                Vec3::new(x1, y, z1),
                Vec3::new(x, y, z1),
                Vec3::new(x, y, z),
                Vec3::new(x1, y, z),
            ],
            Face::PosZ => [
                Vec3::new(x1, y, z1),
                Vec3::new(x1, y1, z1),
                Vec3::new(x, y1, z1),
                Vec3::new(x, y, z1),
            ],
            Face::NegZ => [
                Vec3::new(x, y, z),
                Vec3::new(x, y1, z),
                Vec3::new(x1, y1, z),
                Vec3::new(x1, y, z),
            ],
        }
    }

    /// Lower-left corner of this face's tile inside a block's atlas group.
    #[inline]
    pub fn tile_origin(self) -> [f32; 2] {
        let t = FACE_TILE;
        match self {
            Face::PosX => [3.0 * t, t],
            Face::NegX => [t, t],
            Face::PosY => [t, 2.0 * t],
            Face::NegY => [t, 0.0],
            Face::PosZ => [0.0, t],
            Face::NegZ => [2.0 * t, t],
        }
    }

    /// Per-corner UVs of the face tile, matching [`corners`](Self::corners).
    #[inline]
    pub fn uv_rect(self) -> [[f32; 2]; 4] {
        let [u, v] = self.tile_origin();
        let t = FACE_TILE;
        [[u, v], [u, v + t], [u + t, v + t], [u + t, v]]
    }
}
