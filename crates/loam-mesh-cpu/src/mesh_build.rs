use loam_geom::{Aabb, Vec2, Vec3};

/// Parallel vertex/UV/index streams for one chunk, in chunk-local space.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuffers {
    pub pos: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuffers {
    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.idx.reserve(n_quads * 6);
    }

    /// Appends one unwelded quad as triangles `(0,1,3)` and `(3,1,2)`.
    pub fn add_quad(&mut self, corners: [Vec3; 4], uvs: [Vec2; 4]) {
        let base = self.vertex_count() as u32;
        for (p, uv) in corners.iter().zip(uvs.iter()) {
            self.pos.extend_from_slice(&[p.x, p.y, p.z]);
            self.uv.extend_from_slice(&[uv.x, uv.y]);
        }
        self.idx.extend_from_slice(&[
            base,
            base + 1,
            base + 3,
            base + 3,
            base + 1,
            base + 2,
        ]);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.pos[i * 3..i * 3 + 3])
    }

    /// Corners of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [Vec3; 3] {
        let i = &self.idx[t * 3..t * 3 + 3];
        [
            self.vertex(i[0] as usize),
            self.vertex(i[1] as usize),
            self.vertex(i[2] as usize),
        ]
    }

    /// Local bounds of every vertex, `None` when the mesh is empty.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.pos.chunks_exact(3).map(Vec3::from_slice))
    }

    /// Approximate heap footprint of the three streams.
    pub fn byte_size(&self) -> usize {
        (self.pos.len() + self.uv.len()) * size_of::<f32>() + self.idx.len() * size_of::<u32>()
    }
}

/// Per-vertex normals derived from the triangle list.
///
/// Face normals are accumulated unnormalised, so larger triangles weigh more,
/// then each vertex sum is normalised. Returns a stride-3 stream.
pub fn compute_normals(mesh: &MeshBuffers) -> Vec<f32> {
    let mut acc = vec![Vec3::ZERO; mesh.vertex_count()];
    for tri in mesh.idx.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (va, vb, vc) = (mesh.vertex(a), mesh.vertex(b), mesh.vertex(c));
        let n = (vb - va).cross(vc - va);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    let mut out = Vec::with_capacity(acc.len() * 3);
    for n in acc {
        let n = n.normalized();
        out.extend_from_slice(&[n.x, n.y, n.z]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Face;

    #[test]
    fn quad_indices_are_local_to_the_quad() {
        let mut m = MeshBuffers::default();
        m.add_quad(Face::PosY.corners(0.0, 0.0, 0.0), Face::PosY.uv_rect().map(Vec2::from));
        m.add_quad(Face::NegY.corners(0.0, 0.0, 0.0), Face::NegY.uv_rect().map(Vec2::from));
        assert_eq!(m.vertex_count(), 8);
        assert_eq!(m.idx, vec![0, 1, 3, 3, 1, 2, 4, 5, 7, 7, 5, 6]);
        assert_eq!(m.quad_count(), 2);
        assert_eq!(m.byte_size(), (24 + 16 + 12) * 4);
    }

    #[test]
    fn normals_follow_winding() {
        let mut m = MeshBuffers::default();
        m.add_quad(Face::NegZ.corners(2.0, 3.0, 4.0), Face::NegZ.uv_rect().map(Vec2::from));
        let n = compute_normals(&m);
        for v in n.chunks_exact(3) {
            assert_eq!(Vec3::from_slice(v), Vec3::new(0.0, 0.0, -1.0));
        }
        let bb = m.bounds().unwrap();
        assert_eq!(bb.min, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(bb.max, Vec3::new(3.0, 4.0, 4.0));
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(MeshBuffers::default().bounds().is_none());
        assert!(compute_normals(&MeshBuffers::default()).is_empty());
    }
}
