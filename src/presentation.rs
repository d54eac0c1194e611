//! Seams to the renderer and the physics engine.

use hashbrown::HashMap;
use loam_geom::{Aabb, Vec3};
use loam_mesh_cpu::{MeshBuffers, compute_normals};
use loam_world::ChunkCoord;

/// Token for one uploaded mesh; released when its chunk is destroyed or re-meshed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PresentHandle(pub u64);

pub trait MeshPresenter {
    /// Uploads `mesh`, placed at the world-space `origin`.
    fn present(&mut self, coord: ChunkCoord, origin: Vec3, mesh: &MeshBuffers) -> PresentHandle;
    fn release(&mut self, handle: PresentHandle);
}

pub trait CollisionSink {
    fn build(&mut self, coord: ChunkCoord, mesh: &MeshBuffers);
    fn remove(&mut self, coord: ChunkCoord);
}

#[derive(Clone, Debug)]
pub struct PresentedMesh {
    pub coord: ChunkCoord,
    pub triangles: usize,
    pub bytes: usize,
    /// World-space bounds, `None` for an empty mesh.
    pub bounds: Option<Aabb>,
}

/// Presenter for tools and tests: derives normals like a renderer would and
/// keeps counts instead of GPU buffers.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    next_id: u64,
    live: HashMap<PresentHandle, PresentedMesh>,
    pub uploads: u64,
    pub releases: u64,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_live(&self, handle: PresentHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn get(&self, handle: PresentHandle) -> Option<&PresentedMesh> {
        self.live.get(&handle)
    }

    pub fn live_triangles(&self) -> usize {
        self.live.values().map(|m| m.triangles).sum()
    }

    /// Buffer bytes a renderer would hold for the live meshes.
    pub fn live_bytes(&self) -> usize {
        self.live.values().map(|m| m.bytes).sum()
    }

    /// Handles currently uploaded for `coord`.
    pub fn handles_for(&self, coord: ChunkCoord) -> Vec<PresentHandle> {
        self.live
            .iter()
            .filter(|(_, m)| m.coord == coord)
            .map(|(h, _)| *h)
            .collect()
    }
}

impl MeshPresenter for HeadlessPresenter {
    fn present(&mut self, coord: ChunkCoord, origin: Vec3, mesh: &MeshBuffers) -> PresentHandle {
        let normals = compute_normals(mesh);
        debug_assert_eq!(normals.len(), mesh.pos.len());
        self.next_id += 1;
        let handle = PresentHandle(self.next_id);
        self.uploads += 1;
        self.live.insert(
            handle,
            PresentedMesh {
                coord,
                triangles: mesh.triangle_count(),
                bytes: mesh.byte_size(),
                bounds: mesh.bounds().map(|bb| bb.translated(origin)),
            },
        );
        handle
    }

    fn release(&mut self, handle: PresentHandle) {
        if self.live.remove(&handle).is_some() {
            self.releases += 1;
        } else {
            log::warn!("release of unknown mesh handle {}", handle.0);
        }
    }
}
