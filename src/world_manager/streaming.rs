use hashbrown::HashSet;
use loam_geom::Vec3;
use loam_runtime::JobOut;
use loam_world::ChunkCoord;

use super::{TickReport, WorldManager};
use crate::chunk_state::chunk_origin;
use crate::presentation::MeshPresenter;
use crate::{ChunkPhase, ChunkState};

impl<P: MeshPresenter> WorldManager<P> {
    /// One cooperative step: evict, discover, request, then apply at most one
    /// finished job. Never blocks on the workers.
    pub fn update(&mut self, observer: Vec3) -> TickReport {
        self.tick += 1;
        let center = ChunkCoord::from_position(observer.x, observer.z);
        if self.center != Some(center) {
            log::debug!(target: "stream", "view center {center}");
        }
        self.center = Some(center);
        let mut report = TickReport {
            tick: self.tick,
            center,
            ..TickReport::default()
        };

        let keep = self.cfg.keep_radius();
        let doomed: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|c| c.distance(center) > keep)
            .collect();
        let mut seams = HashSet::new();
        for coord in doomed {
            if self.evict(coord) {
                report.destroyed += 1;
                seams.extend(coord.neighbors4());
            }
        }
        self.refresh_seams(seams);

        for coord in self.missing_candidates(center) {
            if self.request_chunk(coord) {
                report.created += 1;
            }
        }

        for state in self.chunks.values_mut() {
            if state.phase == ChunkPhase::Requested && self.scheduler.is_running(state.coord) {
                state.phase = ChunkPhase::Generating;
            }
        }

        let discarded_before = self.scheduler.stats().discarded;
        if let Some(out) = self.scheduler.try_collect() {
            self.apply_job(out, &mut report);
        }
        report.discarded += (self.scheduler.stats().discarded - discarded_before) as usize;

        if observer.y < self.cfg.floor_y {
            log::info!(
                target: "stream",
                "observer below floor y={:.1} floor={:.1}",
                observer.y,
                self.cfg.floor_y
            );
            report.observer_below_floor = true;
        }

        report.pending = self.scheduler.pending();
        if !report.is_quiet() {
            log::debug!(
                target: "stream",
                "tick={} center={} created={} destroyed={} applied={} failed={} pending={} live={}",
                report.tick,
                center,
                report.created,
                report.destroyed,
                report.applied,
                report.failed,
                report.pending,
                self.chunks.len()
            );
        }
        report
    }

    /// Unmapped axis neighbours of live chunks inside the keep radius, nearest
    /// first, capped per tick. The observer's own chunk seeds an empty map.
    pub(crate) fn missing_candidates(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let keep = self.cfg.keep_radius();
        let mut found: HashSet<ChunkCoord> = HashSet::new();
        if self.chunks.is_empty() {
            found.insert(center);
        } else {
            for coord in self.chunks.keys() {
                for n in coord.neighbors4() {
                    if !self.chunks.contains_key(&n) {
                        found.insert(n);
                    }
                }
            }
        }
        let mut out: Vec<ChunkCoord> = found
            .into_iter()
            .filter(|c| c.distance(center) <= keep)
            .collect();
        out.sort_by_key(|c| (c.distance_sq(center), *c));
        out.truncate(self.cfg.max_new_chunks_per_tick);
        out
    }

    /// Registers `coord` and hands it to the scheduler.
    pub fn request_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            log::warn!(
                target: "stream",
                "chunk {coord} would be overridden without prior deletion; ignored"
            );
            return false;
        }
        self.chunks.insert(coord, ChunkState::requested(coord));
        if !self.scheduler.enqueue(coord) {
            log::warn!(target: "stream", "chunk {coord} already had a job in flight");
        }
        log::trace!(target: "stream", "requested {coord}");
        true
    }

    /// Drops `coord` from the map, releasing its presentation and orphaning
    /// any job still working on it. Neighbours whose meshes were culled
    /// against it are re-meshed.
    pub fn destroy_chunk(&mut self, coord: ChunkCoord) -> bool {
        if !self.evict(coord) {
            return false;
        }
        self.refresh_seams(coord.neighbors4());
        true
    }

    pub(crate) fn evict(&mut self, coord: ChunkCoord) -> bool {
        let Some(state) = self.chunks.remove(&coord) else {
            log::warn!(
                target: "stream",
                "deletion of non-existing chunk {coord} requested; ignored"
            );
            return false;
        };
        if state.is_pending() {
            self.scheduler.mark_destroyed(coord);
        }
        if let Some(handle) = state.handle {
            self.presenter.release(handle);
        }
        if state.is_active() {
            if let Some(sink) = self.collision.as_mut() {
                sink.remove(coord);
            }
        }
        log::trace!(target: "stream", "destroyed {coord} phase={:?}", state.phase);
        true
    }

    /// Re-meshes the live chunks among `coords` whose edge faces were hidden
    /// by a neighbour, so seams facing a removed chunk open up again.
    fn refresh_seams(&mut self, coords: impl IntoIterator<Item = ChunkCoord>) {
        for coord in coords {
            if self.chunks.get(&coord).is_some_and(|c| c.seams_culled) {
                log::trace!(target: "stream", "re-meshing seams of {coord}");
                self.remesh(coord);
            }
        }
    }

    fn apply_job(&mut self, out: JobOut, report: &mut TickReport) {
        let JobOut {
            coord,
            result,
            t_gen_ms,
            t_mesh_ms,
        } = out;
        let Some(state) = self.chunks.get_mut(&coord) else {
            log::debug!(target: "stream", "result for {coord} has no live chunk; dropped");
            report.discarded += 1;
            return;
        };
        if !state.is_pending() {
            log::warn!(
                target: "stream",
                "unexpected result for {coord} in phase {:?}; dropped",
                state.phase
            );
            report.discarded += 1;
            return;
        }
        match result {
            Ok(chunk) => {
                state.buf = Some(chunk.buf);
                state.mesh = Some(chunk.mesh);
                state.seams_culled = false;
                state.phase = ChunkPhase::Ready;
                state.mesh_count += 1;
                self.present(coord);
                report.applied += 1;
                log::debug!(
                    target: "stream",
                    "chunk {coord} active gen={t_gen_ms}ms mesh={t_mesh_ms}ms top_y={}",
                    chunk.top_y
                );
            }
            Err(e) => {
                log::warn!(target: "stream", "chunk {coord} failed: {e}");
                self.chunks.remove(&coord);
                report.failed += 1;
            }
        }
    }

    /// Uploads the chunk's current mesh, replacing any earlier upload.
    pub(crate) fn present(&mut self, coord: ChunkCoord) {
        let Some(state) = self.chunks.get_mut(&coord) else {
            return;
        };
        let Some(mesh) = state.mesh.as_ref() else {
            return;
        };
        if let Some(old) = state.handle.take() {
            self.presenter.release(old);
        }
        let handle = self.presenter.present(coord, chunk_origin(coord), mesh);
        if let Some(sink) = self.collision.as_mut() {
            sink.build(coord, mesh);
        }
        state.handle = Some(handle);
        state.phase = ChunkPhase::Active;
    }
}
