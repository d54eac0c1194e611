use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crossbeam_channel::Sender;
use loam_blocks::BlockRegistry;
use loam_chunk::{ChunkBuf, ChunkOccupancy, GenerateError, generate_chunk_buffer};
use loam_mesh_cpu::{ChunkNeighbors, MeshBuffers, MeshError, build_chunk_mesh};
use loam_world::{ChunkCoord, World};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("generation failed: {0}")]
    Generate(#[from] GenerateError),
    #[error("meshing failed: {0}")]
    Mesh(#[from] MeshError),
}

/// Grid and surface produced for one chunk; owned by whoever collected it.
#[derive(Clone, Debug)]
pub struct GeneratedChunk {
    pub buf: ChunkBuf,
    pub mesh: MeshBuffers,
    pub occupancy: ChunkOccupancy,
    pub top_y: i32,
}

#[derive(Debug)]
pub struct JobOut {
    pub coord: ChunkCoord,
    pub result: Result<GeneratedChunk, JobError>,
    pub t_gen_ms: u32,
    pub t_mesh_ms: u32,
}

impl JobOut {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct BuildJob {
    pub coord: ChunkCoord,
}

/// Counters shared between the scheduler and its workers.
#[derive(Default)]
pub(crate) struct WorkerCounters {
    pub executing: AtomicUsize,
    pub peak_executing: AtomicUsize,
    pub outstanding: AtomicUsize,
}

#[inline]
fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

pub(crate) fn process_build_job(
    job: BuildJob,
    world: &World,
    reg: &BlockRegistry,
    counters: &Arc<WorkerCounters>,
    tx: &Sender<JobOut>,
) {
    let BuildJob { coord } = job;
    let now = counters.executing.fetch_add(1, Ordering::AcqRel) + 1;
    counters.peak_executing.fetch_max(now, Ordering::AcqRel);
    counters.outstanding.fetch_add(1, Ordering::AcqRel);

    let mut t_mesh_ms = 0;
    let t0 = Instant::now();
    let generated = generate_chunk_buffer(world, coord, reg);
    let t_gen_ms = elapsed_ms(t0);

    let result = match generated {
        Ok(g) => {
            let t0 = Instant::now();
            let mesh = build_chunk_mesh(&g.buf, &ChunkNeighbors::none(), reg);
            t_mesh_ms = elapsed_ms(t0);
            mesh.map(|mesh| GeneratedChunk {
                buf: g.buf,
                mesh,
                occupancy: g.occupancy,
                top_y: g.top_y,
            })
            .map_err(JobError::from)
        }
        Err(e) => Err(JobError::from(e)),
    };

    counters.executing.fetch_sub(1, Ordering::AcqRel);
    let out = JobOut {
        coord,
        result,
        t_gen_ms,
        t_mesh_ms,
    };
    if tx.send(out).is_err() {
        // Scheduler is gone; the buffers die with the message.
        counters.outstanding.fetch_sub(1, Ordering::AcqRel);
    }
}
