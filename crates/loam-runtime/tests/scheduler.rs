use std::sync::Arc;
use std::time::Duration;

use hashbrown::HashSet;
use loam_blocks::BlockRegistry;
use loam_runtime::{GenerationScheduler, JobError, JobPhase};
use loam_world::{ChunkCoord, World, WorldGenConfig};

const WAIT: Duration = Duration::from_secs(60);

fn scheduler(cap: usize) -> GenerationScheduler {
    GenerationScheduler::new(
        Arc::new(World::with_defaults(42)),
        Arc::new(BlockRegistry::builtin()),
        cap,
    )
    .unwrap()
}

fn row(n: i32) -> Vec<ChunkCoord> {
    (0..n).map(|i| ChunkCoord::new(i, -i)).collect()
}

#[test]
fn running_never_exceeds_the_cap() {
    let mut s = scheduler(2);
    let coords = row(9);
    for c in &coords {
        assert!(s.enqueue(*c));
        assert!(s.stats().running <= 2);
    }
    assert_eq!(s.stats().queued, 7);

    let mut seen = HashSet::new();
    while seen.len() < coords.len() {
        let out = s.wait_collect(WAIT).expect("job finished");
        assert!(out.is_ok());
        assert!(seen.insert(out.coord), "{} delivered twice", out.coord);
        assert!(s.stats().running <= 2);
    }
    let st = s.stats();
    assert_eq!(st.peak_running, 2);
    assert!(st.peak_executing <= 2);
    assert_eq!(st.completed, 9);
    assert_eq!(st.outstanding_buffers, 0);
    assert!(s.is_idle());
}

#[test]
fn single_worker_starts_backlog_in_order() {
    let mut s = scheduler(1);
    let coords = row(4);
    for c in &coords {
        s.enqueue(*c);
    }
    assert_eq!(s.phase(coords[0]), Some(JobPhase::Running));
    assert_eq!(s.phase(coords[3]), Some(JobPhase::Queued));
    let got: Vec<_> = (0..4).map(|_| s.wait_collect(WAIT).unwrap().coord).collect();
    assert_eq!(got, coords);
}

#[test]
fn destroyed_chunks_never_come_back() {
    let mut s = scheduler(1);
    let [a, b, c] = [ChunkCoord::new(0, 0), ChunkCoord::new(1, 0), ChunkCoord::new(2, 0)];
    s.enqueue(a);
    s.enqueue(b);
    s.enqueue(c);
    assert!(s.mark_destroyed(a));
    assert_eq!(s.phase(a), Some(JobPhase::Orphaned));
    assert!(s.mark_destroyed(b));
    assert_eq!(s.phase(b), None);

    let out = s.wait_collect(WAIT).unwrap();
    assert_eq!(out.coord, c);
    assert!(s.wait_collect(Duration::from_millis(50)).is_none());

    let st = s.stats();
    assert_eq!(st.discarded, 1);
    assert_eq!(st.completed, 1);
    assert_eq!(st.outstanding_buffers, 0);
    assert!(s.is_idle());
}

#[test]
fn duplicate_requests_are_refused() {
    let mut s = scheduler(1);
    let a = ChunkCoord::new(5, 5);
    let b = ChunkCoord::new(6, 5);
    assert!(s.enqueue(a));
    assert!(s.enqueue(b));
    assert!(!s.enqueue(a));
    assert!(!s.enqueue(b));
    assert_eq!(s.pending(), 2);
    assert!(!s.mark_destroyed(ChunkCoord::new(99, 99)));
}

#[test]
fn orphan_then_request_again_delivers_once() {
    let mut s = scheduler(1);
    let a = ChunkCoord::new(-3, 4);
    s.enqueue(a);
    s.mark_destroyed(a);
    assert!(s.enqueue(a));
    let out = s.wait_collect(WAIT).unwrap();
    assert_eq!(out.coord, a);
    assert!(s.wait_collect(Duration::from_millis(50)).is_none());
    assert_eq!(s.stats().discarded, 1);
}

#[test]
fn generation_errors_are_reported_per_chunk() {
    let world = World::new(1, WorldGenConfig::default().with_biome("swamp"));
    let mut s =
        GenerationScheduler::new(Arc::new(world), Arc::new(BlockRegistry::builtin()), 2).unwrap();
    s.enqueue(ChunkCoord::new(0, 0));
    s.enqueue(ChunkCoord::new(0, 1));
    for _ in 0..2 {
        let out = s.wait_collect(WAIT).unwrap();
        assert!(matches!(out.result, Err(JobError::Generate(_))));
    }
    let st = s.stats();
    assert_eq!(st.failed, 2);
    assert_eq!(st.completed, 0);
    assert_eq!(st.outstanding_buffers, 0);
}

#[test]
fn results_carry_grid_and_mesh() {
    let mut s = scheduler(3);
    let c = ChunkCoord::new(0, 0);
    s.enqueue(c);
    let out = s.wait_collect(WAIT).unwrap();
    let chunk = out.result.unwrap();
    assert_eq!(chunk.buf.coord, c);
    assert!(chunk.occupancy.has_blocks());
    assert!(!chunk.mesh.is_empty());
    assert_eq!(chunk.mesh.uv.len() / 2, chunk.mesh.vertex_count());
}
