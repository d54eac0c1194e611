use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};
use hashbrown::HashMap;
use loam_blocks::BlockRegistry;
use loam_world::{ChunkCoord, World};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::job::{BuildJob, JobOut, WorkerCounters, process_build_job};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to start generation workers: {0}")]
    Pool(#[from] ThreadPoolBuildError),
}

/// Where a coordinate sits in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobPhase {
    Queued,
    Running,
    /// Running, but its result will be dropped on collection.
    Orphaned,
}

#[derive(Clone, Copy, Debug, Default)]
struct RunState {
    orphaned: bool,
    requeue: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub queued: usize,
    pub running: usize,
    pub peak_running: usize,
    /// Most jobs a worker pool actually executed at once.
    pub peak_executing: usize,
    pub completed: u64,
    pub failed: u64,
    pub discarded: u64,
    pub outstanding_buffers: usize,
}

/// Runs generation and meshing for at most `max_in_flight` chunks at a time.
///
/// Jobs over the cap wait in a FIFO backlog and start as earlier ones are
/// collected. A job cannot be cancelled once started; destroying its chunk
/// only marks the result for disposal.
pub struct GenerationScheduler {
    job_tx: Sender<BuildJob>,
    res_rx: Receiver<JobOut>,
    _pool: Arc<ThreadPool>,
    counters: Arc<WorkerCounters>,
    max_in_flight: usize,
    backlog: VecDeque<ChunkCoord>,
    running: HashMap<ChunkCoord, RunState>,
    peak_running: usize,
    completed: u64,
    failed: u64,
    discarded: u64,
}

impl GenerationScheduler {
    pub fn new(
        world: Arc<World>,
        reg: Arc<BlockRegistry>,
        max_in_flight: usize,
    ) -> Result<Self, SchedulerError> {
        let max_in_flight = max_in_flight.max(1);
        let (job_tx, job_rx) = unbounded::<BuildJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let counters = Arc::new(WorkerCounters::default());

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(max_in_flight)
                .thread_name(|i| format!("loam-gen-{i}"))
                .build()?,
        );
        for _ in 0..max_in_flight {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let world = world.clone();
            let reg = reg.clone();
            let counters = counters.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    process_build_job(job, world.as_ref(), reg.as_ref(), &counters, &tx);
                }
            });
        }
        log::debug!(target: "sched", "generation pool started workers={max_in_flight}");

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            counters,
            max_in_flight,
            backlog: VecDeque::new(),
            running: HashMap::new(),
            peak_running: 0,
            completed: 0,
            failed: 0,
            discarded: 0,
        })
    }

    #[inline]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn phase(&self, coord: ChunkCoord) -> Option<JobPhase> {
        match self.running.get(&coord) {
            Some(st) if st.orphaned => Some(JobPhase::Orphaned),
            Some(_) => Some(JobPhase::Running),
            None if self.backlog.contains(&coord) => Some(JobPhase::Queued),
            None => None,
        }
    }

    #[inline]
    pub fn is_running(&self, coord: ChunkCoord) -> bool {
        self.running.get(&coord).is_some_and(|st| !st.orphaned)
    }

    /// Jobs queued or running, orphans included.
    #[inline]
    pub fn pending(&self) -> usize {
        self.backlog.len() + self.running.len()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Requests generation of `coord`. Returns false if it is already pending.
    pub fn enqueue(&mut self, coord: ChunkCoord) -> bool {
        if let Some(st) = self.running.get_mut(&coord) {
            if st.orphaned && !st.requeue {
                st.requeue = true;
                log::debug!(target: "sched", "requeue {coord} after orphan drains");
                return true;
            }
            log::warn!(target: "sched", "enqueue of {coord} ignored: already running");
            return false;
        }
        if self.backlog.contains(&coord) {
            log::warn!(target: "sched", "enqueue of {coord} ignored: already queued");
            return false;
        }
        if self.running.len() < self.max_in_flight {
            self.dispatch(coord);
        } else {
            self.backlog.push_back(coord);
            log::trace!(target: "sched", "backlog {coord} depth={}", self.backlog.len());
        }
        true
    }

    /// The chunk at `coord` is gone. A queued job is dropped outright; a
    /// running one is orphaned. Returns false when nothing was pending.
    pub fn mark_destroyed(&mut self, coord: ChunkCoord) -> bool {
        if let Some(pos) = self.backlog.iter().position(|c| *c == coord) {
            self.backlog.remove(pos);
            log::trace!(target: "sched", "unqueued {coord}");
            return true;
        }
        match self.running.get_mut(&coord) {
            Some(st) if st.orphaned => {
                let had_requeue = st.requeue;
                st.requeue = false;
                had_requeue
            }
            Some(st) => {
                st.orphaned = true;
                log::debug!(target: "sched", "orphaned running job {coord}");
                true
            }
            None => false,
        }
    }

    /// Next finished live job, without blocking. Orphaned results met on the
    /// way are dropped and the pool is refilled from the backlog.
    pub fn try_collect(&mut self) -> Option<JobOut> {
        loop {
            let out = match self.res_rx.try_recv() {
                Ok(out) => out,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            };
            if let Some(out) = self.accept(out) {
                return Some(out);
            }
        }
    }

    /// Blocking form of [`try_collect`](Self::try_collect) for tools and tests.
    pub fn wait_collect(&mut self, timeout: Duration) -> Option<JobOut> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            let out = match self.res_rx.recv_timeout(left) {
                Ok(out) => out,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            };
            if let Some(out) = self.accept(out) {
                return Some(out);
            }
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            queued: self.backlog.len(),
            running: self.running.len(),
            peak_running: self.peak_running,
            peak_executing: self.counters.peak_executing.load(Ordering::Acquire),
            completed: self.completed,
            failed: self.failed,
            discarded: self.discarded,
            outstanding_buffers: self.counters.outstanding.load(Ordering::Acquire),
        }
    }

    fn dispatch(&mut self, coord: ChunkCoord) {
        if self.job_tx.send(BuildJob { coord }).is_err() {
            log::error!(target: "sched", "generation workers are gone; dropping {coord}");
            return;
        }
        self.running.insert(coord, RunState::default());
        self.peak_running = self.peak_running.max(self.running.len());
        log::trace!(target: "sched", "start {coord} running={}", self.running.len());
    }

    fn refill(&mut self) {
        while self.running.len() < self.max_in_flight {
            let Some(next) = self.backlog.pop_front() else {
                break;
            };
            self.dispatch(next);
        }
    }

    /// Retires one result. Returns it unless it belongs to a destroyed chunk.
    fn accept(&mut self, out: JobOut) -> Option<JobOut> {
        self.counters.outstanding.fetch_sub(1, Ordering::AcqRel);
        let state = self.running.remove(&out.coord);
        let coord = out.coord;
        match state {
            Some(RunState {
                orphaned: true,
                requeue,
            }) => {
                self.discarded += 1;
                // Drop if stale
                drop(out);
                log::debug!(target: "sched", "discarded orphaned result {coord}");
                if requeue {
                    self.backlog.push_back(coord);
                }
                self.refill();
                None
            }
            Some(_) => {
                if out.is_ok() {
                    self.completed += 1;
                } else {
                    self.failed += 1;
                }
                self.refill();
                Some(out)
            }
            None => {
                log::warn!(target: "sched", "result for untracked job {coord} dropped");
                self.discarded += 1;
                self.refill();
                None
            }
        }
    }
}
