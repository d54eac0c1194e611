//! Owns the chunk map and drives it from the observer's position.

mod editing;
mod streaming;

use std::sync::Arc;

use hashbrown::HashMap;
use loam_blocks::BlockRegistry;
use loam_runtime::{GenerationScheduler, SchedulerStats};
use loam_world::{ChunkCoord, World};

use crate::presentation::{CollisionSink, MeshPresenter};
use crate::{ChunkPhase, ChunkState, StreamingConfig};

/// What one [`WorldManager::update`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub center: ChunkCoord,
    pub created: usize,
    pub destroyed: usize,
    pub applied: usize,
    pub failed: usize,
    pub discarded: usize,
    /// Jobs still queued or running after this tick.
    pub pending: usize,
    /// The observer fell under the floor; its owner should respawn it.
    pub observer_below_floor: bool,
}

impl TickReport {
    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.created == 0
            && self.destroyed == 0
            && self.applied == 0
            && self.failed == 0
            && self.discarded == 0
    }
}

pub struct WorldManager<P: MeshPresenter> {
    world: Arc<World>,
    reg: Arc<BlockRegistry>,
    scheduler: GenerationScheduler,
    presenter: P,
    collision: Option<Box<dyn CollisionSink + Send>>,
    cfg: StreamingConfig,
    chunks: HashMap<ChunkCoord, ChunkState>,
    center: Option<ChunkCoord>,
    tick: u64,
}

impl<P: MeshPresenter> WorldManager<P> {
    pub fn new(
        world: Arc<World>,
        reg: Arc<BlockRegistry>,
        scheduler: GenerationScheduler,
        presenter: P,
        cfg: StreamingConfig,
    ) -> Self {
        log::info!(
            target: "stream",
            "world manager ready seed={} biome={} render_distance={} workers={}",
            world.seed,
            world.biome_name(),
            cfg.render_distance,
            scheduler.max_in_flight()
        );
        Self {
            world,
            reg,
            scheduler,
            presenter,
            collision: None,
            cfg,
            chunks: HashMap::new(),
            center: None,
            tick: 0,
        }
    }

    pub fn with_collision(mut self, sink: impl CollisionSink + Send + 'static) -> Self {
        self.collision = Some(Box::new(sink));
        self
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    #[inline]
    pub fn config(&self) -> &StreamingConfig {
        &self.cfg
    }

    #[inline]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    #[inline]
    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkState> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &ChunkState> {
        self.chunks.values()
    }

    pub fn count_in_phase(&self, phase: ChunkPhase) -> usize {
        self.chunks.values().filter(|c| c.phase == phase).count()
    }

    /// Sorted coordinates of every chunk in `phase`.
    pub fn coords_in_phase(&self, phase: ChunkPhase) -> Vec<ChunkCoord> {
        let mut v: Vec<_> = self
            .chunks
            .values()
            .filter(|c| c.phase == phase)
            .map(|c| c.coord)
            .collect();
        v.sort();
        v
    }

    /// Observer's chunk as of the last update.
    #[inline]
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// No pending jobs, every chunk presented and nothing left to create.
    pub fn is_settled(&self) -> bool {
        let Some(center) = self.center else {
            return false;
        };
        self.scheduler.is_idle()
            && self.chunks.values().all(ChunkState::is_active)
            && self.missing_candidates(center).is_empty()
    }
}

impl<P: MeshPresenter> Drop for WorldManager<P> {
    fn drop(&mut self) {
        let coords: Vec<_> = self.chunks.keys().copied().collect();
        for coord in coords {
            self.evict(coord);
        }
    }
}
