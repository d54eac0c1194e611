use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use loam::blocks::Block;
use loam::geom::Vec3;
use loam::runtime::GenerationScheduler;
use loam::world::World;
use loam::{ChunkPhase, ConfigError, EngineConfig, HeadlessPresenter, WorldManager};

/// Streams a voxel world around an observer walking in a straight line.
#[derive(Parser, Debug)]
#[command(name = "loam", version, about)]
struct Args {
    /// Engine config (`loam.toml`); built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Active biome, overriding the worldgen file.
    #[arg(long)]
    biome: Option<String>,
    /// Streaming radius in chunks.
    #[arg(long)]
    render_distance: Option<f32>,
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Wall-clock length of one tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Observer speed along +X, in blocks per second.
    #[arg(long, default_value_t = 8.0)]
    speed: f32,
    /// Generation workers (concurrency cap).
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<EngineConfig, ConfigError> {
    let mut cfg = match &args.config {
        Some(path) => EngineConfig::load_from_path(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    if let Some(biome) = &args.biome {
        cfg.world.biome = Some(biome.clone());
    }
    if let Some(rd) = args.render_distance {
        cfg.streaming.render_distance = rd;
    }
    if let Some(n) = args.workers {
        cfg.scheduler.max_in_flight = n;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(args: Args) -> Result<(), ConfigError> {
    let cfg = load_config(&args)?;
    let reg = Arc::new(cfg.load_registry()?);
    let worldgen = cfg.load_worldgen()?;
    let world = Arc::new(World::new(cfg.world.seed, worldgen));
    let scheduler =
        GenerationScheduler::new(world.clone(), reg.clone(), cfg.scheduler.max_in_flight)?;
    let mut manager = WorldManager::new(
        world,
        reg.clone(),
        scheduler,
        HeadlessPresenter::new(),
        cfg.streaming.clone(),
    );

    let spawn = Vec3::new(8.0, 200.0, 8.0);
    let mut observer = spawn;
    let dt = args.tick_ms as f32 / 1000.0;
    let tick = Duration::from_millis(args.tick_ms);
    for _ in 0..args.ticks {
        observer.x += args.speed * dt;
        let report = manager.update(observer);
        if report.observer_below_floor {
            log::info!("respawning observer at {spawn:?}");
            observer = spawn;
        }
        if report.failed > 0 {
            log::warn!("tick {}: {} chunk(s) failed to generate", report.tick, report.failed);
        }
        thread::sleep(tick);
    }

    let (wx, wz) = (observer.x.floor() as i32, observer.z.floor() as i32);
    match manager.surface_y(wx, wz) {
        Some(y) => {
            let block = reg
                .id_by_name("wood")
                .map(Block::new)
                .or_else(|| reg.placeable().first().copied());
            if let Some(block) = block {
                let placed = manager.place_block(wx, y + 1, wz, block);
                log::info!("placed block {} at ({wx}, {}, {wz}): {placed}", block.id, y + 1);
            }
        }
        None => log::warn!("no loaded ground under the observer at ({wx}, {wz})"),
    }

    let stats = manager.scheduler_stats();
    let presenter = manager.presenter();
    log::info!(
        target: "stream",
        "done: chunks={} active={} pending={} uploads={} releases={} live_tris={} live_kib={}",
        manager.chunk_count(),
        manager.count_in_phase(ChunkPhase::Active),
        stats.queued + stats.running,
        presenter.uploads,
        presenter.releases,
        presenter.live_triangles(),
        presenter.live_bytes() / 1024
    );
    log::info!(
        target: "sched",
        "completed={} failed={} discarded={} peak_running={} outstanding={}",
        stats.completed,
        stats.failed,
        stats.discarded,
        stats.peak_running,
        stats.outstanding_buffers
    );
    Ok(())
}
