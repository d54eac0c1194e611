//! Streaming voxel world: chunk lifecycle around an observer, plus block edits.
#![forbid(unsafe_code)]

mod chunk_state;
pub mod config;
mod error;
pub mod presentation;
mod world_manager;

pub use chunk_state::{ChunkPhase, ChunkState};
pub use config::{EngineConfig, SchedulerSettings, StreamingConfig, WorldSettings};
pub use error::ConfigError;
pub use presentation::{CollisionSink, HeadlessPresenter, MeshPresenter, PresentHandle};
pub use world_manager::{TickReport, WorldManager};

pub use loam_blocks as blocks;
pub use loam_chunk as chunk;
pub use loam_geom as geom;
pub use loam_mesh_cpu as mesh;
pub use loam_runtime as runtime;
pub use loam_world as world;
