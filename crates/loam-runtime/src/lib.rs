//! Bounded chunk generation pool: enqueue coordinates, poll finished chunks.
#![forbid(unsafe_code)]

mod job;
mod scheduler;

pub use job::{GeneratedChunk, JobError, JobOut};
pub use scheduler::{GenerationScheduler, JobPhase, SchedulerError, SchedulerStats};
