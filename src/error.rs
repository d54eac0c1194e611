use loam_blocks::RegistryError;
use loam_runtime::SchedulerError;
use loam_world::WorldGenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read engine config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid engine config: {0}")]
    Invalid(&'static str),
    #[error("block catalog: {0}")]
    Registry(#[from] RegistryError),
    #[error("worldgen: {0}")]
    WorldGen(#[from] WorldGenError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
