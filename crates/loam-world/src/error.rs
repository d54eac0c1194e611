use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldGenError {
    #[error("unknown biome '{0}'")]
    UnknownBiome(String),
    #[error("invalid biome '{name}': {reason}")]
    InvalidBiome { name: String, reason: &'static str },
    #[error("failed to read worldgen config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse worldgen config: {0}")]
    Parse(#[from] toml::de::Error),
}
