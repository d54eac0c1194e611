use thiserror::Error;

use crate::types::BlockId;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read block catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse block catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("block '{name}' uses id 0, which is reserved for air")]
    ReservedAirId { name: String },
    #[error("block '{name}' is named 'air', which is reserved")]
    ReservedAirName { name: String },
    #[error("block id {id} is declared twice ('{first}' and '{second}')")]
    DuplicateId {
        id: BlockId,
        first: String,
        second: String,
    },
    #[error("block name '{0}' is declared twice")]
    DuplicateName(String),
    #[error("unknown block '{0}'")]
    UnknownBlock(String),
}
