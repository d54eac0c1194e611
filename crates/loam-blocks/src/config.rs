use serde::Deserialize;

use crate::types::BlockId;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

/// One `[[blocks]]` entry of `blocks.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    /// Explicit id; defaults to the next free id after the previous entry.
    pub id: Option<BlockId>,
    pub uv_offset: [f32; 2],
    pub opaque: Option<bool>,
}

impl BlockDef {
    pub fn new(name: &str, id: BlockId, uv_offset: [f32; 2]) -> Self {
        Self {
            name: name.to_string(),
            id: Some(id),
            uv_offset,
            opaque: None,
        }
    }
}

/// Built-in catalog used when no `blocks.toml` is supplied.
pub fn builtin_blocks() -> BlocksConfig {
    BlocksConfig {
        blocks: vec![
            BlockDef::new("stone", 1, [0.75, 0.0]),
            BlockDef::new("grass", 2, [0.0, 0.0]),
            BlockDef::new("dirt", 3, [0.0, 0.25]),
            BlockDef::new("wood", 4, [0.5, 0.0]),
            BlockDef::new("iron", 5, [0.25, 0.0]),
        ],
    }
}
