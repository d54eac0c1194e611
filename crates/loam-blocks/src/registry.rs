use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::{BlocksConfig, builtin_blocks};
use crate::error::RegistryError;
use crate::types::{Block, BlockId, BlockType};

/// Read-only catalog from block id to descriptor.
///
/// Slot 0 is air and never resolves to a descriptor. Built once at startup and
/// shared behind an `Arc`.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    blocks: Vec<Option<BlockType>>,
    by_name: HashMap<String, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BlockRegistry {
    /// Registry holding only air.
    pub fn empty() -> Self {
        Self {
            blocks: vec![None],
            by_name: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        // The built-in table has unique, non-zero ids.
        match Self::from_config(builtin_blocks()) {
            Ok(reg) => reg,
            Err(_) => Self::empty(),
        }
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = Self::empty();
        let mut next_id: BlockId = 1;
        for def in cfg.blocks {
            if def.name == "air" {
                return Err(RegistryError::ReservedAirName { name: def.name });
            }
            let id = def.id.unwrap_or(next_id);
            if id == 0 {
                return Err(RegistryError::ReservedAirId { name: def.name });
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(RegistryError::DuplicateName(def.name));
            }
            let slot = id as usize;
            if reg.blocks.len() <= slot {
                reg.blocks.resize(slot + 1, None);
            }
            if let Some(existing) = &reg.blocks[slot] {
                return Err(RegistryError::DuplicateId {
                    id,
                    first: existing.name.clone(),
                    second: def.name,
                });
            }
            reg.by_name.insert(def.name.clone(), id);
            reg.blocks[slot] = Some(BlockType {
                id,
                name: def.name,
                uv_offset: def.uv_offset,
                opaque: def.opaque.unwrap_or(true),
            });
            next_id = id.saturating_add(1);
        }
        Ok(reg)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Descriptor for `id`; always `None` for air and for unassigned ids.
    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).and_then(Option::as_ref)
    }

    #[inline]
    pub fn contains(&self, block: Block) -> bool {
        block.is_air() || self.get(block.id).is_some()
    }

    /// True when `block` hides the faces of cells touching it.
    #[inline]
    pub fn occludes(&self, block: Block) -> bool {
        self.get(block.id).is_some_and(|ty| ty.opaque)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        if name == "air" {
            return Some(0);
        }
        self.by_name.get(name).copied()
    }

    /// Like [`id_by_name`](Self::id_by_name) but reports the missing name.
    pub fn require(&self, name: &str) -> Result<Block, RegistryError> {
        self.id_by_name(name)
            .map(Block::new)
            .ok_or_else(|| RegistryError::UnknownBlock(name.to_string()))
    }

    /// Every non-air block, in id order.
    pub fn placeable(&self) -> Vec<Block> {
        self.iter().map(BlockType::block).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
