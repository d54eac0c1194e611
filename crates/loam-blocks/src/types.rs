pub type BlockId = u16;

/// One grid cell. Id `0` is always air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
}

impl Block {
    pub const AIR: Block = Block { id: 0 };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self { id }
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        self.id == 0
    }
}

/// Immutable rendering attributes of a non-air block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    /// Offset of the block's tile group in the texture atlas.
    pub uv_offset: [f32; 2],
    pub opaque: bool,
}

impl BlockType {
    #[inline]
    pub fn block(&self) -> Block {
        Block::new(self.id)
    }
}
