//! Cube-sized block buffer used as the materialization target.

use cubicgen_common::{BlockPos, CubePos, StructureBounds, CUBE_SIZE};

/// Block identifier. Zero is air.
pub type BlockId = u16;

/// Sink for materialized structure geometry.
///
/// Writes outside the sink's backing region are silently dropped, which
/// lets structure pieces place blocks without clipping themselves.
pub trait BlockSink {
    /// Sets a block at an absolute position.
    fn set_block(&mut self, pos: BlockPos, block: BlockId);
}

/// A 16³ block buffer anchored at one cube.
#[derive(Debug, Clone)]
pub struct CubeBuffer {
    cube: CubePos,
    blocks: Vec<BlockId>,
    dirty: bool,
}

impl CubeBuffer {
    /// Creates an empty (all-air) buffer for a cube.
    #[must_use]
    pub fn new(cube: CubePos) -> Self {
        let volume = (CUBE_SIZE * CUBE_SIZE * CUBE_SIZE) as usize;
        Self {
            cube,
            blocks: vec![0; volume],
            dirty: false,
        }
    }

    /// Returns the cube this buffer covers.
    #[must_use]
    pub const fn cube_pos(&self) -> CubePos {
        self.cube
    }

    /// Returns the block region covered by this buffer.
    #[must_use]
    pub const fn bounds(&self) -> StructureBounds {
        StructureBounds::of_cube(self.cube)
    }

    /// Returns whether any block has been written since creation or the
    /// last [`Self::mark_clean`].
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Gets the block at an absolute position, or `None` outside the cube.
    #[must_use]
    pub fn get_block(&self, pos: BlockPos) -> Option<BlockId> {
        self.index(pos).map(|i| self.blocks[i])
    }

    /// Fills the overlap of `region` and this cube with a block.
    pub fn fill(&mut self, region: &StructureBounds, block: BlockId) {
        let Some(clip) = self.bounds().intersection(region) else {
            return;
        };
        for y in clip.min.y..=clip.max.y {
            for z in clip.min.z..=clip.max.z {
                for x in clip.min.x..=clip.max.x {
                    self.set_block(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    /// Returns the number of non-air blocks.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|&&b| b != 0).count()
    }

    fn index(&self, pos: BlockPos) -> Option<usize> {
        let min = self.cube.min_block();
        let (lx, ly, lz) = (pos.x - min.x, pos.y - min.y, pos.z - min.z);
        let in_range = |v: i32| (0..CUBE_SIZE).contains(&v);
        if in_range(lx) && in_range(ly) && in_range(lz) {
            Some(((ly * CUBE_SIZE + lz) * CUBE_SIZE + lx) as usize)
        } else {
            None
        }
    }
}

impl BlockSink for CubeBuffer {
    fn set_block(&mut self, pos: BlockPos, block: BlockId) {
        if let Some(i) = self.index(pos) {
            self.blocks[i] = block;
            self.dirty = true;
        }
    }
}
