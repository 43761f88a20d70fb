//! Coordinate types for cube (cell) and block positions.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Edge length of one cube in blocks.
pub const CUBE_SIZE: i32 = 16;

/// Absolute block position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct BlockPos {
    /// X coordinate in blocks
    pub x: i32,
    /// Y coordinate in blocks
    pub y: i32,
    /// Z coordinate in blocks
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Cube (cell) coordinate in the coarse placement grid.
///
/// One cube spans [`CUBE_SIZE`] blocks on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct CubePos {
    /// X coordinate in cube space
    pub x: i32,
    /// Y coordinate in cube space
    pub y: i32,
    /// Z coordinate in cube space
    pub z: i32,
}

impl CubePos {
    /// Creates a new cube coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the minimum block corner of this cube.
    #[must_use]
    pub const fn min_block(self) -> BlockPos {
        BlockPos {
            x: self.x * CUBE_SIZE,
            y: self.y * CUBE_SIZE,
            z: self.z * CUBE_SIZE,
        }
    }

    /// Returns the center block of this cube.
    #[must_use]
    pub const fn center_block(self) -> BlockPos {
        BlockPos {
            x: self.x * CUBE_SIZE + CUBE_SIZE / 2,
            y: self.y * CUBE_SIZE + CUBE_SIZE / 2,
            z: self.z * CUBE_SIZE + CUBE_SIZE / 2,
        }
    }

    /// Returns the cube containing the given block position.
    #[must_use]
    pub const fn containing(pos: BlockPos) -> Self {
        Self {
            x: pos.x.div_euclid(CUBE_SIZE),
            y: pos.y.div_euclid(CUBE_SIZE),
            z: pos.z.div_euclid(CUBE_SIZE),
        }
    }

    /// Checks whether this cube sits on the placement stride.
    ///
    /// Cubes not aligned to the stride are never eligible for structure
    /// placement. `spacing` must be positive.
    #[must_use]
    pub const fn is_aligned(self, spacing: i32) -> bool {
        self.x.rem_euclid(spacing) == 0
            && self.y.rem_euclid(spacing) == 0
            && self.z.rem_euclid(spacing) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_and_center_block() {
        let cube = CubePos::new(2, -1, 0);
        assert_eq!(cube.min_block(), BlockPos::new(32, -16, 0));
        assert_eq!(cube.center_block(), BlockPos::new(40, -8, 8));
    }

    #[test]
    fn test_containing_negative_coords() {
        assert_eq!(
            CubePos::containing(BlockPos::new(-1, 0, 31)),
            CubePos::new(-1, 0, 1)
        );
        assert_eq!(
            CubePos::containing(BlockPos::new(-16, -17, 15)),
            CubePos::new(-1, -2, 0)
        );
    }

    #[test]
    fn test_containing_inverse_of_min_block() {
        let cube = CubePos::new(-3, 7, 12);
        assert_eq!(CubePos::containing(cube.min_block()), cube);
        assert_eq!(CubePos::containing(cube.center_block()), cube);
    }

    #[test]
    fn test_is_aligned() {
        assert!(CubePos::new(0, 0, 0).is_aligned(4));
        assert!(CubePos::new(-4, 8, 12).is_aligned(4));
        assert!(!CubePos::new(-4, 8, 13).is_aligned(4));
        assert!(!CubePos::new(2, 0, 0).is_aligned(4));
        // Spacing of one accepts every cube.
        assert!(CubePos::new(5, -7, 3).is_aligned(1));
    }
}
