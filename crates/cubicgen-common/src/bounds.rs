//! Inclusive 3-D axis-aligned bounding volumes for structure placement.

use crate::coords::{BlockPos, CubePos, CUBE_SIZE};
use serde::{Deserialize, Serialize};

/// Inclusive axis-aligned bounding volume in block coordinates.
///
/// Both corners are part of the volume, so a single-block volume has
/// `min == max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureBounds {
    /// Minimum corner (inclusive)
    pub min: BlockPos,
    /// Maximum corner (inclusive)
    pub max: BlockPos,
}

impl StructureBounds {
    /// Creates a bounding volume from an already-ordered pair of corners.
    #[must_use]
    pub const fn new(min: BlockPos, max: BlockPos) -> Self {
        Self { min, max }
    }

    /// Creates a bounding volume from two arbitrary corners, normalizing
    /// the component order.
    #[must_use]
    pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Returns the block region covered by one cube.
    #[must_use]
    pub const fn of_cube(cube: CubePos) -> Self {
        let min = cube.min_block();
        Self {
            min,
            max: BlockPos::new(
                min.x + CUBE_SIZE - 1,
                min.y + CUBE_SIZE - 1,
                min.z + CUBE_SIZE - 1,
            ),
        }
    }

    /// Checks if the volume contains a block position.
    #[must_use]
    pub const fn contains(&self, pos: BlockPos) -> bool {
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }

    /// Checks if this volume intersects another.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Returns the overlap of two volumes, or `None` if they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            min: BlockPos::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: BlockPos::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        })
    }

    /// Grows this volume to cover another.
    pub fn encompass(&mut self, other: &Self) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);
    }

    /// Size along the X axis in blocks.
    #[must_use]
    pub const fn size_x(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    /// Size along the Y axis in blocks.
    #[must_use]
    pub const fn size_y(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    /// Size along the Z axis in blocks.
    #[must_use]
    pub const fn size_z(&self) -> i32 {
        self.max.z - self.min.z + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_contains_is_inclusive() {
        let bounds = StructureBounds::new(BlockPos::new(0, 0, 0), BlockPos::new(15, 15, 15));
        assert!(bounds.contains(BlockPos::new(0, 0, 0)));
        assert!(bounds.contains(BlockPos::new(15, 15, 15)));
        assert!(!bounds.contains(BlockPos::new(16, 0, 0)));
        assert!(!bounds.contains(BlockPos::new(0, -1, 0)));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let bounds = StructureBounds::from_corners(BlockPos::new(10, -5, 3), BlockPos::new(-2, 4, 3));
        assert_eq!(bounds.min, BlockPos::new(-2, -5, 3));
        assert_eq!(bounds.max, BlockPos::new(10, 4, 3));
    }

    #[test]
    fn test_of_cube_spans_sixteen_blocks() {
        let bounds = StructureBounds::of_cube(CubePos::new(-1, 0, 2));
        assert_eq!(bounds.min, BlockPos::new(-16, 0, 32));
        assert_eq!(bounds.max, BlockPos::new(-1, 15, 47));
        assert_eq!(bounds.size_x(), 16);
        assert_eq!(bounds.size_y(), 16);
        assert_eq!(bounds.size_z(), 16);
    }

    #[test]
    fn test_intersects_touching_edges() {
        let a = StructureBounds::new(BlockPos::new(0, 0, 0), BlockPos::new(4, 4, 4));
        let b = StructureBounds::new(BlockPos::new(4, 4, 4), BlockPos::new(8, 8, 8));
        let c = StructureBounds::new(BlockPos::new(5, 0, 0), BlockPos::new(8, 4, 4));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersection_clips_to_overlap() {
        let a = StructureBounds::new(BlockPos::new(0, 0, 0), BlockPos::new(10, 10, 10));
        let b = StructureBounds::new(BlockPos::new(5, -3, 8), BlockPos::new(20, 4, 25));
        let overlap = a.intersection(&b).expect("volumes overlap");
        assert_eq!(overlap.min, BlockPos::new(5, 0, 8));
        assert_eq!(overlap.max, BlockPos::new(10, 4, 10));

        let far = StructureBounds::new(BlockPos::new(100, 0, 0), BlockPos::new(110, 4, 4));
        assert!(a.intersection(&far).is_none());
    }

    #[test]
    fn test_encompass_grows_volume() {
        let mut bounds = StructureBounds::new(BlockPos::new(0, 0, 0), BlockPos::new(4, 4, 4));
        bounds.encompass(&StructureBounds::new(
            BlockPos::new(-2, 1, 3),
            BlockPos::new(2, 9, 3),
        ));
        assert_eq!(bounds.min, BlockPos::new(-2, 0, 0));
        assert_eq!(bounds.max, BlockPos::new(4, 9, 4));
    }

    proptest! {
        #[test]
        fn prop_intersection_contained_in_both(
            ax in -64i32..64, ay in -64i32..64, az in -64i32..64,
            aw in 0i32..32, ah in 0i32..32, ad in 0i32..32,
            bx in -64i32..64, by in -64i32..64, bz in -64i32..64,
            bw in 0i32..32, bh in 0i32..32, bd in 0i32..32,
        ) {
            let a = StructureBounds::new(
                BlockPos::new(ax, ay, az),
                BlockPos::new(ax + aw, ay + ah, az + ad),
            );
            let b = StructureBounds::new(
                BlockPos::new(bx, by, bz),
                BlockPos::new(bx + bw, by + bh, bz + bd),
            );
            if let Some(overlap) = a.intersection(&b) {
                prop_assert!(a.contains(overlap.min) && a.contains(overlap.max));
                prop_assert!(b.contains(overlap.min) && b.contains(overlap.max));
            } else {
                prop_assert!(!a.intersects(&b));
            }
        }
    }
}
