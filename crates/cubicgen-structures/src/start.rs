//! Structure starts and their sub-components.
//!
//! A [`StructureStart`] records one placed (or rejected) structure
//! instance: its originating cell, the aggregate bounding volume of its
//! components, and per-region post-processing bookkeeping. Starts are
//! the unit of persistence in a structure snapshot.

use cubicgen_common::{BlockPos, CubePos, StructureBounds};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One sub-piece of a structure with its own bounding volume.
///
/// `kind` is opaque to the ledger; providers use it to pick the
/// geometry to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureComponent {
    /// Provider-defined component kind
    pub kind: u32,
    /// Bounding volume of this component
    pub bounds: StructureBounds,
}

impl StructureComponent {
    /// Creates a new component.
    #[must_use]
    pub const fn new(kind: u32, bounds: StructureBounds) -> Self {
        Self { kind, bounds }
    }
}

/// Record of one structure instance keyed by its originating cell.
///
/// A start with no components is a rejected placement: it stays in the
/// ledger to short-circuit repeated generation attempts but never
/// materializes geometry and never answers containment queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureStart {
    cube: CubePos,
    bounds: StructureBounds,
    sizeable: bool,
    components: Vec<StructureComponent>,
    processed: HashSet<CubePos>,
}

impl StructureStart {
    /// Creates a start from its components.
    ///
    /// The aggregate bounding volume is the union of the component
    /// volumes; an empty component list yields a non-sizeable start.
    #[must_use]
    pub fn new(cube: CubePos, components: Vec<StructureComponent>) -> Self {
        let bounds = match components.split_first() {
            Some((first, rest)) => {
                let mut bounds = first.bounds;
                for component in rest {
                    bounds.encompass(&component.bounds);
                }
                bounds
            }
            None => StructureBounds::new(cube.min_block(), cube.min_block()),
        };
        Self {
            cube,
            bounds,
            sizeable: !components.is_empty(),
            components,
            processed: HashSet::new(),
        }
    }

    /// Creates a rejected (non-sizeable) start for a cell.
    #[must_use]
    pub fn rejected(cube: CubePos) -> Self {
        Self::new(cube, Vec::new())
    }

    /// Returns the originating cell of this start.
    #[must_use]
    pub const fn cube_pos(&self) -> CubePos {
        self.cube
    }

    /// Returns the aggregate bounding volume.
    #[must_use]
    pub const fn bounds(&self) -> &StructureBounds {
        &self.bounds
    }

    /// Returns whether this start materializes geometry.
    #[must_use]
    pub const fn is_sizeable(&self) -> bool {
        self.sizeable
    }

    /// Returns the structure components.
    #[must_use]
    pub fn components(&self) -> &[StructureComponent] {
        &self.components
    }

    /// Component-precise containment test.
    ///
    /// The aggregate volume alone is not enough: component volumes are
    /// typically smaller than their union, so a hit requires both.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.sizeable
            && self.bounds.contains(pos)
            && self.components.iter().any(|c| c.bounds.contains(pos))
    }

    /// Coarse containment test against the aggregate volume only.
    #[must_use]
    pub fn bounds_contain(&self, pos: BlockPos) -> bool {
        self.sizeable && self.bounds.contains(pos)
    }

    /// Checks whether this start has already been post-processed for a
    /// region cube.
    #[must_use]
    pub fn is_processed(&self, region: CubePos) -> bool {
        self.processed.contains(&region)
    }

    /// Marks a region cube as post-processed. Sticky: once marked, a
    /// region is never materialized again for this start.
    pub fn mark_processed(&mut self, region: CubePos) {
        self.processed.insert(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn box_at(x: i32, y: i32, z: i32, size: i32) -> StructureBounds {
        StructureBounds::new(
            BlockPos::new(x, y, z),
            BlockPos::new(x + size - 1, y + size - 1, z + size - 1),
        )
    }

    #[test]
    fn test_aggregate_bounds_is_component_union() {
        let start = StructureStart::new(
            CubePos::new(0, 0, 0),
            vec![
                StructureComponent::new(1, box_at(0, 0, 0, 4)),
                StructureComponent::new(2, box_at(10, 2, -6, 4)),
            ],
        );
        assert_eq!(start.bounds().min, BlockPos::new(0, 0, -6));
        assert_eq!(start.bounds().max, BlockPos::new(13, 5, 3));
        assert!(start.is_sizeable());
    }

    #[test]
    fn test_rejected_start_is_not_sizeable() {
        let start = StructureStart::rejected(CubePos::new(3, -2, 1));
        assert!(!start.is_sizeable());
        assert!(start.components().is_empty());
        // Rejected starts never answer containment, even at their own cell.
        assert!(!start.contains(CubePos::new(3, -2, 1).min_block()));
        assert!(!start.bounds_contain(CubePos::new(3, -2, 1).min_block()));
    }

    #[test]
    fn test_contains_requires_component_hit() {
        // Two corner pieces leave a gap in the middle of the aggregate volume.
        let start = StructureStart::new(
            CubePos::new(0, 0, 0),
            vec![
                StructureComponent::new(1, box_at(0, 0, 0, 4)),
                StructureComponent::new(2, box_at(12, 0, 12, 4)),
            ],
        );
        let gap = BlockPos::new(8, 0, 8);
        assert!(start.bounds().contains(gap));
        assert!(start.bounds_contain(gap));
        assert!(!start.contains(gap));

        let inside = BlockPos::new(1, 1, 1);
        assert!(start.contains(inside));
    }

    #[test]
    fn test_processed_marking_is_sticky() {
        let mut start = StructureStart::new(
            CubePos::new(0, 0, 0),
            vec![StructureComponent::new(1, box_at(0, 0, 0, 8))],
        );
        let region = CubePos::new(0, 0, 0);
        assert!(!start.is_processed(region));
        start.mark_processed(region);
        assert!(start.is_processed(region));
        start.mark_processed(region);
        assert!(start.is_processed(region));
        assert!(!start.is_processed(CubePos::new(1, 0, 0)));
    }

    proptest! {
        #[test]
        fn prop_containment_matches_component_scan(
            cx in -32i32..32, cy in -32i32..32, cz in -32i32..32,
            sizes in proptest::collection::vec((1i32..12, -40i32..40, -40i32..40, -40i32..40), 1..6),
            px in -64i32..64, py in -64i32..64, pz in -64i32..64,
        ) {
            let components: Vec<_> = sizes
                .iter()
                .enumerate()
                .map(|(i, &(s, x, y, z))| {
                    StructureComponent::new(i as u32, StructureBounds::new(
                        BlockPos::new(x, y, z),
                        BlockPos::new(x + s - 1, y + s - 1, z + s - 1),
                    ))
                })
                .collect();
            let start = StructureStart::new(CubePos::new(cx, cy, cz), components.clone());
            let point = BlockPos::new(px, py, pz);

            let component_hit = components.iter().any(|c| c.bounds.contains(point));
            prop_assert_eq!(start.contains(point), component_hit);
            // Every component hit is also an aggregate-bounds hit.
            if component_hit {
                prop_assert!(start.bounds_contain(point));
            }
        }
    }
}
