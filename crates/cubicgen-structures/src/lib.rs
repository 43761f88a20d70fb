//! # Cubicgen Structures
//!
//! Structure placement ledger for cube-based world generation.
//!
//! This crate decides, per spatial cell, whether a structure should be
//! generated there, guarantees no two structures are ever placed for
//! the same cell, persists placed starts across sessions, and answers
//! point-containment queries:
//! - Structure starts and components with 3-D bounding volumes
//! - Provider capability trait implemented per structure type
//! - Per-world keyed snapshot storage with atomic flushes
//! - Deduplicating feature generator safe for parallel worker threads
//! - Cube-sized block buffer as the materialization target

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cube;
pub mod generator;
pub mod provider;
pub mod snapshot;
pub mod start;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cube::*;
    pub use crate::generator::*;
    pub use crate::provider::*;
    pub use crate::snapshot::*;
    pub use crate::start::*;
    pub use crate::world::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use cubicgen_common::{CubePos, StructureBounds};

    #[test]
    fn test_start_survives_snapshot_payload_round_trip() {
        let cube = CubePos::new(-2, 5, 1);
        let start = StructureStart::new(
            cube,
            vec![StructureComponent::new(3, StructureBounds::of_cube(cube))],
        );

        let payload = bincode::serialize(&start).expect("serialize");
        let mut snapshot = StructureSnapshot::new("gatehouse");
        snapshot.write_entry(cube, payload);

        let entry = snapshot.entries().next().expect("entry present");
        assert_eq!(entry.cube_pos(), Some(cube));
        let restored: StructureStart =
            bincode::deserialize(&entry.payload).expect("deserialize");
        assert_eq!(restored.cube_pos(), cube);
        assert_eq!(restored.components(), start.components());
        assert!(restored.is_sizeable());
    }
}
