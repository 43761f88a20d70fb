//! # Cubicgen Common
//!
//! Common types shared across the Cubicgen structure placement crates:
//! - Coordinate types (cube cells and absolute block positions)
//! - Inclusive 3-D bounding volumes
//! - Error types for placement and snapshot persistence
//! - Schema versions and magic bytes for on-disk formats

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod bounds;
pub mod coords;
pub mod error;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bounds::*;
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_round_trip_through_block_space() {
        let cube = CubePos::new(-5, 3, 9);
        let bounds = StructureBounds::of_cube(cube);
        assert!(bounds.contains(cube.center_block()));
        assert_eq!(CubePos::containing(bounds.min), cube);
        assert_eq!(CubePos::containing(bounds.max), cube);
    }

    #[test]
    fn test_snapshot_version_compatibility() {
        let newer_minor = SchemaVersion::new(1, 2, 0);
        let next_major = SchemaVersion::new(2, 0, 0);

        assert!(SchemaVersion::SNAPSHOT.can_read(&newer_minor));
        assert!(!SchemaVersion::SNAPSHOT.can_read(&next_major));
    }
}
