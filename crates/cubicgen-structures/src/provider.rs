//! Capability interface implemented per structure type.

use crate::cube::BlockSink;
use crate::start::{StructureComponent, StructureStart};
use crate::world::WorldContext;
use cubicgen_common::{CubePos, StructureBounds, StructureResult};

/// Per-structure-type callbacks consumed by the feature generator.
///
/// One provider describes one kind of structure: whether a cell can
/// host it, how to lay out a new start there, and how to turn a
/// component into blocks. Providers are shared across worker threads.
pub trait StructureProvider: Send + Sync {
    /// Structure type name; keys the persisted snapshot.
    fn name(&self) -> &str;

    /// Feasibility predicate for a cell.
    ///
    /// Errors are fatal for the cell and surface with full diagnostic
    /// context; they are never retried.
    fn can_spawn_at(&self, ctx: &WorldContext, cube: CubePos) -> StructureResult<bool>;

    /// Builds a new start for a feasible cell.
    ///
    /// A provider may return a start with no components to record a
    /// rejected placement that should not be attempted again.
    fn make_start(
        &self,
        ctx: &WorldContext,
        rng: &mut fastrand::Rng,
        cube: CubePos,
    ) -> StructureResult<StructureStart>;

    /// Materializes one component of a start, restricted to `region`.
    ///
    /// `region` is the intersection of the component's bounding volume
    /// and the area being generated; implementations must not place
    /// blocks outside it.
    fn place(
        &self,
        start: &StructureStart,
        component: &StructureComponent,
        region: &StructureBounds,
        rng: &mut fastrand::Rng,
        sink: &mut dyn BlockSink,
    ) -> StructureResult<()>;
}
