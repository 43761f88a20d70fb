//! Deduplicating structure feature generator.
//!
//! Tracks which structure starts have been placed per cell, keeps
//! placement attempts idempotent, persists sizeable starts through the
//! world's snapshot storage, and answers point-containment queries.
//!
//! All mutating operations serialize on one per-generator lock so the
//! lazy snapshot load happens exactly once, no two threads insert a
//! start for the same cell, and the seeded RNG sequence advances in a
//! deterministic order under contention. Queries take read locks and
//! never observe a partially-inserted start.

use crate::cube::BlockSink;
use crate::provider::StructureProvider;
use crate::start::StructureStart;
use crate::world::WorldContext;
use ahash::RandomState;
use cubicgen_common::{BlockPos, CubePos, StructureBounds, StructureError, StructureResult};
use parking_lot::{RwLock, RwLockReadGuard, RwLockUpgradableReadGuard, RwLockWriteGuard};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Counters describing a generator's current state.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorStats {
    /// Number of starts in the ledger (sizeable or rejected)
    pub starts: usize,
    /// Number of placement-parity RNG draws consumed so far
    pub rng_draws: u64,
    /// Whether the snapshot has been loaded
    pub loaded: bool,
}

struct GeneratorState {
    loaded: bool,
    ledger: HashMap<CubePos, StructureStart, RandomState>,
    rng: fastrand::Rng,
    rng_draws: u64,
}

impl GeneratorState {
    fn new() -> Self {
        Self {
            loaded: false,
            ledger: HashMap::default(),
            rng: fastrand::Rng::with_seed(0),
            rng_draws: 0,
        }
    }

    /// Burns one RNG value and counts it, keeping the seeded sequence
    /// call-count stable no matter how the placement attempt turns out.
    fn consume_draw(&mut self) {
        let _ = self.rng.u32(..);
        self.rng_draws += 1;
    }
}

/// Structure placement ledger for one structure type in one world.
///
/// Generic over a [`StructureProvider`] that supplies the feasibility
/// predicate, the start factory, and component materialization.
pub struct FeatureGenerator<P> {
    provider: P,
    spacing: i32,
    state: RwLock<GeneratorState>,
}

impl<P: StructureProvider> FeatureGenerator<P> {
    /// Creates a generator with the given placement stride.
    ///
    /// Only cells whose coordinates are integer multiples of `spacing`
    /// on every axis are eligible for placement.
    ///
    /// # Panics
    ///
    /// Panics if `spacing` is less than 1.
    #[must_use]
    pub fn new(provider: P, spacing: i32) -> Self {
        assert!(spacing >= 1, "spacing must be at least 1");
        Self {
            provider,
            spacing,
            state: RwLock::new(GeneratorState::new()),
        }
    }

    /// Returns the structure provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the placement stride.
    #[must_use]
    pub const fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Loads the persisted snapshot into the ledger.
    ///
    /// Idempotent: the load runs once per generator instance; repeated
    /// calls are no-ops. Registers a fresh empty snapshot with the
    /// world storage if none exists yet.
    pub fn ensure_loaded(&self, ctx: &WorldContext) -> StructureResult<()> {
        let mut state = self.state.write();
        self.load_locked(ctx, &mut state)
    }

    /// Attempts placement for the cube's cell if it sits on the stride.
    ///
    /// Unaligned cubes are never eligible and return `false` without
    /// touching the ledger or the RNG.
    pub fn generate(&self, ctx: &WorldContext, cube: CubePos) -> StructureResult<bool> {
        if !cube.is_aligned(self.spacing) {
            return Ok(false);
        }
        self.try_generate(ctx, cube)
    }

    /// Attempts to place a structure start for a cell.
    ///
    /// A cell already present in the ledger is a no-op (duplicate
    /// attempts are expected, not an error). Otherwise one RNG value is
    /// drawn before the feasibility check regardless of outcome, and on
    /// a feasible cell the provider builds a start that is recorded
    /// unconditionally and persisted iff sizeable.
    ///
    /// Returns whether a new start was recorded.
    pub fn try_generate(&self, ctx: &WorldContext, cell: CubePos) -> StructureResult<bool> {
        let mut guard = self.state.write();
        self.load_locked(ctx, &mut guard)?;

        if guard.ledger.contains_key(&cell) {
            return Ok(false);
        }

        // Draw-then-check order is load-bearing: worlds generated by
        // earlier versions depend on the RNG call-count parity.
        guard.consume_draw();

        let feasible = match self.provider.can_spawn_at(ctx, cell) {
            Ok(feasible) => feasible,
            Err(e) => return Err(self.preparation_error(cell, "unknown", &e)),
        };
        if !feasible {
            return Ok(false);
        }

        let state = &mut *guard;
        let start = match self.provider.make_start(ctx, &mut state.rng, cell) {
            Ok(start) => start,
            Err(e) => return Err(self.preparation_error(cell, "true", &e)),
        };

        // Serialize before inserting so a codec failure leaves the
        // ledger untouched.
        let payload = if start.is_sizeable() {
            Some(
                bincode::serialize(&start)
                    .map_err(|e| StructureError::Serialization(e.to_string()))?,
            )
        } else {
            None
        };

        state.ledger.insert(cell, start);
        if let Some(payload) = payload {
            ctx.storage().write_entry(self.provider.name(), cell, payload)?;
        }
        Ok(true)
    }

    /// Materializes every sizeable start intersecting the cube's region
    /// that has not yet been post-processed for that cube.
    ///
    /// Each intersecting component is placed clipped to the overlap,
    /// the cube is marked processed on the start (sticky), and the
    /// start is re-persisted. Returns whether anything materialized.
    pub fn materialize_intersecting(
        &self,
        ctx: &WorldContext,
        rng: &mut fastrand::Rng,
        cube: CubePos,
        sink: &mut dyn BlockSink,
    ) -> StructureResult<bool> {
        let mut guard = self.state.write();
        self.load_locked(ctx, &mut guard)?;

        let region = StructureBounds::of_cube(cube);
        let mut generated = false;
        let state = &mut *guard;
        for (cell, start) in &mut state.ledger {
            if !start.is_sizeable()
                || start.is_processed(cube)
                || !start.bounds().intersects(&region)
            {
                continue;
            }

            for i in 0..start.components().len() {
                let start_ref: &StructureStart = start;
                let component = &start_ref.components()[i];
                if let Some(clip) = component.bounds.intersection(&region) {
                    self.provider.place(start_ref, component, &clip, rng, sink)?;
                }
            }

            start.mark_processed(cube);
            generated = true;
            let payload = bincode::serialize(&*start)
                .map_err(|e| StructureError::Serialization(e.to_string()))?;
            ctx.storage().write_entry(self.provider.name(), *cell, payload)?;
        }
        Ok(generated)
    }

    /// Checks whether a point lies inside any placed structure, with
    /// component-level precision.
    pub fn is_inside_any_structure(
        &self,
        ctx: &WorldContext,
        point: BlockPos,
    ) -> StructureResult<bool> {
        Ok(self.find_structure_at(ctx, point)?.is_some())
    }

    /// Returns the start owning a point, if any.
    ///
    /// A hit requires the point inside the aggregate bounding volume
    /// and inside at least one component volume.
    pub fn find_structure_at(
        &self,
        ctx: &WorldContext,
        point: BlockPos,
    ) -> StructureResult<Option<StructureStart>> {
        let state = self.loaded_read(ctx)?;
        Ok(state.ledger.values().find(|s| s.contains(point)).cloned())
    }

    /// Coarse containment test against aggregate bounding volumes only.
    pub fn is_inside_structure_bounds(
        &self,
        ctx: &WorldContext,
        point: BlockPos,
    ) -> StructureResult<bool> {
        let state = self.loaded_read(ctx)?;
        Ok(state.ledger.values().any(|s| s.bounds_contain(point)))
    }

    /// Returns a copy of every start currently in the ledger.
    #[must_use]
    pub fn starts(&self) -> Vec<StructureStart> {
        self.state.read().ledger.values().cloned().collect()
    }

    /// Returns current generator counters.
    #[must_use]
    pub fn stats(&self) -> GeneratorStats {
        let state = self.state.read();
        GeneratorStats {
            starts: state.ledger.len(),
            rng_draws: state.rng_draws,
            loaded: state.loaded,
        }
    }

    fn load_locked(&self, ctx: &WorldContext, state: &mut GeneratorState) -> StructureResult<()> {
        if state.loaded {
            return Ok(());
        }

        state.rng = fastrand::Rng::with_seed(ctx.seed());
        let snapshot = ctx.storage().get_or_create(self.provider.name())?;
        let mut restored = 0usize;
        for entry in snapshot.entries() {
            let Some(cube) = entry.cube_pos() else {
                warn!(
                    "skipping '{}' snapshot entry without cell coordinate tags",
                    self.provider.name()
                );
                continue;
            };
            match bincode::deserialize::<StructureStart>(&entry.payload) {
                Ok(start) => {
                    state.ledger.insert(cube, start);
                    restored += 1;
                }
                Err(e) => {
                    warn!(
                        "skipping undecodable '{}' snapshot entry at ({}, {}, {}): {e}",
                        self.provider.name(),
                        cube.x,
                        cube.y,
                        cube.z
                    );
                }
            }
        }
        state.loaded = true;
        debug!(
            "loaded structure ledger '{}': {restored} starts",
            self.provider.name()
        );
        Ok(())
    }

    /// Read access that lazily loads the snapshot on first use.
    fn loaded_read<'a>(
        &'a self,
        ctx: &WorldContext,
    ) -> StructureResult<RwLockReadGuard<'a, GeneratorState>> {
        let guard = self.state.upgradable_read();
        if guard.loaded {
            return Ok(RwLockUpgradableReadGuard::downgrade(guard));
        }
        let mut write = RwLockUpgradableReadGuard::upgrade(guard);
        self.load_locked(ctx, &mut write)?;
        Ok(RwLockWriteGuard::downgrade(write))
    }

    fn preparation_error(
        &self,
        cell: CubePos,
        feasible: &str,
        source: &StructureError,
    ) -> StructureError {
        StructureError::Preparation {
            structure: self.provider.name().to_string(),
            x: cell.x,
            y: cell.y,
            z: cell.z,
            feasible: feasible.to_string(),
            detail: source.to_string(),
        }
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for FeatureGenerator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureGenerator")
            .field("provider", &self.provider)
            .field("spacing", &self.spacing)
            .finish_non_exhaustive()
    }
}
