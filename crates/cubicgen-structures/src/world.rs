//! Per-world generation context.

use crate::snapshot::WorldStorage;
use std::path::PathBuf;

/// Explicit per-world context passed to every generation call.
///
/// Owns the seed and the keyed snapshot storage for one world or
/// session; dropped when the world unloads. Replaces any notion of
/// process-global per-world state.
#[derive(Debug)]
pub struct WorldContext {
    seed: u64,
    storage: WorldStorage,
}

impl WorldContext {
    /// Creates a context for a world with the given seed, persisting
    /// snapshots under `save_dir`.
    #[must_use]
    pub fn new(seed: u64, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            seed,
            storage: WorldStorage::new(save_dir),
        }
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the keyed snapshot storage.
    #[must_use]
    pub const fn storage(&self) -> &WorldStorage {
        &self.storage
    }
}
