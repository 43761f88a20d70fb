//! Snapshot persistence for structure ledgers.
//!
//! A [`StructureSnapshot`] is the durable form of one structure type's
//! ledger: serialized starts tagged with their originating cell
//! coordinates. [`WorldStorage`] keeps the per-world keyed snapshots in
//! memory and flushes dirty ones to disk atomically.

use cubicgen_common::{CubePos, MagicBytes, SchemaVersion, StructureError, StructureResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One persisted structure start tagged with its cell coordinate.
///
/// Coordinates are optional on purpose: entries written by older or
/// foreign tools may lack them, and such entries are skipped on load
/// rather than failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Cell X coordinate tag
    pub x: Option<i32>,
    /// Cell Y coordinate tag
    pub y: Option<i32>,
    /// Cell Z coordinate tag
    pub z: Option<i32>,
    /// Serialized structure start
    pub payload: Vec<u8>,
}

impl SnapshotEntry {
    /// Creates a fully-tagged entry.
    #[must_use]
    pub fn new(cube: CubePos, payload: Vec<u8>) -> Self {
        Self {
            x: Some(cube.x),
            y: Some(cube.y),
            z: Some(cube.z),
            payload,
        }
    }

    /// Returns the cell coordinate, or `None` if any tag is missing.
    #[must_use]
    pub fn cube_pos(&self) -> Option<CubePos> {
        Some(CubePos::new(self.x?, self.y?, self.z?))
    }
}

/// Durable serialized form of one structure type's ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureSnapshot {
    name: String,
    entries: HashMap<String, SnapshotEntry>,
}

impl StructureSnapshot {
    /// Creates an empty snapshot for a structure type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Returns the structure type name this snapshot belongs to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts or replaces the entry for a cell.
    pub fn write_entry(&mut self, cube: CubePos, payload: Vec<u8>) {
        self.entries
            .insert(Self::key(cube), SnapshotEntry::new(cube, payload));
    }

    /// Inserts a raw entry under an arbitrary key, bypassing coordinate
    /// tagging. Used when ingesting foreign snapshot data.
    pub fn insert_raw(&mut self, key: impl Into<String>, entry: SnapshotEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Iterates over all entries.
    pub fn entries(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.values()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the snapshot has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes to the on-disk format (magic bytes + versioned body).
    pub fn to_bytes(&self) -> StructureResult<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&MagicBytes::SNAPSHOT.0);

        let body = SnapshotFile {
            version: SchemaVersion::SNAPSHOT,
            snapshot: self.clone(),
        };
        let data =
            bincode::serialize(&body).map_err(|e| StructureError::Serialization(e.to_string()))?;
        buffer.extend(data);

        Ok(buffer)
    }

    /// Deserializes from the on-disk format.
    pub fn from_bytes(bytes: &[u8]) -> StructureResult<Self> {
        if bytes.len() < 4 || bytes[0..4] != MagicBytes::SNAPSHOT.0 {
            return Err(StructureError::InvalidFormat);
        }

        let body: SnapshotFile = bincode::deserialize(&bytes[4..])
            .map_err(|e| StructureError::Serialization(e.to_string()))?;

        if !SchemaVersion::SNAPSHOT.can_read(&body.version) {
            return Err(StructureError::VersionMismatch {
                expected: SchemaVersion::SNAPSHOT.to_string(),
                found: body.version.to_string(),
            });
        }

        Ok(body.snapshot)
    }

    fn key(cube: CubePos) -> String {
        format!("{},{},{}", cube.x, cube.y, cube.z)
    }
}

/// Versioned on-disk wrapper.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: SchemaVersion,
    snapshot: StructureSnapshot,
}

struct StoredSnapshot {
    snapshot: StructureSnapshot,
    dirty: bool,
}

/// Per-world keyed snapshot storage.
///
/// Snapshots live in memory once touched; `flush` writes dirty ones to
/// `<dir>/<name>.csn` with an atomic temp-file rename.
pub struct WorldStorage {
    dir: PathBuf,
    snapshots: Mutex<HashMap<String, StoredSnapshot>>,
}

impl WorldStorage {
    /// Creates storage rooted at the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            snapshots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fetches the snapshot for a structure type, loading it from disk
    /// on first access or registering a fresh empty one if absent.
    ///
    /// A freshly-registered snapshot is marked dirty so an empty ledger
    /// still reaches disk on the next flush.
    pub fn get_or_create(&self, name: &str) -> StructureResult<StructureSnapshot> {
        let mut snapshots = self.snapshots.lock();
        if let Some(stored) = snapshots.get(name) {
            return Ok(stored.snapshot.clone());
        }

        let stored = self.load_stored(name)?;
        let snapshot = stored.snapshot.clone();
        snapshots.insert(name.to_string(), stored);
        Ok(snapshot)
    }

    /// Upserts one serialized start into a snapshot and marks it dirty.
    ///
    /// A snapshot not yet in memory is loaded from disk first, so the
    /// first write after reopening a world never clobbers previously
    /// persisted entries.
    pub fn write_entry(&self, name: &str, cube: CubePos, payload: Vec<u8>) -> StructureResult<()> {
        let mut snapshots = self.snapshots.lock();
        let stored = match snapshots.entry(name.to_string()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => vacant.insert(self.load_stored(name)?),
        };
        stored.snapshot.write_entry(cube, payload);
        stored.dirty = true;
        Ok(())
    }

    /// Installs a snapshot directly, replacing any in-memory copy and
    /// marking it dirty. Used for imports and tests.
    pub fn install(&self, snapshot: StructureSnapshot) {
        let mut snapshots = self.snapshots.lock();
        snapshots.insert(
            snapshot.name().to_string(),
            StoredSnapshot {
                snapshot,
                dirty: true,
            },
        );
    }

    /// Checks whether a snapshot is known, in memory or on disk.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.snapshots.lock().contains_key(name) || self.snapshot_path(name).exists()
    }

    /// Writes all dirty snapshots to disk.
    ///
    /// Per-snapshot failures are logged and skipped so one bad write
    /// does not block the rest. Returns the number flushed.
    pub fn flush(&self) -> StructureResult<usize> {
        fs::create_dir_all(&self.dir)?;

        let mut snapshots = self.snapshots.lock();
        let mut flushed = 0;
        for stored in snapshots.values_mut() {
            if !stored.dirty {
                continue;
            }
            match self.write_atomic(&stored.snapshot) {
                Ok(()) => {
                    stored.dirty = false;
                    flushed += 1;
                }
                Err(e) => {
                    warn!("failed to flush snapshot '{}': {e}", stored.snapshot.name());
                }
            }
        }
        info!("flushed {flushed} structure snapshots");
        Ok(flushed)
    }

    /// Reads the on-disk snapshot, or registers a fresh dirty one if
    /// the file does not exist.
    fn load_stored(&self, name: &str) -> StructureResult<StoredSnapshot> {
        let path = self.snapshot_path(name);
        if path.exists() {
            Ok(StoredSnapshot {
                snapshot: StructureSnapshot::from_bytes(&fs::read(&path)?)?,
                dirty: false,
            })
        } else {
            Ok(StoredSnapshot {
                snapshot: StructureSnapshot::new(name),
                dirty: true,
            })
        }
    }

    fn write_atomic(&self, snapshot: &StructureSnapshot) -> StructureResult<()> {
        let bytes = snapshot.to_bytes()?;
        let temp_path = self.temp_path(snapshot.name());
        let final_path = self.snapshot_path(snapshot.name());

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &final_path)?;
        Ok(())
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csn"))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csn.tmp"))
    }
}

impl std::fmt::Debug for WorldStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldStorage")
            .field("dir", &self.dir)
            .field("snapshots", &self.snapshots.lock().len())
            .finish()
    }
}
