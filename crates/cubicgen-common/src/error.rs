//! Error types for Cubicgen structure placement.

use thiserror::Error;

/// Top-level error type for structure placement operations.
#[derive(Debug, Error)]
pub enum StructureError {
    /// Feasibility check or start construction failed for a cell.
    ///
    /// Fatal for the triggering cell; carries the full diagnostic
    /// context. The ledger is left untouched.
    #[error(
        "preparing structure '{structure}' at cell ({x}, {y}, {z}) failed \
         (feasible: {feasible}): {detail}"
    )]
    Preparation {
        /// Structure type name
        structure: String,
        /// Cell X coordinate
        x: i32,
        /// Cell Y coordinate
        y: i32,
        /// Cell Z coordinate
        z: i32,
        /// Outcome of the feasibility check, if it ran
        feasible: String,
        /// Underlying failure description
        detail: String,
    },

    /// Error surfaced by a structure provider callback.
    #[error("structure provider error: {0}")]
    Provider(String),

    /// IO error while reading or writing a snapshot.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failed.
    #[error("snapshot serialization error: {0}")]
    Serialization(String),

    /// Snapshot file did not carry the expected magic bytes.
    #[error("invalid snapshot format")]
    InvalidFormat,

    /// Snapshot schema version cannot be read by this build.
    #[error("incompatible snapshot version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build writes
        expected: String,
        /// Version found on disk
        found: String,
    },
}

/// Result type alias for structure placement operations.
pub type StructureResult<T> = Result<T, StructureError>;
