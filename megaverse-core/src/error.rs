//! Error types for megaverse-core.

use thiserror::Error;

use crate::types::Coord;

/// Errors raised while normalising a raw grid into a [`crate::Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A bare string token that names no known kind.
    #[error("unknown cell token '{token}' at ({row}, {column})")]
    UnknownToken {
        row: usize,
        column: usize,
        token: String,
    },

    /// A row whose length differs from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Precondition violations detected by [`crate::delta::diff`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The snapshots hold a different number of cells.
    #[error("snapshot shapes differ: current has {current} cells, target has {target}")]
    ShapeMismatch { current: usize, target: usize },

    /// The cells at `index` do not refer to the same grid position.
    #[error("snapshots are not aligned at index {index}: current {current}, target {target}")]
    UnalignedSnapshot {
        index: usize,
        current: Coord,
        target: Coord,
    },
}
