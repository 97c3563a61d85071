//! Megaverse core library: map types, raw-grid parsing, delta computation.
//!
//! - [`types`]: cells, snapshots, operations
//! - [`parse`]: raw API grid → [`Snapshot`]
//! - [`delta`]: two snapshots → ordered [`Operation`] list
//! - [`error`]: [`ParseError`], [`DiffError`]

pub mod delta;
pub mod error;
pub mod parse;
pub mod types;

pub use delta::{diff, DeltaSummary};
pub use error::{DiffError, ParseError};
pub use parse::{parse_grid, RawGrid};
pub use types::{
    Attribute, Cell, CellKind, Color, Coord, Direction, Operation, Snapshot, Verb,
};
