//! Domain types for megaverse maps.
//!
//! A map is a rectangular grid of [`Cell`]s. Each cell holds one
//! [`CellKind`] and, for the kinds that need one, an [`Attribute`].
//! All types are serializable via serde so plans can be emitted as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The occupant of one grid position.
///
/// Numeric codes match the remote API: `Space = -1`, `Polyanet = 0`,
/// `Soloon = 1`, `Cometh = 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Space,
    Polyanet,
    Soloon,
    Cometh,
}

impl CellKind {
    /// Every kind, in numeric-code order.
    pub fn all() -> &'static [CellKind] {
        &[
            CellKind::Space,
            CellKind::Polyanet,
            CellKind::Soloon,
            CellKind::Cometh,
        ]
    }

    /// The numeric code the remote API uses for this kind.
    pub fn code(self) -> i64 {
        match self {
            CellKind::Space => -1,
            CellKind::Polyanet => 0,
            CellKind::Soloon => 1,
            CellKind::Cometh => 2,
        }
    }

    /// Inverse of [`CellKind::code`]. Unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.code() == code)
    }

    /// Case-insensitive lookup by name (`"POLYANET"`, `"space"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Space => "space",
            CellKind::Polyanet => "polyanet",
            CellKind::Soloon => "soloon",
            CellKind::Cometh => "cometh",
        }
    }

    pub fn is_space(self) -> bool {
        self == CellKind::Space
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Soloon color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Red,
    Purple,
    White,
}

impl Color {
    pub fn all() -> &'static [Color] {
        &[Color::Blue, Color::Red, Color::Purple, Color::White]
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    /// Lower-cased wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Purple => "purple",
            Color::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cometh direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        &[Direction::Up, Direction::Down, Direction::Right, Direction::Left]
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(name))
    }

    /// Lower-cased wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific attribute carried by a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Color(Color),
    Direction(Direction),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Color(c) => c.fmt(f),
            Attribute::Direction(d) => d.fmt(f),
        }
    }
}

/// The action an operation performs against the remote map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Create,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Create => write!(f, "create"),
            Verb::Delete => write!(f, "delete"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A 0-based grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub column: usize,
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// One grid position and its occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub row: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<Attribute>,
}

impl Cell {
    pub fn new(kind: CellKind, row: usize, column: usize, attribute: Option<Attribute>) -> Self {
        Self {
            kind,
            row,
            column,
            attribute,
        }
    }

    pub fn space(row: usize, column: usize) -> Self {
        Self::new(CellKind::Space, row, column, None)
    }

    pub fn polyanet(row: usize, column: usize) -> Self {
        Self::new(CellKind::Polyanet, row, column, None)
    }

    pub fn soloon(row: usize, column: usize, color: Color) -> Self {
        Self::new(CellKind::Soloon, row, column, Some(Attribute::Color(color)))
    }

    pub fn cometh(row: usize, column: usize, direction: Direction) -> Self {
        Self::new(
            CellKind::Cometh,
            row,
            column,
            Some(Attribute::Direction(direction)),
        )
    }

    pub fn coord(&self) -> Coord {
        Coord {
            row: self.row,
            column: self.column,
        }
    }

    /// The color attribute, if this cell carries one.
    pub fn color(&self) -> Option<Color> {
        match self.attribute {
            Some(Attribute::Color(c)) => Some(c),
            _ => None,
        }
    }

    /// The direction attribute, if this cell carries one.
    pub fn direction(&self) -> Option<Direction> {
        match self.attribute {
            Some(Attribute::Direction(d)) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attribute {
            Some(attr) => write!(f, "{} {}@{}", attr, self.kind, self.coord()),
            None => write!(f, "{}@{}", self.kind, self.coord()),
        }
    }
}

/// Full state of a map at one point in time.
///
/// Cells are stored in row-major order with no gaps. [`crate::delta::diff`]
/// relies on that ordering and checks it pairwise rather than trusting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Snapshot {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Snapshot {
    /// Wrap an already-ordered cell sequence.
    ///
    /// No ordering check happens here; snapshots built from a raw grid go
    /// through [`crate::parse::parse_grid`] instead.
    pub fn from_cells(rows: usize, columns: usize, cells: Vec<Cell>) -> Self {
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Cell at `(row, column)`, if inside the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<&Cell> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    /// Iterate rows as slices.
    pub fn row_slices(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics; a 0-column grid has no cells anyway.
        self.cells.chunks(self.columns.max(1))
    }

    /// Number of cells of `kind`.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// One step of a delta: a verb applied to a fully-described cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub verb: Verb,
    pub cell: Cell,
}

impl Operation {
    pub fn create(cell: Cell) -> Self {
        Self {
            verb: Verb::Create,
            cell,
        }
    }

    pub fn delete(cell: Cell) -> Self {
        Self {
            verb: Verb::Delete,
            cell,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.cell)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
