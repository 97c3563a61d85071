//! Raw grid normalisation.
//!
//! The remote API describes cells in three shapes, sometimes mixed in one
//! grid:
//!
//! - `null` for an empty position,
//! - a string token such as `"POLYANET"`, `"RED_SOLOON"` or `"UP_COMETH"`,
//! - a record such as `{"type": 1, "color": "red"}`.
//!
//! [`parse_grid`] turns all of them into [`Cell`]s in row-major order.
//! Unrecognised shapes degrade to [`CellKind::Space`]; the one exception is a
//! bare token that names no kind, which is rejected with
//! [`ParseError::UnknownToken`].

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::types::{Attribute, Cell, CellKind, Color, Direction, Snapshot};

/// A grid exactly as the API returns it.
pub type RawGrid = Vec<Vec<Value>>;

/// Normalise a raw grid into a [`Snapshot`].
pub fn parse_grid(raw: &[Vec<Value>]) -> Result<Snapshot, ParseError> {
    let rows = raw.len();
    let columns = raw.first().map_or(0, Vec::len);
    let mut cells = Vec::with_capacity(rows * columns);

    for (row, line) in raw.iter().enumerate() {
        if line.len() != columns {
            return Err(ParseError::RaggedRow {
                row,
                expected: columns,
                found: line.len(),
            });
        }
        for (column, value) in line.iter().enumerate() {
            cells.push(parse_cell(value, row, column)?);
        }
    }

    Ok(Snapshot::from_cells(rows, columns, cells))
}

/// Normalise a single raw cell value found at `(row, column)`.
pub fn parse_cell(value: &Value, row: usize, column: usize) -> Result<Cell, ParseError> {
    let (kind, attribute) = match value {
        Value::Null => (CellKind::Space, None),
        Value::String(token) => parse_token(token, row, column)?,
        Value::Object(record) if record.contains_key("type") => parse_record(record),
        _ => (CellKind::Space, None),
    };
    Ok(Cell::new(kind, row, column, attribute))
}

fn parse_token(
    token: &str,
    row: usize,
    column: usize,
) -> Result<(CellKind, Option<Attribute>), ParseError> {
    let parts: Vec<&str> = token.split('_').collect();
    if let [modifier, kind_name] = parts.as_slice() {
        return Ok(match *kind_name {
            "SOLOON" => (
                CellKind::Soloon,
                Color::from_name(modifier).map(Attribute::Color),
            ),
            "COMETH" => (
                CellKind::Cometh,
                Direction::from_name(modifier).map(Attribute::Direction),
            ),
            _ => (CellKind::Space, None),
        });
    }

    CellKind::from_name(token)
        .map(|kind| (kind, None))
        .ok_or_else(|| ParseError::UnknownToken {
            row,
            column,
            token: token.to_string(),
        })
}

fn parse_record(record: &Map<String, Value>) -> (CellKind, Option<Attribute>) {
    let kind = record
        .get("type")
        .and_then(Value::as_i64)
        .and_then(CellKind::from_code)
        .unwrap_or(CellKind::Space);

    // `direction` wins when both fields are present.
    let attribute = match (non_empty_str(record, "direction"), non_empty_str(record, "color")) {
        (Some(direction), _) => Direction::from_name(direction).map(Attribute::Direction),
        (None, Some(color)) => Color::from_name(color).map(Attribute::Color),
        (None, None) => None,
    };

    (kind, attribute)
}

fn non_empty_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
