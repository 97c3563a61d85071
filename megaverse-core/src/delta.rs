//! Delta computation between two snapshots.
//!
//! `diff(current, target)` walks both snapshots by index and emits the
//! operations that turn `current` into `target`:
//!
//! 1. Kinds equal → nothing (attributes are not compared).
//! 2. `current` occupied → `Delete` the current cell.
//! 3. `target` occupied → `Create` the target cell.
//!
//! Within a position the delete always precedes the create, and positions are
//! visited in row-major order.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::DiffError;
use crate::types::{CellKind, Operation, Snapshot, Verb};

/// Compute the ordered operation list that reconciles `current` with `target`.
pub fn diff(current: &Snapshot, target: &Snapshot) -> Result<Vec<Operation>, DiffError> {
    if current.len() != target.len() {
        return Err(DiffError::ShapeMismatch {
            current: current.len(),
            target: target.len(),
        });
    }

    let mut delta = Vec::new();
    for (index, (now, want)) in current.iter().zip(target.iter()).enumerate() {
        if now.coord() != want.coord() {
            return Err(DiffError::UnalignedSnapshot {
                index,
                current: now.coord(),
                target: want.coord(),
            });
        }

        if now.kind == want.kind {
            continue;
        }
        if !now.kind.is_space() {
            delta.push(Operation::delete(*now));
        }
        if !want.kind.is_space() {
            delta.push(Operation::create(*want));
        }
    }

    Ok(delta)
}

/// Per-kind create/delete counts for a delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeltaSummary {
    pub creates: usize,
    pub deletes: usize,
    pub by_kind: BTreeMap<String, KindCounts>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub creates: usize,
    pub deletes: usize,
}

impl DeltaSummary {
    pub fn of(operations: &[Operation]) -> Self {
        let mut summary = Self::default();
        for op in operations {
            let entry = summary
                .by_kind
                .entry(op.cell.kind.to_string())
                .or_default();
            match op.verb {
                Verb::Create => {
                    summary.creates += 1;
                    entry.creates += 1;
                }
                Verb::Delete => {
                    summary.deletes += 1;
                    entry.deletes += 1;
                }
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.creates + self.deletes
    }

    pub fn for_kind(&self, kind: CellKind) -> KindCounts {
        self.by_kind
            .get(kind.as_str())
            .copied()
            .unwrap_or_default()
    }
}
