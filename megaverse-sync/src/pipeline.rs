//! Shared reconcile pipeline used by every CLI command.
//!
//! fetch current → fetch goal → parse both → diff → (optionally) submit.

use megaverse_core::{diff, parse_grid, DeltaSummary, Operation, Snapshot};

use crate::api::{MapKind, MegaverseApi};
use crate::config::Config;
use crate::error::{FetchError, SyncError};
use crate::submit::Submitter;

/// Both snapshots and the delta between them.
#[derive(Debug, Clone)]
pub struct Plan {
    pub current: Snapshot,
    pub goal: Snapshot,
    pub operations: Vec<Operation>,
}

impl Plan {
    pub fn summary(&self) -> DeltaSummary {
        DeltaSummary::of(&self.operations)
    }

    pub fn is_converged(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Outcome of [`apply`].
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub plan: Plan,
    /// `false` for a dry run.
    pub submitted: bool,
}

/// Fetch and parse one map.
pub fn fetch_snapshot<A: MegaverseApi>(
    api: &A,
    candidate_id: &str,
    map: MapKind,
) -> Result<Snapshot, FetchError> {
    let raw = api
        .fetch_map(candidate_id, map)
        .map_err(|source| FetchError::Api { map, source })?;
    let snapshot = parse_grid(&raw).map_err(|source| FetchError::Parse { map, source })?;
    tracing::info!(
        "fetched {map} map: {}x{}",
        snapshot.rows(),
        snapshot.columns()
    );
    Ok(snapshot)
}

/// Fetch both maps and compute the delta without submitting anything.
pub fn plan<A: MegaverseApi>(api: &A, config: &Config) -> Result<Plan, SyncError> {
    let current = fetch_snapshot(api, &config.candidate_id, MapKind::Current)?;
    let goal = fetch_snapshot(api, &config.candidate_id, MapKind::Goal)?;
    let operations = diff(&current, &goal)?;

    let summary = DeltaSummary::of(&operations);
    tracing::info!(
        "delta: {} operations ({} create, {} delete)",
        summary.total(),
        summary.creates,
        summary.deletes
    );

    Ok(Plan {
        current,
        goal,
        operations,
    })
}

/// Plan, then submit the delta unless `dry_run`.
pub fn apply<A: MegaverseApi>(
    api: &A,
    config: &Config,
    dry_run: bool,
) -> Result<ApplyOutcome, SyncError> {
    let plan = plan(api, config)?;

    if dry_run {
        tracing::info!("[dry-run] skipping submission");
        return Ok(ApplyOutcome {
            plan,
            submitted: false,
        });
    }

    if plan.is_converged() {
        tracing::info!("current map already matches goal");
    } else {
        Submitter::new(api, config).submit(&plan.operations)?;
    }

    Ok(ApplyOutcome {
        plan,
        submitted: true,
    })
}
