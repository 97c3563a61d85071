//! Pipeline tests against an in-memory remote.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use megaverse_core::{Cell, CellKind, Color, DiffError, ParseError, RawGrid, Verb};
use megaverse_sync::{
    api::EntityRequest, apply, pipeline, plan, ApiError, Config, Endpoint, FetchError, MapKind,
    MegaverseApi, SubmitError, SyncError,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Fake remote
// ---------------------------------------------------------------------------

struct FakeRemote {
    current: Result<RawGrid, ApiError>,
    goal: Result<RawGrid, ApiError>,
    send_script: RefCell<VecDeque<Result<(), ApiError>>>,
    sent: RefCell<Vec<(Verb, EntityRequest)>>,
}

impl FakeRemote {
    fn new(current: serde_json::Value, goal: serde_json::Value) -> Self {
        Self {
            current: Ok(serde_json::from_value(current).expect("current fixture")),
            goal: Ok(serde_json::from_value(goal).expect("goal fixture")),
            send_script: RefCell::default(),
            sent: RefCell::default(),
        }
    }

    fn script(self, responses: Vec<Result<(), ApiError>>) -> Self {
        *self.send_script.borrow_mut() = responses.into();
        self
    }
}

impl MegaverseApi for FakeRemote {
    fn fetch_map(&self, candidate_id: &str, map: MapKind) -> Result<RawGrid, ApiError> {
        assert_eq!(candidate_id, "cand-1");
        match map {
            MapKind::Current => self.current.clone(),
            MapKind::Goal => self.goal.clone(),
        }
    }

    fn send(&self, verb: Verb, request: &EntityRequest) -> Result<(), ApiError> {
        self.sent.borrow_mut().push((verb, request.clone()));
        self.send_script.borrow_mut().pop_front().unwrap_or(Ok(()))
    }
}

fn config() -> Config {
    Config::new("cand-1").with_retry_delay(Duration::ZERO)
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[test]
fn plan_reports_delta_without_sending() {
    let remote = FakeRemote::new(
        json!([[null, "POLYANET"], [null, null]]),
        json!([["POLYANET", null], [null, "BLUE_SOLOON"]]),
    );

    let plan = plan(&remote, &config()).expect("plan");

    assert_eq!(plan.operations.len(), 3);
    assert_eq!(plan.summary().creates, 2);
    assert_eq!(plan.summary().deletes, 1);
    assert_eq!(plan.goal.count(CellKind::Soloon), 1);
    assert!(remote.sent.borrow().is_empty());
}

#[test]
fn dry_run_apply_sends_nothing() {
    let remote = FakeRemote::new(json!([[null]]), json!([["POLYANET"]]));

    let outcome = apply(&remote, &config(), true).expect("apply");

    assert!(!outcome.submitted);
    assert_eq!(outcome.plan.operations.len(), 1);
    assert!(remote.sent.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

#[test]
fn apply_submits_in_delta_order_through_rate_limits() {
    let remote = FakeRemote::new(
        json!([["RED_SOLOON", null]]),
        json!([["UP_COMETH", "POLYANET"]]),
    )
    .script(vec![Ok(()), Err(ApiError::RateLimited), Ok(()), Ok(())]);

    let outcome = apply(&remote, &config(), false).expect("apply");
    assert!(outcome.submitted);

    let sent = remote.sent.borrow();
    let trail: Vec<(Verb, Endpoint, usize)> = sent
        .iter()
        .map(|(verb, req)| (*verb, req.endpoint, req.body.column))
        .collect();
    assert_eq!(
        trail,
        vec![
            (Verb::Delete, Endpoint::Soloons, 0),
            (Verb::Create, Endpoint::Comeths, 0),
            (Verb::Create, Endpoint::Comeths, 0),
            (Verb::Create, Endpoint::Polyanets, 1),
        ]
    );
    assert_eq!(sent[0].1.body.color, Some(Color::Red));
    assert!(sent.iter().all(|(_, req)| req.body.candidate_id == "cand-1"));
}

#[test]
fn converged_maps_send_nothing() {
    let grid = json!([[null, "POLYANET"], ["LEFT_COMETH", null]]);
    let remote = FakeRemote::new(grid.clone(), grid);

    let outcome = apply(&remote, &config(), false).expect("apply");

    assert!(outcome.plan.is_converged());
    assert!(remote.sent.borrow().is_empty());
}

#[test]
fn submit_failure_surfaces_verbatim() {
    let remote = FakeRemote::new(json!([[null, null]]), json!([["POLYANET", "POLYANET"]]))
        .script(vec![Err(ApiError::Application("row out of range".to_string()))]);

    let err = apply(&remote, &config(), false).unwrap_err();

    match err {
        SyncError::Submit(SubmitError::Api {
            index,
            operation,
            source,
        }) => {
            assert_eq!(index, 0);
            assert_eq!(operation.cell, Cell::polyanet(0, 0));
            assert_eq!(source, ApiError::Application("row out of range".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(remote.sent.borrow().len(), 1);
}

// ---------------------------------------------------------------------------
// Fetch and diff failures
// ---------------------------------------------------------------------------

#[test]
fn fetch_failure_names_the_map() {
    let mut remote = FakeRemote::new(json!([[null]]), json!([[null]]));
    remote.goal = Err(ApiError::Status {
        code: 404,
        body: "unknown candidate".to_string(),
    });

    let err = plan(&remote, &config()).unwrap_err();
    assert!(matches!(
        err,
        SyncError::Fetch(FetchError::Api {
            map: MapKind::Goal,
            ..
        })
    ));
    assert!(err.to_string().contains("goal map"));
}

#[test]
fn unknown_token_is_a_fetch_parse_failure() {
    let remote = FakeRemote::new(json!([["WORMHOLE"]]), json!([[null]]));

    let err = pipeline::fetch_snapshot(&remote, "cand-1", MapKind::Current).unwrap_err();
    assert!(matches!(
        err,
        FetchError::Parse {
            map: MapKind::Current,
            source: ParseError::UnknownToken { .. },
        }
    ));
}

#[test]
fn differently_sized_maps_fail_to_diff() {
    let remote = FakeRemote::new(json!([[null, null]]), json!([[null], [null], [null]]));

    let err = plan(&remote, &config()).unwrap_err();
    assert_eq!(
        err,
        SyncError::Diff(DiffError::ShapeMismatch {
            current: 2,
            target: 3
        })
    );
}
