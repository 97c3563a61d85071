//! Remote megaverse API boundary.
//!
//! [`MegaverseApi`] is the seam between the pipeline and the network: the
//! submitter and pipeline only ever talk to the trait, and [`HttpApi`] is the
//! blocking `ureq` implementation used by the binary.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use megaverse_core::{Cell, CellKind, Color, Direction, RawGrid, Verb};

use crate::config::Config;
use crate::error::{ApiError, SubmitError};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Which of the two maps to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// The map as it stands on the remote.
    Current,
    /// The map the remote wants us to reach.
    Goal,
}

impl MapKind {
    pub fn path(self, candidate_id: &str) -> String {
        match self {
            MapKind::Current => format!("map/{candidate_id}"),
            MapKind::Goal => format!("map/{candidate_id}/goal"),
        }
    }

    /// Pull the raw grid out of a response body.
    fn extract(self, mut body: Value) -> Result<RawGrid, ApiError> {
        let (grid, pointer) = match self {
            MapKind::Current => (body.pointer_mut("/map/content"), "map.content"),
            MapKind::Goal => (body.pointer_mut("/goal"), "goal"),
        };
        let grid = grid
            .map(Value::take)
            .ok_or_else(|| ApiError::Decode(format!("response has no `{pointer}` field")))?;
        serde_json::from_value(grid)
            .map_err(|e| ApiError::Decode(format!("`{pointer}` is not a 2-D array: {e}")))
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::Current => write!(f, "current"),
            MapKind::Goal => write!(f, "goal"),
        }
    }
}

/// Resource collection addressed by a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Polyanets,
    Soloons,
    Comeths,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Polyanets => "polyanets",
            Endpoint::Soloons => "soloons",
            Endpoint::Comeths => "comeths",
        }
    }
}

/// JSON body sent to an entity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityBody {
    pub candidate_id: String,
    pub row: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

/// A fully-encoded entity call, minus the verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRequest {
    pub endpoint: Endpoint,
    pub body: EntityBody,
}

impl EntityRequest {
    /// Encode `cell` for its kind's endpoint.
    pub fn for_cell(candidate_id: &str, cell: &Cell) -> Result<Self, SubmitError> {
        let mut body = EntityBody {
            candidate_id: candidate_id.to_string(),
            row: cell.row,
            column: cell.column,
            color: None,
            direction: None,
        };

        let endpoint = match cell.kind {
            CellKind::Space => return Err(SubmitError::Unsubmittable { cell: *cell }),
            CellKind::Polyanet => Endpoint::Polyanets,
            CellKind::Soloon => {
                body.color = Some(
                    cell.color()
                        .ok_or(SubmitError::MissingAttribute { cell: *cell })?,
                );
                Endpoint::Soloons
            }
            CellKind::Cometh => {
                body.direction = Some(
                    cell.direction()
                        .ok_or(SubmitError::MissingAttribute { cell: *cell })?,
                );
                Endpoint::Comeths
            }
        };

        Ok(Self { endpoint, body })
    }
}

/// HTTP method for a verb.
pub fn method(verb: Verb) -> &'static str {
    match verb {
        Verb::Create => "POST",
        Verb::Delete => "DELETE",
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The two calls the reconciler makes against the remote.
pub trait MegaverseApi {
    /// Fetch one map as a raw grid.
    fn fetch_map(&self, candidate_id: &str, map: MapKind) -> Result<RawGrid, ApiError>;

    /// Perform a single create or delete. Must report HTTP 429 as
    /// [`ApiError::RateLimited`].
    fn send(&self, verb: Verb, request: &EntityRequest) -> Result<(), ApiError>;
}

impl<T: MegaverseApi + ?Sized> MegaverseApi for &T {
    fn fetch_map(&self, candidate_id: &str, map: MapKind) -> Result<RawGrid, ApiError> {
        (**self).fetch_map(candidate_id, map)
    }

    fn send(&self, verb: Verb, request: &EntityRequest) -> Result<(), ApiError> {
        (**self).send(verb, request)
    }
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Blocking HTTP client for the megaverse API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    config: Config,
    http: ureq::Agent,
}

impl HttpApi {
    pub fn new(config: &Config) -> Self {
        let http = ureq::AgentBuilder::new()
            .timeout_read(config.timeout)
            .timeout_write(config.timeout)
            .timeout_connect(config.timeout)
            .build();
        Self {
            config: config.clone(),
            http,
        }
    }
}

impl MegaverseApi for HttpApi {
    fn fetch_map(&self, candidate_id: &str, map: MapKind) -> Result<RawGrid, ApiError> {
        let url = self.config.url(&map.path(candidate_id));
        tracing::debug!("GET {url}");
        let body = read_body(self.http.get(&url).call())?;
        check_declared_error(&body)?;
        map.extract(body)
    }

    fn send(&self, verb: Verb, request: &EntityRequest) -> Result<(), ApiError> {
        let url = self.config.url(request.endpoint.path());
        tracing::debug!("{} {url} {:?}", method(verb), request.body);
        let body = read_body(
            self.http
                .request(method(verb), &url)
                .set("Content-Type", "application/json")
                .send_json(&request.body),
        )?;
        check_declared_error(&body)
    }
}

fn read_body(result: Result<ureq::Response, ureq::Error>) -> Result<Value, ApiError> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let text = response.into_string().unwrap_or_default();
            return Err(ApiError::from_status(code, text.trim()));
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(ApiError::Transport(transport.to_string()))
        }
    };

    let text = response
        .into_string()
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Reject bodies that carry a truthy `error` field.
pub(crate) fn check_declared_error(body: &Value) -> Result<(), ApiError> {
    let declared = match body.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(()),
        Some(value) => value,
    };

    let message = match body.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => match declared {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    };
    Err(ApiError::Application(message))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(Cell::polyanet(0, 0), Endpoint::Polyanets, "polyanets")]
    #[case(Cell::soloon(0, 0, Color::Red), Endpoint::Soloons, "soloons")]
    #[case(Cell::cometh(0, 0, Direction::Up), Endpoint::Comeths, "comeths")]
    fn kind_selects_endpoint(#[case] cell: Cell, #[case] endpoint: Endpoint, #[case] path: &str) {
        let req = EntityRequest::for_cell("cand", &cell).expect("encode");
        assert_eq!(req.endpoint, endpoint);
        assert_eq!(req.endpoint.path(), path);
    }

    #[test]
    fn verbs_map_to_http_methods() {
        assert_eq!(method(Verb::Create), "POST");
        assert_eq!(method(Verb::Delete), "DELETE");
    }

    #[test]
    fn soloon_body_uses_lowercase_color() {
        let req = EntityRequest::for_cell("cand", &Cell::soloon(2, 5, Color::Purple)).expect("encode");
        assert_eq!(req.endpoint, Endpoint::Soloons);
        assert_eq!(
            serde_json::to_value(&req.body).expect("json"),
            json!({"candidateId": "cand", "row": 2, "column": 5, "color": "purple"})
        );
    }

    #[test]
    fn polyanet_body_has_no_attribute() {
        let req = EntityRequest::for_cell("cand", &Cell::polyanet(0, 1)).expect("encode");
        assert_eq!(req.endpoint, Endpoint::Polyanets);
        assert_eq!(
            serde_json::to_value(&req.body).expect("json"),
            json!({"candidateId": "cand", "row": 0, "column": 1})
        );
    }

    #[test]
    fn space_is_unsubmittable() {
        let err = EntityRequest::for_cell("cand", &Cell::space(0, 0)).unwrap_err();
        assert!(matches!(err, SubmitError::Unsubmittable { .. }));
    }

    #[test]
    fn cometh_without_direction_is_rejected() {
        let cell = Cell::new(CellKind::Cometh, 1, 1, None);
        let err = EntityRequest::for_cell("cand", &cell).unwrap_err();
        assert_eq!(err, SubmitError::MissingAttribute { cell });
    }

    #[test]
    fn declared_errors_are_detected() {
        assert!(check_declared_error(&json!({})).is_ok());
        assert!(check_declared_error(&Value::Null).is_ok());
        assert!(check_declared_error(&json!({"error": false})).is_ok());
        assert_eq!(
            check_declared_error(&json!({"error": true, "message": "bad row"})),
            Err(ApiError::Application("bad row".to_string()))
        );
        assert_eq!(
            check_declared_error(&json!({"error": "Not found"})),
            Err(ApiError::Application("Not found".to_string()))
        );
    }

    #[test]
    fn status_429_is_rate_limited() {
        assert_eq!(ApiError::from_status(429, "slow down"), ApiError::RateLimited);
        assert_eq!(
            ApiError::from_status(500, "boom"),
            ApiError::Status {
                code: 500,
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn extract_reads_current_and_goal_layouts() {
        let current = MapKind::Current
            .extract(json!({"map": {"content": [[null, {"type": 0}]]}}))
            .expect("current");
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].len(), 2);

        let goal = MapKind::Goal
            .extract(json!({"goal": [["SPACE"], ["POLYANET"]]}))
            .expect("goal");
        assert_eq!(goal.len(), 2);

        let err = MapKind::Goal.extract(json!({"map": {}})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
