//! Error types for megaverse-sync.

use thiserror::Error;

use megaverse_core::{Cell, DiffError, Operation, ParseError};

use crate::api::MapKind;

/// Invalid or missing run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("CANDIDATE_ID is not set")]
    MissingCandidateId,

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Failure of a single remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 429. The same request may succeed later.
    #[error("rate limited by remote (HTTP 429)")]
    RateLimited,

    #[error("remote returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body declares `"error"`.
    #[error("remote reported an error: {0}")]
    Application(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx status.
    pub fn from_status(code: u16, body: impl Into<String>) -> Self {
        if code == 429 {
            ApiError::RateLimited
        } else {
            ApiError::Status {
                code,
                body: body.into(),
            }
        }
    }
}

/// Failure to obtain one of the two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to fetch {map} map: {source}")]
    Api {
        map: MapKind,
        #[source]
        source: ApiError,
    },

    #[error("failed to parse {map} map: {source}")]
    Parse {
        map: MapKind,
        #[source]
        source: ParseError,
    },
}

/// Non-retryable failure while submitting a delta.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("operation #{index} ({operation}) failed: {source}")]
    Api {
        index: usize,
        operation: Operation,
        #[source]
        source: ApiError,
    },

    #[error("{cell} cannot be submitted: space has no endpoint")]
    Unsubmittable { cell: Cell },

    #[error("{cell} cannot be submitted: attribute is missing")]
    MissingAttribute { cell: Cell },
}

/// All errors the reconcile pipeline can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to compute delta: {0}")]
    Diff(#[from] DiffError),

    #[error("failed to submit delta: {0}")]
    Submit(#[from] SubmitError),
}
