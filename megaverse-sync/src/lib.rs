//! # megaverse-sync
//!
//! Remote API client, sequential submitter and the reconcile pipeline.
//!
//! Call [`pipeline::plan`] to fetch both maps and compute the delta, or
//! [`pipeline::apply`] to also submit it.

pub mod api;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod submit;

pub use api::{Endpoint, EntityRequest, HttpApi, MapKind, MegaverseApi};
pub use config::Config;
pub use error::{ApiError, ConfigError, FetchError, SubmitError, SyncError};
pub use pipeline::{apply, plan, ApplyOutcome, Plan};
pub use submit::Submitter;
