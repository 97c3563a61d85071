//! Sequential delta submission with rate-limit retry.
//!
//! Operations are sent one at a time, in order. An operation that is rate
//! limited is re-sent after [`Config::retry_delay`] until it goes through;
//! the next operation never starts before the current one has succeeded.
//! Any other failure stops the run and is returned as-is; operations already
//! applied stay applied.

use std::thread;
use std::time::Duration;

use megaverse_core::Operation;

use crate::api::{EntityRequest, MegaverseApi};
use crate::config::Config;
use crate::error::{ApiError, SubmitError};

/// Applies an ordered delta through a [`MegaverseApi`].
#[derive(Debug)]
pub struct Submitter<A> {
    api: A,
    candidate_id: String,
    retry_delay: Duration,
}

impl<A: MegaverseApi> Submitter<A> {
    pub fn new(api: A, config: &Config) -> Self {
        Self {
            api,
            candidate_id: config.candidate_id.clone(),
            retry_delay: config.retry_delay,
        }
    }

    /// Submit every operation in order, stopping at the first failure that is
    /// not a rate limit.
    pub fn submit(&self, operations: &[Operation]) -> Result<(), SubmitError> {
        let total = operations.len();
        for (index, operation) in operations.iter().enumerate() {
            let attempts = self.submit_one(index, operation)?;
            tracing::info!(
                "[{}/{}] {} ({} attempt{})",
                index + 1,
                total,
                operation,
                attempts,
                if attempts == 1 { "" } else { "s" }
            );
        }
        Ok(())
    }

    /// Returns the number of attempts it took.
    fn submit_one(&self, index: usize, operation: &Operation) -> Result<u32, SubmitError> {
        let request = EntityRequest::for_cell(&self.candidate_id, &operation.cell)?;

        let mut attempts = 0;
        loop {
            attempts += 1;
            tracing::debug!("attempt {attempts} for {operation}");
            match self.api.send(operation.verb, &request) {
                Ok(()) => return Ok(attempts),
                Err(ApiError::RateLimited) => {
                    tracing::warn!(
                        "rate limited on {operation}; retrying in {:?}",
                        self.retry_delay
                    );
                    thread::sleep(self.retry_delay);
                }
                Err(source) => {
                    return Err(SubmitError::Api {
                        index,
                        operation: *operation,
                        source,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use megaverse_core::{Cell, Color, Direction, RawGrid, Verb};

    use super::*;
    use crate::api::{Endpoint, MapKind};

    /// Scripted remote: pops one response per `send`, succeeding once the
    /// script runs out.
    #[derive(Default)]
    struct ScriptedApi {
        script: RefCell<VecDeque<ApiError>>,
        calls: RefCell<Vec<(Verb, EntityRequest)>>,
    }

    impl ScriptedApi {
        fn with_script(errors: Vec<ApiError>) -> Self {
            Self {
                script: RefCell::new(errors.into()),
                calls: RefCell::default(),
            }
        }
    }

    impl MegaverseApi for ScriptedApi {
        fn fetch_map(&self, _candidate_id: &str, _map: MapKind) -> Result<RawGrid, ApiError> {
            Ok(Vec::new())
        }

        fn send(&self, verb: Verb, request: &EntityRequest) -> Result<(), ApiError> {
            self.calls.borrow_mut().push((verb, request.clone()));
            match self.script.borrow_mut().pop_front() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    fn config() -> Config {
        Config::new("cand").with_retry_delay(Duration::ZERO)
    }

    #[test]
    fn retries_rate_limited_operation_then_moves_on() {
        let api = ScriptedApi::with_script(vec![ApiError::RateLimited, ApiError::RateLimited]);
        let ops = vec![
            Operation::create(Cell::polyanet(0, 0)),
            Operation::create(Cell::soloon(0, 1, Color::Red)),
        ];

        Submitter::new(&api, &config()).submit(&ops).expect("submit");

        let calls = api.calls.borrow();
        assert_eq!(calls.len(), 4);
        assert!(calls[..3]
            .iter()
            .all(|(_, req)| req.endpoint == Endpoint::Polyanets && req.body.column == 0));
        assert_eq!(calls[3].1.endpoint, Endpoint::Soloons);
    }

    #[test]
    fn non_retryable_failure_aborts_remaining_operations() {
        let failure = ApiError::Status {
            code: 400,
            body: "bad request".to_string(),
        };
        let api = ScriptedApi::with_script(vec![failure.clone()]);
        let ops = vec![
            Operation::delete(Cell::cometh(1, 1, Direction::Down)),
            Operation::create(Cell::polyanet(2, 2)),
        ];

        let err = Submitter::new(&api, &config()).submit(&ops).unwrap_err();

        assert_eq!(api.calls.borrow().len(), 1);
        assert_eq!(
            err,
            SubmitError::Api {
                index: 0,
                operation: ops[0],
                source: failure,
            }
        );
    }

    #[test]
    fn verbs_are_passed_through_in_order() {
        let api = ScriptedApi::default();
        let ops = vec![
            Operation::delete(Cell::polyanet(0, 0)),
            Operation::create(Cell::cometh(0, 0, Direction::Left)),
        ];

        Submitter::new(&api, &config()).submit(&ops).expect("submit");

        let verbs: Vec<Verb> = api.calls.borrow().iter().map(|(v, _)| *v).collect();
        assert_eq!(verbs, vec![Verb::Delete, Verb::Create]);
    }

    #[test]
    fn encoding_failure_is_not_sent() {
        let api = ScriptedApi::default();
        let ops = vec![Operation::create(Cell::space(0, 0))];

        let err = Submitter::new(&api, &config()).submit(&ops).unwrap_err();
        assert!(matches!(err, SubmitError::Unsubmittable { .. }));
        assert!(api.calls.borrow().is_empty());
    }

    #[test]
    fn empty_delta_is_a_no_op() {
        let api = ScriptedApi::default();
        Submitter::new(&api, &config()).submit(&[]).expect("submit");
        assert!(api.calls.borrow().is_empty());
    }
}
