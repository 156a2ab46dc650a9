//! Engine Context
//!
//! State the engine keeps across evaluations and hands to the evaluator.

use std::time::Duration;

use crate::repl::error::EvalError;
use crate::repl::session::SessionId;
use crate::repl::value::Value;

/// What the last evaluations produced
#[derive(Debug, Clone, Default)]
pub struct EngineContext {
    /// Session the last successful evaluation ran in
    active_session: Option<SessionId>,
    /// Value of the last successful evaluation
    last_result: Value,
    /// Error of the last failed evaluation
    last_error: Option<EvalError>,
    /// Eval count across all sessions
    eval_count: usize,
    /// Total evaluation time
    total_time: Duration,
}

impl EngineContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Session the last successful evaluation ran in
    pub fn active_session(&self) -> Option<SessionId> {
        self.active_session
    }

    /// Value of the last successful evaluation, `nil` before the first
    pub fn last_result(&self) -> &Value {
        &self.last_result
    }

    /// Error of the last failed evaluation
    pub fn last_error(&self) -> Option<&EvalError> {
        self.last_error.as_ref()
    }

    /// Number of evaluations, failed ones included
    pub fn eval_count(&self) -> usize {
        self.eval_count
    }

    /// Time spent in the evaluator
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Record a successful evaluation
    pub fn record_success(
        &mut self,
        session: Option<SessionId>,
        value: Value,
        duration: Duration,
    ) {
        self.active_session = session;
        self.last_result = value;
        self.increment_eval(duration);
    }

    /// Record a failed evaluation; `last_result` is kept
    pub fn record_failure(
        &mut self,
        error: EvalError,
        duration: Duration,
    ) {
        self.last_error = Some(error);
        self.increment_eval(duration);
    }

    fn increment_eval(
        &mut self,
        duration: Duration,
    ) {
        self.eval_count += 1;
        self.total_time += duration;
    }
}
