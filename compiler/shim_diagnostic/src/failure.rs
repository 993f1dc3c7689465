//! Per-type failure records shared by parallel workers.

use std::fmt;

use parking_lot::Mutex;

use crate::ShimError;

/// Stage of the run a failure happened in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Resolve,
    Serialize,
    Write,
    BuildScript,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Resolve => "resolve",
            Phase::Serialize => "serialize",
            Phase::Write => "write",
            Phase::BuildScript => "build script",
        })
    }
}

#[derive(Debug)]
pub struct TypeFailure {
    /// Discovery position of the failed type; `None` for run-level failures.
    pub order: Option<usize>,
    pub type_name: String,
    pub phase: Phase,
    pub error: ShimError,
}

impl fmt::Display for TypeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} failed during {}: {}",
            self.error.code(),
            self.type_name,
            self.phase,
            self.error
        )
    }
}

/// Aggregate outcome of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failed { count: usize },
}

impl RunStatus {
    pub fn is_success(self) -> bool {
        self == RunStatus::Success
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => f.write_str("success"),
            RunStatus::Failed { count: 1 } => f.write_str("1 failure"),
            RunStatus::Failed { count } => write!(f, "{count} failures"),
        }
    }
}

/// Failures recorded from any thread, in no particular order until drained.
#[derive(Debug, Default)]
pub struct FailureLog {
    failures: Mutex<Vec<TypeFailure>>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, failure: TypeFailure) {
        tracing::warn!(
            code = %failure.error.code(),
            ty = %failure.type_name,
            phase = %failure.phase,
            error = %failure.error,
            "type failed"
        );
        self.failures.lock().push(failure);
    }

    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    pub fn status(&self) -> RunStatus {
        match self.len() {
            0 => RunStatus::Success,
            count => RunStatus::Failed { count },
        }
    }

    /// Drain the log, ordered by type discovery position then phase.
    /// Run-level failures come last.
    pub fn into_failures(self) -> Vec<TypeFailure> {
        let mut failures = self.failures.into_inner();
        failures.sort_by_key(|f| (f.order.is_none(), f.order, f.phase));
        failures
    }
}
