//! What a run produced.

use std::fmt;
use std::time::Duration;

use shim_diagnostic::{ErrorCode, Phase, RunStatus, TypeFailure};
use shim_mk::BuildPlan;

/// Fate of one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeOutcome {
    /// Header written. `source` names the unit holding the type's
    /// definitions, if it has any.
    Written {
        header: String,
        source: Option<String>,
    },
    /// Excluded by configuration (generic definitions under `skip`).
    Skipped,
    /// See the matching entry of [`RunReport::failures`].
    Failed { phase: Phase, code: ErrorCode },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeReport {
    pub name: String,
    pub outcome: TypeOutcome,
}

/// Wall time of each phase.
#[derive(Copy, Clone, Debug, Default)]
pub struct PhaseTimings {
    pub load: Duration,
    pub resolve: Duration,
    pub serialize: Duration,
    pub write: Duration,
    pub build_scripts: Duration,
}

impl fmt::Display for PhaseTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "load {:?}, resolve {:?}, serialize {:?}, write {:?}, build scripts {:?}",
            self.load, self.resolve, self.serialize, self.write, self.build_scripts
        )
    }
}

#[derive(Debug)]
pub struct RunReport {
    /// One entry per realized type, in declaration order.
    pub types: Vec<TypeReport>,
    /// Source units listed in `Android.mk`, relative to the output directory.
    pub source_units: Vec<String>,
    pub headers_written: usize,
    pub build_plan: Option<BuildPlan>,
    /// Declaration, type and run-level failures, in declaration order.
    pub failures: Vec<TypeFailure>,
    pub status: RunStatus,
    pub timings: PhaseTimings,
}

impl RunReport {
    pub fn outcome(&self, name: &str) -> Option<&TypeOutcome> {
        self.types
            .iter()
            .find(|t| t.name == name)
            .map(|t| &t.outcome)
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, TypeOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TypeOutcome::Skipped))
    }

    fn count(&self, pred: impl Fn(&TypeOutcome) -> bool) -> usize {
        self.types.iter().filter(|t| pred(&t.outcome)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types: {} written, {} skipped; {} headers, {} source units; {}",
            self.types.len(),
            self.written(),
            self.skipped(),
            self.headers_written,
            self.source_units.len(),
            self.status
        )
    }
}
