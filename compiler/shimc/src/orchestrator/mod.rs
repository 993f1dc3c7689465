//! Drives one generation run.
//!
//! The run is strictly phased. Every type is resolved before any type is
//! serialized, because serializing one type reads the names and
//! classifications of the others. Both passes fan out over a scoped rayon
//! pool; writes happen afterwards on the calling thread in declaration
//! order, so name collisions always fail the later type.

mod output;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use shim_cpp::{serialize_type, CppOptions, Graph, ResolutionContext, Serialized};
use shim_diagnostic::{FailureLog, Phase, ShimError, TypeFailure};
use shim_ir::input::ModelInput;
use shim_ir::{MethodIndex, NameTable, RefResolver, TypeCollection, TypeDataId};
use shim_mk::MkOptions;

use crate::{PhaseTimings, RunReport, SerializationConfig, TypeOutcome, TypeReport};
use output::OutputTree;

/// Worker stack size. Deep generic nesting recurses once per level.
const WORKER_STACK: usize = 16 * 1024 * 1024;

pub struct Orchestrator {
    config: SerializationConfig,
    cpp: CppOptions,
    mk: MkOptions,
}

impl Orchestrator {
    pub fn new(config: SerializationConfig) -> Result<Self, ShimError> {
        config.validate()?;
        let cpp = config.to_cpp_options();
        let mk = config.to_mk_options();
        Ok(Orchestrator { config, cpp, mk })
    }

    pub fn config(&self) -> &SerializationConfig {
        &self.config
    }

    /// Generate headers, sources and build scripts for `input`.
    ///
    /// Failures of single declarations, types, files and the build scripts
    /// are collected into the report. Only failing to set up the output
    /// directories aborts the run.
    #[tracing::instrument(level = "info", skip_all, fields(declarations = input.types.len()))]
    pub fn run(&self, input: &ModelInput) -> Result<RunReport, ShimError> {
        let log = FailureLog::new();
        let mut timings = PhaseTimings::default();

        let start = Instant::now();
        let resolver = RefResolver::new(input.metadata_table());
        let (collection, errors) = TypeCollection::build(input, &resolver);
        for error in errors {
            log.record(TypeFailure {
                order: None,
                type_name: "<declaration>".to_owned(),
                phase: Phase::Resolve,
                error: error.into(),
            });
        }
        let names = NameTable::build(&collection);
        let methods = MethodIndex::build(&collection, &resolver);
        let graph = Graph {
            resolver: &resolver,
            collection: &collection,
            names: &names,
            methods: &methods,
        };
        timings.load = start.elapsed();

        let ids: Vec<_> = collection.ids().collect();
        let mut outcomes = vec![TypeOutcome::Skipped; ids.len()];

        let start = Instant::now();
        let contexts = parallel_map(&ids, |tid| {
            guarded(|| {
                let related = resolver.resolve_deep(collection.get(*tid).this);
                tracing::trace!(related, "walked type relations");
                Ok(ResolutionContext::resolve(&graph, &self.cpp, *tid))
            })
        });
        let mut resolved = Vec::with_capacity(contexts.len());
        for (order, result) in contexts.into_iter().enumerate() {
            match result {
                Ok(cx) => resolved.push((order, cx)),
                Err(error) => {
                    outcomes[order] = fail(&log, order, &names, &ids, Phase::Resolve, error);
                }
            }
        }
        timings.resolve = start.elapsed();
        tracing::info!(types = ids.len(), resolved = resolved.len(), "resolution complete");

        let start = Instant::now();
        let serialized = parallel_map(&resolved, |(_, cx)| {
            guarded(|| serialize_type(&graph, &self.cpp, cx))
        });
        timings.serialize = start.elapsed();

        let start = Instant::now();
        let mut tree = OutputTree::prepare(&self.config, &log)?;
        let progress = self.config.one_source_file && self.config.print_serialization_progress;
        for (done, ((order, _), result)) in resolved.iter().zip(serialized).enumerate() {
            let order = *order;
            let name = names.get(ids[order]);
            outcomes[order] = match result {
                Ok(Serialized::Skipped) => TypeOutcome::Skipped,
                Ok(Serialized::Unit(output)) => match tree.write_type(name, output) {
                    Ok(outcome) => outcome,
                    Err(error) => fail(&log, order, &names, &ids, Phase::Write, error),
                },
                Err(error) => fail(&log, order, &names, &ids, Phase::Serialize, error),
            };
            if progress && (done + 1) % self.config.progress_frequency.max(1) == 0 {
                tracing::info!(done = done + 1, total = resolved.len(), "serialized types");
            }
        }
        let (source_units, headers_written) = tree.finish();
        timings.write = start.elapsed();

        let start = Instant::now();
        let build_plan =
            match shim_mk::write_build_scripts(&self.config.output_dir, &source_units, &self.mk) {
                Ok(plan) => Some(plan),
                Err(error) => {
                    log.record(TypeFailure {
                        order: None,
                        type_name: "Android.mk".to_owned(),
                        phase: Phase::BuildScript,
                        error,
                    });
                    None
                }
            };
        timings.build_scripts = start.elapsed();

        let types = ids
            .iter()
            .zip(outcomes)
            .map(|(tid, outcome)| TypeReport {
                name: names.get(*tid).to_string(),
                outcome,
            })
            .collect();
        let status = log.status();
        let report = RunReport {
            types,
            source_units,
            headers_written,
            build_plan,
            failures: log.into_failures(),
            status,
            timings,
        };
        tracing::info!(%report, "run complete");
        Ok(report)
    }
}

fn fail(
    log: &FailureLog,
    order: usize,
    names: &NameTable,
    ids: &[TypeDataId],
    phase: Phase,
    error: ShimError,
) -> TypeOutcome {
    let code = error.code();
    log.record(TypeFailure {
        order: Some(order),
        type_name: names.get(ids[order]).to_string(),
        phase,
        error,
    });
    TypeOutcome::Failed { phase, code }
}

/// Contain a panic inside one type's work.
fn guarded<R>(work: impl FnOnce() -> Result<R, ShimError>) -> Result<R, ShimError> {
    match catch_unwind(AssertUnwindSafe(work)) {
        Ok(result) => result,
        Err(payload) => Err(ShimError::from_panic(&*payload)),
    }
}

/// Map `items` on a scoped pool, preserving order. Falls back to the
/// calling thread when no pool can be built.
fn parallel_map<T, R, F>(items: &[T], work: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    rayon::ThreadPoolBuilder::new()
        .stack_size(WORKER_STACK)
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| items.par_iter().map(&work).collect::<Vec<_>>())
        })
        .unwrap_or_else(|e| {
            tracing::warn!("failed to create thread pool ({e}), running sequentially");
            items.iter().map(&work).collect()
        })
}
