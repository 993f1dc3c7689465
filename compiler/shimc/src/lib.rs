//! Shim driver: configuration, the generation run and logging setup.
//!
//! A run reads a [`ModelInput`](shim_ir::input::ModelInput), realizes the
//! type graph, emits one header per type plus the source units, and finishes
//! with `Android.mk` and `Application.mk`. See [`Orchestrator::run`].

mod config;
mod orchestrator;
mod report;

use std::sync::Once;

pub use config::{QualifiedMethod, SerializationConfig};
pub use orchestrator::Orchestrator;
pub use report::{PhaseTimings, RunReport, TypeOutcome, TypeReport};

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, once per process.
///
/// Logging stays off unless `RUST_LOG` is set; spans render as an indented
/// tree on stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true)
                        .with_indent_lines(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
