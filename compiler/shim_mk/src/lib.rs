//! Native build descriptors for the generated sources.
//!
//! The NDK build rejects command lines past a fixed length, so the source
//! units cannot all go into one library. [`BuildScriptEmitter::pack`] groups
//! them into static libraries whose member lists stay under a character
//! budget, nesting groups of groups until the top level fits the shared
//! library budget. [`write_build_scripts`] then renders `Android.mk` and the
//! fixed `Application.mk`.

mod android_mk;
mod pack;

use std::path::Path;

use shim_diagnostic::ShimError;

pub use android_mk::{render_android_mk, APPLICATION_MK};
pub use pack::{BuildPlan, BuildScriptEmitter, Library, MAX_DEPTH};

/// Inputs of the build descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MkOptions {
    /// Module id; names the shared library and prefixes every static one.
    pub id: String,
    pub version: String,
    /// Runtime include path passed as `-I`.
    pub libil2cpp: String,
    /// Header and source directory names, relative to `LOCAL_PATH`.
    pub header_dir: String,
    pub source_dir: String,
    /// Budget B: summed member id length of one static library.
    pub static_limit: usize,
    /// Budget S: summed member id length of the top-level aggregate.
    pub shared_limit: usize,
    /// Build with C++ exceptions enabled.
    pub exceptions: bool,
}

impl Default for MkOptions {
    fn default() -> Self {
        MkOptions {
            id: "codegen".to_owned(),
            version: "0.1.0".to_owned(),
            libil2cpp: "./extern/libil2cpp/il2cpp/libil2cpp".to_owned(),
            header_dir: "include".to_owned(),
            source_dir: "src".to_owned(),
            static_limit: 4000,
            shared_limit: 8000,
            exceptions: false,
        }
    }
}

/// Pack `units` and write `Android.mk` and `Application.mk` into `dir`.
///
/// Both files are rendered completely before either is written.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn write_build_scripts(
    dir: &Path,
    units: &[String],
    options: &MkOptions,
) -> Result<BuildPlan, ShimError> {
    let plan = BuildScriptEmitter::new(options.clone()).pack(units)?;
    let android_mk = render_android_mk(&plan, options);

    let android_path = dir.join("Android.mk");
    std::fs::write(&android_path, android_mk).map_err(|e| ShimError::io(&android_path, e))?;
    let application_path = dir.join("Application.mk");
    std::fs::write(&application_path, APPLICATION_MK)
        .map_err(|e| ShimError::io(&application_path, e))?;

    tracing::info!(
        static_libraries = plan.static_libraries.len(),
        "wrote build scripts"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests;
