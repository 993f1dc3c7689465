//! Run configuration.
//!
//! Every field has a default, so a config file only names what it changes:
//!
//! ```json
//! { "output_dir": "out", "output_style": "throw_unless", "id": "mymod" }
//! ```

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use shim_cpp::{
    CppOptions, GenericHandling, NamingPolicy, OutputStyle, UnresolvedHandling, CPP_KEYWORDS,
    DEFAULT_ILLEGAL_METHOD_NAMES, DEFAULT_QUALIFIED_BLACKLIST, RUNTIME_MACROS,
};
use shim_diagnostic::ShimError;
use shim_mk::MkOptions;

/// A method that is never emitted under its own name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedMethod {
    pub namespace: String,
    pub type_name: String,
    pub method: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializationConfig {
    pub output_dir: PathBuf,
    /// Header directory, under `output_dir`.
    pub header_dir: String,
    /// Source directory, under `output_dir`.
    pub source_dir: String,
    /// Append all source units into chunk files instead of one file per type.
    pub one_source_file: bool,
    /// Types per chunk file.
    pub chunk_frequency: usize,
    pub static_library_character_limit: usize,
    pub shared_library_character_limit: usize,
    pub generic_handling: GenericHandling,
    pub unresolved_type_handling: UnresolvedHandling,
    pub output_style: OutputStyle,
    pub illegal_names: Vec<String>,
    pub illegal_method_names: Vec<String>,
    pub qualified_blacklist_methods: Vec<QualifiedMethod>,
    pub print_serialization_progress: bool,
    pub progress_frequency: usize,
    pub id: String,
    pub version: String,
    /// Runtime include directory passed to the native build.
    pub libil2cpp: String,
}

impl Default for SerializationConfig {
    fn default() -> Self {
        SerializationConfig {
            output_dir: PathBuf::from("output"),
            header_dir: "include".to_owned(),
            source_dir: "src".to_owned(),
            one_source_file: true,
            chunk_frequency: 100,
            static_library_character_limit: 4000,
            shared_library_character_limit: 8000,
            generic_handling: GenericHandling::Do,
            unresolved_type_handling: UnresolvedHandling::default(),
            output_style: OutputStyle::Normal,
            illegal_names: CPP_KEYWORDS
                .iter()
                .chain(RUNTIME_MACROS)
                .map(|s| (*s).to_owned())
                .collect(),
            illegal_method_names: DEFAULT_ILLEGAL_METHOD_NAMES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            qualified_blacklist_methods: DEFAULT_QUALIFIED_BLACKLIST
                .iter()
                .map(|(namespace, type_name, method)| QualifiedMethod {
                    namespace: (*namespace).to_owned(),
                    type_name: (*type_name).to_owned(),
                    method: (*method).to_owned(),
                })
                .collect(),
            print_serialization_progress: true,
            progress_frequency: 1000,
            id: "codegen".to_owned(),
            version: "0.2.5".to_owned(),
            libil2cpp: "./extern/libil2cpp/il2cpp/libil2cpp".to_owned(),
        }
    }
}

impl SerializationConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ShimError> {
        let text = std::fs::read_to_string(path).map_err(|e| ShimError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| ShimError::Config(format!("{}: {e}", path.display())))
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_output_style(mut self, style: OutputStyle) -> Self {
        self.output_style = style;
        self
    }

    #[must_use]
    pub fn with_one_source_file(mut self, one_source_file: bool) -> Self {
        self.one_source_file = one_source_file;
        self
    }

    #[must_use]
    pub fn with_generic_handling(mut self, handling: GenericHandling) -> Self {
        self.generic_handling = handling;
        self
    }

    #[must_use]
    pub fn with_unresolved_handling(mut self, handling: UnresolvedHandling) -> Self {
        self.unresolved_type_handling = handling;
        self
    }

    #[must_use]
    pub fn with_library_limits(mut self, static_limit: usize, shared_limit: usize) -> Self {
        self.static_library_character_limit = static_limit;
        self.shared_library_character_limit = shared_limit;
        self
    }

    /// Reject settings no run could use.
    ///
    /// Equal or inverted library limits pass; packing reports them when
    /// they keep it from converging.
    pub fn validate(&self) -> Result<(), ShimError> {
        if self.id.trim().is_empty() {
            return Err(ShimError::Config("module id is empty".to_owned()));
        }
        if self.static_library_character_limit == 0 || self.shared_library_character_limit == 0
        {
            return Err(ShimError::Config(
                "library character limits must be positive".to_owned(),
            ));
        }
        if self.one_source_file && self.chunk_frequency == 0 {
            return Err(ShimError::Config(
                "chunk_frequency must be positive in single source file mode".to_owned(),
            ));
        }
        if self.header_dir.is_empty() || self.source_dir.is_empty() {
            return Err(ShimError::Config(
                "header and source directories must be named".to_owned(),
            ));
        }
        // Both roots are cleared at the start of a run.
        for dir in [&self.header_dir, &self.source_dir] {
            if !is_nested(dir) {
                return Err(ShimError::Config(format!(
                    "`{dir}` must be a relative path inside the output directory"
                )));
            }
        }
        Ok(())
    }

    pub fn to_cpp_options(&self) -> CppOptions {
        CppOptions {
            output_style: self.output_style,
            generic_handling: self.generic_handling,
            unresolved: self.unresolved_type_handling,
            naming: NamingPolicy::new(
                self.illegal_names.iter().cloned(),
                self.illegal_method_names.iter().cloned(),
                self.qualified_blacklist_methods
                    .iter()
                    .map(|q| (q.namespace.clone(), q.type_name.clone(), q.method.clone())),
            ),
        }
    }

    pub fn to_mk_options(&self) -> MkOptions {
        MkOptions {
            id: self.id.clone(),
            version: self.version.clone(),
            libil2cpp: self.libil2cpp.clone(),
            header_dir: self.header_dir.clone(),
            source_dir: self.source_dir.clone(),
            static_limit: self.static_library_character_limit,
            shared_limit: self.shared_library_character_limit,
            exceptions: self.output_style == OutputStyle::ThrowUnless,
        }
    }

    pub fn header_root(&self) -> PathBuf {
        self.output_dir.join(&self.header_dir)
    }

    pub fn source_root(&self) -> PathBuf {
        self.output_dir.join(&self.source_dir)
    }
}

/// Whether `dir` names a directory strictly below the one it is joined to.
fn is_nested(dir: &str) -> bool {
    let mut components = Path::new(dir).components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests;
