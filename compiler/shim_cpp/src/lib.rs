//! C++ emission for the shim code generator.
//!
//! Two passes run over the type collection:
//!
//! 1. [`ResolutionContext::resolve`] renders every signature of one type and
//!    classifies each referenced type as forward-declared or included.
//! 2. [`serialize_type`] turns a frozen context into a header and, when the
//!    type needs one, a source unit.
//!
//! Both passes only read the shared [`Graph`], so the orchestrator may run
//! them on as many threads as it likes.

mod context;
mod cpp_type;
mod naming;
mod options;
mod serialize;
mod writer;

#[cfg(test)]
mod test_helpers;

use shim_ir::{MethodIndex, NameTable, RefResolver, TypeCollection, TypeName};

pub use context::{MethodSig, NeedAs, ResolutionContext, Slot, UnresolvedRef};
pub use cpp_type::primitive_name;
pub use naming::{
    NamingPolicy, CPP_KEYWORDS, DEFAULT_ILLEGAL_METHOD_NAMES, DEFAULT_QUALIFIED_BLACKLIST,
    RUNTIME_MACROS,
};
pub use options::{CppOptions, GenericHandling, OutputStyle, UnresolvedHandling};
pub use serialize::{serialize_type, Serialized};
pub use writer::CppWriter;

/// Banner opening every generated file.
pub const BANNER: &str = "// Autogenerated by shim. Do not edit.";

/// Read-only view of everything the passes consult.
#[derive(Copy, Clone)]
pub struct Graph<'a> {
    pub resolver: &'a RefResolver,
    pub collection: &'a TypeCollection,
    pub names: &'a NameTable,
    pub methods: &'a MethodIndex,
}

/// Generated text for one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeOutput {
    pub header: String,
    /// `None` for interfaces, generic definitions and types without methods.
    pub source: Option<String>,
}

/// Header path relative to the include directory (`Game/A.hpp`).
pub fn header_path(name: &TypeName) -> String {
    unit_path(name, "hpp")
}

/// Source path relative to the source directory (`Game/A.cpp`).
pub fn source_path(name: &TypeName) -> String {
    unit_path(name, "cpp")
}

fn unit_path(name: &TypeName, extension: &str) -> String {
    let mut path = String::new();
    for segment in name.namespace_segments() {
        path.push_str(segment);
        path.push('/');
    }
    path.push_str(&name.name);
    path.push('.');
    path.push_str(extension);
    path
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_unit_paths() {
        let name = TypeName {
            namespace: "UnityEngine.UI".to_owned(),
            name: "Button_1".to_owned(),
        };
        assert_eq!(header_path(&name), "UnityEngine/UI/Button_1.hpp");
        assert_eq!(source_path(&name), "UnityEngine/UI/Button_1.cpp");
    }
}
