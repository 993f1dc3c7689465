//! Identifier denylists and deterministic renaming.
//!
//! A name on a denylist is never emitted verbatim. It is prefixed with `_`
//! until it no longer collides, so the same input always yields the same
//! identifier.

use rustc_hash::FxHashSet;
use shim_ir::safe_name;

/// C++ keywords, from <https://en.cppreference.com/w/cpp/keyword>.
pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "atomic_cancel", "atomic_commit",
    "atomic_noexcept", "auto", "bitand", "bitor", "bool", "break", "case", "catch", "char",
    "char8_t", "char16_t", "char32_t", "class", "compl", "concept", "const", "consteval",
    "constexpr", "constinit", "const_cast", "continue", "co_await", "co_return", "co_yield",
    "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum", "explicit",
    "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or",
    "or_eq", "private", "protected", "public", "reflexpr", "register", "reinterpret_cast",
    "requires", "return", "short", "signed", "sizeof", "static", "static_assert", "static_cast",
    "struct", "switch", "synchronized", "template", "this", "thread_local", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Macros defined by the runtime headers and build flags.
pub const RUNTIME_MACROS: &[&str] = &[
    "INT_MAX", "INT_MIN", "Assert", "bzero", "ID", "VERSION", "NULL", "EOF", "MOD_ID",
];

pub const DEFAULT_ILLEGAL_METHOD_NAMES: &[&str] = &["bzero", "Assert"];

/// (namespace, type, method) triples that must never be emitted verbatim.
pub const DEFAULT_QUALIFIED_BLACKLIST: &[(&str, &str, &str)] = &[(
    "UnityEngine.ResourceManagement.AsyncOperations",
    "AsyncOperationHandle",
    "Convert",
)];

#[derive(Clone, Debug)]
pub struct NamingPolicy {
    illegal_names: FxHashSet<String>,
    illegal_method_names: FxHashSet<String>,
    blacklist: FxHashSet<(String, String, String)>,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        NamingPolicy::new(
            CPP_KEYWORDS.iter().chain(RUNTIME_MACROS).map(|s| (*s).to_owned()),
            DEFAULT_ILLEGAL_METHOD_NAMES.iter().map(|s| (*s).to_owned()),
            DEFAULT_QUALIFIED_BLACKLIST
                .iter()
                .map(|(ns, ty, m)| ((*ns).to_owned(), (*ty).to_owned(), (*m).to_owned())),
        )
    }
}

impl NamingPolicy {
    pub fn new(
        illegal_names: impl IntoIterator<Item = String>,
        illegal_method_names: impl IntoIterator<Item = String>,
        blacklist: impl IntoIterator<Item = (String, String, String)>,
    ) -> Self {
        NamingPolicy {
            illegal_names: illegal_names.into_iter().collect(),
            illegal_method_names: illegal_method_names.into_iter().collect(),
            blacklist: blacklist.into_iter().collect(),
        }
    }

    /// Field and parameter names.
    pub fn identifier(&self, name: &str) -> String {
        let mut ident = safe_name(name);
        if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
            ident.insert(0, '_');
        }
        while self.illegal_names.contains(&ident) {
            ident.insert(0, '_');
        }
        ident
    }

    /// Method names, which also honor the method denylist and the qualified
    /// blacklist.
    pub fn method_name(&self, namespace: &str, type_name: &str, name: &str) -> String {
        let mut ident = self.identifier(name);
        let key = (namespace.to_owned(), type_name.to_owned(), name.to_owned());
        if self.blacklist.contains(&key) {
            ident.insert(0, '_');
        }
        while self.illegal_method_names.contains(&ident) || self.illegal_names.contains(&ident) {
            ident.insert(0, '_');
        }
        ident
    }

    /// Suffix of a static field accessor (`_get_<suffix>`).
    pub fn accessor_suffix(&self, field_name: &str) -> String {
        safe_name(&field_name.replace(['<', '>'], "$"))
    }
}
