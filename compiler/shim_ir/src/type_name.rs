//! Display names for realized types.
//!
//! A `TypeName` is what the emitted code calls a type. It is derived from the
//! type's key, never compared for identity, and carries a `_N` suffix when an
//! earlier type (in discovery order) already produced the same
//! namespace + name pair.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{TypeCollection, TypeDataId};

/// Namespace used for types declared outside any namespace.
pub const GLOBAL_NAMESPACE: &str = "GlobalNamespace";

/// Replace characters that cannot appear in a C++ identifier.
pub fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '`' | '<' | '>' | '.' | '|' | '-' | '=' | ',' | ' ' => '_',
            c => c,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeName {
    /// Dotted namespace (`UnityEngine.UI`).
    pub namespace: String,
    /// Flattened name, nested segments joined by `_`, suffix included.
    pub name: String,
}

impl TypeName {
    /// `UnityEngine::UI`
    pub fn cpp_namespace(&self) -> String {
        self.namespace.replace('.', "::")
    }

    /// `::UnityEngine::UI::Button`
    pub fn qualified(&self) -> String {
        format!("::{}::{}", self.cpp_namespace(), self.name)
    }

    /// Namespace segments, for laying out directories.
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Names for every type of a collection, indexed by `TypeDataId`.
#[derive(Debug, Default)]
pub struct NameTable {
    names: Vec<TypeName>,
}

impl NameTable {
    #[tracing::instrument(level = "debug", skip_all, fields(types = collection.len()))]
    pub fn build(collection: &TypeCollection) -> Self {
        let mut seen: FxHashMap<(String, String), u32> = FxHashMap::default();
        let names = collection
            .ids()
            .map(|tid| {
                let key = collection.key(tid);
                let namespace = if key.namespace.is_empty() {
                    GLOBAL_NAMESPACE.to_owned()
                } else {
                    safe_namespace(&key.namespace)
                };
                let base = key
                    .path
                    .iter()
                    .map(|segment| safe_name(segment))
                    .collect::<Vec<_>>()
                    .join("_");

                let count = seen.entry((namespace.clone(), base.clone())).or_insert(0);
                let name = if *count == 0 {
                    base
                } else {
                    tracing::debug!(%namespace, %base, suffix = *count, "deduplicating type name");
                    format!("{base}_{count}")
                };
                *count += 1;
                TypeName { namespace, name }
            })
            .collect();
        NameTable { names }
    }

    pub fn get(&self, tid: TypeDataId) -> &TypeName {
        &self.names[tid.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn safe_namespace(namespace: &str) -> String {
    namespace
        .split('.')
        .map(safe_name)
        .collect::<Vec<_>>()
        .join(".")
}
