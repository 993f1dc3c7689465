//! Type references.
//!
//! A `TypeRef` is the identity of one type as it appears in the input. It
//! comes in two forms that share one read-only contract:
//!
//! - **metadata-backed**: built from a [`MetadataSymbol`] handed over by the
//!   binary metadata reader
//! - **dump-backed**: built from a [`DumpSymbol`] parsed out of the textual
//!   dump format
//!
//! Only the shallow attributes (namespace, name, kind, generic flag) are
//! stored eagerly. Relations to other references are filled in lazily by the
//! resolver the first time they are asked for.

mod dump;
mod metadata;

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{MetadataHandle, TypeRefId};

pub use dump::{DumpSymbol, ParseFormatError, Suffix};
pub use metadata::{MetadataSymbol, MetadataTable};

/// Ordered list of related references (generic parameters or arguments).
pub(crate) type RefList = SmallVec<[TypeRefId; 2]>;

/// Structural kind of a reference.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    /// A named type, possibly a generic instance.
    #[default]
    Named,
    /// An unbound generic parameter (`T`).
    GenericParameter,
    /// `T*`
    Pointer,
    /// `T[]`, `T[,]`, ...
    Array { rank: u8 },
    /// `ref T` / `out T`
    ByRef,
}

/// Where a node came from. Format-specific detail never leaves this enum.
#[derive(Clone, Debug)]
pub(crate) enum RefOrigin {
    Metadata(MetadataHandle),
    Dump(DumpSymbol),
}

/// One canonical type reference node.
pub struct TypeRef {
    id: TypeRefId,
    namespace: String,
    name: String,
    kind: RefKind,
    generic: bool,
    pub(crate) origin: RefOrigin,
    pub(crate) generic_parameters: OnceLock<RefList>,
    pub(crate) generic_arguments: OnceLock<Option<RefList>>,
    pub(crate) declaring_type: OnceLock<Option<TypeRefId>>,
    pub(crate) element_type: OnceLock<Option<TypeRefId>>,
}

impl TypeRef {
    pub(crate) fn from_metadata(id: TypeRefId, handle: MetadataHandle, symbol: &MetadataSymbol) -> Self {
        let generic = !symbol.generic_parameters.is_empty()
            || symbol.generic_arguments.as_ref().is_some_and(|args| !args.is_empty());
        TypeRef::with_origin(
            id,
            symbol.namespace.clone(),
            symbol.name.clone(),
            symbol.kind,
            generic,
            RefOrigin::Metadata(handle),
        )
    }

    pub(crate) fn from_dump(id: TypeRefId, symbol: DumpSymbol) -> Self {
        TypeRef::with_origin(
            id,
            symbol.namespace().to_owned(),
            symbol.display_name(),
            symbol.kind(),
            symbol.is_generic(),
            RefOrigin::Dump(symbol),
        )
    }

    fn with_origin(
        id: TypeRefId,
        namespace: String,
        name: String,
        kind: RefKind,
        generic: bool,
        origin: RefOrigin,
    ) -> Self {
        TypeRef {
            id,
            namespace,
            name,
            kind,
            generic,
            origin,
            generic_parameters: OnceLock::new(),
            generic_arguments: OnceLock::new(),
            declaring_type: OnceLock::new(),
            element_type: OnceLock::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeRefId {
        self.id
    }

    /// Namespace as written in the input (`UnityEngine.UI`). Empty for
    /// nested types and for dump references, which never carry one.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Simple name, including a metadata arity marker (`List`1`) or a
    /// pointer/array suffix when the input spells one.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RefKind {
        self.kind
    }

    /// Generic definition or generic instance.
    pub fn is_generic(&self) -> bool {
        self.generic
    }

    pub fn is_generic_parameter(&self) -> bool {
        self.kind == RefKind::GenericParameter
    }

    pub fn is_pointer(&self) -> bool {
        self.kind == RefKind::Pointer
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, RefKind::Array { .. })
    }

    pub fn is_by_ref(&self) -> bool {
        self.kind == RefKind::ByRef
    }

    /// Whether this node was produced from binary metadata.
    pub fn is_from_metadata(&self) -> bool {
        matches!(self.origin, RefOrigin::Metadata(_))
    }

    /// Name with any metadata arity marker removed (`List`1` becomes `List`).
    pub fn base_name(&self) -> &str {
        strip_arity(&self.name)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("id", &self.id)
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Drop a trailing metadata arity marker.
pub(crate) fn strip_arity(name: &str) -> &str {
    match name.rfind('`') {
        Some(pos) if name[pos + 1..].bytes().all(|b| b.is_ascii_digit()) => &name[..pos],
        _ => name,
    }
}

#[cfg(test)]
mod tests;
