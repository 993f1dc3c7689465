//! Compact handles into the type graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical handle to a `TypeRef` node owned by a `RefResolver`.
///
/// Two handles are equal exactly when they name the same input symbol.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeRefId(u32);

impl TypeRefId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        TypeRefId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeRefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRefId({})", self.0)
    }
}

/// Raw identity of a symbol in the binary metadata table.
///
/// Handed out by the metadata reader; the resolver maps each handle to
/// exactly one `TypeRefId`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataHandle(pub u32);

impl fmt::Display for MetadataHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Position of a realized type in a `TypeCollection` (discovery order).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeDataId(u32);

impl TypeDataId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        TypeDataId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeDataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDataId({})", self.0)
    }
}

/// Identity of a method: its declaring type plus its declaration position.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct MethodId {
    pub ty: TypeDataId,
    pub index: u32,
}

impl MethodId {
    #[inline]
    pub const fn new(ty: TypeDataId, index: u32) -> Self {
        MethodId { ty, index }
    }
}
