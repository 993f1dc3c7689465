//! Shim IR - the managed-runtime type graph.
//!
//! This crate holds everything the code generator knows about the input
//! program before any C++ is produced:
//! - `TypeRef` nodes, interned per distinct input symbol by [`RefResolver`]
//! - realized types ([`TypeData`]) with their fields, methods and properties
//! - [`TypeCollection`], the enumerable set of realized types
//! - [`NameTable`], the display names with collision suffixes
//! - [`MethodIndex`], override and interface-implementation links
//!
//! # Ownership
//!
//! The resolver owns every `TypeRef` node. Everything else holds a
//! [`TypeRefId`] and looks the node up on demand, so cyclic relations
//! (a generic parameter naming its own declaring type, a nested type naming
//! its parent) never form ownership cycles.
//!
//! # Lifecycle
//!
//! One resolver per run. Dropping it releases every node; a fresh resolver
//! starts with an empty cache and zeroed hit/miss counters.

mod builtin;
mod collection;
mod error;
mod handle;
pub mod input;
mod member;
mod method_index;
mod resolver;
mod stack;
mod type_data;
mod type_name;
mod type_ref;

pub use builtin::Primitive;
pub use collection::{TypeCollection, TypeKey};
pub use error::IrError;
pub use handle::{MetadataHandle, MethodId, TypeDataId, TypeRefId};
pub use member::{Attribute, Field, Method, Parameter, ParameterModifier, Property, Specifiers};
pub use method_index::MethodIndex;
pub use resolver::{CacheStats, RefResolver};
pub use type_data::{TypeData, TypeKind};
pub use type_name::{safe_name, NameTable, TypeName, GLOBAL_NAMESPACE};
pub use type_ref::{
    DumpSymbol, MetadataSymbol, MetadataTable, ParseFormatError, RefKind, Suffix, TypeRef,
};
