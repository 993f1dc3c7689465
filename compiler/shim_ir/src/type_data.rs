//! Realized types.

use serde::{Deserialize, Serialize};

use crate::{Attribute, Field, Method, Property, Specifiers, TypeRefId};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Enum,
    Interface,
}

impl TypeKind {
    /// Stored inline rather than behind a pointer.
    pub fn is_value_type(self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum)
    }
}

/// A fully described managed type: its identity, hierarchy and members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeData {
    pub this: TypeRefId,
    pub kind: TypeKind,
    pub parent: Option<TypeRefId>,
    pub interfaces: Vec<TypeRefId>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
    pub specifiers: Specifiers,
    pub attributes: Vec<Attribute>,
    /// Index into the runtime's type definition table; `-1` when unknown.
    pub type_def_index: i32,
}

impl TypeData {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn instance_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_static())
    }

    pub fn static_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_static())
    }
}
