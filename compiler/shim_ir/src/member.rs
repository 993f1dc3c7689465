//! Members of a realized type: fields, methods, properties.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::TypeRefId;

bitflags! {
    /// Declaration modifiers as written in the dump (`public static readonly`).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Specifiers: u16 {
        // === Visibility ===
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL = 1 << 3;

        // === Storage ===
        const STATIC = 1 << 4;
        const CONST = 1 << 5;
        const READONLY = 1 << 6;

        // === Dispatch ===
        const VIRTUAL = 1 << 7;
        const ABSTRACT = 1 << 8;
        const OVERRIDE = 1 << 9;
        const SEALED = 1 << 10;
        const EXTERN = 1 << 11;
    }
}

const SPECIFIER_WORDS: [(&str, Specifiers); 12] = [
    ("public", Specifiers::PUBLIC),
    ("private", Specifiers::PRIVATE),
    ("protected", Specifiers::PROTECTED),
    ("internal", Specifiers::INTERNAL),
    ("static", Specifiers::STATIC),
    ("const", Specifiers::CONST),
    ("readonly", Specifiers::READONLY),
    ("virtual", Specifiers::VIRTUAL),
    ("abstract", Specifiers::ABSTRACT),
    ("override", Specifiers::OVERRIDE),
    ("sealed", Specifiers::SEALED),
    ("extern", Specifiers::EXTERN),
];

impl Specifiers {
    /// Map one modifier keyword. Unknown words yield `None`.
    pub fn parse(word: &str) -> Option<Specifiers> {
        SPECIFIER_WORDS
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, flag)| *flag)
    }

    /// Fold a list of modifier keywords, ignoring unknown ones.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Specifiers {
        words
            .into_iter()
            .filter_map(Specifiers::parse)
            .fold(Specifiers::empty(), |acc, flag| acc | flag)
    }

    /// Either `static` or `const`: no instance storage.
    pub fn is_static(self) -> bool {
        self.intersects(Specifiers::STATIC | Specifiers::CONST)
    }

    /// Participates in virtual dispatch.
    pub fn is_overridable(self) -> bool {
        self.intersects(Specifiers::VIRTUAL | Specifiers::ABSTRACT | Specifiers::OVERRIDE)
    }
}

impl fmt::Display for Specifiers {
    /// Keywords in declaration order, space separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (word, flag) in SPECIFIER_WORDS {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(word)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// An attribute applied to a declaration, by name only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub declaring_type: TypeRefId,
    pub ty: TypeRefId,
    pub name: String,
    pub specifiers: Specifiers,
    pub attributes: Vec<Attribute>,
    /// Instance layout offset; `-1` when unknown.
    pub offset: i32,
}

impl Field {
    pub fn is_static(&self) -> bool {
        self.specifiers.is_static()
    }
}

/// How a parameter is passed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterModifier {
    #[default]
    None,
    Ref,
    Out,
    In,
    Params,
}

impl ParameterModifier {
    /// Passed by reference to the callee's storage.
    pub fn is_by_ref(self) -> bool {
        matches!(self, ParameterModifier::Ref | ParameterModifier::Out | ParameterModifier::In)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeRefId,
    pub name: String,
    pub modifier: ParameterModifier,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    pub declaring_type: TypeRefId,
    pub return_type: TypeRefId,
    /// Source name, without any explicit-interface prefix.
    pub name: String,
    /// Name the runtime knows the method by (`Iface.Method` for explicit
    /// implementations, `.ctor` for constructors).
    pub il2cpp_name: String,
    pub parameters: Vec<Parameter>,
    pub specifiers: Specifiers,
    pub attributes: Vec<Attribute>,
    /// Addresses in the native image; `-1` when unknown.
    pub rva: i64,
    pub offset: i64,
    pub va: i64,
    /// Vtable slot; `-1` when the method is not virtual or the slot is unknown.
    pub slot: i32,
    /// Interface this method explicitly implements.
    pub implemented_from: Option<TypeRefId>,
    pub generic: bool,
}

impl Method {
    pub fn is_static(&self) -> bool {
        self.specifiers.contains(Specifiers::STATIC)
    }

    /// Parameter types, in order. Two methods with equal names and equal
    /// parameter types have the same signature.
    pub fn parameter_types(&self) -> impl Iterator<Item = TypeRefId> + '_ {
        self.parameters.iter().map(|p| p.ty)
    }

    pub fn same_signature(&self, other: &Method) -> bool {
        self.name == other.name && self.parameter_types().eq(other.parameter_types())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub declaring_type: TypeRefId,
    pub ty: TypeRefId,
    pub name: String,
    pub has_getter: bool,
    pub has_setter: bool,
    pub specifiers: Specifiers,
    pub attributes: Vec<Attribute>,
}
