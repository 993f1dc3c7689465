//! Runtime primitives.
//!
//! Primitives are always resolvable and never need a forward declaration or
//! include: the runtime headers define them.

/// A `System` type the runtime provides natively.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Void,
    Bool,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    IntPtr,
    UIntPtr,
    String,
    Object,
}

impl Primitive {
    /// Namespace every primitive lives in.
    pub const NAMESPACE: &'static str = "System";

    /// Look up a primitive by its metadata name within `System`.
    pub fn from_system_name(name: &str) -> Option<Self> {
        Some(match name {
            "Void" => Primitive::Void,
            "Boolean" => Primitive::Bool,
            "Char" => Primitive::Char,
            "SByte" => Primitive::SByte,
            "Byte" => Primitive::Byte,
            "Int16" => Primitive::Int16,
            "UInt16" => Primitive::UInt16,
            "Int32" => Primitive::Int32,
            "UInt32" => Primitive::UInt32,
            "Int64" => Primitive::Int64,
            "UInt64" => Primitive::UInt64,
            "Single" => Primitive::Single,
            "Double" => Primitive::Double,
            "IntPtr" => Primitive::IntPtr,
            "UIntPtr" => Primitive::UIntPtr,
            "String" => Primitive::String,
            "Object" => Primitive::Object,
            _ => return None,
        })
    }

    /// Look up a primitive by namespace and name.
    pub fn lookup(namespace: &str, name: &str) -> Option<Self> {
        if namespace == Self::NAMESPACE {
            Self::from_system_name(name)
        } else {
            None
        }
    }

    /// Map a C# keyword alias (`int`, `string`, ...) to the metadata name.
    pub fn keyword_alias(word: &str) -> Option<&'static str> {
        Some(match word {
            "void" => "Void",
            "bool" => "Boolean",
            "char" => "Char",
            "sbyte" => "SByte",
            "byte" => "Byte",
            "short" => "Int16",
            "ushort" => "UInt16",
            "int" => "Int32",
            "uint" => "UInt32",
            "long" => "Int64",
            "ulong" => "UInt64",
            "float" => "Single",
            "double" => "Double",
            "string" => "String",
            "object" => "Object",
            _ => return None,
        })
    }

    /// Whether values of this primitive are stored by value.
    pub fn is_value_type(self) -> bool {
        !matches!(self, Primitive::String | Primitive::Object)
    }
}
