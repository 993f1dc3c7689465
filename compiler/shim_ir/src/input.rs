//! The parser collaborators' output contract.
//!
//! Both input readers hand over the same serde shape: a metadata symbol table
//! plus a tree of type declarations whose type references are either metadata
//! handles or dump text. Realizing a declaration resolves every reference
//! through the run's [`RefResolver`]; a reference that cannot be resolved
//! drops only the declaration that carried it.

use serde::{Deserialize, Serialize};

use crate::{
    Attribute, DumpSymbol, Field, IrError, MetadataHandle, MetadataSymbol, MetadataTable, Method,
    Parameter, ParameterModifier, Property, RefResolver, Specifiers, TypeData, TypeKind,
    TypeRefId,
};

fn unknown_i32() -> i32 {
    -1
}

fn unknown_i64() -> i64 {
    -1
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInput {
    #[serde(default)]
    pub symbols: Vec<MetadataSymbol>,
    #[serde(default)]
    pub types: Vec<TypeInput>,
}

impl ModelInput {
    pub fn metadata_table(&self) -> MetadataTable {
        self.symbols.iter().cloned().collect()
    }
}

/// A type reference as either input format spells it.
///
/// ```json
/// {"metadata": 12}
/// {"dump": {"namespace": "UnityEngine", "text": "List<int>[]"}}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRefInput {
    Metadata(MetadataHandle),
    Dump {
        #[serde(default)]
        namespace: String,
        text: String,
    },
}

impl TypeRefInput {
    pub fn dump(namespace: &str, text: &str) -> Self {
        TypeRefInput::Dump {
            namespace: namespace.to_owned(),
            text: text.to_owned(),
        }
    }

    /// Resolve a reference used in a member signature.
    pub fn resolve(&self, resolver: &RefResolver) -> Result<TypeRefId, IrError> {
        match self {
            TypeRefInput::Metadata(handle) => resolver.resolve_metadata(*handle),
            TypeRefInput::Dump { namespace, text } => {
                Ok(resolver.resolve_dump_text(namespace, text)?)
            }
        }
    }

    /// Resolve the reference heading a type declaration.
    pub fn resolve_definition(&self, resolver: &RefResolver) -> Result<TypeRefId, IrError> {
        match self {
            TypeRefInput::Metadata(handle) => resolver.resolve_metadata(*handle),
            TypeRefInput::Dump { namespace, text } => {
                let symbol = DumpSymbol::parse_definition(namespace, text)?;
                Ok(resolver.resolve_dump(&symbol))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInput {
    pub this: TypeRefInput,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub parent: Option<TypeRefInput>,
    #[serde(default)]
    pub interfaces: Vec<TypeRefInput>,
    #[serde(default)]
    pub fields: Vec<FieldInput>,
    #[serde(default)]
    pub methods: Vec<MethodInput>,
    #[serde(default)]
    pub properties: Vec<PropertyInput>,
    #[serde(default)]
    pub specifiers: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default = "unknown_i32")]
    pub type_def_index: i32,
    /// Nested declarations. Each must name its full path (`Outer.Inner`, or
    /// a metadata symbol whose declaring type is this one).
    #[serde(default)]
    pub nested: Vec<TypeInput>,
}

impl TypeInput {
    pub fn new(this: TypeRefInput, kind: TypeKind) -> Self {
        TypeInput {
            this,
            kind,
            parent: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            specifiers: Vec::new(),
            attributes: Vec::new(),
            type_def_index: -1,
            nested: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInput {
    #[serde(rename = "type")]
    pub ty: TypeRefInput,
    pub name: String,
    #[serde(default)]
    pub specifiers: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default = "unknown_i32")]
    pub offset: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInput {
    #[serde(rename = "type")]
    pub ty: TypeRefInput,
    pub name: String,
    #[serde(default)]
    pub modifier: ParameterModifier,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInput {
    pub return_type: TypeRefInput,
    pub name: String,
    /// Runtime name when it differs from `name`.
    #[serde(default)]
    pub il2cpp_name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterInput>,
    #[serde(default)]
    pub specifiers: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default = "unknown_i64")]
    pub rva: i64,
    #[serde(default = "unknown_i64")]
    pub offset: i64,
    #[serde(default = "unknown_i64")]
    pub va: i64,
    #[serde(default = "unknown_i32")]
    pub slot: i32,
    #[serde(default)]
    pub implemented_from: Option<TypeRefInput>,
    #[serde(default)]
    pub generic: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInput {
    #[serde(rename = "type")]
    pub ty: TypeRefInput,
    pub name: String,
    #[serde(default)]
    pub get: bool,
    #[serde(default)]
    pub set: bool,
    #[serde(default)]
    pub specifiers: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

fn specifiers(words: &[String]) -> Specifiers {
    Specifiers::from_words(words.iter().map(String::as_str))
}

fn attributes(names: &[String]) -> Vec<Attribute> {
    names
        .iter()
        .map(|name| Attribute { name: name.clone() })
        .collect()
}

/// Realize one declaration (without its nested declarations).
///
/// Members whose references fail to resolve are dropped; their errors are
/// returned alongside the realized type.
pub(crate) fn realize(
    input: &TypeInput,
    this: TypeRefId,
    resolver: &RefResolver,
) -> (TypeData, Vec<IrError>) {
    let mut errors = Vec::new();
    let mut keep = |result: Result<TypeRefId, IrError>| match result {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::warn!(%err, "dropping declaration with unreadable type reference");
            errors.push(err);
            None
        }
    };

    let parent = input.parent.as_ref().and_then(|p| keep(p.resolve(resolver)));
    let interfaces = input
        .interfaces
        .iter()
        .filter_map(|i| keep(i.resolve(resolver)))
        .collect();

    let fields = input
        .fields
        .iter()
        .filter_map(|f| {
            let ty = keep(f.ty.resolve(resolver))?;
            Some(Field {
                declaring_type: this,
                ty,
                name: f.name.clone(),
                specifiers: specifiers(&f.specifiers),
                attributes: attributes(&f.attributes),
                offset: f.offset,
            })
        })
        .collect();

    let methods = input
        .methods
        .iter()
        .filter_map(|m| realize_method(m, this, resolver, &mut keep))
        .collect();

    let properties = input
        .properties
        .iter()
        .filter_map(|p| {
            let ty = keep(p.ty.resolve(resolver))?;
            Some(Property {
                declaring_type: this,
                ty,
                name: p.name.clone(),
                has_getter: p.get,
                has_setter: p.set,
                specifiers: specifiers(&p.specifiers),
                attributes: attributes(&p.attributes),
            })
        })
        .collect();

    let data = TypeData {
        this,
        kind: input.kind,
        parent,
        interfaces,
        fields,
        methods,
        properties,
        specifiers: specifiers(&input.specifiers),
        attributes: attributes(&input.attributes),
        type_def_index: input.type_def_index,
    };
    (data, errors)
}

fn realize_method(
    input: &MethodInput,
    this: TypeRefId,
    resolver: &RefResolver,
    keep: &mut impl FnMut(Result<TypeRefId, IrError>) -> Option<TypeRefId>,
) -> Option<Method> {
    let return_type = keep(input.return_type.resolve(resolver))?;
    let mut parameters = Vec::with_capacity(input.parameters.len());
    for p in &input.parameters {
        parameters.push(Parameter {
            ty: keep(p.ty.resolve(resolver))?,
            name: p.name.clone(),
            modifier: p.modifier,
        });
    }

    let mut name = input.name.clone();
    let mut implemented_from = match &input.implemented_from {
        Some(iface) => Some(keep(iface.resolve(resolver))?),
        None => None,
    };
    // Explicit implementations are dumped as `Iface.Method`.
    if implemented_from.is_none() {
        if let Some((iface, short)) = split_explicit_name(&input.name) {
            if let Ok(id) = resolver.resolve_dump_text("", iface) {
                implemented_from = Some(id);
                name = short.to_owned();
            }
        }
    }

    Some(Method {
        declaring_type: this,
        return_type,
        name,
        il2cpp_name: input.il2cpp_name.clone().unwrap_or_else(|| input.name.clone()),
        parameters,
        specifiers: specifiers(&input.specifiers),
        attributes: attributes(&input.attributes),
        rva: input.rva,
        offset: input.offset,
        va: input.va,
        slot: input.slot,
        implemented_from,
        generic: input.generic,
    })
}

/// Split `Iface.Method` at the last `.` outside generic brackets. Names that
/// start with `.` (`.ctor`, `.cctor`) are never split.
fn split_explicit_name(name: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut split = None;
    for (i, b) in name.bytes().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b'.' if depth == 0 && i > 0 => split = Some(i),
            _ => {}
        }
    }
    let pos = split?;
    let short = &name[pos + 1..];
    (!short.is_empty()).then(|| (&name[..pos], short))
}
