//! C++ spelling of type references.
//!
//! Rendering a reference also reports what the enclosing header needs to
//! know about every realized type it mentions:
//!
//! | use site                              | need      |
//! |---------------------------------------|-----------|
//! | base type, declaring type             | include   |
//! | value type held by value              | include   |
//! | class (always held through a pointer) | forward   |
//! | behind `*`, `&`, `ref`/`out`          | forward   |
//!
//! Primitives and generic parameters need neither.

use shim_ir::{Primitive, RefKind, TypeDataId, TypeRef, TypeRefId};
use smallvec::SmallVec;

use crate::context::NeedAs;
use crate::{GenericHandling, Graph};

/// How a reference is used at one site.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Usage {
    /// Stored, returned or passed by value.
    Value,
    /// Behind a pointer or reference.
    Indirect,
    /// Inherited from; rendered without a pointer.
    Base,
}

/// C++ spelling of a primitive in value position.
pub fn primitive_name(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Void => "void",
        Primitive::Bool => "bool",
        Primitive::Char => "Il2CppChar",
        Primitive::SByte => "int8_t",
        Primitive::Byte => "uint8_t",
        Primitive::Int16 => "int16_t",
        Primitive::UInt16 => "uint16_t",
        Primitive::Int32 => "int",
        Primitive::UInt32 => "uint",
        Primitive::Int64 => "int64_t",
        Primitive::UInt64 => "uint64_t",
        Primitive::Single => "float",
        Primitive::Double => "double",
        Primitive::IntPtr => "System::IntPtr",
        Primitive::UIntPtr => "System::UIntPtr",
        Primitive::String => "Il2CppString*",
        Primitive::Object => "Il2CppObject*",
    }
}

/// Spelling of a primitive used as a base type.
fn primitive_base(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "Il2CppString",
        Primitive::Object => "Il2CppObject",
        other => primitive_name(other),
    }
}

/// Bases every value type has implicitly; they are never emitted.
pub(crate) fn is_implicit_base(node: &TypeRef) -> bool {
    node.namespace() == Primitive::NAMESPACE && matches!(node.name(), "ValueType" | "Enum")
}

pub(crate) fn primitive_of(node: &TypeRef) -> Option<Primitive> {
    if node.kind() == RefKind::Named && !node.is_generic() {
        Primitive::lookup(node.namespace(), node.name())
    } else {
        None
    }
}

/// Renders references for one member (or one type-scope reference) and
/// collects the needs it discovers. Needs are only merged into the context
/// once the whole member rendered.
pub(crate) struct Renderer<'g, 'a> {
    graph: &'g Graph<'a>,
    generic_handling: GenericHandling,
    scope: &'g [String],
    pub(crate) needs: SmallVec<[(TypeDataId, NeedAs); 4]>,
    pub(crate) instantiations: SmallVec<[TypeRefId; 2]>,
    /// Generic parameters seen that the enclosing type does not declare.
    pub(crate) free_parameters: Vec<String>,
}

impl<'g, 'a> Renderer<'g, 'a> {
    pub(crate) fn new(
        graph: &'g Graph<'a>,
        generic_handling: GenericHandling,
        scope: &'g [String],
    ) -> Self {
        Renderer {
            graph,
            generic_handling,
            scope,
            needs: SmallVec::new(),
            instantiations: SmallVec::new(),
            free_parameters: Vec::new(),
        }
    }

    /// Render `id`, or return the first reference that could not be found.
    pub(crate) fn render(&mut self, id: TypeRefId, usage: Usage) -> Result<String, TypeRefId> {
        let resolver = self.graph.resolver;
        let node = resolver.get(id);
        match node.kind() {
            RefKind::GenericParameter => {
                let name = shim_ir::safe_name(node.name());
                if !self.scope.contains(&name) && !self.free_parameters.contains(&name) {
                    self.free_parameters.push(name.clone());
                }
                Ok(name)
            }
            RefKind::Pointer => {
                let element = resolver.element_type(id).ok_or(id)?;
                Ok(format!("{}*", self.render(element, Usage::Indirect)?))
            }
            RefKind::Array { .. } => {
                let element = resolver.element_type(id).ok_or(id)?;
                Ok(format!("::Array<{}>*", self.render(element, Usage::Value)?))
            }
            RefKind::ByRef => {
                let element = resolver.element_type(id).ok_or(id)?;
                Ok(format!("{}&", self.render(element, Usage::Indirect)?))
            }
            RefKind::Named => self.render_named(id, &node, usage),
        }
    }

    fn render_named(
        &mut self,
        id: TypeRefId,
        node: &TypeRef,
        usage: Usage,
    ) -> Result<String, TypeRefId> {
        if let Some(primitive) = primitive_of(node) {
            return Ok(match usage {
                Usage::Base => primitive_base(primitive),
                Usage::Value | Usage::Indirect => primitive_name(primitive),
            }
            .to_owned());
        }

        let resolver = self.graph.resolver;
        // An in-scope generic parameter shadows any type of the same name.
        if !node.is_generic()
            && resolver.declaring_type(id).is_none()
            && self.scope.iter().any(|param| param == node.name())
        {
            return Ok(shim_ir::safe_name(node.name()));
        }

        let tid = self.graph.collection.lookup(resolver, id).ok_or(id)?;
        let data = self.graph.collection.get(tid);
        if self.generic_handling == GenericHandling::Skip
            && !resolver.generic_parameters(data.this).is_empty()
        {
            return Err(id);
        }

        let mut text = self.graph.names.get(tid).qualified();
        if let Some(args) = resolver.generic_arguments(id).filter(|args| !args.is_empty()) {
            let rendered = args
                .iter()
                .map(|arg| self.render(*arg, Usage::Value))
                .collect::<Result<Vec<_>, _>>()?;
            text = format!("{text}<{}>", rendered.join(", "));
            self.instantiations.push(id);
        }

        let by_value = data.kind.is_value_type();
        let need = match usage {
            Usage::Base => NeedAs::Include,
            Usage::Value if by_value => NeedAs::Include,
            Usage::Value | Usage::Indirect => NeedAs::Forward,
        };
        self.needs.push((tid, need));

        if by_value || usage == Usage::Base {
            Ok(text)
        } else {
            Ok(format!("{text}*"))
        }
    }
}
