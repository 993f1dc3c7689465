//! Type serializer: assembles one header and, when needed, one source unit.
//!
//! Header layout, in order:
//!
//! ```text
//! banner, #pragma once, runtime includes
//! includes of every type needed by value or inherited from
//! forward declarations, grouped by namespace
//! generic instantiation list
//! namespace Ns {
//!     provenance comment, implemented interfaces
//!     struct Name : public Base { fields, static accessors, properties };
//! }
//! namespace Ns::Name_methods { method declarations }
//! ```
//!
//! Interfaces, generic definitions and types without methods get no source
//! unit. Their accessors and methods are defined inline in the header.

mod field;
mod method;
mod static_field;

use std::collections::BTreeMap;

use shim_diagnostic::ShimError;
use shim_ir::{TypeData, TypeDataId, TypeName};

use crate::{
    header_path, CppOptions, CppWriter, Graph, OutputStyle, ResolutionContext, Slot, TypeOutput,
    UnresolvedRef, BANNER,
};

/// Result of serializing one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Serialized {
    Unit(TypeOutput),
    /// Generic definition left out under `GenericHandling::Skip`.
    Skipped,
}

/// Serialize a resolved type.
///
/// Fails only when an unresolved reference was elevated to the type.
#[tracing::instrument(level = "debug", skip_all, fields(ty = %graph.names.get(cx.type_id())))]
pub fn serialize_type(
    graph: &Graph<'_>,
    options: &CppOptions,
    cx: &ResolutionContext,
) -> Result<Serialized, ShimError> {
    let tid = cx.type_id();
    let name = graph.names.get(tid);
    if cx.is_skipped() {
        return Ok(Serialized::Skipped);
    }
    if let Some(failure) = cx.failure() {
        return Err(failure.clone().into_error(&name.to_string()));
    }

    let data = graph.collection.get(tid);
    let scope = TypeScope {
        graph,
        options,
        cx,
        data,
        name,
        has_source: !data.is_interface()
            && !data.methods.is_empty()
            && cx.template_parameters().is_empty(),
    };

    let header = scope.header();
    let source = scope.has_source.then(|| scope.source());
    Ok(Serialized::Unit(TypeOutput { header, source }))
}

/// Everything the member serializers need about the type being emitted.
pub(crate) struct TypeScope<'s, 'a> {
    graph: &'s Graph<'a>,
    options: &'s CppOptions,
    cx: &'s ResolutionContext,
    data: &'s TypeData,
    name: &'s TypeName,
    /// Definitions go to a separate source unit instead of the header.
    has_source: bool,
}

impl TypeScope<'_, '_> {
    fn header(&self) -> String {
        let mut w = CppWriter::new();
        w.line(BANNER);
        w.line("#pragma once");
        if self.options.output_style == OutputStyle::Normal {
            w.line("#include <optional>");
        }
        w.line("#include \"utils/typedefs.h\"");
        if !self.has_source {
            w.line("#include \"utils/il2cpp-utils.hpp\"");
        }
        self.write_includes(&mut w);
        self.write_forward_declares(&mut w);
        self.write_instantiations(&mut w);

        w.blank();
        w.comment(&format!("Type namespace: {}", self.name.namespace));
        w.open(&format!("namespace {}", self.name.cpp_namespace()));
        self.write_type(&mut w);
        w.close("}");

        method::declare(self, &mut w);
        w.finish()
    }

    fn source(&self) -> String {
        let mut w = CppWriter::new();
        w.line(BANNER);
        w.line(&format!("#include \"{}\"", header_path(self.name)));
        w.line("#include \"utils/il2cpp-utils.hpp\"");
        static_field::define(self, &mut w);
        method::define(self, &mut w);
        w.finish()
    }

    fn write_includes(&self, w: &mut CppWriter) {
        let mut includes: Vec<(String, &TypeName)> = self
            .cx
            .includes()
            .into_iter()
            .map(|tid| {
                let name = self.graph.names.get(tid);
                (header_path(name), name)
            })
            .collect();
        includes.sort_by(|a, b| a.0.cmp(&b.0));
        includes.dedup_by(|a, b| a.0 == b.0);
        if includes.is_empty() {
            return;
        }
        w.blank();
        for (path, name) in includes {
            w.comment(&format!("Including type: {name}"));
            w.line(&format!("#include \"{path}\""));
        }
    }

    fn write_forward_declares(&self, w: &mut CppWriter) {
        let mut by_namespace: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for tid in self.cx.forward_declares() {
            let name = self.graph.names.get(tid);
            by_namespace
                .entry(name.cpp_namespace())
                .or_default()
                .push(self.forward_declaration(tid, name));
        }
        for (namespace, mut declarations) in by_namespace {
            declarations.sort();
            w.blank();
            w.comment(&format!("Forward declaring namespace: {namespace}"));
            w.open(&format!("namespace {namespace}"));
            for declaration in declarations {
                w.declaration(&declaration);
            }
            w.close("}");
        }
    }

    fn forward_declaration(&self, tid: TypeDataId, name: &TypeName) -> String {
        let resolver = self.graph.resolver;
        let params = resolver.generic_parameters(self.graph.collection.get(tid).this);
        if params.is_empty() {
            return format!("struct {}", name.name);
        }
        let params: Vec<String> = params
            .iter()
            .map(|p| format!("typename {}", shim_ir::safe_name(resolver.get(*p).name())))
            .collect();
        format!("template<{}> struct {}", params.join(", "), name.name)
    }

    fn write_instantiations(&self, w: &mut CppWriter) {
        let mut described: Vec<String> = self
            .cx
            .instantiations()
            .map(|id| self.graph.resolver.describe(id))
            .collect();
        if described.is_empty() {
            return;
        }
        described.sort();
        described.dedup();
        w.blank();
        w.block_comment(&format!("Generic instantiations:\n{}", described.join("\n")));
    }

    fn write_type(&self, w: &mut CppWriter) {
        let data = self.data;
        let specifiers = data.specifiers.to_string();
        if specifiers.is_empty() {
            w.comment(&format!("Autogenerated type: {}", self.name));
        } else {
            w.comment(&format!("Autogenerated type: {specifiers} {}", self.name));
        }
        if data.type_def_index >= 0 {
            w.comment(&format!("TypeDefIndex: {}", data.type_def_index));
        }
        self.write_interfaces_comment(w);
        for slot in self.cx.interfaces() {
            if let Slot::Diagnostic(unresolved) = slot {
                write_unresolved(w, unresolved);
            }
        }
        if let Slot::Diagnostic(unresolved) = self.cx.parent() {
            write_unresolved(w, unresolved);
        }

        if let Some(template) = template_line(self.cx.template_parameters()) {
            w.line(&template);
        }

        if data.is_interface() {
            w.line(&format!("struct {} : public Il2CppObject {{}};", self.name.name));
            return;
        }

        let declaration = match self.cx.parent().rendered() {
            Some(base) => format!("struct {} : public {base}", self.name.name),
            None => format!("struct {}", self.name.name),
        };
        w.open(&declaration);
        field::declare(self, w);
        static_field::declare(self, w);
        self.write_properties(w);
        w.close("};");
    }

    fn write_interfaces_comment(&self, w: &mut CppWriter) {
        let described: Vec<String> = self
            .data
            .interfaces
            .iter()
            .zip(self.cx.interfaces())
            .filter(|(_, slot)| slot.rendered().is_some())
            .map(|(id, _)| self.graph.resolver.describe(*id))
            .collect();
        if !described.is_empty() {
            w.comment(&format!("Implementing Interfaces: {}", described.join(", ")));
        }
    }

    fn write_properties(&self, w: &mut CppWriter) {
        for property in &self.data.properties {
            let mut accessors = String::new();
            if property.has_getter {
                accessors.push_str(" get;");
            }
            if property.has_setter {
                accessors.push_str(" set;");
            }
            w.comment(&format!(
                "Property: {} {} {{{accessors} }}",
                self.graph.resolver.describe(property.ty),
                property.name
            ));
        }
    }

    /// `"Ns", "Outer/Inner"`, or the class lookup of a generic definition.
    pub(crate) fn class_args(&self) -> String {
        if self.cx.template_parameters().is_empty() {
            let key = self.graph.collection.key(self.cx.type_id());
            format!("\"{}\", \"{}\"", key.namespace, key.path.join("/"))
        } else {
            format!(
                "il2cpp_utils::il2cpp_type_check::il2cpp_no_arg_class<{}>::get()",
                self.self_ref()
            )
        }
    }

    /// How the type itself is passed around: by pointer unless a value type.
    pub(crate) fn self_ref(&self) -> String {
        if self.data.kind.is_value_type() {
            self.cx.self_type().to_owned()
        } else {
            format!("{}*", self.cx.self_type())
        }
    }

    /// `Game::A`, the qualification used by out-of-line definitions.
    pub(crate) fn qualifier(&self) -> String {
        self.cx.self_type().trim_start_matches(':').to_owned()
    }
}

/// `template<typename T, typename U>`, if there are any parameters.
pub(crate) fn template_line(params: &[String]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    let params: Vec<String> = params.iter().map(|p| format!("typename {p}")).collect();
    Some(format!("template<{}>", params.join(", ")))
}

pub(crate) fn write_unresolved(w: &mut CppWriter, unresolved: &UnresolvedRef) {
    w.comment("Unresolved type exception!");
    w.block_comment(&unresolved.diagnostic());
}

/// Wrap a fallible call in a runtime macro. Calls with template arguments
/// get an extra pair of parentheses so their commas survive the macro.
pub(crate) fn wrap(macro_name: &str, call: &str) -> String {
    if call.contains('<') {
        format!("{macro_name}(({call}))")
    } else {
        format!("{macro_name}({call})")
    }
}

#[cfg(test)]
mod tests;
