//! Methods are emitted as free functions in `Ns::Name_methods`. Instance
//! methods take the receiver as an explicit `self` parameter.

use rustc_hash::FxHashMap;
use shim_ir::{Method, MethodId, TypeDataId};

use crate::serialize::{template_line, wrap, write_unresolved, TypeScope};
use crate::{CppWriter, MethodSig, OutputStyle, Slot, UnresolvedRef};

/// Declarations after the type. Types without a source unit get inline
/// definitions instead.
pub(super) fn declare(scope: &TypeScope<'_, '_>, w: &mut CppWriter) {
    if scope.data.methods.is_empty() {
        return;
    }
    w.blank();
    w.open(&format!("namespace {}", methods_namespace(scope)));
    let mut first = true;
    for entry in entries(scope) {
        if !first {
            w.blank();
        }
        first = false;
        match entry {
            Entry::Rendered(emitted) => {
                write_comments(scope, w, &emitted);
                if let Some(template) = &emitted.template {
                    w.line(template);
                }
                if scope.has_source {
                    w.declaration(&emitted.signature(""));
                } else {
                    let prefix = if emitted.template.is_some() { "" } else { "inline " };
                    w.open(&format!("{prefix}{}", emitted.signature("")));
                    w.line(&emitted.body(scope));
                    w.close("}");
                }
            }
            Entry::Diagnostic(unresolved) => write_unresolved(w, unresolved),
        }
    }
    w.close("}");
}

/// Out-of-line definitions for the source unit.
pub(super) fn define(scope: &TypeScope<'_, '_>, w: &mut CppWriter) {
    let qualifier = format!("{}::", methods_namespace(scope));
    for entry in entries(scope) {
        if let Entry::Rendered(emitted) = entry {
            w.blank();
            w.comment(&format!("Autogenerated method: {}", emitted.description));
            w.open(&emitted.signature(&qualifier));
            w.line(&emitted.body(scope));
            w.close("}");
        }
    }
}

/// `Game::A_methods`
fn methods_namespace(scope: &TypeScope<'_, '_>) -> String {
    format!("{}::{}_methods", scope.name.cpp_namespace(), scope.name.name)
}

enum Entry<'s> {
    Rendered(Emitted<'s>),
    Diagnostic(&'s UnresolvedRef),
}

/// A method ready to print: final name, parameters and provenance.
struct Emitted<'s> {
    id: MethodId,
    method: &'s Method,
    sig: &'s MethodSig,
    name: String,
    template: Option<String>,
    return_type: String,
    parameters: Vec<(String, String)>,
    /// `public System.Void Run(System.Int32 count)`, for comments.
    description: String,
}

/// Every emitted method, in declaration order, with duplicate C++
/// signatures renamed `_1`, `_2`, ...
fn entries<'s>(scope: &'s TypeScope<'_, '_>) -> Vec<Entry<'s>> {
    let tid = scope.cx.type_id();
    let mut seen: FxHashMap<String, u32> = FxHashMap::default();
    let mut entries = Vec::new();
    for (index, (method, slot)) in scope.data.methods.iter().zip(scope.cx.methods()).enumerate() {
        match slot {
            Slot::Rendered(sig) => {
                let mut emitted = Emitted::new(scope, method_id(tid, index), method, sig);
                let key = emitted.overload_key();
                let count = seen.entry(key).or_insert(0);
                if *count > 0 {
                    emitted.name = format!("{}_{count}", emitted.name);
                }
                *count += 1;
                entries.push(Entry::Rendered(emitted));
            }
            Slot::Diagnostic(unresolved) => entries.push(Entry::Diagnostic(unresolved)),
            Slot::Omitted => {}
        }
    }
    entries
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "per-type method counts fit in u32"
)]
fn method_id(tid: TypeDataId, index: usize) -> MethodId {
    MethodId::new(tid, index as u32)
}

impl<'s> Emitted<'s> {
    fn new(
        scope: &TypeScope<'_, '_>,
        id: MethodId,
        method: &'s Method,
        sig: &'s MethodSig,
    ) -> Self {
        let naming = &scope.options.naming;
        let key = scope.graph.collection.key(scope.cx.type_id());
        let name = naming.method_name(&key.namespace, key.name(), &method.name);

        let mut template_params = scope.cx.template_parameters().to_vec();
        template_params.extend(sig.template_parameters.iter().cloned());

        let return_type = match scope.options.output_style {
            OutputStyle::Normal if sig.return_type != "void" => {
                format!("std::optional<{}>", sig.return_type)
            }
            _ => sig.return_type.clone(),
        };

        let mut parameters = Vec::with_capacity(method.parameters.len() + 1);
        if !method.is_static() {
            parameters.push((scope.self_ref(), "self".to_owned()));
        }
        for (param, ty) in method.parameters.iter().zip(&sig.parameters) {
            let mut ident = naming.identifier(&param.name);
            while parameters.iter().any(|(_, existing)| *existing == ident) {
                ident.insert(0, '_');
            }
            parameters.push((ty.clone(), ident));
        }

        Emitted {
            id,
            method,
            sig,
            name,
            template: template_line(&template_params),
            return_type,
            parameters,
            description: describe(scope, method),
        }
    }

    /// Name plus parameter types: what C++ overload resolution sees.
    fn overload_key(&self) -> String {
        let types: Vec<&str> = self.parameters.iter().map(|(ty, _)| ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    fn signature(&self, qualifier: &str) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|(ty, name)| format!("{ty} {name}"))
            .collect();
        format!(
            "{} {qualifier}{}({})",
            self.return_type,
            self.name,
            params.join(", ")
        )
    }

    fn body(&self, scope: &TypeScope<'_, '_>) -> String {
        let target = if self.method.is_static() {
            scope.class_args()
        } else {
            "self".to_owned()
        };
        let mut args = String::new();
        let receiver_params = usize::from(!self.method.is_static());
        for (_, name) in &self.parameters[receiver_params..] {
            args.push_str(", ");
            args.push_str(name);
        }

        let returns_value = self.sig.return_type != "void";
        let function = if self.sig.template_parameters.is_empty() {
            "RunMethod"
        } else {
            "RunGenericMethod"
        };
        let type_args = if returns_value {
            format!("<{}>", self.sig.return_type)
        } else {
            String::new()
        };
        let generic_args = if self.sig.template_parameters.is_empty() {
            String::new()
        } else {
            let classes: Vec<String> = self
                .sig
                .template_parameters
                .iter()
                .map(|p| format!("il2cpp_utils::il2cpp_type_check::il2cpp_no_arg_class<{p}>::get()"))
                .collect();
            format!(", std::vector<Il2CppClass*>{{{}}}", classes.join(", "))
        };
        let call = format!(
            "il2cpp_utils::{function}{type_args}({target}, \"{}\"{generic_args}{args})",
            self.method.il2cpp_name
        );

        match (scope.options.output_style.macro_name(), returns_value) {
            (None, true) => format!("return {call};"),
            (None, false) => format!("{};", wrap("RET_V_UNLESS", &call)),
            (Some(macro_name), true) => format!("return {};", wrap(macro_name, &call)),
            (Some(macro_name), false) => format!("{};", wrap(macro_name, &call)),
        }
    }
}

fn write_comments(scope: &TypeScope<'_, '_>, w: &mut CppWriter, emitted: &Emitted<'_>) {
    if let Some(provenance) = provenance(emitted.method) {
        w.comment(&provenance);
    }
    w.comment(&emitted.description);
    for base in scope.graph.methods.base_methods(emitted.id) {
        w.comment(&format!("Base method: {}", method_path(scope, *base)));
    }
    if scope.data.is_interface() {
        for implementation in scope.graph.methods.implementing_methods(emitted.id) {
            w.comment(&format!("Implemented by: {}", method_path(scope, *implementation)));
        }
    }
}

/// `RVA: 0x1A2B Offset: 0x1A2B VA: 0x1A2B Slot: 4`, leaving out unknown
/// parts. `None` when nothing is known.
fn provenance(method: &Method) -> Option<String> {
    let mut parts = Vec::new();
    if method.rva >= 0 {
        parts.push(format!("RVA: 0x{:X}", method.rva));
    }
    if method.offset >= 0 {
        parts.push(format!("Offset: 0x{:X}", method.offset));
    }
    if method.va >= 0 {
        parts.push(format!("VA: 0x{:X}", method.va));
    }
    if method.slot >= 0 {
        parts.push(format!("Slot: {}", method.slot));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn describe(scope: &TypeScope<'_, '_>, method: &Method) -> String {
    let resolver = scope.graph.resolver;
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| format!("{} {}", resolver.describe(p.ty), p.name))
        .collect();
    let specifiers = method.specifiers.to_string();
    let signature = format!(
        "{} {}({})",
        resolver.describe(method.return_type),
        method.name,
        params.join(", ")
    );
    if specifiers.is_empty() {
        signature
    } else {
        format!("{specifiers} {signature}")
    }
}

/// `Game.Base.Run`
fn method_path(scope: &TypeScope<'_, '_>, id: MethodId) -> String {
    let owner = scope.graph.collection.get(id.ty);
    let name = owner
        .methods
        .get(id.index as usize)
        .map_or("?", |m| m.name.as_str());
    format!("{}.{name}", scope.graph.names.get(id.ty))
}

#[cfg(test)]
mod tests {
    use super::provenance;
    use crate::test_helpers::{class, method, Fixture};

    #[test]
    fn test_provenance_omits_unknown_parts() {
        let mut ty = class("Game", "A");
        let mut known = method("Game", "void", "Run", &[]);
        known.rva = 0x1A2B;
        known.slot = 4;
        ty.methods = vec![known, method("Game", "void", "Stop", &[])];
        let fx = Fixture::new(vec![ty]);
        let data = fx.collection.get(fx.id("Game", "A"));
        assert_eq!(provenance(&data.methods[0]).as_deref(), Some("RVA: 0x1A2B Slot: 4"));
        assert_eq!(provenance(&data.methods[1]), None);
    }
}
