//! Per-type resolution pass.
//!
//! A [`ResolutionContext`] is built once per type, before anything is
//! serialized. It visits every signature the type's output will mention,
//! renders each referenced type, and classifies every realized type it
//! touches as forward-declared or included. After the pass the context is
//! read-only; serializers only consult it.
//!
//! Needs are collected per member and merged only when the whole member
//! rendered, so a member dropped for an unresolved reference leaves no
//! stray includes behind.

use rustc_hash::{FxHashMap, FxHashSet};
use shim_diagnostic::{MemberKind, ShimError, UnresolvedPolicy};
use shim_ir::{Method, Parameter, TypeDataId, TypeRefId};

use crate::cpp_type::{is_implicit_base, Renderer, Usage};
use crate::{CppOptions, GenericHandling, Graph};

/// What a header needs to know about a referenced type.
///
/// Ordered so that the union of two needs is their maximum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NeedAs {
    /// A name-level declaration suffices.
    Forward,
    /// The full definition (layout) is required.
    Include,
}

/// A reference that named no primitive and no realized type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedRef {
    pub kind: MemberKind,
    pub member: String,
    pub reference: String,
}

impl UnresolvedRef {
    pub fn into_error(self, owner: &str) -> ShimError {
        ShimError::UnresolvedReference {
            kind: self.kind,
            owner: owner.to_owned(),
            member: self.member,
            reference: self.reference,
        }
    }

    /// Text of the comment that replaces the member in the output.
    pub fn diagnostic(&self) -> String {
        format!(
            "Unresolved {} `{}`: could not resolve type `{}`",
            self.kind, self.member, self.reference
        )
    }
}

/// Outcome of resolving one member (or one type-scope reference).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<T> {
    Rendered(T),
    /// Unresolved under display-in-file: emitted as a diagnostic comment.
    Diagnostic(UnresolvedRef),
    /// Dropped silently.
    Omitted,
}

impl<T> Slot<T> {
    pub fn rendered(&self) -> Option<&T> {
        match self {
            Slot::Rendered(value) => Some(value),
            Slot::Diagnostic(_) | Slot::Omitted => None,
        }
    }
}

/// Rendered signature of one method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSig {
    pub return_type: String,
    pub parameters: Vec<String>,
    /// Method-level generic parameters, in first-use order.
    pub template_parameters: Vec<String>,
}

#[derive(Debug)]
pub struct ResolutionContext {
    tid: TypeDataId,
    skipped: bool,
    failure: Option<UnresolvedRef>,
    needs: FxHashMap<TypeDataId, NeedAs>,
    instantiations: FxHashSet<TypeRefId>,
    template_parameters: Vec<String>,
    self_type: String,
    parent: Slot<String>,
    interfaces: Vec<Slot<String>>,
    fields: Vec<Slot<String>>,
    methods: Vec<Slot<MethodSig>>,
}

impl ResolutionContext {
    /// Resolve every reference of one type.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %graph.names.get(tid)))]
    pub fn resolve(graph: &Graph<'_>, options: &CppOptions, tid: TypeDataId) -> Self {
        let resolver = graph.resolver;
        let data = graph.collection.get(tid);

        let template_parameters: Vec<String> = resolver
            .generic_parameters(data.this)
            .iter()
            .map(|param| shim_ir::safe_name(resolver.get(*param).name()))
            .collect();

        let mut self_type = graph.names.get(tid).qualified();
        if !template_parameters.is_empty() {
            self_type = format!("{self_type}<{}>", template_parameters.join(", "));
        }

        let mut cx = ResolutionContext {
            tid,
            skipped: false,
            failure: None,
            needs: FxHashMap::default(),
            instantiations: FxHashSet::default(),
            template_parameters,
            self_type,
            parent: Slot::Omitted,
            interfaces: Vec::with_capacity(data.interfaces.len()),
            fields: Vec::with_capacity(data.fields.len()),
            methods: Vec::with_capacity(data.methods.len()),
        };

        if options.generic_handling == GenericHandling::Skip && !cx.template_parameters.is_empty()
        {
            tracing::debug!("skipping generic definition");
            cx.skipped = true;
            return cx;
        }

        let scope = cx.template_parameters.clone();
        let mut pass = Pass {
            graph,
            options,
            scope: &scope,
            cx: &mut cx,
        };
        pass.declaring_type();
        pass.parent();
        pass.interfaces();
        pass.fields();
        pass.methods();

        if let Some(failure) = &cx.failure {
            tracing::debug!(reason = %failure.diagnostic(), "type elevated to failure");
        }
        cx
    }

    pub fn type_id(&self) -> TypeDataId {
        self.tid
    }

    /// Generic definition left out under `GenericHandling::Skip`.
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// First reference whose policy elevated to a type failure.
    pub fn failure(&self) -> Option<&UnresolvedRef> {
        self.failure.as_ref()
    }

    pub fn need(&self, tid: TypeDataId) -> Option<NeedAs> {
        self.needs.get(&tid).copied()
    }

    /// Types to include, in id order.
    pub fn includes(&self) -> Vec<TypeDataId> {
        self.with_need(NeedAs::Include)
    }

    /// Types to forward-declare, in id order.
    pub fn forward_declares(&self) -> Vec<TypeDataId> {
        self.with_need(NeedAs::Forward)
    }

    fn with_need(&self, need: NeedAs) -> Vec<TypeDataId> {
        let mut ids: Vec<_> = self
            .needs
            .iter()
            .filter(|(_, n)| **n == need)
            .map(|(tid, _)| *tid)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Generic instances the type's signatures mention.
    pub fn instantiations(&self) -> impl Iterator<Item = TypeRefId> + '_ {
        self.instantiations.iter().copied()
    }

    /// Template parameter names; empty unless the type is a generic definition.
    pub fn template_parameters(&self) -> &[String] {
        &self.template_parameters
    }

    /// `::Ns::Name` or `::Ns::Name<T>`.
    pub fn self_type(&self) -> &str {
        &self.self_type
    }

    pub fn parent(&self) -> &Slot<String> {
        &self.parent
    }

    pub fn interfaces(&self) -> &[Slot<String>] {
        &self.interfaces
    }

    /// One slot per field of the type, in declaration order.
    pub fn fields(&self) -> &[Slot<String>] {
        &self.fields
    }

    /// One slot per method of the type, in declaration order.
    pub fn methods(&self) -> &[Slot<MethodSig>] {
        &self.methods
    }

    fn add_need(&mut self, tid: TypeDataId, need: NeedAs) {
        if tid == self.tid {
            return;
        }
        self.needs
            .entry(tid)
            .and_modify(|current| *current = (*current).max(need))
            .or_insert(need);
    }
}

/// Mutable state of one resolution pass over one type.
struct Pass<'p, 'a> {
    graph: &'p Graph<'a>,
    options: &'p CppOptions,
    scope: &'p [String],
    cx: &'p mut ResolutionContext,
}

impl<'p, 'a> Pass<'p, 'a> {
    fn renderer(&self) -> Renderer<'p, 'a> {
        Renderer::new(self.graph, self.options.generic_handling, self.scope)
    }

    fn commit(&mut self, renderer: Renderer<'_, '_>) {
        for (tid, need) in renderer.needs {
            self.cx.add_need(tid, need);
        }
        self.cx.instantiations.extend(renderer.instantiations);
    }

    /// Apply the configured policy to an unresolved reference.
    fn unresolved<T>(&mut self, kind: MemberKind, member: &str, missing: TypeRefId) -> Slot<T> {
        let unresolved = UnresolvedRef {
            kind,
            member: member.to_owned(),
            reference: self.graph.resolver.describe(missing),
        };
        match self.options.unresolved.for_kind(kind) {
            UnresolvedPolicy::DisplayInFile => Slot::Diagnostic(unresolved),
            UnresolvedPolicy::SkipIssue => Slot::Omitted,
            UnresolvedPolicy::Elevate => {
                self.cx.failure.get_or_insert(unresolved);
                Slot::Omitted
            }
        }
    }

    fn declaring_type(&mut self) {
        let resolver = self.graph.resolver;
        let this = self.graph.collection.get(self.cx.tid).this;
        let declaring = resolver
            .declaring_type(this)
            .and_then(|id| self.graph.collection.lookup(resolver, id));
        if let Some(declaring) = declaring {
            self.cx.add_need(declaring, NeedAs::Include);
        }
    }

    fn parent(&mut self) {
        let graph = self.graph;
        let data = graph.collection.get(self.cx.tid);
        if data.is_interface() {
            return;
        }
        let Some(parent) = data.parent else {
            return;
        };
        if is_implicit_base(&graph.resolver.get(parent)) {
            return;
        }
        let mut renderer = self.renderer();
        self.cx.parent = match renderer.render(parent, Usage::Base) {
            Ok(text) => {
                self.commit(renderer);
                Slot::Rendered(text)
            }
            Err(missing) => self.unresolved(MemberKind::Type, "base type", missing),
        };
    }

    fn interfaces(&mut self) {
        let graph = self.graph;
        let data = graph.collection.get(self.cx.tid);
        for interface in &data.interfaces {
            let mut renderer = self.renderer();
            let slot = match renderer.render(*interface, Usage::Indirect) {
                Ok(text) => {
                    self.commit(renderer);
                    Slot::Rendered(text)
                }
                Err(missing) => self.unresolved(MemberKind::Type, "interface", missing),
            };
            self.cx.interfaces.push(slot);
        }
    }

    fn fields(&mut self) {
        let graph = self.graph;
        let data = graph.collection.get(self.cx.tid);
        for field in &data.fields {
            let mut renderer = self.renderer();
            let slot = match renderer.render(field.ty, Usage::Value) {
                Ok(text) => {
                    self.commit(renderer);
                    Slot::Rendered(text)
                }
                Err(missing) => self.unresolved(MemberKind::Field, &field.name, missing),
            };
            self.cx.fields.push(slot);
        }
    }

    fn methods(&mut self) {
        let graph = self.graph;
        let data = graph.collection.get(self.cx.tid);
        for method in &data.methods {
            if method.generic && self.options.generic_handling == GenericHandling::Skip {
                self.cx.methods.push(Slot::Omitted);
                continue;
            }
            let mut renderer = self.renderer();
            let slot = match render_signature(&mut renderer, method) {
                Ok(sig) => {
                    self.commit(renderer);
                    Slot::Rendered(sig)
                }
                Err(missing) => self.unresolved(MemberKind::Method, &method.name, missing),
            };
            self.cx.methods.push(slot);
        }
    }
}

fn render_signature(renderer: &mut Renderer<'_, '_>, method: &Method) -> Result<MethodSig, TypeRefId> {
    let return_type = renderer.render(method.return_type, Usage::Value)?;
    let parameters = method
        .parameters
        .iter()
        .map(|param| render_parameter(renderer, param))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MethodSig {
        return_type,
        parameters,
        template_parameters: std::mem::take(&mut renderer.free_parameters),
    })
}

/// `ref`/`out`/`in` parameters pass a reference to the caller's storage.
fn render_parameter(renderer: &mut Renderer<'_, '_>, param: &Parameter) -> Result<String, TypeRefId> {
    if !param.modifier.is_by_ref() {
        return renderer.render(param.ty, Usage::Value);
    }
    let text = renderer.render(param.ty, Usage::Indirect)?;
    if text.ends_with('&') {
        Ok(text)
    } else {
        Ok(format!("{text}&"))
    }
}
