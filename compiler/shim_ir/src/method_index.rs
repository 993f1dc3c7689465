//! Override and interface-implementation links between methods.
//!
//! Built once, after the whole collection is realized. Links only ever point
//! at methods of realized types; a base or interface outside the collection
//! simply yields no link.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Method, MethodId, RefResolver, Specifiers, TypeCollection, TypeDataId};

#[derive(Debug, Default)]
pub struct MethodIndex {
    /// Method -> the methods it overrides or implements.
    bases: FxHashMap<MethodId, Vec<MethodId>>,
    /// Method -> the methods that override or implement it.
    implementations: FxHashMap<MethodId, Vec<MethodId>>,
}

impl MethodIndex {
    #[tracing::instrument(level = "debug", skip_all, fields(types = collection.len()))]
    pub fn build(collection: &TypeCollection, resolver: &RefResolver) -> Self {
        let mut index = MethodIndex::default();
        for (tid, ty) in collection.iter() {
            let interfaces: Vec<TypeDataId> = ty
                .interfaces
                .iter()
                .filter_map(|i| collection.lookup(resolver, *i))
                .collect();

            for (id, method) in method_ids(tid, &ty.methods) {
                if method.specifiers.contains(Specifiers::OVERRIDE) {
                    if let Some(base) = find_overridden(collection, resolver, tid, method) {
                        index.link(id, base);
                    }
                }

                if let Some(iface) = method.implemented_from {
                    let target = collection
                        .lookup(resolver, iface)
                        .and_then(|iface| find_in(collection, iface, method, |_| true));
                    if let Some(target) = target {
                        index.link(id, target);
                    }
                } else if !ty.is_interface() && !method.is_static() {
                    for iface in &interfaces {
                        if let Some(target) = find_in(collection, *iface, method, |_| true) {
                            index.link(id, target);
                        }
                    }
                }
            }
        }
        tracing::debug!(links = index.bases.len(), "method index built");
        index
    }

    fn link(&mut self, method: MethodId, base: MethodId) {
        self.bases.entry(method).or_default().push(base);
        self.implementations.entry(base).or_default().push(method);
    }

    /// Methods `id` overrides or implements, base-chain link first.
    pub fn base_methods(&self, id: MethodId) -> &[MethodId] {
        self.bases.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Methods overriding or implementing `id`, in collection order.
    pub fn implementing_methods(&self, id: MethodId) -> &[MethodId] {
        self.implementations.get(&id).map_or(&[], Vec::as_slice)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "per-type method counts fit in u32"
)]
fn method_ids(tid: TypeDataId, methods: &[Method]) -> impl Iterator<Item = (MethodId, &Method)> {
    methods
        .iter()
        .enumerate()
        .map(move |(i, m)| (MethodId::new(tid, i as u32), m))
}

/// First overridable method with the same signature up the parent chain.
fn find_overridden(
    collection: &TypeCollection,
    resolver: &RefResolver,
    tid: TypeDataId,
    method: &Method,
) -> Option<MethodId> {
    let mut seen = FxHashSet::default();
    seen.insert(tid);
    let mut current = collection.parent_of(resolver, tid);
    while let Some(parent) = current {
        if !seen.insert(parent) {
            return None;
        }
        if let Some(found) = find_in(collection, parent, method, |m| m.specifiers.is_overridable())
        {
            return Some(found);
        }
        current = collection.parent_of(resolver, parent);
    }
    None
}

fn find_in(
    collection: &TypeCollection,
    tid: TypeDataId,
    method: &Method,
    accept: impl Fn(&Method) -> bool,
) -> Option<MethodId> {
    method_ids(tid, &collection.get(tid).methods)
        .find(|(_, candidate)| candidate.same_signature(method) && accept(candidate))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests;
