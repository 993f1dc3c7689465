//! Memoizing resolver from raw input identity to canonical `TypeRef`.
//!
//! Every lookup goes through one concurrent identity cache:
//!
//! ```text
//! MetadataHandle ─┐
//!                 ├──► RefKey ──► cache (DashMap) ──► TypeRefId ──► node arena
//! DumpSymbol ─────┘
//! ```
//!
//! # Concurrency
//!
//! The cache uses the `DashMap` entry API: the shard stays write-locked from
//! the miss check until the new id is stored, so two threads racing on the
//! same unseen key converge on one node. Lock order is always cache shard,
//! then arena; nothing takes them the other way round.
//!
//! # Cycles
//!
//! A node is inserted into the cache before any of its relations are
//! resolved, and relations are only resolved lazily (on first access).
//! A relation that leads back to an in-progress node therefore finds it in
//! the cache instead of recursing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::stack::ensure_sufficient_stack;
use crate::type_ref::{RefList, RefOrigin};
use crate::{
    DumpSymbol, IrError, MetadataHandle, MetadataTable, ParseFormatError, TypeRef, TypeRefId,
};

/// Raw input identity. Equal keys always map to the identical node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum RefKey {
    Metadata(MetadataHandle),
    Dump(DumpSymbol),
}

/// Hit/miss counters of the identity cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Run-scoped owner of every `TypeRef` node.
pub struct RefResolver {
    metadata: MetadataTable,
    cache: DashMap<RefKey, TypeRefId, FxBuildHasher>,
    nodes: RwLock<Vec<Arc<TypeRef>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl RefResolver {
    /// Create a resolver over the metadata symbol table of one run.
    pub fn new(metadata: MetadataTable) -> Self {
        RefResolver {
            metadata,
            cache: DashMap::with_hasher(FxBuildHasher),
            nodes: RwLock::new(Vec::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Resolve a metadata handle to its canonical node.
    pub fn resolve_metadata(&self, handle: MetadataHandle) -> Result<TypeRefId, IrError> {
        let Some(symbol) = self.metadata.get(handle) else {
            return Err(IrError::UnknownHandle(handle));
        };
        Ok(self.intern(RefKey::Metadata(handle), |id| {
            TypeRef::from_metadata(id, handle, symbol)
        }))
    }

    /// Resolve an already-parsed dump symbol to its canonical node.
    pub fn resolve_dump(&self, symbol: &DumpSymbol) -> TypeRefId {
        self.intern(RefKey::Dump(symbol.clone()), |id| {
            TypeRef::from_dump(id, symbol.clone())
        })
    }

    /// Parse and resolve a dump type reference.
    pub fn resolve_dump_text(
        &self,
        namespace: &str,
        text: &str,
    ) -> Result<TypeRefId, ParseFormatError> {
        let symbol = DumpSymbol::parse(namespace, text)?;
        Ok(self.resolve_dump(&symbol))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a run never holds more than u32::MAX distinct type symbols"
    )]
    fn intern(&self, key: RefKey, make: impl FnOnce(TypeRefId) -> TypeRef) -> TypeRefId {
        match self.cache.entry(key) {
            Entry::Occupied(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                *entry.get()
            }
            Entry::Vacant(entry) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let id = {
                    let mut nodes = self.nodes.write();
                    let id = TypeRefId::new(nodes.len() as u32);
                    nodes.push(Arc::new(make(id)));
                    id
                };
                entry.insert(id);
                id
            }
        }
    }

    /// Look up a node.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this resolver.
    pub fn get(&self, id: TypeRefId) -> Arc<TypeRef> {
        Arc::clone(&self.nodes.read()[id.index()])
    }

    /// Look up a node, returning `None` for ids from another resolver.
    pub fn try_get(&self, id: TypeRefId) -> Option<Arc<TypeRef>> {
        self.nodes.read().get(id.index()).cloned()
    }

    /// Declared generic parameters, in order. Empty for non-generic types
    /// and for generic instances that only carry arguments.
    pub fn generic_parameters(&self, id: TypeRefId) -> RefList {
        let node = self.get(id);
        node.generic_parameters
            .get_or_init(|| match &node.origin {
                RefOrigin::Metadata(handle) => self
                    .metadata
                    .get(*handle)
                    .map(|symbol| self.resolve_handles(&symbol.generic_parameters))
                    .unwrap_or_default(),
                RefOrigin::Dump(symbol) if symbol.is_definition() => symbol
                    .arguments()
                    .iter()
                    .map(|arg| self.resolve_dump(arg))
                    .collect(),
                RefOrigin::Dump(_) => RefList::new(),
            })
            .clone()
    }

    /// Generic arguments, in order. `None` when the input does not specify
    /// any (including every generic definition).
    pub fn generic_arguments(&self, id: TypeRefId) -> Option<RefList> {
        let node = self.get(id);
        node.generic_arguments
            .get_or_init(|| match &node.origin {
                RefOrigin::Metadata(handle) => self
                    .metadata
                    .get(*handle)
                    .and_then(|symbol| symbol.generic_arguments.as_ref())
                    .map(|args| self.resolve_handles(args)),
                RefOrigin::Dump(symbol) => {
                    if symbol.is_definition() || !node.is_generic() {
                        None
                    } else {
                        Some(
                            symbol
                                .arguments()
                                .iter()
                                .map(|arg| self.resolve_dump(arg))
                                .collect(),
                        )
                    }
                }
            })
            .clone()
    }

    /// Enclosing type of a nested type.
    pub fn declaring_type(&self, id: TypeRefId) -> Option<TypeRefId> {
        let node = self.get(id);
        *node.declaring_type.get_or_init(|| match &node.origin {
            RefOrigin::Metadata(handle) => self
                .metadata
                .get(*handle)
                .and_then(|symbol| symbol.declaring_type)
                .and_then(|declaring| self.resolve_handle(declaring)),
            RefOrigin::Dump(symbol) => symbol.declaring().map(|d| self.resolve_dump(&d)),
        })
    }

    /// Pointee, array element or by-ref target.
    pub fn element_type(&self, id: TypeRefId) -> Option<TypeRefId> {
        let node = self.get(id);
        *node.element_type.get_or_init(|| match &node.origin {
            RefOrigin::Metadata(handle) => self
                .metadata
                .get(*handle)
                .and_then(|symbol| symbol.element_type)
                .and_then(|element| self.resolve_handle(element)),
            RefOrigin::Dump(symbol) => symbol.element().map(|e| self.resolve_dump(&e)),
        })
    }

    fn resolve_handle(&self, handle: MetadataHandle) -> Option<TypeRefId> {
        match self.resolve_metadata(handle) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::debug!(%err, "dropping dangling metadata relation");
                None
            }
        }
    }

    fn resolve_handles(&self, handles: &[MetadataHandle]) -> RefList {
        handles.iter().filter_map(|h| self.resolve_handle(*h)).collect()
    }

    /// Human-readable form for diagnostics: `Ns.Name<Arg, Arg>`.
    pub fn describe(&self, id: TypeRefId) -> String {
        ensure_sufficient_stack(|| {
            let node = self.get(id);
            let mut text = node.to_string();
            if let Some(args) = self.generic_arguments(id) {
                text.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        text.push_str(", ");
                    }
                    text.push_str(&self.describe(*arg));
                }
                text.push('>');
            }
            text
        })
    }

    /// Force every relation reachable from `root`, returning the number of
    /// distinct nodes visited. Cycles terminate at already-visited nodes.
    pub fn resolve_deep(&self, root: TypeRefId) -> usize {
        let mut seen = FxHashSet::default();
        self.walk(root, &mut seen);
        seen.len()
    }

    fn walk(&self, id: TypeRefId, seen: &mut FxHashSet<TypeRefId>) {
        if !seen.insert(id) {
            return;
        }
        ensure_sufficient_stack(|| {
            let mut related: RefList = self.generic_parameters(id);
            related.extend(self.generic_arguments(id).unwrap_or_default());
            related.extend(self.declaring_type(id));
            related.extend(self.element_type(id));
            for next in related {
                self.walk(next, seen);
            }
        });
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of distinct nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RefResolver {
    fn default() -> Self {
        Self::new(MetadataTable::new())
    }
}

#[cfg(test)]
mod tests;
