//! The enumerable set of realized types.
//!
//! Types are stored in discovery order (declaration order of the input,
//! nested types immediately after their declaring type). That order is the
//! one every later pass iterates in, so output never depends on hashing or
//! thread scheduling.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::input::{realize, ModelInput, TypeInput};
use crate::{IrError, RefKind, RefResolver, TypeData, TypeDataId, TypeRefId};

/// Upper bound on declaring-type chains; deeper chains are treated as cyclic.
const MAX_NESTING: usize = 64;

/// Name-level identity of a realized type, independent of input format.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeKey {
    /// Namespace of the outermost declaring type.
    pub namespace: String,
    /// Nesting path, outermost first, without arity markers.
    pub path: Vec<String>,
    pub arity: usize,
}

impl TypeKey {
    /// Key of a named reference. `None` for pointers, arrays, by-refs and
    /// generic parameters, which never name a realized type.
    pub fn of(resolver: &RefResolver, id: TypeRefId) -> Option<TypeKey> {
        let node = resolver.get(id);
        if node.kind() != RefKind::Named {
            return None;
        }
        let arity = resolver
            .generic_arguments(id)
            .map_or_else(|| resolver.generic_parameters(id).len(), |args| args.len());

        let mut path = vec![node.base_name().to_owned()];
        let mut namespace = node.namespace().to_owned();
        let mut current = id;
        while let Some(outer) = resolver.declaring_type(current) {
            if path.len() > MAX_NESTING {
                return None;
            }
            let outer_node = resolver.get(outer);
            path.push(outer_node.base_name().to_owned());
            namespace = outer_node.namespace().to_owned();
            current = outer;
        }
        path.reverse();
        Some(TypeKey {
            namespace,
            path,
            arity,
        })
    }

    /// Innermost simple name.
    pub fn name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }

    fn declares(&self, nested: &TypeKey) -> bool {
        nested.namespace == self.namespace
            && nested.path.len() == self.path.len() + 1
            && nested.path.starts_with(&self.path)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace.is_empty() {
            write!(f, "{}.", self.namespace)?;
        }
        f.write_str(&self.path.join("."))
    }
}

#[derive(Default)]
pub struct TypeCollection {
    types: Vec<TypeData>,
    keys: Vec<TypeKey>,
    by_ref: FxHashMap<TypeRefId, TypeDataId>,
    by_key: FxHashMap<TypeKey, TypeDataId>,
    /// Namespace-less lookup for dump references, which never carry one.
    by_path: FxHashMap<(Vec<String>, usize), TypeDataId>,
}

impl TypeCollection {
    /// Realize every declaration of `input`.
    ///
    /// Returns the collection together with every declaration-level error.
    /// A failed declaration is absent from the collection (with its nested
    /// declarations); every other declaration is still realized.
    #[tracing::instrument(level = "debug", skip_all, fields(declarations = input.types.len()))]
    pub fn build(input: &ModelInput, resolver: &RefResolver) -> (Self, Vec<IrError>) {
        let mut collection = TypeCollection::default();
        let mut errors = Vec::new();
        for ty in &input.types {
            collection.add(ty, None, resolver, &mut errors);
        }
        tracing::debug!(
            types = collection.len(),
            errors = errors.len(),
            "type collection realized"
        );
        (collection, errors)
    }

    fn add(
        &mut self,
        input: &TypeInput,
        outer: Option<&TypeKey>,
        resolver: &RefResolver,
        errors: &mut Vec<IrError>,
    ) {
        let this = match input.this.resolve_definition(resolver) {
            Ok(this) => this,
            Err(err) => {
                tracing::warn!(%err, "dropping type declaration");
                errors.push(err);
                return;
            }
        };
        let Some(key) = TypeKey::of(resolver, this) else {
            errors.push(IrError::NotADefinition(resolver.describe(this)));
            return;
        };
        if let Some(outer) = outer {
            if !outer.declares(&key) {
                errors.push(IrError::NestingMismatch {
                    nested: key.to_string(),
                    expected: outer.to_string(),
                });
                return;
            }
        }

        let (data, member_errors) = realize(input, this, resolver);
        errors.extend(member_errors);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "type counts are bounded by the runtime's u32 definition index"
        )]
        let tid = TypeDataId::new(self.types.len() as u32);
        self.types.push(data);
        self.by_ref.entry(this).or_insert(tid);
        self.by_key.entry(key.clone()).or_insert(tid);
        self.by_path
            .entry((key.path.clone(), key.arity))
            .or_insert(tid);
        self.keys.push(key.clone());

        for nested in &input.nested {
            self.add(nested, Some(&key), resolver, errors);
        }
    }

    /// Find the realized type a reference names, if any.
    pub fn lookup(&self, resolver: &RefResolver, id: TypeRefId) -> Option<TypeDataId> {
        if let Some(tid) = self.by_ref.get(&id) {
            return Some(*tid);
        }
        let key = TypeKey::of(resolver, id)?;
        if let Some(tid) = self.by_key.get(&key) {
            return Some(*tid);
        }
        if !key.namespace.is_empty() {
            return None;
        }
        if let Some(tid) = self.by_path.get(&(key.path.clone(), key.arity)) {
            return Some(*tid);
        }
        // Qualified dump text (`System.Collections.IEnumerable`): leading
        // segments may spell the namespace.
        (1..key.path.len()).find_map(|split| {
            let qualified = TypeKey {
                namespace: key.path[..split].join("."),
                path: key.path[split..].to_vec(),
                arity: key.arity,
            };
            self.by_key.get(&qualified).copied()
        })
    }

    /// Find a type by namespace and dotted nesting path, any arity.
    pub fn find(&self, namespace: &str, path: &str) -> Option<TypeDataId> {
        self.keys
            .iter()
            .position(|k| k.namespace == namespace && k.path.join(".") == path)
            .and_then(|i| self.ids().nth(i))
    }

    pub fn get(&self, tid: TypeDataId) -> &TypeData {
        &self.types[tid.index()]
    }

    pub fn key(&self, tid: TypeDataId) -> &TypeKey {
        &self.keys[tid.index()]
    }

    /// Realized base type, when the parent names one in this collection.
    pub fn parent_of(&self, resolver: &RefResolver, tid: TypeDataId) -> Option<TypeDataId> {
        self.get(tid)
            .parent
            .and_then(|parent| self.lookup(resolver, parent))
            .filter(|parent| *parent != tid)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "type counts are bounded by the runtime's u32 definition index"
    )]
    pub fn ids(&self) -> impl ExactSizeIterator<Item = TypeDataId> {
        (0..self.types.len()).map(|i| TypeDataId::new(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeDataId, &TypeData)> {
        self.ids().zip(self.types.iter())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
