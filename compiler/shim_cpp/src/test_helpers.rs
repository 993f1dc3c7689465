//! Builds a realized graph from a hand-written model.

// Tests use unwrap for brevity; a panic is a good failure message here.
#![allow(clippy::unwrap_used)]

use shim_ir::input::{
    FieldInput, MethodInput, ModelInput, ParameterInput, TypeInput, TypeRefInput,
};
use shim_ir::{
    MethodIndex, NameTable, ParameterModifier, RefResolver, TypeCollection, TypeDataId, TypeKind,
};

use crate::{CppOptions, Graph, ResolutionContext};

pub(crate) struct Fixture {
    pub resolver: RefResolver,
    pub collection: TypeCollection,
    pub names: NameTable,
    pub methods: MethodIndex,
}

impl Fixture {
    pub fn new(types: Vec<TypeInput>) -> Self {
        let input = ModelInput {
            symbols: Vec::new(),
            types,
        };
        let resolver = RefResolver::new(input.metadata_table());
        let (collection, errors) = TypeCollection::build(&input, &resolver);
        assert!(errors.is_empty(), "{errors:?}");
        let names = NameTable::build(&collection);
        let methods = MethodIndex::build(&collection, &resolver);
        Fixture {
            resolver,
            collection,
            names,
            methods,
        }
    }

    pub fn graph(&self) -> Graph<'_> {
        Graph {
            resolver: &self.resolver,
            collection: &self.collection,
            names: &self.names,
            methods: &self.methods,
        }
    }

    pub fn id(&self, namespace: &str, path: &str) -> TypeDataId {
        self.collection.find(namespace, path).unwrap()
    }

    pub fn resolve(&self, options: &CppOptions, namespace: &str, path: &str) -> ResolutionContext {
        ResolutionContext::resolve(&self.graph(), options, self.id(namespace, path))
    }
}

pub(crate) fn class(namespace: &str, text: &str) -> TypeInput {
    TypeInput::new(TypeRefInput::dump(namespace, text), TypeKind::Class)
}

pub(crate) fn structure(namespace: &str, text: &str) -> TypeInput {
    TypeInput::new(TypeRefInput::dump(namespace, text), TypeKind::Struct)
}

pub(crate) fn interface(namespace: &str, text: &str) -> TypeInput {
    TypeInput::new(TypeRefInput::dump(namespace, text), TypeKind::Interface)
}

pub(crate) fn field(namespace: &str, ty: &str, name: &str) -> FieldInput {
    FieldInput {
        ty: TypeRefInput::dump(namespace, ty),
        name: name.to_owned(),
        specifiers: vec!["public".to_owned()],
        attributes: Vec::new(),
        offset: -1,
    }
}

pub(crate) fn static_field(namespace: &str, ty: &str, name: &str) -> FieldInput {
    FieldInput {
        specifiers: vec!["public".to_owned(), "static".to_owned()],
        ..field(namespace, ty, name)
    }
}

pub(crate) fn method(namespace: &str, ret: &str, name: &str, params: &[(&str, &str)]) -> MethodInput {
    MethodInput {
        return_type: TypeRefInput::dump(namespace, ret),
        name: name.to_owned(),
        il2cpp_name: None,
        parameters: params
            .iter()
            .map(|(ty, name)| ParameterInput {
                ty: TypeRefInput::dump(namespace, ty),
                name: (*name).to_owned(),
                modifier: ParameterModifier::None,
            })
            .collect(),
        specifiers: vec!["public".to_owned()],
        attributes: Vec::new(),
        rva: -1,
        offset: -1,
        va: -1,
        slot: -1,
        implemented_from: None,
        generic: false,
    }
}
