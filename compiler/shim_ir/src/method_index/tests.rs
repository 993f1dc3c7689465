// Tests use unwrap for brevity; a panic is a good failure message here.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;
use crate::input::{MethodInput, ModelInput, ParameterInput, TypeInput, TypeRefInput};
use crate::{ParameterModifier, TypeKind};

fn method(name: &str, specifiers: &[&str], params: &[&str]) -> MethodInput {
    MethodInput {
        return_type: TypeRefInput::dump("", "void"),
        name: name.into(),
        il2cpp_name: None,
        parameters: params
            .iter()
            .enumerate()
            .map(|(i, ty)| ParameterInput {
                ty: TypeRefInput::dump("", ty),
                name: format!("p{i}"),
                modifier: ParameterModifier::None,
            })
            .collect(),
        specifiers: specifiers.iter().map(|s| (*s).to_owned()).collect(),
        attributes: Vec::new(),
        rva: -1,
        offset: -1,
        va: -1,
        slot: -1,
        implemented_from: None,
        generic: false,
    }
}

fn ty(text: &str, kind: TypeKind, methods: Vec<MethodInput>) -> TypeInput {
    let mut ty = TypeInput::new(TypeRefInput::dump("Game", text), kind);
    ty.methods = methods;
    ty
}

fn build(types: Vec<TypeInput>) -> (TypeCollection, RefResolver, MethodIndex) {
    let input = ModelInput {
        symbols: Vec::new(),
        types,
    };
    let resolver = RefResolver::default();
    let (collection, errors) = TypeCollection::build(&input, &resolver);
    assert!(errors.is_empty());
    let index = MethodIndex::build(&collection, &resolver);
    (collection, resolver, index)
}

fn id(collection: &TypeCollection, ty: &str, index: u32) -> MethodId {
    MethodId::new(collection.find("Game", ty).unwrap(), index)
}

#[test]
fn test_override_links_to_nearest_overridable_base() {
    let animal = ty(
        "Animal",
        TypeKind::Class,
        vec![
            method("Speak", &["public", "virtual"], &[]),
            method("Eat", &["public", "virtual"], &["int"]),
        ],
    );
    let mut dog = ty(
        "Dog",
        TypeKind::Class,
        vec![method("Speak", &["public", "override"], &[])],
    );
    dog.parent = Some(TypeRefInput::dump("", "Animal"));
    let mut puppy = ty(
        "Puppy",
        TypeKind::Class,
        vec![
            method("Speak", &["public", "override"], &[]),
            method("Eat", &["public", "override"], &["int"]),
            method("Eat", &["public", "override"], &["float"]),
        ],
    );
    puppy.parent = Some(TypeRefInput::dump("", "Dog"));

    let (c, _, index) = build(vec![animal, dog, puppy]);

    assert_eq!(index.base_methods(id(&c, "Dog", 0)), [id(&c, "Animal", 0)]);
    assert_eq!(index.base_methods(id(&c, "Puppy", 0)), [id(&c, "Dog", 0)]);
    assert_eq!(index.base_methods(id(&c, "Puppy", 1)), [id(&c, "Animal", 1)]);
    assert!(index.base_methods(id(&c, "Puppy", 2)).is_empty());
    assert_eq!(
        index.implementing_methods(id(&c, "Animal", 0)),
        [id(&c, "Dog", 0)]
    );
}

#[test]
fn test_implicit_and_explicit_interface_implementations() {
    let iface = ty(
        "IRunner",
        TypeKind::Interface,
        vec![
            method("Run", &["public", "abstract"], &[]),
            method("Stop", &["public", "abstract"], &[]),
        ],
    );
    let mut runner = ty(
        "Runner",
        TypeKind::Class,
        vec![
            method("Run", &["public"], &[]),
            method("IRunner.Stop", &["private"], &[]),
            method("Helper", &["public"], &[]),
        ],
    );
    runner.interfaces.push(TypeRefInput::dump("", "IRunner"));

    let (c, _, index) = build(vec![iface, runner]);

    assert_eq!(index.base_methods(id(&c, "Runner", 0)), [id(&c, "IRunner", 0)]);
    assert_eq!(index.base_methods(id(&c, "Runner", 1)), [id(&c, "IRunner", 1)]);
    assert!(index.base_methods(id(&c, "Runner", 2)).is_empty());
    assert_eq!(
        index.implementing_methods(id(&c, "IRunner", 1)),
        [id(&c, "Runner", 1)]
    );
}

#[test]
fn test_cyclic_parents_terminate() {
    let mut a = ty("A", TypeKind::Class, vec![method("M", &["override"], &[])]);
    a.parent = Some(TypeRefInput::dump("", "B"));
    let mut b = ty("B", TypeKind::Class, Vec::new());
    b.parent = Some(TypeRefInput::dump("", "A"));

    let (c, _, index) = build(vec![a, b]);
    assert!(index.base_methods(id(&c, "A", 0)).is_empty());
}
