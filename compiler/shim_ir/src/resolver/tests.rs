// Tests use unwrap for brevity; a panic is a good failure message here.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;
use crate::{MetadataSymbol, RefKind};

fn h(raw: u32) -> MetadataHandle {
    MetadataHandle(raw)
}

fn table(symbols: impl IntoIterator<Item = MetadataSymbol>) -> MetadataTable {
    symbols.into_iter().collect()
}

#[test]
fn test_same_handle_same_node() {
    let resolver = RefResolver::new(table([MetadataSymbol::named(h(1), "Game", "Player")]));
    let a = resolver.resolve_metadata(h(1)).unwrap();
    let b = resolver.resolve_metadata(h(1)).unwrap();
    assert_eq!(a, b);
    assert_eq!(resolver.len(), 1);
    assert_eq!(resolver.get(a).to_string(), "Game.Player");
}

#[test]
fn test_unknown_handle_is_an_error() {
    let resolver = RefResolver::default();
    assert_eq!(
        resolver.resolve_metadata(h(9)),
        Err(IrError::UnknownHandle(h(9)))
    );
    assert!(resolver.is_empty());
}

#[test]
fn test_hits_and_misses() {
    let resolver = RefResolver::new(table((0..5).map(|i| {
        MetadataSymbol::named(h(i), "Ns", &format!("T{i}"))
    })));
    for i in 0..5 {
        resolver.resolve_metadata(h(i)).unwrap();
    }
    assert_eq!(resolver.stats(), CacheStats { hits: 0, misses: 5 });

    for _ in 0..3 {
        resolver.resolve_metadata(h(2)).unwrap();
    }
    assert_eq!(resolver.stats(), CacheStats { hits: 3, misses: 5 });
}

#[test]
fn test_fresh_resolver_starts_empty() {
    let first = RefResolver::new(table([MetadataSymbol::named(h(1), "", "A")]));
    first.resolve_metadata(h(1)).unwrap();
    first.resolve_metadata(h(1)).unwrap();
    drop(first);

    let second = RefResolver::default();
    assert_eq!(second.stats(), CacheStats::default());
    assert!(second.is_empty());
}

#[test]
fn test_dump_identity_is_structural() {
    let resolver = RefResolver::default();
    let a = resolver.resolve_dump_text("", "List<int>").unwrap();
    let b = resolver.resolve_dump_text("", "List< int >").unwrap();
    let c = resolver.resolve_dump_text("", "List<float>").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_metadata_and_dump_never_share_nodes() {
    let resolver = RefResolver::new(table([MetadataSymbol::named(h(1), "System", "Int32")]));
    let from_metadata = resolver.resolve_metadata(h(1)).unwrap();
    let from_dump = resolver.resolve_dump_text("", "int").unwrap();
    assert_ne!(from_metadata, from_dump);
    assert!(resolver.get(from_metadata).is_from_metadata());
    assert!(!resolver.get(from_dump).is_from_metadata());
}

#[test]
fn test_dump_relations() {
    let resolver = RefResolver::default();
    let array = resolver.resolve_dump_text("Game", "Outer.Inner<int>[]").unwrap();
    assert_eq!(resolver.get(array).kind(), RefKind::Array { rank: 1 });

    let element = resolver.element_type(array).unwrap();
    let args = resolver.generic_arguments(element).unwrap();
    assert_eq!(args.len(), 1);
    assert_eq!(resolver.get(args[0]).to_string(), "System.Int32");

    let outer = resolver.declaring_type(element).unwrap();
    assert_eq!(resolver.get(outer).to_string(), "Game.Outer");
    assert_eq!(resolver.declaring_type(outer), None);
    assert_eq!(resolver.generic_arguments(outer), None);
}

#[test]
fn test_definition_arguments_are_parameters() {
    let resolver = RefResolver::default();
    let symbol = DumpSymbol::parse_definition("Game", "Pool<T>").unwrap();
    let id = resolver.resolve_dump(&symbol);
    assert_eq!(resolver.generic_arguments(id), None);
    let params = resolver.generic_parameters(id);
    assert_eq!(params.len(), 1);
    assert_eq!(resolver.get(params[0]).name(), "T");
}

#[test]
fn test_cyclic_metadata_relations_terminate() {
    // `Node<T>` whose parameter `T` is declared by `Node<T>` itself, and a
    // nested type whose declaring type lists it as its own generic argument.
    let mut node = MetadataSymbol::named(h(1), "Graph", "Node`1");
    node.generic_parameters = vec![h(2)];
    let mut param = MetadataSymbol::named(h(2), "", "T");
    param.kind = RefKind::GenericParameter;
    param.declaring_type = Some(h(1));
    let mut inner = MetadataSymbol::named(h(3), "", "Edge");
    inner.declaring_type = Some(h(4));
    let mut instance = MetadataSymbol::named(h(4), "Graph", "Node`1");
    instance.generic_arguments = Some(vec![h(3)]);

    let resolver = RefResolver::new(table([node, param, inner, instance]));
    let root = resolver.resolve_metadata(h(1)).unwrap();
    assert_eq!(resolver.resolve_deep(root), 2);

    let edge = resolver.resolve_metadata(h(3)).unwrap();
    assert_eq!(resolver.resolve_deep(edge), 2);
    assert_eq!(resolver.len(), 4);

    let t = resolver.generic_parameters(root)[0];
    assert_eq!(resolver.declaring_type(t), Some(root));
}

#[test]
fn test_dangling_relation_is_dropped() {
    let mut orphan = MetadataSymbol::named(h(1), "", "Orphan");
    orphan.declaring_type = Some(h(99));
    let resolver = RefResolver::new(table([orphan]));
    let id = resolver.resolve_metadata(h(1)).unwrap();
    assert_eq!(resolver.declaring_type(id), None);
}

#[test]
fn test_describe_includes_arguments() {
    let resolver = RefResolver::default();
    let id = resolver
        .resolve_dump_text("Game", "Dictionary<string, List<int>>")
        .unwrap();
    assert_eq!(
        resolver.describe(id),
        "Game.Dictionary<System.String, List<System.Int32>>"
    );
}

#[test]
fn test_deep_generic_nesting() {
    let depth = 200;
    let text = format!("{}int{}", "List<".repeat(depth), ">".repeat(depth));
    let resolver = RefResolver::default();
    let id = resolver.resolve_dump_text("", &text).unwrap();
    assert_eq!(resolver.resolve_deep(id), depth + 1);
}

#[test]
fn test_concurrent_resolution_converges() {
    let resolver = RefResolver::new(table((0..64).map(|i| {
        MetadataSymbol::named(h(i), "Ns", &format!("T{i}"))
    })));

    let per_thread: Vec<Vec<TypeRefId>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..64)
                        .map(|i| resolver.resolve_metadata(h(i)).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    for ids in &per_thread[1..] {
        assert_eq!(ids, &per_thread[0]);
    }
    assert_eq!(resolver.len(), 64);
    let stats = resolver.stats();
    assert_eq!(stats.misses, 64);
    assert_eq!(stats.hits, 64 * 7);
}
