// Tests use unwrap for brevity; a panic is a good failure message here.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use shim_diagnostic::{ErrorCode, UnresolvedPolicy};
use shim_ir::input::{ParameterInput, TypeInput, TypeRefInput};
use shim_ir::ParameterModifier;

use super::*;
use crate::test_helpers::{class, field, interface, method, static_field, structure, Fixture};
use crate::{GenericHandling, UnresolvedHandling};

fn emit(fx: &Fixture, options: &CppOptions, namespace: &str, path: &str) -> Serialized {
    let cx = fx.resolve(options, namespace, path);
    serialize_type(&fx.graph(), options, &cx).unwrap()
}

fn unit(fx: &Fixture, options: &CppOptions, namespace: &str, path: &str) -> TypeOutput {
    match emit(fx, options, namespace, path) {
        Serialized::Unit(output) => output,
        Serialized::Skipped => panic!("{namespace}.{path} was skipped"),
    }
}

fn styled(style: OutputStyle) -> CppOptions {
    CppOptions {
        output_style: style,
        ..CppOptions::default()
    }
}

fn holder() -> Vec<TypeInput> {
    let mut a = class("Game", "A");
    a.specifiers = vec!["public".to_owned()];
    let mut b_field = field("Game", "B", "b");
    b_field.offset = 0x10;
    a.fields = vec![b_field];
    a.methods = vec![method("Game", "int", "Run", &[("int", "count")])];
    vec![a, structure("Game", "B")]
}

#[test]
fn test_header_and_source_layout() {
    let fx = Fixture::new(holder());
    let output = unit(&fx, &CppOptions::default(), "Game", "A");

    assert_eq!(
        output.header,
        r#"// Autogenerated by shim. Do not edit.
#pragma once
#include <optional>
#include "utils/typedefs.h"

// Including type: Game.B
#include "Game/B.hpp"

// Type namespace: Game
namespace Game {
    // Autogenerated type: public Game.A
    struct A {
        // Offset: 0x10
        ::Game::B b;
    };
}

namespace Game::A_methods {
    // public System.Int32 Run(System.Int32 count)
    std::optional<int> Run(::Game::A* self, int count);
}
"#
    );
    assert_eq!(
        output.source.unwrap(),
        r#"// Autogenerated by shim. Do not edit.
#include "Game/A.hpp"
#include "utils/il2cpp-utils.hpp"

// Autogenerated method: public System.Int32 Run(System.Int32 count)
std::optional<int> Game::A_methods::Run(::Game::A* self, int count) {
    return il2cpp_utils::RunMethod<int>(self, "Run", count);
}
"#
    );
}

#[test]
fn test_type_without_methods_has_no_source() {
    let fx = Fixture::new(holder());
    let output = unit(&fx, &CppOptions::default(), "Game", "B");
    assert_eq!(output.source, None);
    assert!(output.header.contains("struct B {\n    };"));
}

#[test]
fn test_output_is_deterministic() {
    let fx = Fixture::new(holder());
    let options = CppOptions::default();
    assert_eq!(unit(&fx, &options, "Game", "A"), unit(&fx, &options, "Game", "A"));
}

#[test]
fn test_forward_declares_grouped_by_namespace() {
    let mut take = method("Game", "void", "Take", &[("Target", "target")]);
    take.parameters.push(ParameterInput {
        ty: TypeRefInput::dump("UI", "Button"),
        name: "button".to_owned(),
        modifier: ParameterModifier::None,
    });
    let mut a = class("Game", "A");
    a.methods = vec![take];
    let fx = Fixture::new(vec![a, class("Game", "Target"), class("UI", "Button")]);
    let header = unit(&fx, &CppOptions::default(), "Game", "A").header;

    assert!(header.contains(
        "// Forward declaring namespace: Game\nnamespace Game {\n    struct Target;\n}"
    ));
    assert!(header.contains(
        "// Forward declaring namespace: UI\nnamespace UI {\n    struct Button;\n}"
    ));
    assert!(!header.contains("#include \"Game/Target.hpp\""));
}

#[test]
fn test_interface_is_marker_with_inline_methods() {
    let mut i = interface("Game", "I");
    i.methods = vec![method("Game", "void", "Use", &[])];
    let mut c = class("Game", "C");
    c.interfaces = vec![TypeRefInput::dump("Game", "I")];
    c.methods = vec![method("Game", "void", "Use", &[])];
    let fx = Fixture::new(vec![i, c]);

    let iface = unit(&fx, &CppOptions::default(), "Game", "I");
    assert_eq!(iface.source, None);
    assert!(iface.header.contains("    struct I : public Il2CppObject {};\n"));
    assert!(iface.header.contains("// Implemented by: Game.C.Use"));
    assert!(iface
        .header
        .contains("    inline void Use(::Game::I* self) {\n        RET_V_UNLESS(il2cpp_utils::RunMethod(self, \"Use\"));\n    }"));

    let c_out = unit(&fx, &CppOptions::default(), "Game", "C");
    assert!(c_out.header.contains("// Implementing Interfaces: Game.I\n"));
    assert!(c_out.header.contains("// Base method: Game.I.Use"));
    assert!(c_out.source.is_some());
}

#[test]
fn test_static_accessors_per_style() {
    let mut a = class("Game", "A");
    a.fields = vec![static_field("Game", "int", "count")];
    a.methods = vec![method("Game", "void", "Reset", &[])];
    let fx = Fixture::new(vec![a]);

    let normal = unit(&fx, &styled(OutputStyle::Normal), "Game", "A");
    assert!(normal.header.contains(
        "        // Get static field: public static System.Int32 count\n        static std::optional<int> _get_count();\n"
    ));
    assert!(normal.header.contains("        static void _set_count(int value);\n"));
    let source = normal.source.unwrap();
    assert!(source.contains(
        "std::optional<int> Game::A::_get_count() {\n    return il2cpp_utils::GetFieldValue<int>(\"Game\", \"A\", \"count\");\n}"
    ));
    assert!(source.contains(
        "void Game::A::_set_count(int value) {\n    RET_V_UNLESS(il2cpp_utils::SetFieldValue(\"Game\", \"A\", \"count\", value));\n}"
    ));
    assert!(source.contains("RET_V_UNLESS(il2cpp_utils::RunMethod(self, \"Reset\"));"));

    let crash = unit(&fx, &styled(OutputStyle::CrashUnless), "Game", "A");
    let source = crash.source.unwrap();
    assert!(!crash.header.contains("#include <optional>"));
    assert!(source.contains(
        "int Game::A::_get_count() {\n    return CRASH_UNLESS((il2cpp_utils::GetFieldValue<int>(\"Game\", \"A\", \"count\")));\n}"
    ));
    assert!(source.contains(
        "    CRASH_UNLESS(il2cpp_utils::SetFieldValue(\"Game\", \"A\", \"count\", value));\n"
    ));

    let throw = unit(&fx, &styled(OutputStyle::ThrowUnless), "Game", "A");
    let source = throw.source.unwrap();
    assert!(source.contains("return THROW_UNLESS((il2cpp_utils::GetFieldValue<int>("));
    assert!(source.contains("    THROW_UNLESS(il2cpp_utils::RunMethod(self, \"Reset\"));\n"));
}

#[test]
fn test_static_accessors_inline_without_source() {
    let mut a = class("Game", "Config");
    a.fields = vec![static_field("Game", "int", "<Instance>k__BackingField")];
    let fx = Fixture::new(vec![a]);

    let output = unit(&fx, &CppOptions::default(), "Game", "Config");
    assert_eq!(output.source, None);
    assert!(output.header.contains("#include \"utils/il2cpp-utils.hpp\""));
    assert!(output
        .header
        .contains("        static std::optional<int> _get_$Instance$k__BackingField() {\n"));
    assert!(output
        .header
        .contains("GetFieldValue<int>(\"Game\", \"Config\", \"<Instance>k__BackingField\")"));
}

#[test]
fn test_generic_definition_is_templated_and_inline() {
    let mut pool = class("Game", "Pool<T>");
    pool.fields = vec![field("Game", "T", "head"), static_field("Game", "int", "count")];
    pool.methods = vec![method("Game", "T", "Take", &[])];
    let fx = Fixture::new(vec![pool]);

    let output = unit(&fx, &CppOptions::default(), "Game", "Pool");
    assert_eq!(output.source, None);
    assert!(output.header.contains("    template<typename T>\n    struct Pool {\n        T head;\n"));
    assert!(output.header.contains(
        "il2cpp_utils::il2cpp_type_check::il2cpp_no_arg_class<::Game::Pool<T>*>::get(), \"count\""
    ));
    assert!(output.header.contains(
        "    template<typename T>\n    std::optional<T> Take(::Game::Pool<T>* self) {\n        return il2cpp_utils::RunMethod<T>(self, \"Take\");\n    }"
    ));
}

#[test]
fn test_generic_skip_yields_skipped() {
    let fx = Fixture::new(vec![class("Game", "Pool<T>")]);
    let options = CppOptions {
        generic_handling: GenericHandling::Skip,
        ..CppOptions::default()
    };
    assert_eq!(emit(&fx, &options, "Game", "Pool"), Serialized::Skipped);
}

fn broken() -> Fixture {
    let mut a = class("Game", "A");
    a.methods = vec![
        method("Game", "Missing", "Broken", &[]),
        method("Game", "int", "Fine", &[]),
    ];
    let mut b = class("Game", "B");
    b.fields = vec![field("Game", "Missing", "lost")];
    Fixture::new(vec![a, b])
}

fn with_policy(policy: UnresolvedPolicy) -> CppOptions {
    CppOptions {
        unresolved: UnresolvedHandling::uniform(policy),
        ..CppOptions::default()
    }
}

#[test]
fn test_display_in_file_comments_member() {
    let fx = broken();
    let output = unit(&fx, &with_policy(UnresolvedPolicy::DisplayInFile), "Game", "A");
    assert!(output.header.contains(
        "    // Unresolved type exception!\n    /*\n    Unresolved method `Broken`: could not resolve type `Game.Missing`\n    */\n"
    ));
    assert!(output.header.contains("std::optional<int> Fine(::Game::A* self);"));
    let source = output.source.unwrap();
    assert!(source.contains("Fine"));
    assert!(!source.contains("Broken"));
}

#[test]
fn test_skip_issue_drops_member_silently() {
    let fx = broken();
    let output = unit(&fx, &with_policy(UnresolvedPolicy::SkipIssue), "Game", "A");
    assert!(!output.header.contains("Unresolved"));
    assert!(!output.header.contains("Broken"));
    assert!(output.header.contains("Fine"));
}

#[test]
fn test_elevate_fails_type() {
    let fx = broken();
    let options = with_policy(UnresolvedPolicy::Elevate);
    let cx = fx.resolve(&options, "Game", "B");
    let err = serialize_type(&fx.graph(), &options, &cx).unwrap_err();
    assert_eq!(err.code(), ErrorCode::S0001);
    assert!(err.to_string().contains("`Game.B`"));
}

#[test]
fn test_renaming_and_overloads() {
    let mut a = class("Game", "A");
    a.fields = vec![field("Game", "int", "class")];
    a.methods = vec![
        method("Game", "void", "Run", &[("int", "x")]),
        method("Game", "void", "Run", &[("int", "y")]),
        method("Game", "void", "bzero", &[("int", "self")]),
    ];
    let fx = Fixture::new(vec![a]);

    let header = unit(&fx, &CppOptions::default(), "Game", "A").header;
    assert!(header.contains("        int _class;\n"));
    assert!(header.contains("void Run(::Game::A* self, int x);"));
    assert!(header.contains("void Run_1(::Game::A* self, int y);"));
    assert!(header.contains("void _bzero(::Game::A* self, int _self);"));
}

#[test]
fn test_override_comment_and_provenance() {
    let mut base = class("Game", "Base");
    let mut run = method("Game", "void", "Run", &[]);
    run.specifiers.push("virtual".to_owned());
    base.methods = vec![run];

    let mut derived = class("Game", "Derived");
    derived.parent = Some(TypeRefInput::dump("Game", "Base"));
    let mut run = method("Game", "void", "Run", &[]);
    run.specifiers.push("override".to_owned());
    run.rva = 0x1234;
    run.offset = 0x1234;
    run.va = 0x5678;
    run.slot = 4;
    derived.methods = vec![run];
    let fx = Fixture::new(vec![base, derived]);

    let header = unit(&fx, &CppOptions::default(), "Game", "Derived").header;
    assert!(header.contains("struct Derived : public ::Game::Base {"));
    assert!(header.contains(
        "    // RVA: 0x1234 Offset: 0x1234 VA: 0x5678 Slot: 4\n    // public override System.Void Run()\n    // Base method: Game.Base.Run\n"
    ));
}

#[test]
fn test_static_method_uses_class_lookup() {
    let mut a = class("Game", "Outer");
    let mut inner = class("Game", "Outer.Inner");
    let mut make = method("Game", "int", "Make", &[("int", "seed")]);
    make.specifiers.push("static".to_owned());
    inner.methods = vec![make];
    a.nested = vec![inner];
    let fx = Fixture::new(vec![a]);

    let output = unit(&fx, &CppOptions::default(), "Game", "Outer.Inner");
    assert!(output.header.contains("#include \"Game/Outer.hpp\""));
    assert!(output.header.contains("struct Outer_Inner {"));
    assert!(output.source.unwrap().contains(
        "std::optional<int> Game::Outer_Inner_methods::Make(int seed) {\n    return il2cpp_utils::RunMethod<int>(\"Game\", \"Outer/Inner\", \"Make\", seed);\n}"
    ));
}
