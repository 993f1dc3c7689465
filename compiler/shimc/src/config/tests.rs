// Tests use unwrap for brevity; a panic is a good failure message here.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use shim_cpp::{OutputStyle, UnresolvedHandling};
use shim_diagnostic::{ErrorCode, UnresolvedPolicy};
use tempfile::tempdir;

use super::SerializationConfig;

#[test]
fn test_defaults_validate() {
    let config = SerializationConfig::default();
    assert!(config.validate().is_ok());
    assert!(config.one_source_file);
    assert_eq!(config.chunk_frequency, 100);
    assert!(config.illegal_names.iter().any(|n| n == "MOD_ID"));
    assert!(config.illegal_names.iter().any(|n| n == "class"));
    assert_eq!(config.illegal_method_names, ["bzero", "Assert"]);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let json = r#"{
        "id": "mymod",
        "output_style": "throw_unless",
        "unresolved_type_handling": { "type": "elevate" }
    }"#;
    let config: SerializationConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.id, "mymod");
    assert_eq!(config.output_style, OutputStyle::ThrowUnless);
    assert_eq!(
        config.unresolved_type_handling,
        UnresolvedHandling {
            ty: UnresolvedPolicy::Elevate,
            ..UnresolvedHandling::default()
        }
    );
    assert_eq!(config.header_dir, "include");
    assert_eq!(config.static_library_character_limit, 4000);
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shim.json");
    std::fs::write(&path, r#"{ "one_source_file": false, "version": "1.0.0" }"#).unwrap();
    let config = SerializationConfig::load(&path).unwrap();
    assert!(!config.one_source_file);
    assert_eq!(config.version, "1.0.0");
}

#[test]
fn test_load_reports_bad_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shim.json");
    std::fs::write(&path, "{ \"id\": 4 }").unwrap();
    let err = SerializationConfig::load(&path).unwrap_err();
    assert_eq!(err.code(), ErrorCode::S2001);
    let missing = SerializationConfig::load(&dir.path().join("none.json")).unwrap_err();
    assert_eq!(missing.code(), ErrorCode::S1002);
}

#[test]
fn test_validate_rejects_unusable_settings() {
    let empty_id = SerializationConfig {
        id: " ".to_owned(),
        ..SerializationConfig::default()
    };
    assert_eq!(empty_id.validate().unwrap_err().code(), ErrorCode::S2001);

    let zero_limit = SerializationConfig::default().with_library_limits(0, 100);
    assert!(zero_limit.validate().is_err());

    let zero_chunk = SerializationConfig {
        chunk_frequency: 0,
        ..SerializationConfig::default()
    };
    assert!(zero_chunk.validate().is_err());
    assert!(zero_chunk.with_one_source_file(false).validate().is_ok());

    for dir in ["..", "../elsewhere", "/usr/include", "include/../.."] {
        let escaping = SerializationConfig {
            header_dir: dir.to_owned(),
            ..SerializationConfig::default()
        };
        assert_eq!(escaping.validate().unwrap_err().code(), ErrorCode::S2001, "{dir}");
    }
    let nested = SerializationConfig {
        source_dir: "gen/src".to_owned(),
        ..SerializationConfig::default()
    };
    assert!(nested.validate().is_ok());
}

#[test]
fn test_inverted_limits_pass_validation() {
    let config = SerializationConfig::default().with_library_limits(10_000, 100);
    assert!(config.validate().is_ok());
}

#[test]
fn test_mk_options() {
    let config = SerializationConfig::default().with_output_style(OutputStyle::ThrowUnless);
    let mk = config.to_mk_options();
    assert!(mk.exceptions);
    assert_eq!(mk.id, "codegen");
    assert_eq!(mk.static_limit, 4000);
    assert_eq!(mk.shared_limit, 8000);
    assert!(!SerializationConfig::default().to_mk_options().exceptions);
}

#[test]
fn test_default_limits_pack_past_the_static_limit() {
    let units: Vec<String> = (0..250).map(|i| format!("src/Game/Type{i:04}.cpp")).collect();
    let mk = SerializationConfig::default().to_mk_options();
    let plan = shim_mk::BuildScriptEmitter::new(mk).pack(&units).unwrap();
    assert_eq!(plan.shared.members, units);
}

#[test]
fn test_cpp_options_carry_denylists() {
    let config = SerializationConfig {
        illegal_names: vec!["Foo".to_owned()],
        ..SerializationConfig::default()
    };
    let options = config.to_cpp_options();
    assert_eq!(options.naming.identifier("Foo"), "_Foo");
    assert_eq!(options.naming.identifier("class"), "class");
}
