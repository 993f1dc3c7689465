// Tests use unwrap for brevity; a panic is a good failure message here.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::{
    render_android_mk, write_build_scripts, BuildPlan, Library, MkOptions, APPLICATION_MK,
};

fn options() -> MkOptions {
    MkOptions {
        id: "mod".to_owned(),
        version: "1.2.0".to_owned(),
        libil2cpp: "./il2cpp".to_owned(),
        ..MkOptions::default()
    }
}

#[test]
fn test_android_mk_text() {
    let plan = BuildPlan {
        static_libraries: vec![Library {
            id: "mod_partial_0_0".to_owned(),
            holds_sources: true,
            members: vec!["src/Game/A.cpp".to_owned(), "src/Game/C.cpp".to_owned()],
        }],
        shared: Library {
            id: "mod".to_owned(),
            holds_sources: false,
            members: vec!["mod_partial_0_0".to_owned()],
        },
    };
    let expected = "\
# Autogenerated by shim. Do not edit.
LOCAL_PATH := $(call my-dir)
TARGET_ARCH_ABI := $(APP_ABI)

# Writing static library: mod_partial_0_0
include $(CLEAR_VARS)
LOCAL_MODULE := mod_partial_0_0
LOCAL_SRC_FILES += src/Game/A.cpp
LOCAL_SRC_FILES += src/Game/C.cpp
LOCAL_C_INCLUDES := ./include ./src
LOCAL_CFLAGS += -DMOD_ID='\"mod\"' -DVERSION='\"1.2.0\"'
LOCAL_CFLAGS += -I'./il2cpp'
LOCAL_CPP_FEATURES := rtti
include $(BUILD_STATIC_LIBRARY)

# Writing shared library: mod
include $(CLEAR_VARS)
LOCAL_MODULE := mod
LOCAL_STATIC_LIBRARIES += mod_partial_0_0
LOCAL_C_INCLUDES := ./include ./src
LOCAL_CFLAGS += -DMOD_ID='\"mod\"' -DVERSION='\"1.2.0\"'
LOCAL_CFLAGS += -I'./il2cpp'
LOCAL_CPP_FEATURES := rtti
LOCAL_LDLIBS := -llog
include $(BUILD_SHARED_LIBRARY)
";
    assert_eq!(render_android_mk(&plan, &options()), expected);
}

#[test]
fn test_exceptions_feature() {
    let plan = BuildPlan {
        static_libraries: Vec::new(),
        shared: Library {
            id: "mod".to_owned(),
            holds_sources: true,
            members: vec!["src/Game/A.cpp".to_owned()],
        },
    };
    let options = MkOptions {
        exceptions: true,
        ..options()
    };
    let text = render_android_mk(&plan, &options);
    assert!(text.contains("LOCAL_CPP_FEATURES := rtti exceptions\n"));
    assert!(text.contains("LOCAL_SRC_FILES += src/Game/A.cpp\n"));
}

#[test]
fn test_write_build_scripts() {
    let dir = tempdir().unwrap();
    // An earlier run's files are replaced.
    std::fs::write(dir.path().join("Android.mk"), "stale").unwrap();

    let units = vec!["src/Game/A.cpp".to_owned(), "src/Game/C.cpp".to_owned()];
    let plan = write_build_scripts(dir.path(), &units, &options()).unwrap();
    assert_eq!(plan.shared.members, units);

    let android = std::fs::read_to_string(dir.path().join("Android.mk")).unwrap();
    assert_eq!(android, render_android_mk(&plan, &options()));
    let application = std::fs::read_to_string(dir.path().join("Application.mk")).unwrap();
    assert_eq!(application, APPLICATION_MK);
    assert!(application.contains("APP_CFLAGS := -std=gnu18\n"));
}

#[test]
fn test_write_build_scripts_reports_budget_errors() {
    let dir = tempdir().unwrap();
    let options = MkOptions {
        static_limit: 4,
        ..options()
    };
    let err = write_build_scripts(dir.path(), &["src/Game/A.cpp".to_owned()], &options)
        .unwrap_err();
    assert_eq!(err.code(), shim_diagnostic::ErrorCode::S1003);
    assert!(!dir.path().join("Android.mk").exists());
}
