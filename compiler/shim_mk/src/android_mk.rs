//! Text of the two NDK build descriptors.

use std::fmt::Write;

use crate::{BuildPlan, Library, MkOptions};

/// Fixed toolchain settings.
pub const APPLICATION_MK: &str = "\
APP_ABI := arm64-v8a
APP_PLATFORM := 24
APP_PIE := true
APP_STL := c++_static
APP_CFLAGS := -std=gnu18
APP_CPPFLAGS := -std=gnu++2a
APP_SHORT_COMMANDS := true
";

const HEADER: &str = "\
# Autogenerated by shim. Do not edit.
LOCAL_PATH := $(call my-dir)
TARGET_ARCH_ABI := $(APP_ABI)
";

enum Kind {
    Static,
    Shared,
}

/// Render `Android.mk` for `plan`: static libraries in plan order, then the
/// shared library.
pub fn render_android_mk(plan: &BuildPlan, options: &MkOptions) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for library in &plan.static_libraries {
        write_library(&mut out, library, Kind::Static, options);
        out.push('\n');
    }
    write_library(&mut out, &plan.shared, Kind::Shared, options);
    out
}

fn write_library(out: &mut String, library: &Library, kind: Kind, options: &MkOptions) {
    let (label, include) = match kind {
        Kind::Static => ("static", "$(BUILD_STATIC_LIBRARY)"),
        Kind::Shared => ("shared", "$(BUILD_SHARED_LIBRARY)"),
    };
    let member_var = if library.holds_sources {
        "LOCAL_SRC_FILES"
    } else {
        "LOCAL_STATIC_LIBRARIES"
    };
    let features = if options.exceptions {
        "rtti exceptions"
    } else {
        "rtti"
    };

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# Writing {label} library: {}", library.id);
    let _ = writeln!(out, "include $(CLEAR_VARS)");
    let _ = writeln!(out, "LOCAL_MODULE := {}", library.id);
    for member in &library.members {
        let _ = writeln!(out, "{member_var} += {member}");
    }
    let _ = writeln!(
        out,
        "LOCAL_C_INCLUDES := ./{} ./{}",
        options.header_dir, options.source_dir
    );
    let _ = writeln!(
        out,
        "LOCAL_CFLAGS += -DMOD_ID='\"{}\"' -DVERSION='\"{}\"'",
        options.id, options.version
    );
    let _ = writeln!(out, "LOCAL_CFLAGS += -I'{}'", options.libil2cpp);
    let _ = writeln!(out, "LOCAL_CPP_FEATURES := {features}");
    if let Kind::Shared = kind {
        let _ = writeln!(out, "LOCAL_LDLIBS := -llog");
    }
    let _ = writeln!(out, "include {include}");
}
