//! Serializer configuration.

use serde::{Deserialize, Serialize};
use shim_diagnostic::{MemberKind, UnresolvedPolicy};

use crate::NamingPolicy;

/// How generated accessors surface a failed runtime call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStyle {
    /// Getters return `std::optional<T>`; setters and void calls no-op.
    #[default]
    Normal,
    /// Abort the process.
    CrashUnless,
    /// Throw a runtime error.
    ThrowUnless,
}

impl OutputStyle {
    /// Wrapping macro for a fallible call, if the style has one.
    pub(crate) fn macro_name(self) -> Option<&'static str> {
        match self {
            OutputStyle::Normal => None,
            OutputStyle::CrashUnless => Some("CRASH_UNLESS"),
            OutputStyle::ThrowUnless => Some("THROW_UNLESS"),
        }
    }
}

/// Whether generic definitions and generic methods are emitted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericHandling {
    #[default]
    Do,
    Skip,
}

/// Unresolved-reference policy per scope.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct UnresolvedHandling {
    pub field: UnresolvedPolicy,
    pub method: UnresolvedPolicy,
    #[serde(rename = "type")]
    pub ty: UnresolvedPolicy,
}

impl UnresolvedHandling {
    pub fn uniform(policy: UnresolvedPolicy) -> Self {
        UnresolvedHandling {
            field: policy,
            method: policy,
            ty: policy,
        }
    }

    pub fn for_kind(&self, kind: MemberKind) -> UnresolvedPolicy {
        match kind {
            MemberKind::Field => self.field,
            MemberKind::Method => self.method,
            MemberKind::Type => self.ty,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CppOptions {
    pub output_style: OutputStyle,
    pub generic_handling: GenericHandling,
    pub unresolved: UnresolvedHandling,
    pub naming: NamingPolicy,
}
