use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do with a member (or type) that references an unresolvable type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Replace the member with a diagnostic comment.
    #[default]
    DisplayInFile,
    /// Omit the member without a trace.
    SkipIssue,
    /// Fail the enclosing scope (member to type; at type scope, the type).
    Elevate,
}

/// Scope an unresolved reference was found in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
    Type,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberKind::Field => "field",
            MemberKind::Method => "method",
            MemberKind::Type => "type",
        })
    }
}
