use std::fmt;

/// Stable codes for every failure the generator reports.
///
/// Format: S#### where the first digit indicates the stage:
/// - S0xxx: input and resolution
/// - S1xxx: output files and build scripts
/// - S2xxx: configuration
/// - S9xxx: internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Member or type references a type that is not in the collection
    S0001,
    /// Malformed dump type symbol
    S0002,
    /// Declaration could not be realized (unknown handle, bad nesting)
    S0003,

    /// Output path already exists
    S1001,
    /// I/O failure while writing output
    S1002,
    /// Bin-packing budgets do not converge
    S1003,

    /// Invalid configuration value
    S2001,

    /// Worker panicked
    S9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::S0001 => "S0001",
            ErrorCode::S0002 => "S0002",
            ErrorCode::S0003 => "S0003",
            ErrorCode::S1001 => "S1001",
            ErrorCode::S1002 => "S1002",
            ErrorCode::S1003 => "S1003",
            ErrorCode::S2001 => "S2001",
            ErrorCode::S9001 => "S9001",
        }
    }

    /// Internal errors indicate a generator bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("S9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
