use std::any::Any;
use std::path::PathBuf;

use shim_ir::{IrError, ParseFormatError};
use thiserror::Error;

use crate::{ErrorCode, MemberKind};

#[derive(Debug, Error)]
pub enum ShimError {
    /// A referenced type is neither a primitive nor in the collection.
    #[error("{kind} `{member}` of `{owner}` references unresolved type `{reference}`")]
    UnresolvedReference {
        kind: MemberKind,
        owner: String,
        member: String,
        reference: String,
    },

    /// The output path already exists; usually a name deduplication failure.
    #[error("refusing to overwrite existing file `{}`", path.display())]
    FileCollision { path: PathBuf },

    #[error(transparent)]
    ParseFormat(#[from] ParseFormatError),

    /// A declaration that could not be realized for another reason.
    #[error(transparent)]
    Input(IrError),

    #[error("library budgets do not converge: {reason}")]
    BudgetMisconfiguration { reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot write `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("worker panicked: {0}")]
    Panicked(String),
}

impl ShimError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ShimError::UnresolvedReference { .. } => ErrorCode::S0001,
            ShimError::ParseFormat(_) => ErrorCode::S0002,
            ShimError::Input(_) => ErrorCode::S0003,
            ShimError::FileCollision { .. } => ErrorCode::S1001,
            ShimError::Io { .. } => ErrorCode::S1002,
            ShimError::BudgetMisconfiguration { .. } => ErrorCode::S1003,
            ShimError::Config(_) => ErrorCode::S2001,
            ShimError::Panicked(_) => ErrorCode::S9001,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShimError::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert a payload caught by `catch_unwind`.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "non-string panic payload".to_string()
        };
        ShimError::Panicked(message)
    }
}

impl From<IrError> for ShimError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::ParseFormat(err) => ShimError::ParseFormat(err),
            err => ShimError::Input(err),
        }
    }
}
