//! Errors raised while realizing the input contract into a type graph.

use thiserror::Error;

use crate::{MetadataHandle, ParseFormatError};

/// A declaration that could not be realized.
///
/// Each error is fatal for the one declaration that carried it; the rest of
/// the input is still realized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error(transparent)]
    ParseFormat(#[from] ParseFormatError),

    #[error("metadata handle {0} is not present in the symbol table")]
    UnknownHandle(MetadataHandle),

    #[error("nested type `{nested}` does not declare `{expected}` as its declaring type")]
    NestingMismatch { nested: String, expected: String },

    #[error("`{0}` cannot head a type declaration")]
    NotADefinition(String),
}
