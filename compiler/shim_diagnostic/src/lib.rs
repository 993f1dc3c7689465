//! Failure taxonomy for the shim code generator.
//!
//! Every failure the generator can hit is a [`ShimError`] with a stable
//! [`ErrorCode`]. Failures are contained at the type boundary: workers record
//! them in a shared [`FailureLog`] and carry on, and the run reports an
//! aggregate [`RunStatus`] at the end.

mod error;
mod error_code;
mod failure;
mod policy;

pub use error::ShimError;
pub use error_code::ErrorCode;
pub use failure::{FailureLog, Phase, RunStatus, TypeFailure};
pub use policy::{MemberKind, UnresolvedPolicy};
