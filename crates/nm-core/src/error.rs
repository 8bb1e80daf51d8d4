//! Core error type.
//!
//! The simulation itself has no runtime failure modes; errors only arise from
//! validating configuration and parsing user-supplied names.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown norm kind {0:?}")]
    UnknownNorm(String),

    #[error("unknown experiment flag {0:?}")]
    UnknownFlag(String),
}

/// Shorthand result type for `nm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
