//! Configuration and parse errors shared by the `ukr-*` crates.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `ukr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
