//! Errors for the fallible entry points
//!
//! Malformed directives are not errors, they are [diagnostics](crate::diagnostics). The only
//! thing that can fail outright is handing the engine a buffer that is not text.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("buffer is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
