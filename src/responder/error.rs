//! Responder error types

use thiserror::Error;

/// Errors raised while building a keyword table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponderError {
    /// An empty keyword is a substring of every query
    #[error("Empty keyword for response: {response:?}")]
    EmptyKeyword { response: String },
}

/// Result type for responder operations
pub type ResponderResult<T> = Result<T, ResponderError>;
