//! Domain error types

use thiserror::Error;

/// Errors raised while parsing backend profile fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A proficiency level code is not one of A1..C2.
    #[error("unknown language level: {0}")]
    UnknownLanguageLevel(String),
}
