//! # Error Types
//!
//! Errors raised while bringing external data into the value model.

use thiserror::Error;

/// A value could not be represented in the JSON-compatible model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Floating point value is NaN or infinite.
    #[error("Number is not finite")]
    NonFiniteNumber,

    /// Expected a mapping at the top level.
    #[error("Expected an object, found {found}")]
    NotAnObject { found: &'static str },
}
