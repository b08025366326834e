//! Error types for view operations

use thiserror::Error;

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all view operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Markup text failed to parse
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// A value could not be converted to the requested view shape
    #[error("Type conversion error: {0}")]
    Conversion(String),

    /// A node did not have the shape an operation required
    #[error("Node access error: {0}")]
    NodeAccess(String),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialize(String),
}
