//! Error types for XML parsing

use thiserror::Error;

/// Errors that can occur while parsing a response body
#[derive(Debug, Error)]
pub enum XmlError {
    /// The input contained no markup at all
    #[error("XML document is empty")]
    Empty,

    /// The input was not well-formed XML
    #[error("XML parsing error: {0}")]
    Parse(String),
}

/// Type alias for results that can return an XmlError
pub type Result<T> = std::result::Result<T, XmlError>;
