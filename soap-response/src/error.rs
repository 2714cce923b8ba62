//! Error types for SOAP response handling

use crate::{HttpError, SoapFault};
use thiserror::Error;

/// Errors produced while classifying a SOAP response
#[derive(Debug, Error)]
pub enum SoapError {
    /// SOAP fault returned by the service
    ///
    /// Only returned when the active policy raises errors.
    #[error("SOAP fault: {0}")]
    Fault(SoapFault),

    /// HTTP status of 300 or above
    ///
    /// Only returned when the active policy raises errors.
    #[error("HTTP error: {0}")]
    Http(HttpError),

    /// The fault's `detail/errorcode` is present but not an integer
    ///
    /// Returned regardless of the policy, since the fault cannot be
    /// described faithfully.
    #[error("Malformed SOAP fault code: {0:?}")]
    MalformedFaultCode(String),

    /// The fault's `detail/errorcode` is an integer outside the `i64` range
    #[error("SOAP fault code out of range: {0}")]
    FaultCodeOutOfRange(String),

    /// Network or HTTP communication error before a response was available
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The response body exceeded the configured read limit
    #[error("Response body larger than {limit} bytes")]
    BodyTooLarge { limit: u64 },
}

impl SoapError {
    /// The SOAP fault carried by this error, if it is one
    pub fn as_fault(&self) -> Option<&SoapFault> {
        match self {
            SoapError::Fault(fault) => Some(fault),
            _ => None,
        }
    }

    /// The HTTP error carried by this error, if it is one
    pub fn as_http_error(&self) -> Option<&HttpError> {
        match self {
            SoapError::Http(error) => Some(error),
            _ => None,
        }
    }
}

/// Type alias for results that can return a SoapError
pub type Result<T> = std::result::Result<T, SoapError>;
