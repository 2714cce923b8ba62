//! Raise/record policy for detected faults and HTTP errors

use crate::FaultMessageHandler;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Environment variable read by [`ErrorPolicy::from_env`]
pub const RAISE_ERRORS_ENV: &str = "SOAP_RAISE_ERRORS";

/// Decides how a [`Response`](crate::Response) reports what it detects
///
/// When `raise_errors` is set (the default), a SOAP fault or HTTP error is
/// returned as an `Err` from construction. Otherwise it is only recorded on
/// the response. An optional [`FaultMessageHandler`] replaces the default
/// SOAP 1.1/1.2 fault message extraction.
#[derive(Clone)]
pub struct ErrorPolicy {
    raise_errors: bool,
    fault_handler: Option<Arc<dyn FaultMessageHandler>>,
}

impl ErrorPolicy {
    /// Raise errors, default fault messages
    pub const fn new() -> Self {
        Self {
            raise_errors: true,
            fault_handler: None,
        }
    }

    /// Record errors on the response instead of raising them
    pub const fn lenient() -> Self {
        Self {
            raise_errors: false,
            fault_handler: None,
        }
    }

    /// Build a policy from `SOAP_RAISE_ERRORS`
    ///
    /// Accepts `true/1/yes/on` and `false/0/no/off` (any case). A missing or
    /// unrecognised value keeps the default of raising.
    pub fn from_env() -> Self {
        let raise_errors = std::env::var(RAISE_ERRORS_ENV)
            .ok()
            .and_then(|value| parse_flag(&value))
            .unwrap_or(true);

        Self::new().with_raise_errors(raise_errors)
    }

    pub fn with_raise_errors(mut self, raise_errors: bool) -> Self {
        self.raise_errors = raise_errors;
        self
    }

    pub fn with_fault_handler(mut self, handler: impl FaultMessageHandler + 'static) -> Self {
        self.fault_handler = Some(Arc::new(handler));
        self
    }

    pub fn without_fault_handler(mut self) -> Self {
        self.fault_handler = None;
        self
    }

    pub fn raise_errors(&self) -> bool {
        self.raise_errors
    }

    pub fn fault_handler(&self) -> Option<&dyn FaultMessageHandler> {
        self.fault_handler.as_deref()
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorPolicy")
            .field("raise_errors", &self.raise_errors)
            .field("custom_fault_handler", &self.fault_handler.is_some())
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Process-wide default used by `Response::new`. Constructors take a snapshot,
// so a policy change never affects a response already being built.
static GLOBAL_POLICY: RwLock<ErrorPolicy> = parking_lot::const_rwlock(ErrorPolicy::new());

/// Set whether responses built with the global policy raise errors
pub fn set_raise_errors(raise_errors: bool) {
    GLOBAL_POLICY.write().raise_errors = raise_errors;
}

/// Whether responses built with the global policy raise errors
pub fn raise_errors() -> bool {
    GLOBAL_POLICY.read().raise_errors
}

/// Install a fault message handler on the global policy
///
/// ```rust
/// use soap_response::{clear_fault_message_handler, set_fault_message_handler, XmlMap};
///
/// set_fault_message_handler(|fault: &XmlMap| {
///     fault.get("message").map(|message| message.to_string())
/// });
/// # clear_fault_message_handler();
/// ```
pub fn set_fault_message_handler(handler: impl FaultMessageHandler + 'static) {
    GLOBAL_POLICY.write().fault_handler = Some(Arc::new(handler));
}

/// Remove the global fault message handler, restoring the default extraction
pub fn clear_fault_message_handler() {
    GLOBAL_POLICY.write().fault_handler = None;
}

/// Snapshot of the global policy
pub fn global_policy() -> ErrorPolicy {
    GLOBAL_POLICY.read().clone()
}

/// Replace the global policy wholesale
pub fn set_global_policy(policy: ErrorPolicy) {
    *GLOBAL_POLICY.write() = policy;
}
