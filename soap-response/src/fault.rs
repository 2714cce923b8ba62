//! SOAP fault detection and message extraction

use crate::{Result, SoapError};
use soap_xml::{XmlMap, XmlValue};
use std::fmt;
use std::num::IntErrorKind;
use tracing::debug;

/// Produces the human-readable message for a SOAP fault node
///
/// Returning `None` means the node is not treated as a fault at all. An empty
/// `<Fault/>` element is never a fault and never reaches the handler; a
/// `Fault` holding only text is passed as an empty mapping.
/// Closures of the form `Fn(&XmlMap) -> Option<String>` implement this trait.
pub trait FaultMessageHandler: Send + Sync {
    fn message(&self, fault: &XmlMap) -> Option<String>;
}

impl<F> FaultMessageHandler for F
where
    F: Fn(&XmlMap) -> Option<String> + Send + Sync,
{
    fn message(&self, fault: &XmlMap) -> Option<String> {
        self(fault)
    }
}

/// The default strategy, recognising the SOAP 1.1 and SOAP 1.2 fault shapes
///
/// - SOAP 1.1: `faultcode` / `faultstring` → `"(<faultcode>) <faultstring>"`
/// - SOAP 1.2: `Code/Value` / `Reason/Text` → `"(<value>) <text>"`
///
/// A node matching neither shape produces no message.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionedFaultMessage;

impl FaultMessageHandler for VersionedFaultMessage {
    fn message(&self, fault: &XmlMap) -> Option<String> {
        if fault.contains_key("faultcode") {
            return Some(format!(
                "({}) {}",
                display(fault.get("faultcode")),
                display(fault.get("faultstring"))
            ));
        }

        if fault.contains_key("code") {
            return Some(format!(
                "({}) {}",
                display(fault.lookup(&["code", "value"])),
                display(fault.lookup(&["reason", "text"]))
            ));
        }

        None
    }
}

fn display(value: Option<&XmlValue>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// A SOAP fault found in a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    message: String,
    code: i64,
}

impl SoapFault {
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Numeric code from the fault's `detail/errorcode`, 0 when absent
    pub fn code(&self) -> i64 {
        self.code
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Look for a SOAP fault in a normalized body mapping
///
/// With a `handler` installed, its message is used verbatim and the numeric
/// code is not read (it stays 0). Otherwise [`VersionedFaultMessage`] is
/// applied and the code comes from `detail/errorcode`.
pub(crate) fn extract(
    body: &XmlMap,
    handler: Option<&dyn FaultMessageHandler>,
) -> Result<Option<SoapFault>> {
    let node = match body.get("fault") {
        None | Some(XmlValue::Null) => return Ok(None),
        Some(node) => node,
    };

    let empty = XmlMap::new();
    let fault = node.as_map().unwrap_or(&empty);

    let message = match handler {
        Some(handler) => handler.message(fault),
        None => VersionedFaultMessage.message(fault),
    };
    let message = match message {
        Some(message) => message,
        None => {
            debug!("Fault element present but not in a recognised shape");
            return Ok(None);
        }
    };

    let code = match handler {
        Some(_) => 0,
        None => fault_code(fault)?,
    };

    Ok(Some(SoapFault { message, code }))
}

fn fault_code(fault: &XmlMap) -> Result<i64> {
    match fault.lookup(&["detail", "errorcode"]) {
        None | Some(XmlValue::Null) => Ok(0),
        Some(XmlValue::Text(text)) => text.trim().parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                SoapError::FaultCodeOutOfRange(text.trim().to_string())
            }
            _ => SoapError::MalformedFaultCode(text.clone()),
        }),
        Some(other) => Err(SoapError::MalformedFaultCode(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn text(value: &str) -> XmlValue {
        XmlValue::Text(value.to_string())
    }

    fn map(entries: Vec<(&str, XmlValue)>) -> XmlMap {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    fn body_with_fault(fault: XmlMap) -> XmlMap {
        map(vec![("fault", XmlValue::Map(fault))])
    }

    #[test]
    fn test_soap_11_message() {
        let fault = map(vec![
            ("faultcode", text("soap:Client")),
            ("faultstring", text("Invalid request")),
        ]);
        assert_eq!(
            VersionedFaultMessage.message(&fault).as_deref(),
            Some("(soap:Client) Invalid request")
        );
    }

    #[test]
    fn test_soap_12_message() {
        let fault = map(vec![
            ("code", XmlValue::Map(map(vec![("value", text("soap:Sender"))]))),
            ("reason", XmlValue::Map(map(vec![("text", text("Timed out"))]))),
        ]);
        assert_eq!(
            VersionedFaultMessage.message(&fault).as_deref(),
            Some("(soap:Sender) Timed out")
        );
    }

    #[test]
    fn test_missing_pieces_format_as_empty() {
        let fault = map(vec![("faultcode", text("soap:Server"))]);
        assert_eq!(
            VersionedFaultMessage.message(&fault).as_deref(),
            Some("(soap:Server) ")
        );

        let fault = map(vec![("code", text("flat"))]);
        assert_eq!(VersionedFaultMessage.message(&fault).as_deref(), Some("() "));
    }

    #[test]
    fn test_unrecognised_shape_is_not_a_fault() {
        let body = body_with_fault(map(vec![("message", text("something"))]));
        assert_eq!(extract(&body, None).unwrap(), None);
    }

    #[test]
    fn test_no_fault_node() {
        let body = map(vec![("ping_response", text("pong"))]);
        assert_eq!(extract(&body, None).unwrap(), None);
    }

    #[test]
    fn test_fault_code_from_detail() {
        let body = body_with_fault(map(vec![
            ("faultcode", text("soap:Server")),
            ("faultstring", text("Locked")),
            ("detail", XmlValue::Map(map(vec![("errorcode", text(" 1004 "))]))),
        ]));
        let fault = extract(&body, None).unwrap().unwrap();
        assert_eq!(fault.code(), 1004);
        assert_eq!(fault.message(), "(soap:Server) Locked");
    }

    #[test]
    fn test_empty_fault_code_defaults_to_zero() {
        let body = body_with_fault(map(vec![
            ("faultcode", text("soap:Server")),
            ("detail", XmlValue::Map(map(vec![("errorcode", XmlValue::Null)]))),
        ]));
        assert_eq!(extract(&body, None).unwrap().unwrap().code(), 0);
    }

    #[test]
    fn test_malformed_fault_code() {
        let body = body_with_fault(map(vec![
            ("faultcode", text("soap:Server")),
            ("detail", XmlValue::Map(map(vec![("errorcode", text("abc"))]))),
        ]));
        match extract(&body, None) {
            Err(SoapError::MalformedFaultCode(value)) => assert_eq!(value, "abc"),
            other => panic!("Expected MalformedFaultCode, got {:?}", other),
        }
    }

    #[test]
    fn test_handler_overrides_message_and_skips_code() {
        let body = body_with_fault(map(vec![
            ("faultcode", text("soap:Server")),
            ("detail", XmlValue::Map(map(vec![("errorcode", text("abc"))]))),
        ]));
        let handler = |fault: &XmlMap| Some(format!("custom: {} keys", fault.len()));

        let fault = extract(&body, Some(&handler)).unwrap().unwrap();
        assert_eq!(fault.message(), "custom: 2 keys");
        assert_eq!(fault.code(), 0);
    }

    #[test]
    fn test_handler_returning_none_suppresses_fault() {
        let body = body_with_fault(map(vec![("faultcode", text("soap:Server"))]));
        let handler = |_: &XmlMap| -> Option<String> { None };

        assert_eq!(extract(&body, Some(&handler)).unwrap(), None);
    }

    #[test]
    fn test_out_of_range_fault_code() {
        let body = body_with_fault(map(vec![
            ("faultcode", text("soap:Server")),
            ("detail", XmlValue::Map(map(vec![("errorcode", text(" 99999999999999999999 "))]))),
        ]));
        match extract(&body, None) {
            Err(SoapError::FaultCodeOutOfRange(value)) => assert_eq!(value, "99999999999999999999"),
            other => panic!("Expected FaultCodeOutOfRange, got {:?}", other),
        }

        let body = body_with_fault(map(vec![
            ("faultcode", text("soap:Server")),
            ("detail", XmlValue::Map(map(vec![("errorcode", text("-9223372036854775808"))]))),
        ]));
        assert_eq!(extract(&body, None).unwrap().unwrap().code(), i64::MIN);
    }

    #[test]
    fn test_empty_fault_element_is_not_a_fault() {
        let calls = AtomicUsize::new(0);
        let handler = |_: &XmlMap| {
            calls.fetch_add(1, Ordering::SeqCst);
            Some("custom".to_string())
        };

        let body = map(vec![("fault", XmlValue::Null)]);
        assert_eq!(extract(&body, Some(&handler)).unwrap(), None);
        assert_eq!(extract(&body, None).unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_text_fault_reaches_handler_as_empty_mapping() {
        let body = map(vec![("fault", text("server exploded"))]);
        let handler = |fault: &XmlMap| fault.is_empty().then(|| "text fault".to_string());

        let fault = extract(&body, Some(&handler)).unwrap().unwrap();
        assert_eq!(fault.message(), "text fault");
        assert_eq!(extract(&body, None).unwrap(), None);
    }
}
