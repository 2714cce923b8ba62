//! SOAP response classification
//!
//! Wraps the raw HTTP response of a SOAP call and tells the caller which of
//! three things happened: the call succeeded, the service answered with a
//! SOAP fault, or the transport reported an HTTP error status.
//!
//! Both fault wire shapes are recognised: SOAP 1.1 (`faultcode` /
//! `faultstring`) and SOAP 1.2 (`Code/Value` / `Reason/Text`). Whether a
//! detected problem is returned as an error from construction or only
//! recorded on the [`Response`] is decided by an [`ErrorPolicy`].
//!
//! ```rust
//! use soap_response::{ErrorPolicy, HttpResponse, Response, SoapError};
//!
//! let http = HttpResponse::new(200, "OK", r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
//!     <soap:Body>
//!         <soap:Fault><faultcode>soap:Client</faultcode><faultstring>Bad input</faultstring></soap:Fault>
//!     </soap:Body>
//! </soap:Envelope>"#);
//!
//! // Strict mode: the fault is returned as an error
//! match Response::with_policy(http.clone(), &ErrorPolicy::new()) {
//!     Err(SoapError::Fault(fault)) => assert_eq!(fault.message(), "(soap:Client) Bad input"),
//!     other => panic!("expected a SOAP fault, got {:?}", other),
//! }
//!
//! // Lenient mode: the fault is recorded for inspection
//! let response = Response::with_policy(http, &ErrorPolicy::lenient()).unwrap();
//! assert!(response.is_soap_fault());
//! assert_eq!(response.soap_fault_code(), Some(0));
//! ```

mod error;
mod fault;
mod http;
pub mod logging;
mod policy;
mod response;

pub use error::{Result, SoapError};
pub use fault::{FaultMessageHandler, SoapFault, VersionedFaultMessage};
pub use http::{HttpError, HttpResponse, ResponseSummary, DEFAULT_BODY_LIMIT};
pub use policy::{
    clear_fault_message_handler, global_policy, raise_errors, set_fault_message_handler,
    set_global_policy, set_raise_errors, ErrorPolicy, RAISE_ERRORS_ENV,
};
pub use response::{Outcome, Response, ResponseBuilder};

pub use soap_xml::{XmlError, XmlMap, XmlParser, XmlTreeParser, XmlValue};
