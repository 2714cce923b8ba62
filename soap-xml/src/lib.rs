//! Untyped XML parsing for SOAP response bodies
//!
//! This crate turns raw XML into a generic [`XmlMap`] tree so that callers can
//! inspect a SOAP response without declaring a typed struct for every message.
//! It also knows how to locate the SOAP `Body` inside a parsed envelope.
//!
//! ```rust
//! use soap_xml::{find_soap_body, parse};
//!
//! let document = parse(br#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
//!     <s:Body><GetStatusResponse><Status>OK</Status></GetStatusResponse></s:Body>
//! </s:Envelope>"#).unwrap();
//!
//! let body = find_soap_body(&document);
//! assert_eq!(
//!     body.lookup(&["get_status_response", "status"]).and_then(|v| v.as_text()),
//!     Some("OK")
//! );
//! ```

mod body;
mod error;
mod mapping;
mod parser;

pub use body::{find_soap_body, local_name, normalize_key};
pub use error::{Result, XmlError};
pub use mapping::{XmlMap, XmlValue};
pub use parser::{parse, XmlParser, XmlTreeParser};
