//! The response envelope

use crate::fault::{self, SoapFault};
use crate::http::{HttpError, HttpResponse};
use crate::policy::{self, ErrorPolicy};
use crate::{Result, SoapError};
use soap_xml::{find_soap_body, XmlError, XmlMap, XmlParser, XmlTreeParser};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

static EMPTY_DOCUMENT: XmlMap = XmlMap::new();

/// What a response turned out to be
///
/// A SOAP fault takes precedence over an HTTP error when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Success,
    SoapFault(&'a SoapFault),
    HttpError(&'a HttpError),
}

/// A classified SOAP response
///
/// Built from an [`HttpResponse`]. Construction first looks for a SOAP fault
/// in the body, then checks the HTTP status. Under a raising policy the first
/// problem found is returned as an error and the second check never runs.
///
/// The body is parsed lazily, at most once per response, and the result is
/// cached for the response's lifetime.
pub struct Response {
    http: HttpResponse,
    parser: Box<dyn XmlParser>,
    document: OnceLock<std::result::Result<XmlMap, XmlError>>,
    body: OnceLock<XmlMap>,
    soap_fault: Option<SoapFault>,
    http_error: Option<HttpError>,
}

impl Response {
    /// Classify a response using a snapshot of the global policy
    pub fn new(http: HttpResponse) -> Result<Self> {
        Self::builder(http).build()
    }

    /// Classify a response under an explicit policy
    pub fn with_policy(http: HttpResponse, policy: &ErrorPolicy) -> Result<Self> {
        Self::builder(http).policy(policy.clone()).build()
    }

    pub fn builder(http: HttpResponse) -> ResponseBuilder {
        ResponseBuilder {
            http,
            policy: None,
            parser: Box::new(XmlTreeParser),
        }
    }

    /// The contents of the SOAP body as a structured mapping
    ///
    /// Keys are normalized (no namespace prefix, snake_case). A body that
    /// fails to parse yields an empty mapping; see [`parse_error`](Self::parse_error).
    pub fn body(&self) -> &XmlMap {
        self.body.get_or_init(|| find_soap_body(self.document()))
    }

    /// The full parsed document, empty if the body is not valid XML
    pub fn document(&self) -> &XmlMap {
        match self.parsed() {
            Ok(document) => document,
            Err(_) => &EMPTY_DOCUMENT,
        }
    }

    /// Why the body could not be parsed, if it could not
    pub fn parse_error(&self) -> Option<&XmlError> {
        self.parsed().as_ref().err()
    }

    fn parsed(&self) -> &std::result::Result<XmlMap, XmlError> {
        self.document.get_or_init(|| {
            let parsed = self.parser.parse(self.http.body());
            if let Err(e) = &parsed {
                debug!(error = %e, "Response body is not valid XML, treating it as empty");
            }
            parsed
        })
    }

    /// The raw response body as text, unparsed
    ///
    /// Borrowed when the body is valid UTF-8. Otherwise invalid sequences are
    /// replaced; [`raw_body`](Self::raw_body) has the exact bytes.
    pub fn xml(&self) -> Cow<'_, str> {
        self.http.body_text()
    }

    /// The response body exactly as received
    pub fn raw_body(&self) -> &[u8] {
        self.http.body()
    }

    pub fn is_soap_fault(&self) -> bool {
        self.soap_fault.is_some()
    }

    pub fn soap_fault(&self) -> Option<&SoapFault> {
        self.soap_fault.as_ref()
    }

    pub fn soap_fault_message(&self) -> Option<&str> {
        self.soap_fault.as_ref().map(SoapFault::message)
    }

    pub fn soap_fault_code(&self) -> Option<i64> {
        self.soap_fault.as_ref().map(SoapFault::code)
    }

    pub fn is_http_error(&self) -> bool {
        self.http_error.is_some()
    }

    pub fn http_error(&self) -> Option<&HttpError> {
        self.http_error.as_ref()
    }

    pub fn http_error_message(&self) -> Option<&str> {
        self.http_error.as_ref().map(HttpError::message)
    }

    /// The wrapped transport response
    pub fn http(&self) -> &HttpResponse {
        &self.http
    }

    pub fn into_http(self) -> HttpResponse {
        self.http
    }

    pub fn outcome(&self) -> Outcome<'_> {
        match (&self.soap_fault, &self.http_error) {
            (Some(fault), _) => Outcome::SoapFault(fault),
            (None, Some(error)) => Outcome::HttpError(error),
            (None, None) => Outcome::Success,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome(), Outcome::Success)
    }

    /// Turn a recorded fault or HTTP error into an `Err`
    ///
    /// Useful with a lenient policy when the caller wants strict handling at
    /// a particular call site.
    pub fn into_result(mut self) -> Result<Self> {
        if let Some(fault) = self.soap_fault.take() {
            return Err(SoapError::Fault(fault));
        }
        if let Some(error) = self.http_error.take() {
            return Err(SoapError::Http(error));
        }
        Ok(self)
    }

    fn handle_soap_fault(&mut self, policy: &ErrorPolicy) -> Result<()> {
        let detected = fault::extract(self.body(), policy.fault_handler())?;

        if let Some(fault) = detected {
            debug!(code = fault.code(), message = %fault.message(), "SOAP fault in response");
            if policy.raise_errors() {
                return Err(SoapError::Fault(fault));
            }
            self.soap_fault = Some(fault);
        }

        Ok(())
    }

    fn handle_http_error(&mut self, policy: &ErrorPolicy) -> Result<()> {
        if let Some(error) = HttpError::detect(&self.http) {
            debug!(status = error.status(), "HTTP error status in response");
            if policy.raise_errors() {
                return Err(SoapError::Http(error));
            }
            self.http_error = Some(error);
        }

        Ok(())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xml())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("http", &self.http)
            .field("soap_fault", &self.soap_fault)
            .field("http_error", &self.http_error)
            .finish_non_exhaustive()
    }
}

/// Configures how a [`Response`] is built
pub struct ResponseBuilder {
    http: HttpResponse,
    policy: Option<ErrorPolicy>,
    parser: Box<dyn XmlParser>,
}

impl ResponseBuilder {
    /// Use this policy instead of the global one
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Replace the default xmltree-backed parser
    pub fn parser(mut self, parser: impl XmlParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn build(self) -> Result<Response> {
        let policy = self.policy.unwrap_or_else(policy::global_policy);

        let mut response = Response {
            http: self.http,
            parser: self.parser,
            document: OnceLock::new(),
            body: OnceLock::new(),
            soap_fault: None,
            http_error: None,
        };

        response.handle_soap_fault(&policy)?;
        response.handle_http_error(&policy)?;

        Ok(response)
    }
}
