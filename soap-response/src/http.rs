//! The raw HTTP response and HTTP-status error detection

use crate::{Result, SoapError};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// Largest body [`HttpResponse::from_ureq`] will read, 64 MiB
///
/// Use [`HttpResponse::from_ureq_with_limit`] for a different cap.
pub const DEFAULT_BODY_LIMIT: u64 = 64 * 1024 * 1024;

/// The transport's view of a received response
///
/// The body is kept as the bytes received, so an envelope in a non-UTF-8
/// encoding reaches the XML parser unchanged. Header names are stored
/// lowercase and looked up case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    status_text: String,
    body: Vec<u8>,
    headers: BTreeMap<String, String>,
}

impl HttpResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
            headers: BTreeMap::new(),
        }
    }

    /// Add a header, replacing any previous value under the same name
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Convert a response received through ureq
    ///
    /// Reads at most [`DEFAULT_BODY_LIMIT`] bytes of body. Fails only if the
    /// body cannot be read or is larger than that.
    pub fn from_ureq(response: ureq::Response) -> Result<Self> {
        Self::from_ureq_with_limit(response, DEFAULT_BODY_LIMIT)
    }

    /// Convert a response received through ureq, reading at most `limit`
    /// bytes of body
    ///
    /// A longer body fails with [`SoapError::BodyTooLarge`].
    pub fn from_ureq_with_limit(response: ureq::Response, limit: u64) -> Result<Self> {
        let status = response.status();
        let status_text = response.status_text().to_string();
        let headers = response
            .headers_names()
            .into_iter()
            .filter_map(|name| {
                let value = response.header(&name)?.to_string();
                Some((name.to_ascii_lowercase(), value))
            })
            .collect();

        let mut body = Vec::new();
        response
            .into_reader()
            .take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| SoapError::Network(e.to_string()))?;
        if body.len() as u64 > limit {
            return Err(SoapError::BodyTooLarge { limit });
        }

        Ok(Self {
            status,
            status_text,
            body,
            headers,
        })
    }

    /// Convert the result of a ureq call
    ///
    /// ureq reports 4xx/5xx statuses as errors; those still carry a SOAP
    /// response worth classifying, so they are turned back into an
    /// `HttpResponse`. Only transport failures become `SoapError::Network`.
    pub fn from_call(result: std::result::Result<ureq::Response, ureq::Error>) -> Result<Self> {
        match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => Self::from_ureq(response),
            Err(ureq::Error::Transport(transport)) => Err(SoapError::Network(transport.to_string())),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The body bytes exactly as received
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, with invalid UTF-8 replaced by U+FFFD
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Status line and headers, without the body
    pub fn summary(&self) -> ResponseSummary {
        ResponseSummary {
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
        }
    }
}

/// Status and headers of a response, attached to HTTP errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSummary {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
}

/// An HTTP status of 300 or above
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
    summary: ResponseSummary,
}

impl HttpError {
    /// Check a response's status code
    ///
    /// The message reads `"<status text> (<status>)"`, followed by
    /// `": <body>"` when the body is not empty.
    pub(crate) fn detect(response: &HttpResponse) -> Option<Self> {
        if response.status < 300 {
            return None;
        }

        let mut message = format!("{} ({})", response.status_text, response.status);
        if !response.body.is_empty() {
            message.push_str(": ");
            message.push_str(&response.body_text());
        }

        Some(Self {
            message,
            summary: response.summary(),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn summary(&self) -> &ResponseSummary {
        &self.summary
    }

    pub fn status(&self) -> u16 {
        self.summary.status
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
