//! The HTTP transport capability used by the client.
//!
//! The client only needs a blocking GET that streams the body into a sink and
//! tells timeouts apart from every other failure. [`ReqwestTransport`] is the
//! default implementation; tests and embedders may supply their own
//! [`Transport`].

use http::StatusCode;
use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Read};
use std::time::Duration;

/// A blocking HTTP GET capability.
///
/// # Examples
///
/// ```
/// use vkapi::transport::{Transport, TransportError};
/// use http::StatusCode;
/// use std::time::Duration;
///
/// /// Answers every request with the same body.
/// struct Canned(&'static str);
///
/// impl Transport for Canned {
///     fn get(
///         &mut self,
///         _url: &str,
///         _timeout: Duration,
///         sink: &mut dyn FnMut(&[u8]),
///     ) -> Result<StatusCode, TransportError> {
///         sink(self.0.as_bytes());
///         Ok(StatusCode::OK)
///     }
/// }
/// ```
pub trait Transport: Send {
    /// Performs one GET request against a fully built URL.
    ///
    /// The body is handed to `sink` as it arrives, in one or more chunks.
    /// `timeout` bounds the whole attempt. On error the sink may already have
    /// received part of the body; the caller discards it.
    fn get(
        &mut self,
        url: &str,
        timeout: Duration,
        sink: &mut dyn FnMut(&[u8]),
    ) -> Result<StatusCode, TransportError>;
}

/// What kind of transport failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The attempt did not finish within the timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// The request could not be built or sent.
    Request,
    /// Reading the response body failed.
    Body,
    /// Any other failure.
    Other,
}

impl TransportErrorKind {
    /// A human readable description of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Timeout => "operation timed out",
            TransportErrorKind::Connect => "couldn't connect to server",
            TransportErrorKind::Request => "failed to send request",
            TransportErrorKind::Body => "failed to read response body",
            TransportErrorKind::Other => "transport failure",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed transport attempt.
#[derive(Debug, Clone)]
pub struct TransportError {
    kind: TransportErrorKind,
    status: Option<StatusCode>,
    description: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            description: description.into(),
        }
    }

    /// Attaches the HTTP status that accompanied the failure.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }

    fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::TimedOut {
            return Self::new(TransportErrorKind::Timeout, err.to_string());
        }
        // reqwest errors name the request URL, which may carry secrets
        if let Some(inner) = err.get_ref().and_then(|e| e.downcast_ref::<reqwest::Error>()) {
            let kind = if inner.is_timeout() {
                TransportErrorKind::Timeout
            } else {
                TransportErrorKind::Body
            };
            let description = inner
                .source()
                .map(|source| describe(source))
                .unwrap_or_else(|| kind.as_str().to_string());
            return Self::new(kind, description);
        }
        Self::new(TransportErrorKind::Body, err.to_string())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {}): {}", self.kind, status, self.description),
            None => write!(f, "{}: {}", self.kind, self.description),
        }
    }
}

impl StdError for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else if err.is_builder() || err.is_request() || err.is_redirect() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };

        Self {
            kind,
            status: err.status(),
            description: describe(&err),
        }
    }
}

/// Flattens an error and its sources into one line.
fn describe(err: &dyn StdError) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}

/// [`Transport`] backed by `reqwest`'s blocking client.
///
/// One instance keeps one connection pool; it is owned by a single client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest's default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> crate::Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .user_agent(concat!("vkapi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                crate::Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { http_client })
    }

    /// Wraps an already configured reqwest client.
    pub fn from_client(http_client: reqwest::blocking::Client) -> Self {
        Self { http_client }
    }
}

impl Transport for ReqwestTransport {
    fn get(
        &mut self,
        url: &str,
        timeout: Duration,
        sink: &mut dyn FnMut(&[u8]),
    ) -> Result<StatusCode, TransportError> {
        let mut response = self.http_client.get(url).timeout(timeout).send()?;
        let status = response.status();

        let mut chunk = [0u8; 8192];
        loop {
            let read = response
                .read(&mut chunk)
                .map_err(|e| TransportError::from_io(e).with_status(status))?;
            if read == 0 {
                break;
            }
            sink(&chunk[..read]);
        }

        Ok(status)
    }
}
