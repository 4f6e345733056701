//! Credentials and per-client logging options.

use std::fmt;

/// Application credentials and the defaults injected into every call.
///
/// Empty strings are treated as "not configured".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// The application (client) id used for authorization
    pub app_id: String,
    /// The application secret used for authorization
    pub app_secret: String,
    /// Injected as `access_token` unless the caller passes one
    pub access_token: Option<String>,
    /// Injected as `v` unless the caller passes one
    pub api_version: Option<String>,
    /// Injected as `lang` unless the caller passes one
    pub lang: Option<String>,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            ..Default::default()
        }
    }
}

/// Turns an empty setting into `None`.
pub(crate) fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |set: bool| if set { "***" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &redacted(!self.app_secret.is_empty()))
            .field("access_token", &redacted(self.access_token.is_some()))
            .field("api_version", &self.api_version)
            .field("lang", &self.lang)
            .finish()
    }
}

/// Logging behaviour of one client.
///
/// Owned by the client rather than kept in process-wide state, so two clients
/// in one process can log differently. Where log records go is decided by
/// the application's `tracing` subscriber.
///
/// # Examples
///
/// ```
/// use vkapi::LogOptions;
///
/// let quiet = LogOptions {
///     warn_on_missing_defaults: false,
///     ..LogOptions::default()
/// };
/// assert!(quiet.redact_secrets);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// Warn when no access token, API version or language is available.
    pub warn_on_missing_defaults: bool,
    /// Log each request URL at debug level.
    pub log_request_urls: bool,
    /// Mask the access token, app secret and password in logged URLs.
    pub redact_secrets: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            warn_on_missing_defaults: true,
            log_request_urls: true,
            redact_secrets: true,
        }
    }
}
