//! The VK API client.
//!
//! [`Client`] is the single entry point every call goes through. It injects
//! the default parameters, throttles, builds the URL, runs the transport with
//! timeout retries, decodes the body and classifies the answer. Use
//! [`ClientBuilder`] to configure and create clients.

use crate::classify::classify;
use crate::config::{non_empty, Credentials, LogOptions};
use crate::methods::Method;
use crate::params::Params;
use crate::rate_limit::{RateLimiter, DEFAULT_MAX_REQUESTS_PER_SECOND};
use crate::request_url::{build_url, redact_secrets};
use crate::response::{decode, Envelope};
use crate::retry::{fetch, RetryPolicy};
use crate::transport::{ReqwestTransport, Transport};
use crate::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Base URL of ordinary API methods.
pub const DEFAULT_API_URL: &str = "https://api.vk.com/method/";

/// Base URL of the OAuth token endpoint.
pub const DEFAULT_OAUTH_URL: &str = "https://oauth.vk.com/";

/// A blocking VK API client.
///
/// A client owns one transport, one rate window and one response buffer, so
/// it takes `&mut self` for every call. Share it across threads behind a
/// `Mutex`, or create one client per thread.
///
/// # Examples
///
/// ```no_run
/// use vkapi::{Client, Params, methods};
///
/// # fn example() -> Result<(), vkapi::Error> {
/// let mut client = Client::builder()
///     .app_id("3697615")
///     .app_secret("AlVXZFMUqyrnABp8ncuU")
///     .api_version("5.45")
///     .build()?;
///
/// client.authorize("example@example.com", "examplepassword")?;
///
/// let users = client.invoke(methods::users::SEARCH, Params::new().with("count", "500"))?;
/// for user in users["response"]["items"].as_array().into_iter().flatten() {
///     println!("{}", user["id"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client {
    credentials: Credentials,
    api_url: String,
    oauth_url: String,
    retry_policy: RetryPolicy,
    rate_limiter: RateLimiter,
    log_options: LogOptions,
    transport: Box<dyn Transport>,
    buffer: Vec<u8>,
    last_response: Option<Envelope>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with application credentials and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Result<Self> {
        ClientBuilder::new()
            .app_id(app_id)
            .app_secret(app_secret)
            .build()
    }

    /// Calls a remote procedure by its wire name.
    ///
    /// Missing `access_token`, `v` and `lang` parameters are filled from the
    /// configured defaults. The call may block to honour the rate ceiling.
    ///
    /// # Errors
    ///
    /// The first failing stage wins: [`Error::Transport`], then
    /// [`Error::Decode`], then [`Error::Api`] or [`Error::Internal`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vkapi::{Client, Params};
    ///
    /// # fn example() -> Result<(), vkapi::Error> {
    /// let mut client = Client::builder().api_version("5.45").build()?;
    /// let envelope = client.call("users.get", Params::from([("user_ids", "1")]))?;
    /// println!("{}", envelope["response"][0]["first_name"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn call(&mut self, method: &str, mut params: Params) -> Result<Envelope> {
        self.inject_defaults(&mut params);
        let base = self.api_url.clone();
        let envelope = self.exchange(&base, method, &params)?;
        classify(envelope)
    }

    /// Calls a method from the [`methods`](crate::methods) table.
    pub fn invoke(&mut self, method: Method, params: Params) -> Result<Envelope> {
        self.call(method.remote(), params)
    }

    /// Runs the pipeline against an arbitrary base URL.
    ///
    /// No default parameters are injected; the parameters are sent as given.
    pub fn custom_request(&mut self, base: &str, method: &str, params: &Params) -> Result<Envelope> {
        let envelope = self.exchange(base, method, params)?;
        classify(envelope)
    }

    /// Obtains an access token with the password grant.
    ///
    /// On success the token becomes the default `access_token` of every
    /// following call and is returned. On failure the previous token is kept.
    ///
    /// # Errors
    ///
    /// - [`Error::Api`] if the answer carries a VK error object
    /// - [`Error::Authorization`] if the OAuth endpoint rejected the grant or
    ///   the answer has no `access_token`
    /// - transport and decode errors as for [`Client::call`]
    pub fn authorize(&mut self, login: &str, password: &str) -> Result<String> {
        let params = Params::from([
            ("grant_type", "password"),
            ("client_id", self.credentials.app_id.as_str()),
            ("client_secret", self.credentials.app_secret.as_str()),
            ("username", login),
            ("password", password),
        ]);

        let base = self.oauth_url.clone();
        let envelope = self.exchange(&base, "token", &params)?;

        // OAuth failures use a string `error` next to `error_description`
        if let Some(Value::String(error)) = envelope.error() {
            let description = envelope
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or("no description");
            tracing::error!(error = %error, description = %description, "Authorization rejected");
            return Err(Error::Authorization {
                message: format!("{}: {}", error, description),
            });
        }

        let envelope = classify(envelope)?;

        let Some(token) = envelope.access_token() else {
            tracing::error!("No access_token field in the authorization answer");
            return Err(Error::Authorization {
                message: "no access_token field in the answer".to_string(),
            });
        };

        let token = token.to_string();
        self.credentials.access_token = Some(token.clone());

        tracing::info!(
            user_id = ?envelope.get("user_id"),
            expires_in = ?envelope.get("expires_in"),
            "Authorized"
        );

        Ok(token)
    }

    /// Throttles, sends and decodes one request. Classification is left to
    /// the caller.
    fn exchange(&mut self, base: &str, method: &str, params: &Params) -> Result<Envelope> {
        self.last_response = None;
        self.rate_limiter.acquire();

        let url = build_url(base, method, params);
        if self.log_options.log_request_urls {
            let shown = if self.log_options.redact_secrets {
                redact_secrets(&url)
            } else {
                url.clone()
            };
            tracing::debug!(method = %method, url = %shown, "Executing VK API request");
        }

        let result = fetch(self.transport.as_mut(), &url, &self.retry_policy, &mut self.buffer)
            .and_then(|status| {
                if !status.is_success() {
                    tracing::warn!(
                        status = status.as_u16(),
                        method = %method,
                        "Non-success HTTP status, decoding body anyway"
                    );
                }
                decode(&mut self.buffer)
            });

        self.buffer.clear();
        let envelope = result?;
        self.last_response = Some(envelope.clone());
        Ok(envelope)
    }

    fn inject_defaults(&self, params: &mut Params) {
        self.inject_default(
            params,
            "access_token",
            self.credentials.access_token.as_deref(),
            "Access token wasn't passed, only a few methods will work",
        );
        self.inject_default(
            params,
            "v",
            self.credentials.api_version.as_deref(),
            "API version wasn't passed, VK will assume its default",
        );
        self.inject_default(
            params,
            "lang",
            self.credentials.lang.as_deref(),
            "Language wasn't passed, VK will answer in its default language",
        );
    }

    fn inject_default(&self, params: &mut Params, key: &str, default: Option<&str>, warning: &str) {
        match default {
            Some(value) => {
                params.insert_default(key, value);
            }
            None if self.log_options.warn_on_missing_defaults && !params.contains_key(key) => {
                tracing::warn!(parameter = key, "{}", warning);
            }
            None => {}
        }
    }

    /// Sets the application id used by [`Client::authorize`].
    pub fn set_app_id(&mut self, app_id: impl Into<String>) {
        self.credentials.app_id = app_id.into();
    }

    /// Sets the application secret used by [`Client::authorize`].
    pub fn set_app_secret(&mut self, app_secret: impl Into<String>) {
        self.credentials.app_secret = app_secret.into();
    }

    /// Sets the default access token. An empty string clears it.
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.credentials.access_token = non_empty(token);
    }

    /// Sets the default API version. An empty string clears it.
    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.credentials.api_version = non_empty(version);
    }

    /// Sets the default language. An empty string clears it.
    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.credentials.lang = non_empty(lang);
    }

    /// Changes the rate ceiling; effective on the next call.
    pub fn set_max_requests_per_second(&mut self, max_requests_per_second: u32) {
        self.rate_limiter
            .set_max_requests_per_second(max_requests_per_second);
    }

    /// Replaces the logging options of this client.
    pub fn set_log_options(&mut self, log_options: LogOptions) {
        self.log_options = log_options;
    }

    /// Returns the application id.
    pub fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    /// Returns the default access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.credentials.access_token.as_deref()
    }

    /// Returns the default API version, if any.
    pub fn api_version(&self) -> Option<&str> {
        self.credentials.api_version.as_deref()
    }

    /// Returns the default language, if any.
    pub fn lang(&self) -> Option<&str> {
        self.credentials.lang.as_deref()
    }

    /// Returns all credentials and defaults.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the current rate ceiling.
    pub fn max_requests_per_second(&self) -> u32 {
        self.rate_limiter.max_requests_per_second()
    }

    /// Returns the logging options of this client.
    pub fn log_options(&self) -> LogOptions {
        self.log_options
    }

    /// The envelope decoded by the latest call, error envelopes included.
    ///
    /// `None` before the first call and after a call that failed before a
    /// body could be decoded.
    pub fn last_response(&self) -> Option<&Envelope> {
        self.last_response.as_ref()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("credentials", &self.credentials)
            .field("api_url", &self.api_url)
            .field("oauth_url", &self.oauth_url)
            .field("retry_policy", &self.retry_policy)
            .field("rate_limiter", &self.rate_limiter)
            .field("log_options", &self.log_options)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use vkapi::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), vkapi::Error> {
/// let client = ClientBuilder::new()
///     .access_token("533bacf01e11f55b536a565b57531ac114461ae8736d6506a3")
///     .api_version("5.45")
///     .lang("en")
///     .max_requests_per_second(3)
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    credentials: Credentials,
    api_url: Option<Url>,
    oauth_url: Option<Url>,
    retry_policy: RetryPolicy,
    max_requests_per_second: u32,
    log_options: LogOptions,
    transport: Option<Box<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            credentials: Credentials::default(),
            api_url: None,
            oauth_url: None,
            retry_policy: RetryPolicy::default(),
            max_requests_per_second: DEFAULT_MAX_REQUESTS_PER_SECOND,
            log_options: LogOptions::default(),
            transport: None,
        }
    }

    /// Sets the application id used for authorization.
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.credentials.app_id = app_id.into();
        self
    }

    /// Sets the application secret used for authorization.
    pub fn app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.credentials.app_secret = app_secret.into();
        self
    }

    /// Sets the default access token. An empty string leaves it unset.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.access_token = non_empty(token);
        self
    }

    /// Sets the default API version sent as `v`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.credentials.api_version = non_empty(version);
        self
    }

    /// Sets the default language sent as `lang`.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.credentials.lang = non_empty(lang);
        self
    }

    /// Replaces all credentials at once.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the client-side rate ceiling. Defaults to 3.
    pub fn max_requests_per_second(mut self, max_requests_per_second: u32) -> Self {
        self.max_requests_per_second = max_requests_per_second;
        self
    }

    /// Sets the per-attempt timeout. Defaults to 5 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.retry_policy.timeout = timeout;
        self
    }

    /// Sets how many attempts a timing out call gets. Defaults to 3.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.retry_policy.max_attempts = max_attempts;
        self
    }

    /// Replaces the timeout and attempt settings at once.
    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Sets the base URL of API methods.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn api_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.api_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the base URL of the OAuth endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn oauth_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.oauth_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the logging options of the client.
    pub fn log_options(mut self, log_options: LogOptions) -> Self {
        self.log_options = log_options;
        self
    }

    /// Uses a custom transport instead of the reqwest one.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default HTTP transport cannot be created.
    pub fn build(self) -> Result<Client> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::new()?),
        };

        Ok(Client {
            credentials: self.credentials,
            api_url: base_url(self.api_url, DEFAULT_API_URL),
            oauth_url: base_url(self.oauth_url, DEFAULT_OAUTH_URL),
            retry_policy: self.retry_policy,
            rate_limiter: RateLimiter::new(self.max_requests_per_second),
            log_options: self.log_options,
            transport,
            buffer: Vec::new(),
            last_response: None,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Method names are appended directly, so bases always end with a slash.
fn base_url(url: Option<Url>, default: &str) -> String {
    let mut base = url.map(String::from).unwrap_or_else(|| default.to_string());
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}
