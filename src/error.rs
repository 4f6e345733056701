//! Error types for VK API calls.
//!
//! Every fatal failure of a call surfaces as one [`Error`] variant. The first
//! failing pipeline stage wins: transport, then decoding, then classification
//! of the remote error envelope.

use crate::transport::TransportError;
use std::fmt;

/// The main error type for VK API calls.
///
/// # Examples
///
/// ```no_run
/// use vkapi::{Client, Error, Params, methods};
///
/// # fn example() -> Result<(), Error> {
/// let mut client = Client::builder().api_version("5.45").build()?;
///
/// match client.invoke(methods::users::GET, Params::new().with("user_id", "1")) {
///     Ok(envelope) => println!("Success: {:?}", envelope.response()),
///     Err(Error::Api(api_error)) => {
///         eprintln!("VK returned {}: {}", api_error.code, api_error.message);
///     }
///     Err(Error::Decode { raw_response, message }) => {
///         eprintln!("Malformed body ({}): {}", message, raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The transport failed and retries, if any applied, were exhausted.
    ///
    /// Only timeouts are retried; any other transport failure ends up here
    /// after a single attempt.
    #[error("Transport error after {attempts} attempt(s): {source}")]
    Transport {
        /// The failure reported by the last attempt
        #[source]
        source: TransportError,
        /// The number of attempts made
        attempts: usize,
    },

    /// The response body was not valid JSON.
    ///
    /// # Fields
    ///
    /// * `message` - The parser diagnostic
    /// * `raw_response` - The body that failed to parse
    #[error("Failed to decode response: {message}")]
    Decode {
        /// The parser diagnostic
        message: String,
        /// The raw response body, lossily converted to UTF-8
        raw_response: String,
    },

    /// The remote service answered with an `error` envelope.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The authorization call did not yield an access token.
    #[error("Authorization failed: {message}")]
    Authorization {
        /// What the OAuth endpoint reported, or why the answer was rejected
        message: String,
    },

    /// An envelope could not be interpreted.
    ///
    /// Raised when an `error` object has an unexpected shape, or when an
    /// [`ApiError`] is requested from an envelope that carries no error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Invalid configuration was provided.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid base URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if the call failed because every attempt timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { source, .. } if source.is_timeout())
    }

    /// Returns the remote error code for [`Error::Api`] errors.
    pub fn api_code(&self) -> Option<ErrorCode> {
        match self {
            Error::Api(api_error) => Some(api_error.code),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for VK API calls.
pub type Result<T> = std::result::Result<T, Error>;

/// An error reported in-band by the VK API.
///
/// Built from the `error` object of a response envelope:
///
/// ```json
/// {"error": {"error_code": 5, "error_msg": "...", "request_params": [{"key": "..", "value": ".."}]}}
/// ```
///
/// It copies out everything it needs, so it outlives the envelope.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("VK API error {code}: {message}")]
pub struct ApiError {
    /// The numeric error code
    pub code: ErrorCode,
    /// The human readable message sent by the service
    pub message: String,
    /// The request parameters echoed back by the service, in order
    pub request_params: Vec<(String, String)>,
}

impl ApiError {
    /// Returns the echoed value of a request parameter.
    pub fn request_param(&self, key: &str) -> Option<&str> {
        self.request_params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A VK API error code.
///
/// Codes unknown to this crate are kept verbatim; the named constants cover
/// the ones documented for every method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(pub i64);

impl ErrorCode {
    pub const UNKNOWN: ErrorCode = ErrorCode(1);
    pub const APPLICATION_DISABLED: ErrorCode = ErrorCode(2);
    pub const UNKNOWN_METHOD: ErrorCode = ErrorCode(3);
    pub const INVALID_SIGNATURE: ErrorCode = ErrorCode(4);
    pub const AUTHORIZATION_FAILED: ErrorCode = ErrorCode(5);
    pub const TOO_MANY_REQUESTS: ErrorCode = ErrorCode(6);
    pub const PERMISSION_DENIED: ErrorCode = ErrorCode(7);
    pub const INVALID_REQUEST: ErrorCode = ErrorCode(8);
    pub const FLOOD_CONTROL: ErrorCode = ErrorCode(9);
    pub const INTERNAL_SERVER_ERROR: ErrorCode = ErrorCode(10);
    pub const APPLICATION_MUST_BE_DISABLED: ErrorCode = ErrorCode(11);
    pub const CAPTCHA_NEEDED: ErrorCode = ErrorCode(14);
    pub const ACCESS_DENIED: ErrorCode = ErrorCode(15);
    pub const HTTPS_REQUIRED: ErrorCode = ErrorCode(16);
    pub const VALIDATION_REQUIRED: ErrorCode = ErrorCode(17);
    pub const STANDALONE_ONLY: ErrorCode = ErrorCode(20);
    pub const STANDALONE_AND_OPENAPI_ONLY: ErrorCode = ErrorCode(21);
    pub const METHOD_DISABLED: ErrorCode = ErrorCode(23);
    pub const CONFIRMATION_REQUIRED: ErrorCode = ErrorCode(24);
    pub const INVALID_PARAMETER: ErrorCode = ErrorCode(100);
    pub const INVALID_APP_ID: ErrorCode = ErrorCode(101);
    pub const INVALID_USER_ID: ErrorCode = ErrorCode(113);
    pub const INVALID_TIMESTAMP: ErrorCode = ErrorCode(150);
    pub const ALBUM_ACCESS_DENIED: ErrorCode = ErrorCode(200);
    pub const AUDIO_ACCESS_DENIED: ErrorCode = ErrorCode(201);
    pub const GROUP_ACCESS_DENIED: ErrorCode = ErrorCode(203);
    pub const ALBUM_FULL: ErrorCode = ErrorCode(300);
    pub const VOTES_DISABLED: ErrorCode = ErrorCode(500);
    pub const ADS_PERMISSION_DENIED: ErrorCode = ErrorCode(600);
    pub const ADS_ERROR: ErrorCode = ErrorCode(603);

    /// Returns a short description for well-known codes.
    ///
    /// ```
    /// use vkapi::ErrorCode;
    ///
    /// assert_eq!(ErrorCode(6).description(), Some("too many requests per second"));
    /// assert_eq!(ErrorCode(4242).description(), None);
    /// ```
    pub fn description(&self) -> Option<&'static str> {
        let text = match *self {
            Self::UNKNOWN => "unknown error",
            Self::APPLICATION_DISABLED => "application is disabled",
            Self::UNKNOWN_METHOD => "unknown method passed",
            Self::INVALID_SIGNATURE => "incorrect signature",
            Self::AUTHORIZATION_FAILED => "user authorization failed",
            Self::TOO_MANY_REQUESTS => "too many requests per second",
            Self::PERMISSION_DENIED => "permission to perform this action is denied",
            Self::INVALID_REQUEST => "invalid request",
            Self::FLOOD_CONTROL => "flood control",
            Self::INTERNAL_SERVER_ERROR => "internal server error",
            Self::APPLICATION_MUST_BE_DISABLED => "application must be disabled in test mode",
            Self::CAPTCHA_NEEDED => "captcha needed",
            Self::ACCESS_DENIED => "access denied",
            Self::HTTPS_REQUIRED => "HTTP authorization failed, HTTPS required",
            Self::VALIDATION_REQUIRED => "validation required",
            Self::STANDALONE_ONLY => "permission denied for non-standalone applications",
            Self::STANDALONE_AND_OPENAPI_ONLY => {
                "permission allowed only for standalone and OpenAPI applications"
            }
            Self::METHOD_DISABLED => "method was disabled",
            Self::CONFIRMATION_REQUIRED => "confirmation required",
            Self::INVALID_PARAMETER => "one of the parameters specified was missing or invalid",
            Self::INVALID_APP_ID => "invalid application id",
            Self::INVALID_USER_ID => "invalid user id",
            Self::INVALID_TIMESTAMP => "invalid timestamp",
            Self::ALBUM_ACCESS_DENIED => "access to album denied",
            Self::AUDIO_ACCESS_DENIED => "access to audio denied",
            Self::GROUP_ACCESS_DENIED => "access to group denied",
            Self::ALBUM_FULL => "album is full",
            Self::VOTES_DISABLED => "votes transactions are disabled",
            Self::ADS_PERMISSION_DENIED => "no permission to perform ads operation",
            Self::ADS_ERROR => "ads operation error",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        ErrorCode(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportErrorKind;

    #[test]
    fn test_is_timeout() {
        let err = Error::Transport {
            source: TransportError::new(TransportErrorKind::Timeout, "operation timed out"),
            attempts: 3,
        };
        assert!(err.is_timeout());

        let err = Error::Transport {
            source: TransportError::new(TransportErrorKind::Connect, "connection refused"),
            attempts: 1,
        };
        assert!(!err.is_timeout());
        assert!(!Error::Internal("x".to_string()).is_timeout());
    }

    #[test]
    fn test_api_code_and_request_param() {
        let api_error = ApiError {
            code: ErrorCode::AUTHORIZATION_FAILED,
            message: "auth failed".to_string(),
            request_params: vec![
                ("method".to_string(), "users.get".to_string()),
                ("v".to_string(), "5.45".to_string()),
            ],
        };
        assert_eq!(api_error.request_param("v"), Some("5.45"));
        assert_eq!(api_error.request_param("lang"), None);

        let err = Error::from(api_error);
        assert_eq!(err.api_code(), Some(ErrorCode(5)));
        assert_eq!(err.to_string(), "VK API error 5: auth failed");
    }

    #[test]
    fn test_raw_response_only_on_decode_errors() {
        let err = Error::Decode {
            message: "EOF while parsing".to_string(),
            raw_response: "{\"response\":".to_string(),
        };
        assert_eq!(err.raw_response(), Some("{\"response\":"));
        assert_eq!(Error::Internal("x".to_string()).raw_response(), None);
    }
}
