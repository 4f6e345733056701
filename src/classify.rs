//! Classification of decoded envelopes into success or [`ApiError`].

use crate::error::{ApiError, ErrorCode};
use crate::response::Envelope;
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct RawApiError {
    error_code: i64,
    #[serde(default)]
    error_msg: String,
    #[serde(default)]
    request_params: Vec<RawRequestParam>,
}

#[derive(Deserialize)]
struct RawRequestParam {
    key: String,
    #[serde(default)]
    value: Value,
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl TryFrom<&Envelope> for ApiError {
    type Error = Error;

    /// Extracts the error object of an envelope.
    ///
    /// Fails with [`Error::Internal`] if the envelope has no `error` field or
    /// the object does not have the documented shape.
    fn try_from(envelope: &Envelope) -> Result<Self> {
        let error = envelope
            .error()
            .ok_or_else(|| Error::Internal("envelope carries no error object".to_string()))?;

        let raw = RawApiError::deserialize(error)
            .map_err(|e| Error::Internal(format!("malformed error object: {}", e)))?;

        Ok(ApiError {
            code: ErrorCode(raw.error_code),
            message: raw.error_msg,
            request_params: raw
                .request_params
                .into_iter()
                .map(|p| (p.key, value_to_string(p.value)))
                .collect(),
        })
    }
}

/// Passes error-free envelopes through and turns error envelopes into errors.
///
/// # Errors
///
/// - [`Error::Api`] if the envelope carries a well-formed `error` object
/// - [`Error::Internal`] if the `error` field has an unexpected shape
///
/// # Examples
///
/// ```
/// use vkapi::{Error, classify::classify, response::Envelope};
/// use serde_json::json;
///
/// let ok = Envelope::from(json!({"response": [1]}));
/// assert!(classify(ok).is_ok());
///
/// let failed = Envelope::from(json!({
///     "error": {"error_code": 5, "error_msg": "auth failed", "request_params": []}
/// }));
/// assert!(matches!(classify(failed), Err(Error::Api(e)) if e.code.0 == 5));
/// ```
pub fn classify(envelope: Envelope) -> Result<Envelope> {
    if !envelope.is_error() {
        return Ok(envelope);
    }

    let api_error = match ApiError::try_from(&envelope) {
        Ok(api_error) => api_error,
        Err(e) => {
            tracing::error!(error = %e, envelope = %envelope.as_value(), "Unrecognized error envelope");
            return Err(e);
        }
    };

    let params = api_error
        .request_params
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ");

    tracing::error!(
        code = api_error.code.0,
        message = %api_error.message,
        description = api_error.code.description().unwrap_or("unknown"),
        request_params = %params,
        "VK API returned error"
    );

    Err(Error::Api(api_error))
}
