//! Decoded response envelopes.
//!
//! Every VK answer is a JSON object holding either a `response` payload or an
//! `error` object. [`Envelope`] wraps the decoded tree without interpreting
//! the payload.

use crate::{Error, Result};
use serde_json::Value;

/// A decoded VK API answer.
///
/// # Examples
///
/// ```
/// use vkapi::response::decode;
///
/// let mut buffer = br#"{"response":{"count":1,"items":[{"id":1}]}}"#.to_vec();
/// let envelope = decode(&mut buffer).unwrap();
///
/// assert!(!envelope.is_error());
/// assert_eq!(envelope.response().unwrap()["count"], 1);
/// assert!(buffer.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    value: Value,
}

impl Envelope {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// The `response` payload, if the call succeeded.
    pub fn response(&self) -> Option<&Value> {
        self.value.get("response")
    }

    /// The raw `error` field, if the service reported one.
    pub fn error(&self) -> Option<&Value> {
        self.value.get("error")
    }

    /// Returns `true` if the envelope carries an `error` field.
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// The `access_token` field of an OAuth answer.
    pub fn access_token(&self) -> Option<&str> {
        self.value.get("access_token").and_then(Value::as_str)
    }

    /// Returns a top-level field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Consumes the envelope and returns the `response` payload.
    pub fn into_response(self) -> Option<Value> {
        match self.value {
            Value::Object(mut map) => map.remove("response"),
            _ => None,
        }
    }
}

impl From<Value> for Envelope {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl AsRef<Value> for Envelope {
    fn as_ref(&self) -> &Value {
        &self.value
    }
}

impl std::ops::Deref for Envelope {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

/// Parses a buffered body into an [`Envelope`].
///
/// The buffer is cleared whether or not parsing succeeds, so nothing from
/// this body leaks into the next call.
///
/// # Errors
///
/// Returns [`Error::Decode`] with the parser diagnostic if the body is not
/// valid JSON.
pub fn decode(buffer: &mut Vec<u8>) -> Result<Envelope> {
    let parsed = serde_json::from_slice::<Value>(buffer);

    let result = match parsed {
        Ok(value) => {
            let envelope = Envelope::new(value);
            if envelope.access_token().is_some() {
                tracing::trace!(bytes = buffer.len(), "Decoded token response");
            } else {
                tracing::trace!(body = %envelope.as_value(), "Decoded response");
            }
            Ok(envelope)
        }
        Err(e) => {
            let raw_response = String::from_utf8_lossy(buffer).into_owned();
            tracing::error!(
                error = %e,
                raw_response = %raw_response,
                "Failed to decode response"
            );
            Err(Error::Decode {
                message: e.to_string(),
                raw_response,
            })
        }
    };

    buffer.clear();
    result
}
