//! Error types for the search API client.
//!
//! # Design
//! Every failure a caller can see is an `ApiError`. Non-2xx responses are
//! turned into `Http` in exactly one place (`ApiError::from_response`), so the
//! status code and message are shaped the same way for every endpoint.

use crate::http::HttpResponse;

/// JSON fields checked, in order, for a server-provided error message.
const MESSAGE_FIELDS: [&str; 3] = ["message", "error", "detail"];

/// Errors returned by `SearchClient`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never completed (DNS, refused connection, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A 2xx response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration could not be built.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Build an `Http` failure from a non-2xx response.
    pub fn from_response(response: &HttpResponse) -> Self {
        ApiError::Http {
            status: response.status,
            message: failure_message(response.status, &response.body),
        }
    }

    /// HTTP status for `Http` failures, `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Message for a failed response. Never empty.
fn failure_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(serde_json::Value::Object(fields)) =
        serde_json::from_str::<serde_json::Value>(trimmed)
    {
        let field = MESSAGE_FIELDS
            .iter()
            .filter_map(|key| fields.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|msg| !msg.is_empty());
        if let Some(msg) = field {
            return msg.to_string();
        }
    }
    if trimmed.is_empty() {
        format!("operation failed (status {status})")
    } else {
        trimmed.to_string()
    }
}
