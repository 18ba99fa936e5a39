//! Error taxonomy for calls against the transit backend.
//!
//! Every failure is classified exactly once, at the transport boundary (or in
//! a facade's pre-flight validation), and travels up unchanged. Facades may
//! replace the message shown to the user but never the [`ErrorKind`].

use serde_json::Value;
use thiserror::Error;

/// Message used for every failure where no response was received.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your internet connection and try again.";

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Client-side input validation failed; nothing was sent.
    Validation,
    /// HTTP 401. The session has been cleared.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 422, with field-level detail in `data`.
    Unprocessable,
    /// HTTP 429.
    RateLimited,
    /// HTTP 5xx.
    Server,
    /// Any other non-2xx status.
    Http,
    /// No response received (connect failure, reset, timeout).
    Network,
    /// HTTP 200 carrying an envelope with `status: "error"`.
    Logical,
    /// The response body could not be decoded into the expected shape.
    Decode,
}

impl ErrorKind {
    /// Classify a non-2xx HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            422 => ErrorKind::Unprocessable,
            429 => ErrorKind::RateLimited,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Http,
        }
    }

    /// Whether a failure of this kind may succeed when attempted again.
    pub fn is_retryable(self) -> bool {
        !matches!(
            self,
            ErrorKind::Validation
                | ErrorKind::Unauthorized
                | ErrorKind::Forbidden
                | ErrorKind::Unprocessable
        )
    }

    /// Stable lowercase label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unprocessable => "unprocessable",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Server => "server",
            ErrorKind::Http => "http",
            ErrorKind::Network => "network",
            ErrorKind::Logical => "logical",
            ErrorKind::Decode => "decode",
        }
    }
}

/// A normalized API failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    data: Option<Value>,
    server_message: bool,
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            data: None,
            server_message: false,
        }
    }

    /// Pre-flight validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// No response was received.
    pub fn network() -> Self {
        Self::new(ErrorKind::Network, NETWORK_ERROR_MESSAGE)
    }

    /// Envelope reported `status: "error"` on a 2xx response.
    pub fn logical(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.is_empty() => Self {
                server_message: true,
                ..Self::new(ErrorKind::Logical, message)
            },
            _ => Self::new(ErrorKind::Logical, "Unknown server error"),
        }
    }

    /// Body could not be decoded.
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::Decode, format!("Invalid response from server: {err}"))
    }

    /// Non-2xx response. The body's `message` field wins over the generic text.
    pub fn from_response(status: u16, body: Option<Value>) -> Self {
        let server_message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_owned);

        let (message, from_server) = match server_message {
            Some(message) => (message, true),
            None => (format!("Request failed with status {status}"), false),
        };

        Self {
            kind: ErrorKind::from_status(status),
            message,
            status: Some(status),
            data: body,
            server_message: from_server,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Raw response body, when one was received.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Field-level detail of a 422 response (`errors` in the body).
    pub fn validation_errors(&self) -> Option<&Value> {
        if self.kind != ErrorKind::Unprocessable {
            return None;
        }
        self.data.as_ref().and_then(|d| d.get("errors"))
    }

    /// True when the server answered with an HTTP error status.
    pub fn is_api_error(&self) -> bool {
        self.status.is_some()
    }

    pub fn is_network_error(&self) -> bool {
        self.kind == ErrorKind::Network
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// True when the message came from the server rather than from this crate.
    pub fn has_server_message(&self) -> bool {
        self.server_message
    }

    /// Replace the message with a facade fallback unless the server supplied
    /// one. Network and validation messages are already user-facing and kept.
    pub fn with_fallback(mut self, fallback: &str) -> Self {
        let keep = self.server_message
            || matches!(self.kind, ErrorKind::Network | ErrorKind::Validation);
        if !keep {
            self.message = fallback.to_owned();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::Unprocessable);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimited);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Http);
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(!ErrorKind::Unauthorized.is_retryable());
        assert!(!ErrorKind::Forbidden.is_retryable());
        assert!(!ErrorKind::Unprocessable.is_retryable());
        assert!(!ErrorKind::Validation.is_retryable());
        assert!(ErrorKind::Network.is_retryable());
        assert!(ErrorKind::Server.is_retryable());
        assert!(ErrorKind::RateLimited.is_retryable());
        assert!(ErrorKind::Http.is_retryable());
    }

    #[test]
    fn test_response_message_preference() {
        let err = ApiError::from_response(500, Some(json!({"message": "db down"})));
        assert_eq!(err.to_string(), "db down");
        assert!(err.has_server_message());
        assert!(err.is_api_error());

        let err = ApiError::from_response(418, None);
        assert_eq!(err.message(), "Request failed with status 418");
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.status(), Some(418));
    }

    #[test]
    fn test_validation_detail() {
        let body = json!({"message": "Invalid", "errors": {"phone": "required"}});
        let err = ApiError::from_response(422, Some(body));
        assert_eq!(err.validation_errors(), Some(&json!({"phone": "required"})));
    }

    #[test]
    fn test_fallback_keeps_kind() {
        let err = ApiError::from_response(502, None).with_fallback("Failed to fetch routes");
        assert_eq!(err.message(), "Failed to fetch routes");
        assert_eq!(err.kind(), ErrorKind::Server);

        let err = ApiError::from_response(400, Some(json!({"message": "Trip is full"})))
            .with_fallback("Failed to create booking");
        assert_eq!(err.message(), "Trip is full");

        let err = ApiError::network().with_fallback("Failed to fetch routes");
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
        assert!(err.is_network_error());
        assert!(!err.is_api_error());
    }
}
