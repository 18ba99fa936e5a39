//! The `{status, data, message}` response envelope.
//!
//! Decoded once, at the transport boundary, into [`Envelope`]; facades only
//! ever see the unwrapped [`ApiResponse`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// A successful envelope, unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: Option<String>,
}

impl ApiResponse<Value> {
    /// Deserialize `data` into a concrete type.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<ApiResponse<T>> {
        let data = serde_json::from_value(self.data).map_err(ApiError::decode)?;
        Ok(ApiResponse {
            data,
            message: self.message,
        })
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(ApiResponse<T>),
    Failure { message: Option<String> },
}

impl Envelope<Value> {
    /// Classify a 2xx body.
    ///
    /// `status: "success"` and `status: "error"` are the two envelope forms.
    /// A body without a recognised `status` is passed through whole as data.
    pub fn decode(body: Value) -> Self {
        let mut map = match body {
            Value::Object(map) => map,
            other => {
                return Envelope::Success(ApiResponse {
                    data: other,
                    message: None,
                })
            }
        };

        let message = map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match map.get("status").and_then(Value::as_str) {
            Some("success") => Envelope::Success(ApiResponse {
                data: map.remove("data").unwrap_or(Value::Null),
                message,
            }),
            Some("error") => Envelope::Failure { message },
            _ => Envelope::Success(ApiResponse {
                data: Value::Object(map),
                message: None,
            }),
        }
    }
}

impl<T> Envelope<T> {
    /// `Failure` becomes a logical error carrying the server's message.
    pub fn into_result(self) -> ApiResult<ApiResponse<T>> {
        match self {
            Envelope::Success(response) => Ok(response),
            Envelope::Failure { message } => Err(ApiError::logical(message)),
        }
    }
}
