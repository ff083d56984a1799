//! JSON envelopes wrapping every API response

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{new_id, Timestamp};

/// Envelope for a successful response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub request_id: String,
    pub server_time: Timestamp,
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    /// Wrap `data` with a fresh request id and the current server time.
    ///
    /// The id is generated here and is unrelated to any id carried by the
    /// inbound request.
    pub fn new(data: T) -> Self {
        Self {
            request_id: new_id().to_string(),
            server_time: Timestamp::now(),
            data,
        }
    }
}

/// Envelope for an error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub request_id: String,
    pub server_time: Timestamp,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            request_id: new_id().to_string(),
            server_time: Timestamp::now(),
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details,
            },
        }
    }
}
