//! Standard response envelope helpers.
//!
//! Success: `{"status":"ok","code":200,"data":..}`.
//! Error: `{"status":"error","code":404,"message":"Not found"}`.

use crate::error::ApiError;
use crate::state::ApiState;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Ok,
    Error,
}

/// `ok` carries `data` and no `message`; `error` carries `message` and no `data`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn success(data: Value, code: u16) -> Self {
        Envelope {
            status: EnvelopeStatus::Ok,
            code,
            data: Some(data),
            message: None,
        }
    }

    /// Without a message, falls back to the status table (empty for unknown codes).
    pub fn error(code: u16, message: Option<&str>) -> Self {
        Envelope {
            status: EnvelopeStatus::Error,
            code,
            data: None,
            message: Some(message.unwrap_or_else(|| status_message(code)).to_string()),
        }
    }

    fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Default message for a status code; empty for codes outside the table.
pub fn status_message(code: u16) -> &'static str {
    match code {
        200 => "Success",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not found",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// A finished JSON response. Handlers may return one directly; it is passed through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub code: u16,
    pub body: Value,
    pub headers: HeaderMap,
}

impl ApiResponse {
    pub fn new(body: Value, code: u16) -> Self {
        ApiResponse {
            code,
            body,
            headers: HeaderMap::new(),
        }
    }

    /// Body decoded as an envelope, if it is one.
    pub fn envelope(&self) -> Option<Envelope> {
        serde_json::from_value(self.body.clone()).ok()
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body)).into_response();
        response.headers_mut().extend(self.headers);
        response
    }
}

impl ApiState {
    /// Raw JSON response carrying the configured headers.
    pub fn json_response(&self, body: Value, code: u16) -> ApiResponse {
        ApiResponse {
            code,
            body,
            headers: self.headers.clone(),
        }
    }

    /// Success envelope; a missing or zero code means 200.
    pub fn success_response(&self, data: Value, code: Option<u16>) -> ApiResponse {
        let code = code.filter(|c| *c != 0).unwrap_or(200);
        self.json_response(Envelope::success(data, code).into_value(), code)
    }

    /// Error envelope; a missing or zero code means 500.
    pub fn error_response(&self, code: Option<u16>, message: Option<&str>) -> ApiResponse {
        let code = code.filter(|c| *c != 0).unwrap_or(500);
        self.json_response(Envelope::error(code, message).into_value(), code)
    }

    /// Error envelope for a failed filter or handler.
    pub fn failure_response(&self, err: &ApiError) -> ApiResponse {
        match err.code() {
            Some(code) => {
                tracing::debug!(code, error = %err, "request rejected");
                self.error_response(Some(code), err.public_message().as_deref())
            }
            None => {
                tracing::error!(error = %err, "request failed");
                self.error_response(Some(500), None)
            }
        }
    }
}
