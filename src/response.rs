//! Invocation reply envelope: `statusCode`, fixed headers, JSON text body.

use crate::error::AppError;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
    ])
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Reply {
            status_code: StatusCode::OK.as_u16(),
            headers: default_headers(),
            body: body.to_string(),
        }
    }

    pub fn error(err: &AppError) -> Self {
        Reply {
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            headers: default_headers(),
            body: error_body(&err.to_string()).to_string(),
        }
    }

    /// Parsed body; used by callers (and tests) that want the JSON back.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        response
    }
}
