//! Inbound shapes: the platform event, the action request inside its body, and
//! the action name.

use crate::error::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};
use std::fmt;

/// Invocation record. Only `body` matters; everything else the platform sends is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub body: Option<String>,
}

impl Event {
    pub fn from_body(body: impl Into<String>) -> Self {
        Event { body: Some(body.into()) }
    }

    /// Tolerant conversion from a raw platform payload. A string body is taken as
    /// is (base64-decoded when `isBase64Encoded` is set), an object body is
    /// re-serialized, and anything else counts as absent.
    pub fn from_payload(payload: Value) -> Self {
        let encoded = payload.get("isBase64Encoded").and_then(Value::as_bool).unwrap_or(false);
        let body = match payload.get("body") {
            Some(Value::String(s)) if encoded => match STANDARD.decode(s) {
                Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
                // Leave it undecoded; the JSON parse reports the problem.
                Err(_) => Some(s.clone()),
            },
            Some(Value::String(s)) => Some(s.clone()),
            Some(v @ Value::Object(_)) => Some(v.to_string()),
            _ => None,
        };
        Event { body }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Delete,
    Upload,
    ListMedia,
    DeleteMedia,
    Status,
}

impl Action {
    /// Exact, case-sensitive match; anything unrecognised is a status probe.
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some("list") => Action::List,
            Some("create") => Action::Create,
            Some("delete") => Action::Delete,
            Some("upload") => Action::Upload,
            Some("list-media") => Action::ListMedia,
            Some("delete-media") => Action::DeleteMedia,
            _ => Action::Status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Delete => "delete",
            Action::Upload => "upload",
            Action::ListMedia => "list-media",
            Action::DeleteMedia => "delete-media",
            Action::Status => "status",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed request body: a JSON object with an `action` and per-action fields.
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    fields: Map<String, Value>,
}

impl ActionRequest {
    /// Absent or empty bodies are `{}`. Anything else must parse as a JSON object.
    pub fn parse(body: Option<&str>) -> Result<Self, AppError> {
        let text = body.filter(|s| !s.is_empty()).unwrap_or("{}");
        match serde_json::from_str::<Value>(text)? {
            Value::Object(fields) => Ok(ActionRequest { fields }),
            _ => Err(AppError::BadRequest("body must be a JSON object".into())),
        }
    }

    pub fn action(&self) -> Action {
        Action::parse(self.fields.get("action").and_then(Value::as_str))
    }

    /// String field; `null` and absent are both `None`.
    pub fn str_field(&self, name: &str) -> Result<Option<String>, AppError> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(AppError::BadRequest(format!("field '{}' must be a string", name))),
        }
    }

    pub fn str_or(&self, name: &str, default: &str) -> Result<String, AppError> {
        Ok(self.str_field(name)?.unwrap_or_else(|| default.to_string()))
    }

    /// The `id` field as a row id. Integers and integer strings are accepted; absent is `None`.
    pub fn id_field(&self) -> Result<Option<i32>, AppError> {
        let invalid = || AppError::BadRequest("field 'id' must be an integer".into());
        match self.fields.get("id") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Some)
                .ok_or_else(invalid),
            Some(Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }
}
