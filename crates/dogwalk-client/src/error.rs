//! The single error shape every API call surfaces.
//!
//! Servers answer failures in several shapes: `{error:{code,message}}` from
//! the Dogwalk API, `{code,message}` or `{message}` from gateways and the
//! identity provider, `{error:"..."}` from older proxies, or just a status
//! line. [`ApiError::from_response`] folds all of them into `{code, message}`.

use serde_json::Value;
use thiserror::Error;

/// Code used for failures that never produced an HTTP status.
pub const NETWORK_ERROR_CODE: u16 = 0;

/// Coarse classification used by callers to decide what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Unexpected,
}

/// Normalised API error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A transport failure: connection refused, timeout, undecodable body.
    pub fn network(err: &reqwest::Error) -> Self {
        Self::new(NETWORK_ERROR_CODE, format!("Network error: {err}"))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(401, message)
    }

    pub const fn kind(&self) -> ErrorKind {
        match self.code {
            400 | 413 | 422 => ErrorKind::Validation,
            401 | 403 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            _ => ErrorKind::Unexpected,
        }
    }

    /// Normalise a non-success response body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        if let Ok(value) = serde_json::from_slice::<Value>(body) {
            if let Some(err) = from_json(status, &value) {
                return err;
            }
        } else {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if !text.is_empty() && text.len() <= 200 && !text.starts_with('<') {
                return Self::new(status, text);
            }
        }
        Self::new(status, fallback_message(status))
    }
}

fn from_json(status: u16, value: &Value) -> Option<ApiError> {
    let obj = value.as_object()?;

    match obj.get("error") {
        Some(Value::Object(inner)) => {
            let message = message_of(inner)?;
            return Some(ApiError::new(code_of(inner).unwrap_or(status), message));
        }
        Some(Value::String(message)) => return Some(ApiError::new(status, message.clone())),
        _ => {}
    }

    let message = message_of(obj)?;
    Some(ApiError::new(code_of(obj).unwrap_or(status), message))
}

fn message_of(obj: &serde_json::Map<String, Value>) -> Option<String> {
    ["message", "Message"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Only numeric codes in the HTTP range count; symbolic codes are ignored.
fn code_of(obj: &serde_json::Map<String, Value>) -> Option<u16> {
    obj.get("code")
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok())
        .filter(|c| (100..600).contains(c))
}

fn fallback_message(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map_or_else(
            || format!("Request failed with status {status}"),
            str::to_string,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_error_body() {
        let err = ApiError::from_response(404, br#"{"error":{"code":404,"message":"Dog not found"}}"#);
        assert_eq!(err, ApiError::new(404, "Dog not found"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn flat_code_message_body() {
        let err = ApiError::from_response(502, br#"{"code":400,"message":"bad dog"}"#);
        assert_eq!(err, ApiError::new(400, "bad dog"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn identity_provider_body_keeps_http_status() {
        let body = br#"{"__type":"NotAuthorizedException","message":"Incorrect username or password."}"#;
        let err = ApiError::from_response(400, body);
        assert_eq!(err.code, 400);
        assert_eq!(err.message, "Incorrect username or password.");
    }

    #[test]
    fn symbolic_code_is_ignored() {
        let err = ApiError::from_response(401, br#"{"code":"TokenExpired","message":"expired"}"#);
        assert_eq!(err.code, 401);
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn string_error_body() {
        let err = ApiError::from_response(401, br#"{"error":"Invalid token"}"#);
        assert_eq!(err, ApiError::new(401, "Invalid token"));
    }

    #[test]
    fn plain_text_body() {
        let err = ApiError::from_response(500, b"upstream exploded\n");
        assert_eq!(err, ApiError::new(500, "upstream exploded"));
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn bare_status_uses_reason_phrase() {
        assert_eq!(
            ApiError::from_response(503, b""),
            ApiError::new(503, "Service Unavailable")
        );
        assert_eq!(
            ApiError::from_response(502, b"<html>bad gateway</html>").message,
            "Bad Gateway"
        );
    }

    #[test]
    fn json_without_message_falls_back_to_status() {
        let err = ApiError::from_response(404, br#"{"detail":"nope"}"#);
        assert_eq!(err, ApiError::new(404, "Not Found"));
    }

    #[test]
    fn network_code_is_unexpected() {
        let err = ApiError::new(NETWORK_ERROR_CODE, "Network error: refused");
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(err.to_string(), "Network error: refused");
    }
}
