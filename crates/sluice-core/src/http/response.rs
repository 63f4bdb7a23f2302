use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ERROR_MESSAGE: &str = "Internal server error";

/// Error raised by an HTTP handler.
///
/// Status resolution: `status_code`, then `status`, then `code`, else 500.
/// Message resolution: `error`, then `body`, then `message`, else
/// [`DEFAULT_ERROR_MESSAGE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpError {
    pub status_code: Option<u16>,
    pub status: Option<u16>,
    pub code: Option<u16>,
    pub error: Option<String>,
    pub body: Option<String>,
    pub message: Option<String>,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn resolved_status(&self) -> u16 {
        self.status_code.or(self.status).or(self.code).unwrap_or(500)
    }

    pub fn resolved_message(&self) -> &str {
        self.error
            .as_deref()
            .or(self.body.as_deref())
            .or(self.message.as_deref())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HttpError (status: {}): {}", self.resolved_status(), self.resolved_message())
    }
}

impl std::error::Error for HttpError {}

/// API Gateway proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn json(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            headers: HashMap::from([("content-type".to_string(), "application/json".to_string())]),
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status_code: 204,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn from_error(error: &HttpError) -> Self {
        let body = serde_json::json!({ "message": error.resolved_message() });
        Self::json(error.resolved_status(), body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::status_code_first(HttpError::new("x").with_status_code(418).with_status(400).with_code(401), 418)]
    #[case::then_status(HttpError::new("x").with_status(404).with_code(401), 404)]
    #[case::then_code(HttpError::new("x").with_code(409), 409)]
    #[case::default(HttpError::new("x"), 500)]
    fn status_priority(#[case] error: HttpError, #[case] expected: u16) {
        assert_eq!(error.resolved_status(), expected);
    }

    #[rstest]
    #[case::error_first(HttpError::new("m").with_body("b").with_error("e"), "e")]
    #[case::then_body(HttpError::new("m").with_body("b"), "b")]
    #[case::then_message(HttpError::new("m"), "m")]
    #[case::default(HttpError::default(), DEFAULT_ERROR_MESSAGE)]
    fn message_priority(#[case] error: HttpError, #[case] expected: &str) {
        assert_eq!(error.resolved_message(), expected);
    }

    #[test]
    fn error_response_carries_json_message() {
        let response = HttpResponse::from_error(&HttpError::new("teapot").with_status_code(418));
        assert_eq!(response.status_code, 418);
        assert_eq!(response.body.as_deref(), Some(r#"{"message":"teapot"}"#));
    }

    #[test]
    fn no_content_serializes_without_body() {
        let value = serde_json::to_value(HttpResponse::no_content()).unwrap();
        assert_eq!(value, serde_json::json!({ "statusCode": 204 }));
    }
}
