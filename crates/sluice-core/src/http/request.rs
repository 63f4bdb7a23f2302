use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::HttpError;

/// API Gateway style request as delivered to the function.
///
/// Missing maps arrive either absent or as `null`; both normalize to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequest {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRequest {
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub params: HashMap<String, String>,
    /// Decoded JSON when the content type says so, otherwise the raw text.
    pub body: Value,
}

impl NormalizedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Normalize headers, query and path parameters, and decode JSON bodies.
///
/// Fails with a 400 `HttpError` when a JSON content type carries a body that
/// does not parse.
pub fn normalize_request_parameters(raw: RawRequest) -> Result<NormalizedRequest, HttpError> {
    let headers: HashMap<String, String> = raw
        .headers
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect();

    let is_json = headers
        .get("content-type")
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));

    let body = match raw.body {
        None => Value::Null,
        Some(text) if is_json && !text.trim().is_empty() => serde_json::from_str(&text)
            .map_err(|e| HttpError::new(format!("invalid JSON body: {e}")).with_status_code(400))?,
        Some(text) => Value::String(text),
    };

    Ok(NormalizedRequest {
        headers,
        query: raw.query_string_parameters.unwrap_or_default(),
        path: raw.path,
        method: raw.http_method,
        params: raw.path_parameters.unwrap_or_default(),
        body,
    })
}
