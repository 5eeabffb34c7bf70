//! Request descriptors and raw responses.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::error::RequestError;

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// What a caller asks for: path relative to the API origin, method, body
/// and extra headers. Built per call and never persisted.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub path: String,
    pub method: Method,
    pub body: Body,
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: Body::Empty,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Body::Form(fields);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A fully resolved request as handed to the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Body,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// How a received response is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    Unauthorized,
    OtherFailure,
}

impl ResponseClass {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            ResponseClass::Success
        } else if status == StatusCode::UNAUTHORIZED {
            ResponseClass::Unauthorized
        } else {
            ResponseClass::OtherFailure
        }
    }
}

/// A response as received. `body` is the parsed JSON payload, a string for
/// non-JSON payloads, and `Null` when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn classify(&self) -> ResponseClass {
        ResponseClass::from_status(self.status)
    }

    /// Decode a payload: JSON when it parses, otherwise the lossy text.
    pub fn parse_body(bytes: &[u8]) -> Value {
        if bytes.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }

    /// FastAPI-style `detail` message, if the server sent one.
    pub fn detail(&self) -> Option<&str> {
        self.body.get("detail").and_then(Value::as_str)
    }

    /// One-line description with the body truncated for logging.
    pub fn summary(&self) -> String {
        let body = match &self.body {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        format!("Status {}: {}", self.status, truncate_body(&body))
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

/// Flatten a JSON object into query pairs. Strings are used verbatim,
/// nulls are dropped and everything else is JSON-encoded. A null `params`
/// means no query; arrays and scalars have no key to send under.
pub(crate) fn query_pairs(params: &Value) -> Result<Vec<(String, String)>, RequestError> {
    match params {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect()),
        other => Err(RequestError::InvalidRequest(format!(
            "GET params must be a JSON object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_statuses() {
        assert_eq!(ResponseClass::from_status(StatusCode::OK), ResponseClass::Success);
        assert_eq!(ResponseClass::from_status(StatusCode::NO_CONTENT), ResponseClass::Success);
        assert_eq!(
            ResponseClass::from_status(StatusCode::UNAUTHORIZED),
            ResponseClass::Unauthorized
        );
        assert_eq!(ResponseClass::from_status(StatusCode::FORBIDDEN), ResponseClass::OtherFailure);
        assert_eq!(
            ResponseClass::from_status(StatusCode::MOVED_PERMANENTLY),
            ResponseClass::OtherFailure
        );
        assert_eq!(
            ResponseClass::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            ResponseClass::OtherFailure
        );
    }

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(RawResponse::parse_body(b""), Value::Null);
        assert_eq!(RawResponse::parse_body(br#"{"id":1}"#), json!({"id": 1}));
        assert_eq!(RawResponse::parse_body(b"Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_detail_and_summary() {
        let response = RawResponse::new(StatusCode::NOT_FOUND, json!({"detail": "Post not found"}));
        assert_eq!(response.detail(), Some("Post not found"));
        assert!(response.summary().starts_with("Status 404 Not Found"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "é".repeat(400);
        let truncated = truncate_body(&body);
        assert!(truncated.contains("truncated, 800 total bytes"));
    }

    #[test]
    fn test_query_pairs_from_object() {
        let pairs = query_pairs(&json!({"page": 2, "q": "hello", "skip": null})).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("q".to_string(), "hello".to_string()),
            ]
        );
        assert!(query_pairs(&Value::Null).unwrap().is_empty());
        assert!(matches!(
            query_pairs(&json!([1, 2])),
            Err(RequestError::InvalidRequest(_))
        ));
        assert!(query_pairs(&json!("page=2")).is_err());
    }

    #[test]
    fn test_descriptor_builders() {
        let descriptor = RequestDescriptor::post("/posts")
            .with_json(json!({"title": "hi"}))
            .with_header(
                HeaderName::from_static("x-client"),
                HeaderValue::from_static("admin"),
            );
        assert_eq!(descriptor.method, Method::POST);
        assert_eq!(descriptor.body, Body::Json(json!({"title": "hi"})));
        assert_eq!(descriptor.headers.get("x-client").unwrap(), "admin");
    }
}
