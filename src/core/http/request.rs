//! Request and response values passed between the client and a transport

use derive_more::Display;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ErrorBody};

/// Paths that never receive a bearer header and never trigger a refresh.
pub const AUTH_ENDPOINTS: [&str; 4] = ["/auth/token", "/auth/signin", "/auth/signup", "/auth/refresh"];

/// Whether `path` targets one of the [`AUTH_ENDPOINTS`].
pub fn is_auth_endpoint(path: &str) -> bool {
    AUTH_ENDPOINTS.iter().any(|endpoint| path.contains(endpoint))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Method {
    #[display("GET")]
    Get,
    #[display("POST")]
    Post,
    #[display("PUT")]
    Put,
    #[display("PATCH")]
    Patch,
    #[display("DELETE")]
    Delete,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

impl Body {
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Body::Empty => None,
            Body::Json(_) => Some("application/json"),
            Body::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    pub fn encode(&self) -> Option<String> {
        match self {
            Body::Empty => None,
            Body::Json(value) => Some(value.to_string()),
            Body::Form(fields) => Some(encode_pairs(fields)),
        }
    }
}

/// A request relative to a client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Body,
    /// Set on the single replay after a token refresh.
    pub retried: bool,
    /// Report a 401 as a plain error instead of ending the session.
    pub tolerate_unauthorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
            retried: false,
            tolerate_unauthorized: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when `value` is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Explicit bearer token; the client will not replace it.
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {}", token))
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        self.body = Body::Form(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    /// Best-effort request: a 401 neither refreshes nor signs out.
    pub fn tolerate_unauthorized(mut self) -> Self {
        self.tolerate_unauthorized = true;
        self
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn is_auth_endpoint(&self) -> bool {
        is_auth_endpoint(&self.path)
    }

    /// Absolute URL against `base_url`. Absolute paths are used as-is.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            self.path.clone()
        } else {
            format!("{}{}", base_url.trim_end_matches('/'), self.path)
        };
        if !self.query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encode_pairs(&self.query));
        }
        url
    }

    /// Fully resolved request handed to a transport.
    pub fn prepare(&self, base_url: &str) -> PreparedRequest {
        let mut headers = self.headers.clone();
        if let Some(content_type) = self.body.content_type() {
            if !self.has_header("Content-Type") {
                headers.push(("Content-Type".to_string(), content_type.to_string()));
            }
        }
        PreparedRequest {
            method: self.method,
            url: self.url(base_url),
            headers,
            body: self.body.encode(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `Ok(self)` on 2xx, otherwise an [`ApiError::Status`] with the parsed `detail`.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.is_success() {
            return Ok(self);
        }
        let detail = serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.detail);
        Err(ApiError::Status {
            status: self.status,
            detail,
        })
    }
}

fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
