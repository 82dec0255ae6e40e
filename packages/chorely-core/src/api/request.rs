//! Request descriptors.
//!
//! An [`ApiRequest`] describes one logical call. It is built once and reused
//! unchanged when the pipeline retries after a token refresh; only the token
//! override differs on the retry.

use super::ApiError;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one outbound API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
    token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: Vec::new(),
            token: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Put, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    /// Attach a JSON body. Ignored for GET requests.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append a query parameter. Only sent for GET requests; pairs keep their
    /// insertion order in the URL.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Use this bearer token instead of the session's access token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Like [`with_token`](Self::with_token), for call sites holding an optional override.
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Body actually sent on the wire: GET never carries one.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self.method {
            Method::Get => None,
            _ => self.body.as_ref(),
        }
    }

    /// Resolve the full URL against `base_url`.
    pub fn url(&self, base_url: &str) -> Result<Url, ApiError> {
        if !self.endpoint.starts_with('/')
            || self.endpoint.starts_with("//")
            || self.endpoint.contains("://")
            || self.endpoint.split('/').any(is_dot_segment)
        {
            return Err(ApiError::InvalidEndpoint(self.endpoint.clone()));
        }

        let mut url = Url::parse(&format!("{}{}", base_url, self.endpoint))?;

        if self.method == Method::Get && !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// `.` or `..`, plain or percent-encoded; URL parsing would resolve these
/// against the base path.
fn is_dot_segment(segment: &str) -> bool {
    let segment = segment.to_ascii_lowercase().replace("%2e", ".");
    segment == "." || segment == ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://api.example.com/api";

    #[test]
    fn test_get_url_with_ordered_query() {
        let request = ApiRequest::get("/taskInstance/get")
            .with_query("date", "2025-01-01")
            .with_query("child name", "Ana & Bo");

        let url = request.url(BASE).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/taskInstance/get?date=2025-01-01&child+name=Ana+%26+Bo"
        );
    }

    #[test]
    fn test_query_ignored_for_non_get() {
        let request = ApiRequest::post("/child/add").with_query("x", "1");
        let url = request.url(BASE).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/child/add");
    }

    #[test]
    fn test_body_ignored_for_get() {
        let request = ApiRequest::get("/child/get")
            .with_json(&json!({"ignored": true}))
            .unwrap();
        assert!(request.payload().is_none());

        let request = ApiRequest::put("/child/update/1")
            .with_json(&json!({"name": "Ana"}))
            .unwrap();
        assert_eq!(request.payload(), Some(&json!({"name": "Ana"})));
    }

    #[test]
    fn test_rejects_non_relative_endpoints() {
        for endpoint in ["child/get", "//evil.example.com/x", "/http://evil", ""] {
            let err = ApiRequest::get(endpoint).url(BASE).unwrap_err();
            assert!(matches!(err, ApiError::InvalidEndpoint(_)), "{endpoint}");
        }
    }

    #[test]
    fn test_rejects_dot_segments() {
        for endpoint in [
            "/child/get/..",
            "/child/get/.",
            "/child/../auth/login",
            "/child/get/%2E%2e",
            "/child/get/.%2e/x",
        ] {
            let err = ApiRequest::get(endpoint).url(BASE).unwrap_err();
            assert!(matches!(err, ApiError::InvalidEndpoint(_)), "{endpoint}");
        }

        let by_id = crate::api::endpoints::Resource::Child.get_by_id("..");
        assert!(ApiRequest::get(by_id).url(BASE).is_err());

        let url = ApiRequest::get("/child/get/a..b").url(BASE).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/child/get/a..b");
    }

    #[test]
    fn test_same_descriptor_same_url() {
        let request = ApiRequest::get("/child/get").with_query("a", "1").with_query("b", "2");
        assert_eq!(request.url(BASE).unwrap(), request.clone().url(BASE).unwrap());
    }
}
