//! Backend request value.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::HttpMethod;

/// Header carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// Scheme prefix of the `Authorization` header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// A request to the backend API, relative to the configured base URL.
///
/// Requests are plain values so the authorization pipeline can clone the
/// original and resend it with a fresh credential.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path below the API base URL, e.g. `/courses/`.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Extra request headers.
    pub headers: BTreeMap<String, String>,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request without body or query.
    ///
    /// A missing leading slash is added to the path.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        Self {
            method,
            path,
            ..Self::default()
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    /// Creates a PATCH request with a JSON body.
    #[must_use]
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, path).with_body(body)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attaches `token` as the bearer credential, replacing any previous one.
    pub fn set_bearer(&mut self, token: &str) {
        self.headers
            .insert(AUTHORIZATION.to_string(), format!("{BEARER_PREFIX}{token}"));
    }

    /// Returns a copy of this request carrying `token` as bearer credential.
    #[must_use]
    pub fn authorized(&self, token: &str) -> Self {
        let mut request = self.clone();
        request.set_bearer(token);
        request
    }

    /// Returns the bearer token currently attached, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
    }
}

// Credentials must not end up in logs.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(AUTHORIZATION) {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_leading_slash_is_added() {
        assert_eq!(ApiRequest::get("courses/").path, "/courses/");
        assert_eq!(ApiRequest::get("/courses/").path, "/courses/");
    }

    #[test]
    fn test_authorized_copy_leaves_original_untouched() {
        let original = ApiRequest::post("/chat/send/", json!({"message": "Hallo"}));
        let retried = original.authorized("T2");

        assert_eq!(original.bearer(), None);
        assert_eq!(retried.bearer(), Some("T2"));
        assert_eq!(retried.body, original.body);
    }

    #[test]
    fn test_set_bearer_replaces_previous_token() {
        let mut request = ApiRequest::get("/progress/");
        request.set_bearer("T1");
        request.set_bearer("T2");
        assert_eq!(
            request.headers.get(AUTHORIZATION).map(String::as_str),
            Some("Bearer T2")
        );
    }

    #[test]
    fn test_debug_redacts_authorization() {
        let request = ApiRequest::get("/auth/profile/").authorized("secret-token");
        let debug = format!("{request:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
