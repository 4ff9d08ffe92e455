//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Request paths are resolved below the configured API base URL.

use std::collections::BTreeMap;
use std::time::Duration;

use lernen_application::ports::{HttpClient, HttpClientError, HttpFuture};
use lernen_domain::{ApiRequest, ApiResponse, HttpMethod};
use reqwest::{Client, Method};
use tracing::trace;
use url::Url;

/// HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` cannot carry paths or the client
    /// cannot be created.
    pub fn new(base_url: Url, timeout: Duration, user_agent: &str) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;
        Self::with_client(client, base_url, timeout)
    }

    /// Creates a client around a preconfigured reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` cannot carry paths.
    pub fn with_client(
        client: Client,
        base_url: Url,
        timeout: Duration,
    ) -> Result<Self, HttpClientError> {
        if base_url.cannot_be_a_base() {
            return Err(HttpClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Appends the request path and query to the base URL.
    fn resolve(&self, request: &ApiRequest) -> Url {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}{}",
            self.base_url.path().trim_end_matches('/'),
            request.path
        );
        url.set_path(&path);
        url.set_query(None);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        url
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = format!("{error:?}");
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message: error.to_string(),
                };
            }
            if lowered.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(error.to_string());
        }

        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn send<'a>(&'a self, request: &'a ApiRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            let url = self.resolve(request);
            let timeout_ms = self.timeout_ms();
            trace!(method = %request.method, url = %url, "sending");

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();
            let headers: BTreeMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();
            let body = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?
                .to_vec();

            trace!(status, bytes = body.len(), "received");
            Ok(ApiResponse::new(status, body).with_headers(headers))
        })
    }
}
