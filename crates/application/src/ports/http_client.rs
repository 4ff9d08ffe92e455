//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use lernen_domain::{ApiRequest, ApiResponse};

/// Boxed future returned by [`HttpClient::send`].
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ApiResponse, HttpClientError>> + Send + 'a>>;

/// Port for sending requests to the backend API.
///
/// Implementations resolve the request path against the configured base
/// URL. Any HTTP status, including 4xx and 5xx, is a successful send;
/// errors are reserved for transport failures.
pub trait HttpClient: Send + Sync {
    /// Sends the request exactly as given and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    fn send<'a>(&'a self, request: &'a ApiRequest) -> HttpFuture<'a>;
}

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpClientError {
    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Other transport error.
    #[error("{0}")]
    Other(String),
}
