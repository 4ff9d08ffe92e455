//! Application error types

use thiserror::Error;

use lernen_domain::{ApiResponse, AuthError, StatusCode};

use crate::ports::{HttpClientError, RepositoryError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// A session that is neither empty nor complete was rejected.
    #[error("refusing to store a partial session")]
    PartialSession,

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl From<ApplicationError> for AuthError {
    fn from(error: ApplicationError) -> Self {
        Self::Storage {
            message: error.to_string(),
        }
    }
}

/// Errors returned by authorized backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("request failed with status {}", .0.status)]
    Status(ApiResponse),

    /// The access token was rejected and could not be refreshed. The
    /// session has been cleared; the caller should route to the login page.
    #[error("session expired, sign in again")]
    SessionExpired {
        /// The original 401 response.
        original: ApiResponse,
    },

    /// The backend could not be reached.
    #[error("network error: {0}")]
    Network(#[from] HttpClientError),

    /// A success response did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The response arrived but its result could not be stored.
    #[error(transparent)]
    Storage(#[from] ApplicationError),
}

impl ApiError {
    /// Status of the backend response behind this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(response) | Self::SessionExpired { original: response } => {
                Some(response.status)
            }
            Self::Network(_) | Self::Decode(_) | Self::Storage(_) => None,
        }
    }

    /// True when the session is gone and the user has to sign in.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Backend `detail` message, if the error carries one.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Status(response) | Self::SessionExpired { original: response } => {
                response.detail()
            }
            Self::Network(_) | Self::Decode(_) | Self::Storage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_session_expired_requires_login() {
        let error = ApiError::SessionExpired {
            original: ApiResponse::with_json(401, &json!({"detail": "Token is invalid or expired"})),
        };
        assert!(error.requires_login());
        assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(error.detail().as_deref(), Some("Token is invalid or expired"));
    }

    #[test]
    fn test_status_error_passes_through() {
        let error = ApiError::Status(ApiResponse::new(404, Vec::new()));
        assert!(!error.requires_login());
        assert_eq!(error.to_string(), "request failed with status 404 Not Found");
    }

    #[test]
    fn test_network_error_has_no_status() {
        let error = ApiError::from(HttpClientError::ConnectionFailed("reset".to_string()));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_application_error_maps_to_storage_auth_error() {
        let error: AuthError = ApplicationError::PartialSession.into();
        assert!(matches!(error, AuthError::Storage { .. }));
    }
}
