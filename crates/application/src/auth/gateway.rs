//! Unauthenticated calls to the backend's auth endpoints.
//!
//! These go straight to the transport, never through the authorized
//! pipeline: a 401 from the login endpoint means bad credentials, not an
//! expired token, and must not trigger a refresh.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use lernen_domain::{
    ApiRequest, ApiResponse, AuthError, AuthTokens, FieldErrors, LoginCredentials,
    RegistrationData, StatusCode, UserProfile,
};

use crate::ports::{HttpClient, HttpClientError};

/// Login endpoint.
pub const LOGIN_PATH: &str = "/auth/login/";
/// Registration endpoint.
pub const REGISTER_PATH: &str = "/auth/register/";
/// Access token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/token/refresh/";
/// Current user's profile.
pub const PROFILE_PATH: &str = "/auth/profile/";

/// Tokens and, when the backend includes it, the user they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    /// User record, absent when the backend answered with a bare token pair.
    pub user: Option<UserProfile>,
    /// Issued tokens.
    pub tokens: AuthTokens,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenBody {
    Nested { user: UserProfile, tokens: AuthTokens },
    Flat { access: String, refresh: String },
}

impl From<TokenBody> for AuthPayload {
    fn from(body: TokenBody) -> Self {
        match body {
            TokenBody::Nested { user, tokens } => Self {
                user: Some(user),
                tokens,
            },
            TokenBody::Flat { access, refresh } => Self {
                user: None,
                tokens: AuthTokens::new(access, refresh),
            },
        }
    }
}

#[derive(Deserialize)]
struct RefreshBody {
    access: String,
}

/// Client for the auth endpoints.
#[derive(Clone)]
pub struct AuthGateway {
    transport: Arc<dyn HttpClient>,
}

impl AuthGateway {
    /// Creates a gateway over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpClient>) -> Self {
        Self { transport }
    }

    /// Exchanges credentials for tokens.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for 401/403 or a 400 carrying `detail`,
    /// `Validation` for other 400s, `NetworkUnavailable` on transport
    /// failure and `Backend` otherwise.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload, AuthError> {
        let request = ApiRequest::post(
            LOGIN_PATH,
            json!({"email": credentials.email, "password": credentials.password}),
        );
        let response = self.send(&request).await?;
        if response.is_success() {
            return decode_payload(&response);
        }

        let status = response.status;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidCredentials {
                detail: response.detail().unwrap_or_else(|| "Login failed".to_string()),
            });
        }
        if status == StatusCode::BAD_REQUEST {
            if let Some(detail) = response.detail() {
                return Err(AuthError::InvalidCredentials { detail });
            }
            if let Some(fields) = field_errors(&response) {
                return Err(AuthError::Validation { fields });
            }
        }
        Err(backend_error(&response))
    }

    /// Creates an account and returns its tokens.
    ///
    /// # Errors
    ///
    /// `Validation` with the backend's field map for a 400,
    /// `NetworkUnavailable` on transport failure and `Backend` otherwise.
    pub async fn register(&self, data: &RegistrationData) -> Result<AuthPayload, AuthError> {
        let body = serde_json::to_value(data).map_err(|e| AuthError::Backend {
            status: 0,
            message: e.to_string(),
        })?;
        let response = self.send(&ApiRequest::post(REGISTER_PATH, body)).await?;
        if response.is_success() {
            return decode_payload(&response);
        }
        if response.status == StatusCode::BAD_REQUEST
            && let Some(fields) = field_errors(&response)
        {
            return Err(AuthError::Validation { fields });
        }
        Err(backend_error(&response))
    }

    /// Obtains a new access token.
    ///
    /// # Errors
    ///
    /// `RefreshFailed` for any rejection or malformed answer,
    /// `NetworkUnavailable` on transport failure.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let request = ApiRequest::post(REFRESH_PATH, json!({"refresh": refresh_token}));
        let response = self.send(&request).await?;
        if !response.is_success() {
            return Err(AuthError::RefreshFailed {
                message: response
                    .detail()
                    .unwrap_or_else(|| response.status.to_string()),
            });
        }
        response
            .json::<RefreshBody>()
            .map(|body| body.access)
            .map_err(|e| AuthError::RefreshFailed {
                message: format!("malformed refresh response: {e}"),
            })
    }

    /// Fetches the profile of the user owning `access_token`.
    ///
    /// # Errors
    ///
    /// `TokenExpired` for a 401, `NetworkUnavailable` on transport failure
    /// and `Backend` otherwise.
    pub async fn profile(&self, access_token: &str) -> Result<UserProfile, AuthError> {
        let request = ApiRequest::get(PROFILE_PATH).authorized(access_token);
        let response = self.send(&request).await?;
        if response.status.is_unauthorized() {
            return Err(AuthError::TokenExpired);
        }
        if !response.is_success() {
            return Err(backend_error(&response));
        }
        response
            .json::<Value>()
            .ok()
            .and_then(UserProfile::from_value)
            .ok_or_else(|| AuthError::Backend {
                status: response.status.as_u16(),
                message: "profile response is not an object".to_string(),
            })
    }

    /// Sends `request` without touching the session.
    pub(crate) async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, AuthError> {
        debug!(method = %request.method, path = %request.path, "auth request");
        self.transport
            .send(request)
            .await
            .map_err(network_unavailable)
    }
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway").finish_non_exhaustive()
    }
}

fn network_unavailable(error: HttpClientError) -> AuthError {
    AuthError::NetworkUnavailable {
        message: error.to_string(),
    }
}

fn decode_payload(response: &ApiResponse) -> Result<AuthPayload, AuthError> {
    response
        .json::<TokenBody>()
        .map(AuthPayload::from)
        .map_err(|e| AuthError::Backend {
            status: response.status.as_u16(),
            message: format!("malformed token response: {e}"),
        })
}

fn backend_error(response: &ApiResponse) -> AuthError {
    AuthError::Backend {
        status: response.status.as_u16(),
        message: response
            .detail()
            .unwrap_or_else(|| response.status.to_string()),
    }
}

/// Reads a DRF field error map, normalizing bare strings to one-element lists.
fn field_errors(response: &ApiResponse) -> Option<FieldErrors> {
    let Ok(Value::Object(map)) = response.json::<Value>() else {
        return None;
    };
    if map.is_empty() {
        return None;
    }
    let fields = map
        .into_iter()
        .map(|(field, value)| {
            let messages = match value {
                Value::Array(items) => items.into_iter().map(message_text).collect(),
                other => vec![message_text(other)],
            };
            (field, messages)
        })
        .collect();
    Some(fields)
}

fn message_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
