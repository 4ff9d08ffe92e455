//! Token and authentication error types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field-keyed validation messages, as returned by the registration endpoint.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Access/refresh token pair issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived credential attached to authorized requests.
    pub access: String,
    /// Longer-lived credential used only to obtain a new access token.
    pub refresh: String,
}

impl AuthTokens {
    /// Creates a token pair.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Authentication errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The backend rejected the credentials.
    #[error("invalid credentials: {detail}")]
    InvalidCredentials {
        /// Message from the backend, suitable for display.
        detail: String,
    },

    /// One or more fields failed validation, locally or on the backend.
    #[error("validation failed for {}", field_names(.fields))]
    Validation {
        /// Messages keyed by field name.
        fields: FieldErrors,
    },

    /// The backend could not be reached.
    #[error("backend unreachable: {message}")]
    NetworkUnavailable {
        /// Transport error description.
        message: String,
    },

    /// The access token was rejected. Handled inside the request pipeline.
    #[error("access token expired")]
    TokenExpired,

    /// The refresh token could not be exchanged for a new access token.
    #[error("failed to refresh token: {message}")]
    RefreshFailed {
        /// Error description.
        message: String,
    },

    /// The backend answered with an unexpected status or body.
    #[error("backend error ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// The session could not be persisted.
    #[error("session storage error: {message}")]
    Storage {
        /// Error description.
        message: String,
    },
}

fn field_names(fields: &FieldErrors) -> String {
    fields.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl AuthError {
    /// Builds a validation error for a single field.
    #[must_use]
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(name.into(), vec![message.into()]);
        Self::Validation { fields }
    }

    /// Returns one `field: message` line per validation message, or the
    /// error's display string for other variants.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation { fields } => fields
                .iter()
                .flat_map(|(field, messages)| {
                    messages.iter().map(move |message| format!("{field}: {message}"))
                })
                .collect(),
            other => vec![other.to_string()],
        }
    }
}
