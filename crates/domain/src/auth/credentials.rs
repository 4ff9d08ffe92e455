//! Login and registration payloads

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::AuthError;
use crate::error::DomainError;

/// Email/password pair sent to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Account email, the backend's username field.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl LoginCredentials {
    /// Creates login credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// CEFR proficiency levels offered at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LanguageLevel {
    /// Beginner.
    #[default]
    A1,
    /// Elementary.
    A2,
    /// Intermediate.
    B1,
    /// Upper intermediate.
    B2,
    /// Advanced.
    C1,
    /// Proficient.
    C2,
}

impl LanguageLevel {
    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A1 => "Beginner A1",
            Self::A2 => "Elementary A2",
            Self::B1 => "Intermediate B1",
            Self::B2 => "Upper Intermediate B2",
            Self::C1 => "Advanced C1",
            Self::C2 => "Proficient C2",
        }
    }
}

impl FromStr for LanguageLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            _ => Err(DomainError::UnknownLanguageLevel(s.to_string())),
        }
    }
}

/// Native languages offered at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NativeLanguage {
    /// English.
    #[default]
    En,
    /// Arabic.
    Ar,
    /// Spanish.
    Es,
    /// French.
    Fr,
    /// Italian.
    It,
    /// Portuguese.
    Pt,
    /// Russian.
    Ru,
    /// Turkish.
    Tr,
    /// Chinese.
    Zh,
}

/// Profile data sent to the registration endpoint.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationData {
    /// Account email.
    pub email: String,
    /// Public username.
    pub username: String,
    /// Chosen password.
    pub password: String,
    /// Repetition of the password, checked locally before sending.
    pub password_confirm: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Current proficiency.
    pub language_level: LanguageLevel,
    /// Native language.
    pub native_language: NativeLanguage,
}

impl RegistrationData {
    /// Checks the fields that can be validated without the backend.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` keyed `password_confirm` when the two
    /// passwords differ.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.password != self.password_confirm {
            return Err(AuthError::field("password_confirm", "Passwords do not match"));
        }
        Ok(())
    }
}

impl fmt::Debug for RegistrationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationData")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("language_level", &self.language_level)
            .field("native_language", &self.native_language)
            .finish_non_exhaustive()
    }
}
