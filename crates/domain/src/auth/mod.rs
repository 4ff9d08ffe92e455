//! Authentication domain types

mod credentials;
mod types;

pub use credentials::{LanguageLevel, LoginCredentials, NativeLanguage, RegistrationData};
pub use types::{AuthError, AuthTokens, FieldErrors};
