//! Lernen Domain - Core business types
//!
//! This crate defines the domain model for the Lernen client core:
//! sessions and their credentials, the request/response shapes that
//! travel through the authorization pipeline, route guarding and the
//! theme preference. All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod request;
pub mod response;
pub mod route;
pub mod session;
pub mod settings;
pub mod state;

pub use auth::{
    AuthError, AuthTokens, FieldErrors, LanguageLevel, LoginCredentials, NativeLanguage,
    RegistrationData,
};
pub use error::DomainError;
pub use request::{ApiRequest, HttpMethod};
pub use response::{ApiResponse, StatusCode};
pub use route::{Route, RouteDecision};
pub use session::{Session, UserProfile};
pub use settings::ThemePreference;
pub use state::AuthorizationStage;
