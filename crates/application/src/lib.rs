//! Lernen Application - Session services and ports
//!
//! This crate defines the application layer with:
//! - Port traits (transport, session and theme persistence, presentation)
//! - The token store and session lifecycle
//! - The authorized request pipeline and the endpoint facade on top of it
//! - Application-level error handling

pub mod api;
pub mod auth;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod theme;

#[cfg(test)]
mod fakes;

pub use api::LearningApi;
pub use auth::{AuthGateway, AuthPayload, SessionController, TokenStore};
pub use error::{ApiError, ApplicationError, ApplicationResult};
pub use pipeline::{AuthorizedClient, MAX_REFRESH_ATTEMPTS, RetryDecision};
pub use ports::{
    FileSystem, FileSystemError, HttpClient, HttpClientError, HttpFuture, RepositoryError,
    SessionRepository, ThemePresenter, ThemeRepository,
};
pub use theme::ThemeStore;
