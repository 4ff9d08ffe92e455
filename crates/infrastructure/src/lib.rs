//! Lernen Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, the configuration loader and
//! the wiring that assembles the client core.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::{LogThemePresenter, ReqwestHttpClient};
pub use bootstrap::AppContext;
pub use crate::config::{ClientConfig, ConfigError};
pub use persistence::{
    AUTH_STORAGE_FILE, FileSessionRepository, FileThemeRepository, THEME_STORAGE_FILE,
    TokioFileSystem,
};
pub use serialization::{SerializationError, decode_state, encode_state};
