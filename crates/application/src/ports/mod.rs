//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod file_system;
mod http_client;
mod session_repository;
mod theme;

pub use file_system::{FileSystem, FileSystemError};
pub use http_client::{HttpClient, HttpClientError, HttpFuture};
pub use session_repository::{RepositoryError, SessionRepository};
pub use theme::{ThemePresenter, ThemeRepository};
