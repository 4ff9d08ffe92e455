//! Persistence implementations for file-based storage.

mod file_system;
mod session_repository;
mod theme_repository;

pub use file_system::TokioFileSystem;
pub use session_repository::{AUTH_STORAGE_FILE, FileSessionRepository};
pub use theme_repository::{FileThemeRepository, THEME_STORAGE_FILE};
