//! File-based session repository implementation.
//!
//! The session lives in `auth-storage.json` inside the storage directory:
//! ```json
//! {
//!   "state": {
//!     "user": { "id": 1, "email": "anna@example.com" },
//!     "accessToken": "eyJ...",
//!     "refreshToken": "eyJ...",
//!     "isAuthenticated": true
//!   },
//!   "version": 0
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lernen_application::ports::{FileSystem, FileSystemError, RepositoryError, SessionRepository};
use lernen_domain::Session;

use crate::serialization::{decode_state, encode_state};

/// Name of the session entry.
pub const AUTH_STORAGE_FILE: &str = "auth-storage.json";

/// Converts `FileSystemError` to `std::io::Error` for `RepositoryError`.
pub(crate) fn to_io_error(e: FileSystemError) -> std::io::Error {
    match e {
        FileSystemError::Io(io_err) => io_err,
        FileSystemError::NotFound(path) => {
            std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string())
        }
        FileSystemError::PermissionDenied(path) => std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            path.display().to_string(),
        ),
    }
}

/// Reads an entry, mapping a missing file to `None`.
pub(crate) async fn read_entry<F: FileSystem>(
    fs: &F,
    path: &Path,
) -> Result<Option<Vec<u8>>, RepositoryError> {
    match fs.read_file(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(FileSystemError::NotFound(_)) => Ok(None),
        Err(e) => Err(RepositoryError::Io(to_io_error(e))),
    }
}

/// Session repository writing one JSON entry.
#[derive(Debug, Clone)]
pub struct FileSessionRepository<F> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> FileSessionRepository<F> {
    /// Creates a repository storing its entry in `storage_dir`.
    pub fn new(fs: F, storage_dir: &Path) -> Self {
        Self {
            fs,
            path: storage_dir.join(AUTH_STORAGE_FILE),
        }
    }

    /// Location of the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<F: FileSystem + Sync> SessionRepository for FileSessionRepository<F> {
    async fn load(&self) -> Result<Option<Session>, RepositoryError> {
        let Some(bytes) = read_entry(&self.fs, &self.path).await? else {
            return Ok(None);
        };
        decode_state(&bytes)
            .map(Some)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    async fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        let content =
            encode_state(session).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.fs
            .write_file_atomic(&self.path, &content)
            .await
            .map_err(|e| RepositoryError::Io(to_io_error(e)))
    }

    async fn remove(&self) -> Result<(), RepositoryError> {
        self.fs
            .remove_file(&self.path)
            .await
            .map_err(|e| RepositoryError::Io(to_io_error(e)))
    }
}
