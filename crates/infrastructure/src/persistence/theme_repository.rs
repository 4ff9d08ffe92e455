//! File-based theme preference repository.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lernen_application::ports::{FileSystem, RepositoryError, ThemeRepository};
use lernen_domain::ThemePreference;

use super::session_repository::{read_entry, to_io_error};
use crate::serialization::{decode_state, encode_state};

/// Name of the theme entry.
pub const THEME_STORAGE_FILE: &str = "theme-storage.json";

/// Stores the preference in `theme-storage.json`.
#[derive(Debug, Clone)]
pub struct FileThemeRepository<F> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> FileThemeRepository<F> {
    /// Creates a repository storing its entry in `storage_dir`.
    pub fn new(fs: F, storage_dir: &Path) -> Self {
        Self {
            fs,
            path: storage_dir.join(THEME_STORAGE_FILE),
        }
    }
}

#[async_trait]
impl<F: FileSystem + Sync> ThemeRepository for FileThemeRepository<F> {
    async fn load(&self) -> Result<Option<ThemePreference>, RepositoryError> {
        let Some(bytes) = read_entry(&self.fs, &self.path).await? else {
            return Ok(None);
        };
        decode_state(&bytes)
            .map(Some)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    async fn save(&self, preference: &ThemePreference) -> Result<(), RepositoryError> {
        let content =
            encode_state(preference).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.fs
            .write_file_atomic(&self.path, &content)
            .await
            .map_err(|e| RepositoryError::Io(to_io_error(e)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::TokioFileSystem;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let repository = FileThemeRepository::new(TokioFileSystem::new(), dir.path());
        assert_eq!(repository.load().await.unwrap(), None);

        repository.save(&ThemePreference::DARK).await.unwrap();

        assert_eq!(
            repository.load().await.unwrap(),
            Some(ThemePreference::DARK)
        );
        assert!(dir.path().join(THEME_STORAGE_FILE).exists());
    }

    #[tokio::test]
    async fn test_reads_entry_without_dark_flag_as_light() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(THEME_STORAGE_FILE),
            br#"{"state":{},"version":0}"#,
        )
        .unwrap();
        let repository = FileThemeRepository::new(TokioFileSystem::new(), dir.path());

        assert_eq!(
            repository.load().await.unwrap(),
            Some(ThemePreference::LIGHT)
        );
    }
}
