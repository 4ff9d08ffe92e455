//! Theme preference ports

use async_trait::async_trait;

use lernen_domain::ThemePreference;

use super::RepositoryError;

/// Repository trait for the persisted theme preference.
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// Loads the preference, `None` if never saved.
    ///
    /// # Errors
    /// Returns an error if the entry exists but cannot be read or decoded.
    async fn load(&self) -> Result<Option<ThemePreference>, RepositoryError>;

    /// Persists the preference.
    ///
    /// # Errors
    /// Returns an error if the entry cannot be written.
    async fn save(&self, preference: &ThemePreference) -> Result<(), RepositoryError>;
}

/// Presentation layer that switches the visual mode.
pub trait ThemePresenter: Send + Sync {
    /// Applies the preference, e.g. toggles the root `dark` class.
    fn apply(&self, preference: ThemePreference);
}
