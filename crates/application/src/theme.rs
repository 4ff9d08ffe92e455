//! Persisted light/dark preference.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use lernen_domain::ThemePreference;

use crate::ports::{ThemePresenter, ThemeRepository};

/// Holds the theme preference and pushes every change to the presenter.
pub struct ThemeStore {
    current: RwLock<ThemePreference>,
    repository: Arc<dyn ThemeRepository>,
    presenter: Arc<dyn ThemePresenter>,
}

impl ThemeStore {
    /// Loads the persisted preference and applies it once.
    ///
    /// A missing or unreadable entry starts in light mode.
    pub async fn restore(
        repository: Arc<dyn ThemeRepository>,
        presenter: Arc<dyn ThemePresenter>,
    ) -> Self {
        let preference = match repository.load().await {
            Ok(preference) => preference.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "persisted theme is unreadable, using light mode");
                ThemePreference::default()
            }
        };
        debug!(mode = preference.mode_name(), "theme restored");
        presenter.apply(preference);
        Self {
            current: RwLock::new(preference),
            repository,
            presenter,
        }
    }

    /// Current preference.
    pub async fn get(&self) -> ThemePreference {
        *self.current.read().await
    }

    /// Flips between light and dark and returns the new preference.
    pub async fn toggle_theme(&self) -> ThemePreference {
        let mut current = self.current.write().await;
        let next = current.toggled();
        self.commit(&mut current, next).await;
        next
    }

    /// Sets dark mode on or off.
    pub async fn set_theme(&self, is_dark: bool) {
        let mut current = self.current.write().await;
        self.commit(&mut current, ThemePreference::new(is_dark)).await;
    }

    async fn commit(&self, current: &mut ThemePreference, next: ThemePreference) {
        *current = next;
        if let Err(e) = self.repository.save(&next).await {
            warn!(error = %e, "failed to persist theme preference");
        }
        self.presenter.apply(next);
    }
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore").finish_non_exhaustive()
    }
}
