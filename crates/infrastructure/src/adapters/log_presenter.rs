//! Theme presenter for headless hosts.

use lernen_application::ports::ThemePresenter;
use lernen_domain::ThemePreference;
use tracing::info;

/// Reports theme changes to the log instead of a rendering surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogThemePresenter;

impl ThemePresenter for LogThemePresenter {
    fn apply(&self, preference: ThemePreference) {
        info!(mode = preference.mode_name(), "theme applied");
    }
}
