//! User preference domain model
//!
//! Defines presentation preferences persisted on the client.

use serde::{Deserialize, Serialize};

/// Light/dark presentation preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreference {
    /// Whether the dark presentation mode is active.
    #[serde(default)]
    pub is_dark: bool,
}

impl ThemePreference {
    /// Light mode.
    pub const LIGHT: Self = Self { is_dark: false };
    /// Dark mode.
    pub const DARK: Self = Self { is_dark: true };

    /// Creates a preference from a boolean.
    #[must_use]
    pub const fn new(is_dark: bool) -> Self {
        Self { is_dark }
    }

    /// Returns the opposite preference.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self {
            is_dark: !self.is_dark,
        }
    }

    /// Name of the presentation mode, as used for the root style class.
    #[must_use]
    pub const fn mode_name(self) -> &'static str {
        if self.is_dark { "dark" } else { "light" }
    }
}
