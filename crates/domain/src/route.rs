//! Client-side route guarding.
//!
//! Routing and rendering live outside the core; this module only decides,
//! from the authentication state, whether a route may be shown.

use std::fmt;

/// Navigable application routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in form.
    Login,
    /// Account creation form.
    Register,
    /// Landing page after sign-in.
    Dashboard,
    /// Course catalogue.
    Courses,
    /// A single lesson, keyed by the raw path segment.
    Lesson(String),
    /// AI tutor chat.
    Chat,
    /// Translation tool.
    Translator,
    /// Profile page.
    Profile,
}

impl Route {
    /// Resolves a path. Unknown paths fall back to the dashboard.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_matches('/');
        let mut segments = trimmed.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("login"), None, None) => Self::Login,
            (Some("register"), None, None) => Self::Register,
            (Some("courses"), None, None) => Self::Courses,
            (Some("chat"), None, None) => Self::Chat,
            (Some("translator"), None, None) => Self::Translator,
            (Some("profile"), None, None) => Self::Profile,
            (Some("lessons"), Some(id), None) => Self::Lesson(id.to_string()),
            _ => Self::Dashboard,
        }
    }

    /// Canonical path of the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Courses => "/courses".to_string(),
            Self::Lesson(id) => format!("/lessons/{id}"),
            Self::Chat => "/chat".to_string(),
            Self::Translator => "/translator".to_string(),
            Self::Profile => "/profile".to_string(),
        }
    }

    /// True for routes that require a signed-in session.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// Decides whether the route can be rendered.
    #[must_use]
    pub fn guard(self, authenticated: bool) -> RouteDecision {
        if self.is_protected() && !authenticated {
            RouteDecision::Redirect(Self::Login)
        } else {
            RouteDecision::Render(self)
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of guarding a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show the requested route.
    Render(Route),
    /// Navigate to another route instead.
    Redirect(Route),
}

impl RouteDecision {
    /// The route that ends up displayed.
    #[must_use]
    pub fn target(self) -> Route {
        match self {
            Self::Render(route) | Self::Redirect(route) => route,
        }
    }
}
