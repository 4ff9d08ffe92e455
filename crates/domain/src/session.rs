//! Session state types.
//!
//! A [`Session`] is either empty or fully populated. The constructors are
//! the only way to build one in code, so a partially filled session can
//! only come from deserializing a damaged snapshot; [`Session::is_consistent`]
//! detects that case.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::{AuthTokens, LanguageLevel};

/// User record as returned by the backend.
///
/// The core stores and forwards the record without interpreting it; the
/// accessors exist for identity display only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    /// Wraps a JSON value, returning `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    fn non_empty_str(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.non_empty_str("email")
    }

    /// Public username.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.non_empty_str("username")
    }

    /// Proficiency level, if present and valid.
    #[must_use]
    pub fn language_level(&self) -> Option<LanguageLevel> {
        self.non_empty_str("language_level")?.parse().ok()
    }

    /// Name to greet the user with: full name, else username, else email.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let full_name = [self.non_empty_str("first_name"), self.non_empty_str("last_name")]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !full_name.is_empty() {
            return Some(full_name);
        }
        self.username().or_else(|| self.email()).map(String::from)
    }
}

/// The authenticated identity of this client.
///
/// Serialized with the field names of the persisted `auth-storage` entry.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default, rename = "isAuthenticated")]
    authenticated: bool,
}

impl Session {
    /// The signed-out session.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            user: None,
            access_token: None,
            refresh_token: None,
            authenticated: false,
        }
    }

    /// A fully populated session.
    #[must_use]
    pub fn authenticated(user: UserProfile, tokens: AuthTokens) -> Self {
        Self {
            user: Some(user),
            access_token: Some(tokens.access),
            refresh_token: Some(tokens.refresh),
            authenticated: true,
        }
    }

    /// Replaces the access token. An empty session stays empty.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        if self.authenticated {
            self.access_token = Some(access_token.into());
        }
        self
    }

    /// Replaces the user snapshot. An empty session stays empty.
    #[must_use]
    pub fn with_user(mut self, user: UserProfile) -> Self {
        if self.authenticated {
            self.user = Some(user);
        }
        self
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// The current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The current refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// True iff user, access token and refresh token are all present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// True if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.authenticated
            && self.user.is_none()
            && self.access_token.is_none()
            && self.refresh_token.is_none()
    }

    /// True if the session is either fully empty or fully populated.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        let populated =
            self.user.is_some() && self.access_token.is_some() && self.refresh_token.is_some();
        if self.authenticated {
            populated
        } else {
            self.is_empty()
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.as_ref().and_then(UserProfile::email))
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user() -> UserProfile {
        UserProfile::from_value(json!({
            "id": 7,
            "email": "a@b.com",
            "username": "anna",
            "first_name": "Anna",
            "last_name": "Schmidt",
            "language_level": "B1",
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_session() {
        let session = Session::empty();
        assert!(session.is_empty());
        assert!(session.is_consistent());
        assert!(!session.is_authenticated());
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_authenticated_session_holds_all_fields() {
        let session = Session::authenticated(user(), AuthTokens::new("T1", "R1"));
        assert!(session.is_authenticated());
        assert!(session.is_consistent());
        assert_eq!(session.access_token(), Some("T1"));
        assert_eq!(session.refresh_token(), Some("R1"));
        assert_eq!(session.user().and_then(UserProfile::email), Some("a@b.com"));
    }

    #[test]
    fn test_access_token_replacement_keeps_refresh_and_user() {
        let session =
            Session::authenticated(user(), AuthTokens::new("T1", "R1")).with_access_token("T2");
        assert_eq!(session.access_token(), Some("T2"));
        assert_eq!(session.refresh_token(), Some("R1"));
        assert_eq!(session.user(), Some(&user()));
    }

    #[test]
    fn test_empty_session_cannot_be_partially_filled() {
        let session = Session::empty().with_access_token("T2").with_user(user());
        assert!(session.is_empty());
    }

    #[test]
    fn test_persisted_field_names() {
        let session = Session::authenticated(user(), AuthTokens::new("T1", "R1"));
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["accessToken"], "T1");
        assert_eq!(value["refreshToken"], "R1");
        assert_eq!(value["isAuthenticated"], true);
        assert_eq!(value["user"]["username"], "anna");
    }

    #[test]
    fn test_partial_snapshot_is_inconsistent() {
        let session: Session = serde_json::from_value(json!({
            "user": null,
            "accessToken": "T1",
            "refreshToken": null,
            "isAuthenticated": true,
        }))
        .unwrap();
        assert!(!session.is_consistent());

        let stale: Session = serde_json::from_value(json!({"accessToken": "T1"})).unwrap();
        assert!(!stale.is_consistent());
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(user().display_name().as_deref(), Some("Anna Schmidt"));

        let username_only =
            UserProfile::from_value(json!({"username": "anna", "first_name": ""})).unwrap();
        assert_eq!(username_only.display_name().as_deref(), Some("anna"));

        let email_only = UserProfile::from_value(json!({"email": "a@b.com"})).unwrap();
        assert_eq!(email_only.display_name().as_deref(), Some("a@b.com"));

        assert_eq!(UserProfile::default().display_name(), None);
    }

    #[test]
    fn test_language_level_accessor() {
        assert_eq!(user().language_level(), Some(LanguageLevel::B1));
        assert!(UserProfile::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn test_debug_omits_tokens() {
        let session = Session::authenticated(user(), AuthTokens::new("T1-secret", "R1-secret"));
        let debug = format!("{session:?}");
        assert!(!debug.contains("T1-secret"));
        assert!(!debug.contains("R1-secret"));
    }
}
