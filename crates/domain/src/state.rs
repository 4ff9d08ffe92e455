//! Authorization pipeline state types.
//!
//! Every outbound authorized call walks through these stages; the
//! pipeline records them for diagnostics and tests.

use std::fmt;

/// Stage of a single authorized request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizationStage {
    /// Request accepted, nothing sent yet.
    Pending,
    /// Sent with the current access token (if any).
    AuthorizedSent,
    /// The backend answered 401.
    Unauthorized,
    /// Exchanging the refresh token for a new access token.
    Refreshing,
    /// Resent once with the new access token.
    RetriedSent,
    /// Final successful response.
    Success,
    /// Final failure passed to the caller.
    Failure,
    /// The refresh exchange failed.
    RefreshFailed,
    /// The session was cleared; the caller must sign in again.
    ForcedLogout,
}

impl AuthorizationStage {
    /// True for stages after which nothing else happens.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::ForcedLogout)
    }

    /// Returns the stage name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AuthorizedSent => "authorized_sent",
            Self::Unauthorized => "unauthorized",
            Self::Refreshing => "refreshing",
            Self::RetriedSent => "retried_sent",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::RefreshFailed => "refresh_failed",
            Self::ForcedLogout => "forced_logout",
        }
    }
}

impl fmt::Display for AuthorizationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
