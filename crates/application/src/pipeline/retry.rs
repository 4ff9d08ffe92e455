//! Retry policy for authorized requests.

use lernen_domain::StatusCode;

/// Refreshes allowed per original request.
pub const MAX_REFRESH_ATTEMPTS: u32 = 1;

/// What to do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Refresh the access token and resend.
    Refresh,
    /// Hand the response to the caller as a success.
    Complete,
    /// Hand the response to the caller as a failure.
    Fail,
}

impl RetryDecision {
    /// Decides from the status and the number of refreshes already done
    /// for this request.
    #[must_use]
    pub const fn decide(status: StatusCode, attempts_so_far: u32) -> Self {
        if status.is_unauthorized() && attempts_so_far < MAX_REFRESH_ATTEMPTS {
            Self::Refresh
        } else if status.is_success() || status.is_redirection() {
            Self::Complete
        } else {
            Self::Fail
        }
    }
}
