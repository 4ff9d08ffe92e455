//! Authorized request pipeline
//!
//! Attaches the access token to outbound requests and recovers from an
//! expired token with a single refresh and resend.

mod client;
mod retry;

pub use client::AuthorizedClient;
pub use retry::{MAX_REFRESH_ATTEMPTS, RetryDecision};
