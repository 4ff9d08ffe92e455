//! Outbound request types.

mod method;
mod spec;

pub use method::HttpMethod;
pub use spec::{ApiRequest, AUTHORIZATION, BEARER_PREFIX};
