//! Backend response types.

mod spec;

pub use spec::{ApiResponse, StatusCode};
