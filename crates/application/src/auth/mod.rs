//! Authentication services
//!
//! This module provides the session store, the raw auth endpoint client and
//! the controller that signs users in and out.

mod controller;
mod gateway;
mod token_store;

pub use controller::SessionController;
pub use gateway::{AuthGateway, AuthPayload, LOGIN_PATH, PROFILE_PATH, REFRESH_PATH, REGISTER_PATH};
pub use token_store::TokenStore;
