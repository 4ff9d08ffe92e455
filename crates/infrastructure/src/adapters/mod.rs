//! Infrastructure adapters

mod log_presenter;
mod reqwest_client;

pub use log_presenter::LogThemePresenter;
pub use reqwest_client::ReqwestHttpClient;
