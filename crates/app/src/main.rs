//! Lernen client - headless entry point
//!
//! Loads the configuration, restores the persisted session and theme,
//! and reports where the requested route (first argument, default `/`)
//! would lead.

use std::sync::Arc;

use lernen_domain::{LanguageLevel, Route, RouteDecision};
use lernen_infrastructure::{AppContext, ClientConfig, LogThemePresenter};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lernen client v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::load()?;
    let context = AppContext::build(&config, Arc::new(LogThemePresenter)).await?;

    if context.sessions.is_authenticated() {
        match context.api.refresh_profile().await {
            Ok(user) => info!(
                user = user.display_name().as_deref().unwrap_or("unknown"),
                level = user.language_level().map_or("unknown", LanguageLevel::label),
                "session restored"
            ),
            Err(e) if e.requires_login() => warn!("stored session expired, sign in again"),
            Err(e) => warn!(error = %e, "could not refresh profile"),
        }
    }

    let requested = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    match context.sessions.guard(Route::parse(&requested)) {
        RouteDecision::Render(route) => info!(route = %route, "rendering"),
        RouteDecision::Redirect(route) => info!(requested = %requested, route = %route, "redirecting"),
    }

    Ok(())
}
