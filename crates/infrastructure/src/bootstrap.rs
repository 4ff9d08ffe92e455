//! Wires the adapters into the application services.

use std::sync::Arc;

use lernen_application::{
    ApplicationError, ApplicationResult, AuthGateway, AuthorizedClient, HttpClient, LearningApi,
    SessionController, ThemePresenter, ThemeStore, TokenStore,
};
use tracing::info;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::persistence::{FileSessionRepository, FileThemeRepository, TokioFileSystem};

/// The assembled client core.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Session store shared by all services.
    pub store: Arc<TokenStore>,
    /// Sign-in and sign-out.
    pub sessions: SessionController,
    /// Backend endpoints behind the authorized pipeline.
    pub api: LearningApi,
    /// Theme preference.
    pub theme: Arc<ThemeStore>,
}

impl AppContext {
    /// Restores persisted state and builds every service over the real
    /// adapters.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Config` if the HTTP client cannot be built
    /// for the configured URL.
    pub async fn build(
        config: &ClientConfig,
        presenter: Arc<dyn ThemePresenter>,
    ) -> ApplicationResult<Self> {
        let transport = ReqwestHttpClient::new(
            config.api_url.clone(),
            config.timeout(),
            &config.user_agent,
        )
        .map_err(|e| ApplicationError::Config(e.to_string()))?;
        let context = Self::with_transport(Arc::new(transport), config, presenter).await;
        info!(
            api_url = %config.api_url,
            storage_dir = %config.storage_dir.display(),
            authenticated = context.store.is_authenticated(),
            "client core ready"
        );
        Ok(context)
    }

    /// Builds the services over `transport`, with file persistence in the
    /// configured storage directory.
    pub async fn with_transport(
        transport: Arc<dyn HttpClient>,
        config: &ClientConfig,
        presenter: Arc<dyn ThemePresenter>,
    ) -> Self {
        let fs = TokioFileSystem::new();
        let sessions = Arc::new(FileSessionRepository::new(fs, &config.storage_dir));
        let themes = Arc::new(FileThemeRepository::new(fs, &config.storage_dir));

        let store = Arc::new(TokenStore::restore(sessions).await);
        let theme = Arc::new(ThemeStore::restore(themes, presenter).await);
        let client = Arc::new(AuthorizedClient::new(
            Arc::clone(&transport),
            Arc::clone(&store),
        ));

        Self {
            sessions: SessionController::new(AuthGateway::new(transport), Arc::clone(&store)),
            api: LearningApi::new(client),
            store,
            theme,
        }
    }
}
