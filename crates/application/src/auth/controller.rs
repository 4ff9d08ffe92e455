//! Session lifecycle: the only writer of a full session.

use std::sync::Arc;

use tracing::{info, warn};

use lernen_domain::{
    AuthError, LoginCredentials, RegistrationData, Route, RouteDecision, Session,
};

use super::gateway::{AuthGateway, AuthPayload};
use super::token_store::TokenStore;

/// Signs users in and out.
#[derive(Debug, Clone)]
pub struct SessionController {
    gateway: AuthGateway,
    store: Arc<TokenStore>,
}

impl SessionController {
    /// Creates a controller writing to `store`.
    #[must_use]
    pub const fn new(gateway: AuthGateway, store: Arc<TokenStore>) -> Self {
        Self { gateway, store }
    }

    /// Signs in with email and password.
    ///
    /// On failure the stored session is left untouched.
    ///
    /// # Errors
    ///
    /// See [`AuthGateway::login`]; a storage failure maps to `AuthError::Storage`.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<Session, AuthError> {
        let payload = self.gateway.login(&credentials).await.inspect_err(|e| {
            info!(email = %credentials.email, error = %e, "login rejected");
        })?;
        let session = self.commit(payload).await?;
        info!(email = %credentials.email, "signed in");
        Ok(session)
    }

    /// Creates an account and signs in.
    ///
    /// Mismatched passwords are rejected before any request is sent.
    ///
    /// # Errors
    ///
    /// See [`AuthGateway::register`].
    pub async fn register(&self, data: RegistrationData) -> Result<Session, AuthError> {
        data.validate()?;
        let payload = self.gateway.register(&data).await.inspect_err(|e| {
            info!(email = %data.email, error = %e, "registration rejected");
        })?;
        let session = self.commit(payload).await?;
        info!(email = %data.email, username = %data.username, "account created");
        Ok(session)
    }

    /// Signs out locally. Never fails.
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to remove persisted session");
        }
        info!("signed out");
    }

    /// Current session snapshot.
    #[must_use]
    pub fn current(&self) -> Session {
        self.store.get()
    }

    /// True while a session is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Decides whether `route` may render for the current session.
    #[must_use]
    pub fn guard(&self, route: Route) -> RouteDecision {
        route.guard(self.is_authenticated())
    }

    async fn commit(&self, payload: AuthPayload) -> Result<Session, AuthError> {
        let user = match payload.user {
            Some(user) => user,
            None => self.gateway.profile(&payload.tokens.access).await?,
        };
        let session = Session::authenticated(user, payload.tokens);
        self.store.set(session.clone()).await?;
        Ok(session)
    }
}
