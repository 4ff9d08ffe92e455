//! The authorized HTTP client.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use lernen_domain::{ApiRequest, ApiResponse, AuthError, AuthorizationStage};

use super::retry::RetryDecision;
use crate::auth::{AuthGateway, TokenStore};
use crate::error::ApiError;
use crate::ports::HttpClient;

/// Sends requests with the stored access token and refreshes it on 401.
///
/// Refreshes are serialized: a request that waited for another request's
/// refresh reuses the rotated token instead of refreshing again.
pub struct AuthorizedClient {
    transport: Arc<dyn HttpClient>,
    gateway: AuthGateway,
    store: Arc<TokenStore>,
    refresh_lock: Mutex<()>,
}

impl AuthorizedClient {
    /// Creates a client sending through `transport` with tokens from `store`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpClient>, store: Arc<TokenStore>) -> Self {
        Self {
            gateway: AuthGateway::new(Arc::clone(&transport)),
            transport,
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    /// The session store this client reads tokens from.
    #[must_use]
    pub const fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Sends `request` with authorization.
    ///
    /// # Errors
    ///
    /// `SessionExpired` when the token was rejected and could not be
    /// refreshed (the session is cleared), `Status` for any other failing
    /// response, `Network` for transport errors.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut stages = Vec::new();
        self.run(request, &mut stages).await
    }

    /// Like [`execute`](Self::execute), also returning the stages walked.
    pub async fn execute_traced(
        &self,
        request: &ApiRequest,
    ) -> (Result<ApiResponse, ApiError>, Vec<AuthorizationStage>) {
        let mut stages = Vec::new();
        let result = self.run(request, &mut stages).await;
        (result, stages)
    }

    async fn run(
        &self,
        request: &ApiRequest,
        stages: &mut Vec<AuthorizationStage>,
    ) -> Result<ApiResponse, ApiError> {
        enter(stages, AuthorizationStage::Pending, request);

        let mut sent_with = self.store.access_token();
        let outbound = match sent_with.as_deref() {
            Some(token) => request.authorized(token),
            None => request.clone(),
        };
        enter(stages, AuthorizationStage::AuthorizedSent, request);
        let mut response = self.send(&outbound, stages, request).await?;

        let mut attempts = 0;
        loop {
            match RetryDecision::decide(response.status, attempts) {
                RetryDecision::Complete => {
                    enter(stages, AuthorizationStage::Success, request);
                    return Ok(response);
                }
                RetryDecision::Fail => {
                    enter(stages, AuthorizationStage::Failure, request);
                    return Err(ApiError::Status(response));
                }
                RetryDecision::Refresh => {
                    enter(stages, AuthorizationStage::Unauthorized, request);
                    enter(stages, AuthorizationStage::Refreshing, request);
                    attempts += 1;

                    let token = match self.fresh_token(sent_with.as_deref()).await {
                        Ok(token) => token,
                        Err(e) => {
                            debug!(path = %request.path, error = %e, "refresh unavailable");
                            enter(stages, AuthorizationStage::RefreshFailed, request);
                            enter(stages, AuthorizationStage::ForcedLogout, request);
                            return Err(ApiError::SessionExpired { original: response });
                        }
                    };

                    enter(stages, AuthorizationStage::RetriedSent, request);
                    let retry = request.authorized(&token);
                    sent_with = Some(token);
                    response = self.send(&retry, stages, request).await?;
                }
            }
        }
    }

    async fn send(
        &self,
        outbound: &ApiRequest,
        stages: &mut Vec<AuthorizationStage>,
        request: &ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        match self.transport.send(outbound).await {
            Ok(response) => Ok(response),
            Err(e) => {
                debug!(path = %request.path, error = %e, "transport error");
                enter(stages, AuthorizationStage::Failure, request);
                Err(ApiError::Network(e))
            }
        }
    }

    /// Returns an access token newer than `rejected`, refreshing if needed.
    ///
    /// Runs under the refresh lock. A rejected refresh clears the session
    /// before the lock is released, so waiting requests fail fast.
    async fn fresh_token(&self, rejected: Option<&str>) -> Result<String, AuthError> {
        let _guard = self.refresh_lock.lock().await;

        let session = self.store.get();
        if !session.is_authenticated() {
            return Err(AuthError::TokenExpired);
        }
        if let Some(current) = session.access_token()
            && Some(current) != rejected
        {
            debug!("reusing access token rotated by a concurrent refresh");
            return Ok(current.to_string());
        }
        let Some(refresh_token) = session.refresh_token() else {
            self.expire().await;
            return Err(AuthError::RefreshFailed {
                message: "no refresh token held".to_string(),
            });
        };

        let access = match self.gateway.refresh(refresh_token).await {
            Ok(access) => access,
            Err(e) => {
                warn!(error = %e, "token refresh failed, signing out");
                self.expire().await;
                return Err(e);
            }
        };

        match self.store.replace_access_token(access.clone()).await {
            Ok(true) => {
                debug!("access token refreshed");
                Ok(access)
            }
            Ok(false) => Err(AuthError::TokenExpired),
            Err(e) => {
                warn!(error = %e, "failed to persist refreshed token, signing out");
                self.expire().await;
                Err(e.into())
            }
        }
    }

    async fn expire(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to remove persisted session");
        }
    }
}

impl std::fmt::Debug for AuthorizedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedClient")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

fn enter(stages: &mut Vec<AuthorizationStage>, stage: AuthorizationStage, request: &ApiRequest) {
    debug!(stage = %stage, method = %request.method, path = %request.path, "authorization");
    stages.push(stage);
}
