//! Persisted session storage.
//!
//! This module provides the single owner of the [`Session`] value. Reads
//! are lock-free snapshots of a `watch` slot; writes go through the
//! injected [`SessionRepository`] before they are published, and are
//! serialized so a persist/publish pair never interleaves with another.

use std::sync::Arc;

use lernen_domain::{Session, UserProfile};
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::SessionRepository;

/// Thread-safe session store backed by a persistence port.
pub struct TokenStore {
    state: watch::Sender<Session>,
    repository: Arc<dyn SessionRepository>,
    writer: Mutex<()>,
}

impl TokenStore {
    /// Creates an empty store without reading persisted state.
    #[must_use]
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self::with_session(repository, Session::empty())
    }

    fn with_session(repository: Arc<dyn SessionRepository>, session: Session) -> Self {
        let (state, _) = watch::channel(session);
        Self {
            state,
            repository,
            writer: Mutex::new(()),
        }
    }

    /// Creates a store holding the persisted session, if a valid one exists.
    ///
    /// An unreadable or partial snapshot is discarded and removed so it
    /// cannot resurface on the next start.
    pub async fn restore(repository: Arc<dyn SessionRepository>) -> Self {
        let restored = match repository.load().await {
            Ok(Some(session)) if session.is_consistent() => session,
            Ok(None) => Session::empty(),
            Ok(Some(_)) => {
                warn!("persisted session is incomplete, discarding it");
                Self::discard(repository.as_ref()).await;
                Session::empty()
            }
            Err(e) => {
                warn!(error = %e, "persisted session is unreadable, discarding it");
                Self::discard(repository.as_ref()).await;
                Session::empty()
            }
        };
        debug!(
            authenticated = restored.is_authenticated(),
            "session restored"
        );
        Self::with_session(repository, restored)
    }

    async fn discard(repository: &dyn SessionRepository) {
        if let Err(e) = repository.remove().await {
            warn!(error = %e, "failed to remove persisted session");
        }
    }

    /// Returns the current session snapshot.
    #[must_use]
    pub fn get(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Returns true if the current session is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Returns the current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token().map(String::from)
    }

    /// Subscribes to session changes.
    ///
    /// The receiver sees every published snapshot; the current one is
    /// marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Replaces the session, persisting it first.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::PartialSession` for a session that is
    /// neither empty nor complete, or a storage error; in both cases the
    /// in-memory session is unchanged.
    pub async fn set(&self, session: Session) -> ApplicationResult<()> {
        if !session.is_consistent() {
            return Err(ApplicationError::PartialSession);
        }
        let _guard = self.writer.lock().await;
        self.repository.save(&session).await?;
        self.state.send_replace(session);
        Ok(())
    }

    /// Removes the persisted entry, then clears the session.
    ///
    /// The in-memory session is always cleared, even when removing the
    /// persisted entry fails.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the persisted entry could not be removed.
    pub async fn clear(&self) -> ApplicationResult<()> {
        let _guard = self.writer.lock().await;
        let removed = self.repository.remove().await;
        self.state.send_replace(Session::empty());
        removed?;
        Ok(())
    }

    /// Replaces only the access token, keeping refresh token and user.
    ///
    /// Returns `false` without writing when the session is no longer
    /// authenticated, so a logout that raced a refresh stays in effect.
    ///
    /// # Errors
    ///
    /// Returns a storage error; the in-memory session is then unchanged.
    pub async fn replace_access_token(&self, access_token: String) -> ApplicationResult<bool> {
        let _guard = self.writer.lock().await;
        let current = self.get();
        if !current.is_authenticated() {
            return Ok(false);
        }
        let next = current.with_access_token(access_token);
        self.repository.save(&next).await?;
        self.state.send_replace(next);
        Ok(true)
    }

    /// Replaces only the user snapshot, keeping both tokens.
    ///
    /// Returns `false` without writing when the session is not authenticated.
    ///
    /// # Errors
    ///
    /// Returns a storage error; the in-memory session is then unchanged.
    pub async fn replace_user(&self, user: UserProfile) -> ApplicationResult<bool> {
        let _guard = self.writer.lock().await;
        let current = self.get();
        if !current.is_authenticated() {
            return Ok(false);
        }
        let next = current.with_user(user);
        self.repository.save(&next).await?;
        self.state.send_replace(next);
        Ok(true)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("session", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
