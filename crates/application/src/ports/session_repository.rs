//! Session repository port
//!
//! Defines the interface for persisting the signed-in session.

use async_trait::async_trait;

use lernen_domain::Session;

/// Errors that can occur during preference and session persistence.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository trait for the persisted session snapshot.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the persisted session.
    ///
    /// # Returns
    /// `None` if nothing has been persisted yet.
    ///
    /// # Errors
    /// Returns an error if the entry exists but cannot be read or decoded.
    async fn load(&self) -> Result<Option<Session>, RepositoryError>;

    /// Persists the session, replacing the previous snapshot as a whole.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be written.
    async fn save(&self, session: &Session) -> Result<(), RepositoryError>;

    /// Removes the persisted entry so a later start does not restore it.
    ///
    /// # Errors
    /// Returns an error if the entry exists but cannot be removed.
    async fn remove(&self) -> Result<(), RepositoryError>;
}
