//! In-memory port implementations shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lernen_domain::{ApiRequest, ApiResponse, AuthTokens, Session, ThemePreference, UserProfile};
use serde_json::json;

use crate::ports::{
    HttpClient, HttpClientError, HttpFuture, RepositoryError, SessionRepository, ThemePresenter,
    ThemeRepository,
};

pub fn sample_user() -> UserProfile {
    UserProfile::from_value(json!({
        "id": 1,
        "email": "a@b.com",
        "username": "anna",
    }))
    .unwrap()
}

pub fn sample_session() -> Session {
    Session::authenticated(sample_user(), AuthTokens::new("T1", "R1"))
}

fn storage_failure() -> RepositoryError {
    RepositoryError::Io(std::io::Error::other("disk full"))
}

#[derive(Default)]
pub struct MemorySessionRepository {
    stored: Mutex<Option<Session>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        let repository = Self::default();
        *repository.stored.lock().unwrap() = Some(session);
        repository
    }

    pub fn stored(&self) -> Option<Session> {
        self.stored.lock().unwrap().clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn load(&self) -> Result<Option<Session>, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Serialization("expected value".to_string()));
        }
        Ok(self.stored())
    }

    async fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(storage_failure());
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(storage_failure());
        }
        *self.stored.lock().unwrap() = None;
        Ok(())
    }
}

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, HttpClientError> + Send + Sync>;

/// Transport that answers through a closure and records every request.
pub struct ScriptedHttpClient {
    handler: Handler,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(
        handler: impl Fn(&ApiRequest) -> Result<ApiResponse, HttpClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Delays answers for `path`, so concurrent callers can overlap.
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn send<'a>(&'a self, request: &'a ApiRequest) -> HttpFuture<'a> {
        self.requests.lock().unwrap().push(request.clone());
        let result = (self.handler)(request);
        let delay = self.delays.get(&request.path).copied();
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}

/// Answers 200 for `token` and 401 for anything else.
pub fn accepts_only(token: &'static str, request: &ApiRequest) -> ApiResponse {
    if request.bearer() == Some(token) {
        ApiResponse::with_json(200, &json!({"ok": true}))
    } else {
        ApiResponse::with_json(401, &json!({"detail": "Given token not valid"}))
    }
}

#[derive(Default)]
pub struct MemoryThemeRepository {
    stored: Mutex<Option<ThemePreference>>,
    fail_writes: AtomicBool,
}

impl MemoryThemeRepository {
    pub fn with_preference(preference: ThemePreference) -> Self {
        let repository = Self::default();
        *repository.stored.lock().unwrap() = Some(preference);
        repository
    }

    pub fn stored(&self) -> Option<ThemePreference> {
        *self.stored.lock().unwrap()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ThemeRepository for MemoryThemeRepository {
    async fn load(&self) -> Result<Option<ThemePreference>, RepositoryError> {
        Ok(self.stored())
    }

    async fn save(&self, preference: &ThemePreference) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(storage_failure());
        }
        *self.stored.lock().unwrap() = Some(*preference);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    applied: Mutex<Vec<ThemePreference>>,
}

impl RecordingPresenter {
    pub fn applied(&self) -> Vec<ThemePreference> {
        self.applied.lock().unwrap().clone()
    }
}

impl ThemePresenter for RecordingPresenter {
    fn apply(&self, preference: ThemePreference) {
        self.applied.lock().unwrap().push(preference);
    }
}
