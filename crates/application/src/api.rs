//! Typed facade over the backend's endpoint groups.
//!
//! Payloads stay opaque JSON; every call goes through the authorized
//! pipeline.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use lernen_domain::{ApiRequest, ApiResponse, UserProfile};

use crate::auth::PROFILE_PATH;
use crate::error::ApiError;
use crate::pipeline::AuthorizedClient;

/// Backend endpoints used by the learning screens.
#[derive(Debug, Clone)]
pub struct LearningApi {
    client: Arc<AuthorizedClient>,
}

impl LearningApi {
    /// Creates the facade over `client`.
    #[must_use]
    pub const fn new(client: Arc<AuthorizedClient>) -> Self {
        Self { client }
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let response = self.client.execute(&request).await?;
        decode(&response)
    }

    // auth

    /// Current user's profile.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn profile(&self) -> Result<Value, ApiError> {
        self.call(ApiRequest::get(PROFILE_PATH)).await
    }

    /// Re-fetches the profile and replaces the stored user snapshot.
    ///
    /// Tokens are untouched; nothing is stored once the session is gone.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline, or `Decode` if the answer is not
    /// an object.
    pub async fn refresh_profile(&self) -> Result<UserProfile, ApiError> {
        let value = self.profile().await?;
        self.store_user(value).await
    }

    /// Updates profile fields and stores the resulting user.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline, or `Decode` if the answer is not
    /// an object.
    pub async fn update_profile(&self, patch: Value) -> Result<UserProfile, ApiError> {
        let value = self.call(ApiRequest::patch(PROFILE_PATH, patch)).await?;
        self.store_user(value).await
    }

    async fn store_user(&self, value: Value) -> Result<UserProfile, ApiError> {
        let user = UserProfile::from_value(value)
            .ok_or_else(|| ApiError::Decode("profile is not an object".to_string()))?;
        match self.client.store().replace_user(user.clone()).await {
            Ok(true) => debug!("user snapshot updated"),
            Ok(false) => debug!("session ended before the profile arrived"),
            Err(e) => return Err(e.into()),
        }
        Ok(user)
    }

    /// Learning statistics of the current user.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn stats(&self) -> Result<Value, ApiError> {
        self.call(ApiRequest::get("/auth/stats/")).await
    }

    // courses

    /// Lists courses, filtered by `params`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn courses(&self, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.call(with_params(ApiRequest::get("/courses/"), params))
            .await
    }

    /// A single course.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn course(&self, id: u64) -> Result<Value, ApiError> {
        self.call(ApiRequest::get(format!("/courses/{id}/"))).await
    }

    /// A course module.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn module(&self, id: u64) -> Result<Value, ApiError> {
        self.call(ApiRequest::get(format!("/courses/modules/{id}/")))
            .await
    }

    // lessons

    /// Lists lessons, filtered by `params`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn lessons(&self, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.call(with_params(ApiRequest::get("/lessons/"), params))
            .await
    }

    /// A single lesson.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn lesson(&self, id: u64) -> Result<Value, ApiError> {
        self.call(ApiRequest::get(format!("/lessons/{id}/"))).await
    }

    /// Marks a lesson as completed.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn complete_lesson(&self, id: u64) -> Result<Value, ApiError> {
        self.call(ApiRequest::post(format!("/lessons/{id}/complete/"), json!({})))
            .await
    }

    /// Submits an exercise answer.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn submit_exercise(&self, body: Value) -> Result<Value, ApiError> {
        self.call(ApiRequest::post("/lessons/exercises/submit/", body))
            .await
    }

    // progress

    /// Progress on all enrolled courses.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn progress(&self) -> Result<Value, ApiError> {
        self.call(ApiRequest::get("/progress/")).await
    }

    /// Progress on one course.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn course_progress(&self, id: u64) -> Result<Value, ApiError> {
        self.call(ApiRequest::get(format!("/progress/{id}/"))).await
    }

    /// Current learning streak.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn streak(&self) -> Result<Value, ApiError> {
        self.call(ApiRequest::get("/progress/streak/")).await
    }

    /// Unlocked achievements.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn achievements(&self) -> Result<Value, ApiError> {
        self.call(ApiRequest::get("/progress/achievements/")).await
    }

    /// Dashboard summary.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn dashboard(&self) -> Result<Value, ApiError> {
        self.call(ApiRequest::get("/progress/dashboard/")).await
    }

    // ai

    /// Translates `text` between two language codes.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({"text": text, "source_lang": source_lang, "target_lang": target_lang});
        self.call(ApiRequest::post("/ai/translate/", body)).await
    }

    /// Generates example sentences for `word`.
    ///
    /// Without `level` the backend uses the user's own level.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn generate_sentences(
        &self,
        word: &str,
        level: Option<&str>,
        count: u32,
    ) -> Result<Value, ApiError> {
        let mut body = json!({"word": word, "count": count});
        if let Some(level) = level {
            body["level"] = Value::from(level);
        }
        self.call(ApiRequest::post("/ai/generate-sentences/", body))
            .await
    }

    /// Synthesizes speech for `text`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn text_to_speech(&self, text: &str, speed: f64) -> Result<Value, ApiError> {
        let body = json!({"text": text, "speed": speed});
        self.call(ApiRequest::post("/ai/text-to-speech/", body)).await
    }

    // chat

    /// Chat sessions of the current user.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn chat_sessions(&self) -> Result<Value, ApiError> {
        self.call(ApiRequest::get("/chat/sessions/")).await
    }

    /// A chat session with its messages.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn chat_session(&self, id: u64) -> Result<Value, ApiError> {
        self.call(ApiRequest::get(format!("/chat/sessions/{id}/")))
            .await
    }

    /// Opens a chat session.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn create_chat_session(&self, body: Value) -> Result<Value, ApiError> {
        self.call(ApiRequest::post("/chat/sessions/", body)).await
    }

    /// Sends a chat message and returns the tutor's reply.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn send_message(&self, body: Value) -> Result<Value, ApiError> {
        self.call(ApiRequest::post("/chat/send/", body)).await
    }

    /// Deletes the messages of a chat session.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the pipeline.
    pub async fn clear_chat_session(&self, id: u64) -> Result<Value, ApiError> {
        self.call(ApiRequest::delete(format!("/chat/sessions/{id}/clear/")))
            .await
    }
}

fn with_params(request: ApiRequest, params: &[(&str, &str)]) -> ApiRequest {
    params
        .iter()
        .fold(request, |request, (name, value)| request.with_query(*name, *value))
}

/// Empty bodies (204, DELETE) decode to `null`.
fn decode(response: &ApiResponse) -> Result<Value, ApiError> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    response
        .json()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::{REFRESH_PATH, TokenStore};
    use crate::fakes::{MemorySessionRepository, ScriptedHttpClient, sample_session};
    use lernen_domain::HttpMethod;
    use pretty_assertions::assert_eq;

    async fn api(transport: ScriptedHttpClient) -> (LearningApi, Arc<ScriptedHttpClient>) {
        let transport = Arc::new(transport);
        let store = Arc::new(TokenStore::new(Arc::new(MemorySessionRepository::new())));
        store.set(sample_session()).await.unwrap();
        let client = Arc::new(AuthorizedClient::new(transport.clone(), store));
        (LearningApi::new(client), transport)
    }

    #[tokio::test]
    async fn test_course_list_carries_params() {
        let (api, transport) =
            api(ScriptedHttpClient::new(|_| Ok(ApiResponse::with_json(200, &json!([]))))).await;

        let courses = api.courses(&[("level", "A1"), ("search", "Zahlen")]).await.unwrap();

        assert_eq!(courses, json!([]));
        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/courses/");
        assert_eq!(
            sent.query,
            vec![
                ("level".to_string(), "A1".to_string()),
                ("search".to_string(), "Zahlen".to_string())
            ]
        );
        assert_eq!(sent.bearer(), Some("T1"));
    }

    #[tokio::test]
    async fn test_endpoint_paths() {
        let (api, transport) =
            api(ScriptedHttpClient::new(|_| Ok(ApiResponse::with_json(200, &json!({}))))).await;

        api.lesson(3).await.unwrap();
        api.complete_lesson(3).await.unwrap();
        api.module(9).await.unwrap();
        api.course_progress(2).await.unwrap();
        api.chat_session(5).await.unwrap();

        let paths: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        assert_eq!(
            paths,
            vec![
                (HttpMethod::Get, "/lessons/3/".to_string()),
                (HttpMethod::Post, "/lessons/3/complete/".to_string()),
                (HttpMethod::Get, "/courses/modules/9/".to_string()),
                (HttpMethod::Get, "/progress/2/".to_string()),
                (HttpMethod::Get, "/chat/sessions/5/".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_translate_body() {
        let (api, transport) = api(ScriptedHttpClient::new(|_| {
            Ok(ApiResponse::with_json(200, &json!({"translated_text": "Hallo"})))
        }))
        .await;

        let reply = api.translate("Hello", "en", "de").await.unwrap();

        assert_eq!(reply["translated_text"], "Hallo");
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"text": "Hello", "source_lang": "en", "target_lang": "de"}))
        );
    }

    #[tokio::test]
    async fn test_generate_sentences_level_is_optional() {
        let (api, transport) =
            api(ScriptedHttpClient::new(|_| Ok(ApiResponse::with_json(200, &json!({}))))).await;

        api.generate_sentences("Haus", None, 3).await.unwrap();
        api.generate_sentences("Haus", Some("B1"), 3).await.unwrap();

        let bodies: Vec<_> = transport.requests().into_iter().map(|r| r.body.unwrap()).collect();
        assert_eq!(bodies[0], json!({"word": "Haus", "count": 3}));
        assert_eq!(bodies[1]["level"], "B1");
    }

    #[tokio::test]
    async fn test_empty_body_decodes_to_null() {
        let (api, transport) =
            api(ScriptedHttpClient::new(|_| Ok(ApiResponse::new(204, Vec::new())))).await;

        assert_eq!(api.clear_chat_session(4).await.unwrap(), Value::Null);
        assert_eq!(transport.requests()[0].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let (api, _) =
            api(ScriptedHttpClient::new(|_| Ok(ApiResponse::new(200, b"<html>".to_vec())))).await;
        assert!(matches!(api.dashboard().await, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_refresh_profile_replaces_user_only() {
        let (api, _) = api(ScriptedHttpClient::new(|_| {
            Ok(ApiResponse::with_json(
                200,
                &json!({"email": "a@b.com", "username": "anna", "language_level": "B2"}),
            ))
        }))
        .await;

        let user = api.refresh_profile().await.unwrap();

        let session = api.client.store().get();
        assert_eq!(session.user(), Some(&user));
        assert_eq!(session.access_token(), Some("T1"));
        assert_eq!(session.refresh_token(), Some("R1"));
    }

    #[tokio::test]
    async fn test_update_profile_patches_and_stores() {
        let (api, transport) = api(ScriptedHttpClient::new(|request| {
            let mut user = json!({"email": "a@b.com"});
            if let Some(body) = &request.body {
                user["first_name"] = body["first_name"].clone();
            }
            Ok(ApiResponse::with_json(200, &user))
        }))
        .await;

        let user = api
            .update_profile(json!({"first_name": "Annika"}))
            .await
            .unwrap();

        assert_eq!(user.display_name().as_deref(), Some("Annika"));
        assert_eq!(transport.requests()[0].method, HttpMethod::Patch);
        assert_eq!(api.client.store().get().user(), Some(&user));
    }

    #[tokio::test]
    async fn test_expired_session_surfaces_from_facade() {
        let (api, transport) =
            api(ScriptedHttpClient::new(|_| Ok(ApiResponse::new(401, Vec::new())))).await;

        let error = api.streak().await.unwrap_err();

        assert!(error.requires_login());
        assert!(!api.client.store().is_authenticated());
        assert_eq!(transport.calls_to(REFRESH_PATH), 1);
    }
}
