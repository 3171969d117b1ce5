//! HTTP implementation of the tutor API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::*;
use super::TutorApi;
use crate::error::TutorError;
use crate::session::{Session, SessionId};
use crate::Result;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tutor API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTutorApi {
    client: Client,
    base_url: Url,
}

impl HttpTutorApi {
    /// Create a client with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TutorError::Validation(format!("invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TutorError::Validation(format!(
                "invalid API URL '{}'",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if segments.is_empty() {
            return url;
        }
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Build `{base}/api/{segments...}`.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut all = Vec::with_capacity(segments.len() + 1);
        all.push("api");
        all.extend_from_slice(segments);
        self.url(&all)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!("API {} {}", status.as_u16(), response.url().path());

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(TutorError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TutorApi for HttpTutorApi {
    async fn health_check(&self) -> Result<HealthStatus> {
        self.send(self.client.get(self.url(&[]))).await
    }

    async fn create_session(&self, student_id: &str) -> Result<Session> {
        let body = CreateSessionRequest {
            student_id: student_id.to_string(),
        };
        self.send(self.client.post(self.endpoint(&["sessions"])).json(&body))
            .await
    }

    async fn get_session(&self, session_id: &SessionId) -> Result<Session> {
        self.send(
            self.client
                .get(self.endpoint(&["sessions", session_id.as_str()])),
        )
        .await
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<()> {
        let _: serde_json::Value = self
            .send(
                self.client
                    .delete(self.endpoint(&["sessions", session_id.as_str()])),
            )
            .await?;
        Ok(())
    }

    async fn explain_concept(
        &self,
        session_id: &SessionId,
        request: &ExplainConceptRequest,
    ) -> Result<ConceptExplanation> {
        let url = self.endpoint(&["sessions", session_id.as_str(), "concepts", "explain"]);
        self.send(self.client.post(url).json(request)).await
    }

    async fn generate_problems(
        &self,
        session_id: &SessionId,
        request: &GenerateProblemsRequest,
    ) -> Result<GenerateProblemsResponse> {
        let url = self.endpoint(&["sessions", session_id.as_str(), "problems", "generate"]);
        self.send(self.client.post(url).json(request)).await
    }

    async fn evaluate_solution(
        &self,
        session_id: &SessionId,
        request: &EvaluateSolutionRequest,
    ) -> Result<EvaluationResponse> {
        let url = self.endpoint(&["sessions", session_id.as_str(), "problems", "evaluate"]);
        self.send(self.client.post(url).json(request)).await
    }

    async fn progress_report(&self, session_id: &SessionId) -> Result<ProgressReport> {
        let url = self.endpoint(&["sessions", session_id.as_str(), "progress"]);
        self.send(self.client.get(url)).await
    }

    async fn conversation_history(
        &self,
        session_id: &SessionId,
        limit: u32,
    ) -> Result<ConversationHistory> {
        let url = self.endpoint(&["sessions", session_id.as_str(), "conversation"]);
        self.send(self.client.get(url).query(&[("limit", limit)]))
            .await
    }

    async fn student_analytics(&self, student_id: &str) -> Result<StudentAnalytics> {
        let url = self.endpoint(&["students", student_id, "analytics"]);
        self.send(self.client.get(url)).await
    }

    async fn dashboard(&self, student_id: &str) -> Result<Dashboard> {
        let url = self.endpoint(&["students", student_id, "dashboard"]);
        self.send(self.client.get(url)).await
    }

    async fn user_profile(&self, student_id: &str) -> Result<UserProfile> {
        let url = self.endpoint(&["students", student_id, "profile"]);
        self.send(self.client.get(url)).await
    }

    async fn update_user_profile(
        &self,
        student_id: &str,
        preferences: &LearningPreferences,
    ) -> Result<UserProfile> {
        let url = self.endpoint(&["students", student_id, "profile"]);
        let body = UpdateProfileRequest {
            learning_preferences: preferences,
        };
        self.send(self.client.put(url).json(&body)).await
    }

    async fn subjects(&self) -> Result<Vec<String>> {
        self.send(self.client.get(self.endpoint(&["subjects"])))
            .await
    }

    async fn topics(&self, subject: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["subjects", subject, "topics"]);
        self.send(self.client.get(url)).await
    }
}
