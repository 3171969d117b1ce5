//! Tutor API collaborator.
//!
//! The remote API is reached through the [`TutorApi`] trait so session and
//! workflow logic can run against any implementation. [`HttpTutorApi`] is
//! the production implementation over HTTP.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Health check |
//! | POST | `/api/sessions` | Create session |
//! | GET | `/api/sessions/{id}` | Get session |
//! | DELETE | `/api/sessions/{id}` | Delete session |
//! | POST | `/api/sessions/{id}/concepts/explain` | Explain a concept |
//! | POST | `/api/sessions/{id}/problems/generate` | Generate problems |
//! | POST | `/api/sessions/{id}/problems/evaluate` | Evaluate a solution |
//! | GET | `/api/sessions/{id}/progress` | Progress report |
//! | GET | `/api/sessions/{id}/conversation` | Conversation history |
//! | GET | `/api/students/{id}/analytics` | Student analytics |
//! | GET | `/api/students/{id}/dashboard` | Dashboard data |
//! | GET/PUT | `/api/students/{id}/profile` | User profile |
//! | GET | `/api/subjects` | Available subjects |
//! | GET | `/api/subjects/{subject}/topics` | Topics of a subject |

mod client;
mod types;

use async_trait::async_trait;

use crate::session::{Session, SessionId};
use crate::Result;

pub use client::{HttpTutorApi, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use types::*;

/// Capability contract of the remote tutor API.
#[async_trait]
pub trait TutorApi: Send + Sync {
    async fn health_check(&self) -> Result<HealthStatus>;

    async fn create_session(&self, student_id: &str) -> Result<Session>;

    async fn get_session(&self, session_id: &SessionId) -> Result<Session>;

    async fn delete_session(&self, session_id: &SessionId) -> Result<()>;

    async fn explain_concept(
        &self,
        session_id: &SessionId,
        request: &ExplainConceptRequest,
    ) -> Result<ConceptExplanation>;

    async fn generate_problems(
        &self,
        session_id: &SessionId,
        request: &GenerateProblemsRequest,
    ) -> Result<GenerateProblemsResponse>;

    async fn evaluate_solution(
        &self,
        session_id: &SessionId,
        request: &EvaluateSolutionRequest,
    ) -> Result<EvaluationResponse>;

    async fn progress_report(&self, session_id: &SessionId) -> Result<ProgressReport>;

    async fn conversation_history(
        &self,
        session_id: &SessionId,
        limit: u32,
    ) -> Result<ConversationHistory>;

    async fn student_analytics(&self, student_id: &str) -> Result<StudentAnalytics>;

    async fn dashboard(&self, student_id: &str) -> Result<Dashboard>;

    async fn user_profile(&self, student_id: &str) -> Result<UserProfile>;

    async fn update_user_profile(
        &self,
        student_id: &str,
        preferences: &LearningPreferences,
    ) -> Result<UserProfile>;

    async fn subjects(&self) -> Result<Vec<String>>;

    async fn topics(&self, subject: &str) -> Result<Vec<String>>;
}
