//! Scripted in-process `TutorApi` used by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tutor_client::api::*;
use tutor_client::{Result, Session, SessionId, TutorApi, TutorError};

fn unavailable(what: &str) -> TutorError {
    TutorError::Api {
        status: 503,
        detail: format!("{} unavailable", what),
    }
}

#[derive(Default)]
pub struct ScriptedApi {
    pub unhealthy: AtomicBool,
    pub create_fails: AtomicBool,
    pub dashboard_fails: AtomicBool,
    pub analytics_fails: AtomicBool,
    pub report_fails: AtomicBool,
    /// Generation and evaluation calls never answer.
    pub hangs: AtomicBool,
    known_sessions: Mutex<HashSet<String>>,
    generate: Mutex<VecDeque<Result<GenerateProblemsResponse>>>,
    evaluate: Mutex<VecDeque<Result<EvaluationResponse>>>,
    subjects: Mutex<Option<Result<Vec<String>>>>,
    profile: Mutex<UserProfile>,
    next_session: AtomicUsize,
    calls: Mutex<Vec<String>>,
    last_generate: Mutex<Option<GenerateProblemsRequest>>,
    last_evaluate: Mutex<Option<EvaluateSolutionRequest>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, id: &str) -> Self {
        self.known_sessions.lock().unwrap().insert(id.to_string());
        self
    }

    pub fn push_generate(&self, result: Result<GenerateProblemsResponse>) {
        self.generate.lock().unwrap().push_back(result);
    }

    pub fn push_evaluate(&self, result: Result<EvaluationResponse>) {
        self.evaluate.lock().unwrap().push_back(result);
    }

    pub fn set_subjects(&self, result: Result<Vec<String>>) {
        *self.subjects.lock().unwrap() = Some(result);
    }

    /// Number of calls made to `method`.
    pub fn calls(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.as_str() == method)
            .count()
    }

    pub fn last_generate(&self) -> Option<GenerateProblemsRequest> {
        self.last_generate.lock().unwrap().clone()
    }

    pub fn last_evaluate(&self) -> Option<EvaluateSolutionRequest> {
        self.last_evaluate.lock().unwrap().clone()
    }

    async fn stall(&self) {
        if self.hangs.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }
}

pub fn listed(question: &str) -> GenerateProblemsResponse {
    GenerateProblemsResponse {
        problems: Some(vec![ProblemData {
            problem_id: Some("p-1".into()),
            question: question.into(),
            ..ProblemData::default()
        }]),
        question: None,
    }
}

pub fn verdict(is_correct: bool, score: f64) -> EvaluationResponse {
    EvaluationResponse {
        problem_id: Some("p-1".into()),
        is_correct,
        performance_score: score,
        feedback: if is_correct { "Well done" } else { "Check your signs" }.into(),
    }
}

#[async_trait]
impl TutorApi for ScriptedApi {
    async fn health_check(&self) -> Result<HealthStatus> {
        self.record("health_check");
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(TutorError::Connectivity("connection refused".into()));
        }
        Ok(HealthStatus {
            status: Some("healthy".into()),
            ..HealthStatus::default()
        })
    }

    async fn create_session(&self, student_id: &str) -> Result<Session> {
        self.record("create_session");
        if self.create_fails.load(Ordering::SeqCst) {
            return Err(unavailable("session creation"));
        }
        let n = self.next_session.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("new-session-{}", n);
        self.known_sessions.lock().unwrap().insert(id.clone());
        Ok(Session::new(id, student_id))
    }

    async fn get_session(&self, session_id: &SessionId) -> Result<Session> {
        self.record("get_session");
        if self.known_sessions.lock().unwrap().contains(session_id.as_str()) {
            Ok(Session::new(session_id.clone(), "restored-student"))
        } else {
            Err(TutorError::Api {
                status: 404,
                detail: "Session not found".into(),
            })
        }
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<()> {
        self.record("delete_session");
        self.known_sessions.lock().unwrap().remove(session_id.as_str());
        Ok(())
    }

    async fn explain_concept(
        &self,
        _session_id: &SessionId,
        request: &ExplainConceptRequest,
    ) -> Result<ConceptExplanation> {
        self.record("explain_concept");
        Ok(ConceptExplanation {
            subject: request.subject.clone(),
            topic: request.topic.clone(),
            explanation: format!("{} explained", request.topic),
            ..ConceptExplanation::default()
        })
    }

    async fn generate_problems(
        &self,
        _session_id: &SessionId,
        request: &GenerateProblemsRequest,
    ) -> Result<GenerateProblemsResponse> {
        self.record("generate_problems");
        *self.last_generate.lock().unwrap() = Some(request.clone());
        self.stall().await;
        self.generate
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable("generation")))
    }

    async fn evaluate_solution(
        &self,
        _session_id: &SessionId,
        request: &EvaluateSolutionRequest,
    ) -> Result<EvaluationResponse> {
        self.record("evaluate_solution");
        *self.last_evaluate.lock().unwrap() = Some(request.clone());
        self.stall().await;
        self.evaluate
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable("evaluation")))
    }

    async fn progress_report(&self, session_id: &SessionId) -> Result<ProgressReport> {
        self.record("progress_report");
        if self.report_fails.load(Ordering::SeqCst) {
            return Err(unavailable("progress report"));
        }
        Ok(ProgressReport {
            session_id: session_id.to_string(),
            summary: "Steady progress".into(),
            strengths: vec!["Algebra".into()],
            ..ProgressReport::default()
        })
    }

    async fn conversation_history(
        &self,
        session_id: &SessionId,
        limit: u32,
    ) -> Result<ConversationHistory> {
        self.record("conversation_history");
        let messages: Vec<_> = (0..limit.min(2))
            .map(|i| ConversationMessage {
                role: if i % 2 == 0 { "student" } else { "tutor" }.into(),
                content: format!("message {}", i),
                ..ConversationMessage::default()
            })
            .collect();
        Ok(ConversationHistory {
            session_id: session_id.to_string(),
            total_messages: messages.len() as u64,
            messages,
        })
    }

    async fn student_analytics(&self, student_id: &str) -> Result<StudentAnalytics> {
        self.record("student_analytics");
        if self.analytics_fails.load(Ordering::SeqCst) {
            return Err(unavailable("analytics"));
        }
        Ok(StudentAnalytics {
            student_id: student_id.into(),
            total_sessions: 3,
            total_problems_solved: 12,
            average_score: 0.75,
            ..StudentAnalytics::default()
        })
    }

    async fn dashboard(&self, student_id: &str) -> Result<Dashboard> {
        self.record("dashboard");
        if self.dashboard_fails.load(Ordering::SeqCst) {
            return Err(unavailable("dashboard"));
        }
        Ok(Dashboard {
            student_id: student_id.into(),
            summary: DashboardSummary {
                active_sessions: 1,
                performance_summary: HashMap::from([("Mathematics".to_string(), 0.8)]),
                recommended_actions: vec!["Practice geometry".into()],
                ..DashboardSummary::default()
            },
        })
    }

    async fn user_profile(&self, student_id: &str) -> Result<UserProfile> {
        self.record("user_profile");
        let mut profile = self.profile.lock().unwrap().clone();
        profile.student_id = student_id.into();
        Ok(profile)
    }

    async fn update_user_profile(
        &self,
        student_id: &str,
        preferences: &LearningPreferences,
    ) -> Result<UserProfile> {
        self.record("update_user_profile");
        let mut profile = self.profile.lock().unwrap();
        profile.student_id = student_id.into();
        profile.learning_preferences = preferences.clone();
        Ok(profile.clone())
    }

    async fn subjects(&self) -> Result<Vec<String>> {
        self.record("subjects");
        match self.subjects.lock().unwrap().take() {
            Some(result) => result,
            None => Ok(vec!["Mathematics".into(), "Physics".into()]),
        }
    }

    async fn topics(&self, _subject: &str) -> Result<Vec<String>> {
        self.record("topics");
        Ok(Vec::new())
    }
}
