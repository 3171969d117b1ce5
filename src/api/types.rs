//! API request and response types.
//!
//! Every response field the server might omit carries a serde default.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::practice::Difficulty;

/// Preferred way of presenting explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    Kinesthetic,
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Auditory => "auditory",
            LearningStyle::Kinesthetic => "kinesthetic",
        })
    }
}

impl FromStr for LearningStyle {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visual" => Ok(LearningStyle::Visual),
            "auditory" => Ok(LearningStyle::Auditory),
            "kinesthetic" => Ok(LearningStyle::Kinesthetic),
            other => Err(TutorError::Validation(format!(
                "unknown learning style '{}'",
                other
            ))),
        }
    }
}

/// Response of the root health endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub message: Option<String>,
    pub version: Option<String>,
    pub status: Option<String>,
}

/// Request to create a new session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub student_id: String,
}

/// Request to explain a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainConceptRequest {
    pub subject: String,
    pub topic: String,
    pub difficulty_level: Difficulty,
    pub learning_style: LearningStyle,
}

impl ExplainConceptRequest {
    pub fn new(subject: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            difficulty_level: Difficulty::default(),
            learning_style: LearningStyle::default(),
        }
    }
}

/// Explanation returned for a concept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConceptExplanation {
    pub subject: String,
    pub topic: String,
    pub difficulty_level: String,
    pub learning_style: String,
    pub explanation: String,
}

/// Request to generate practice problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateProblemsRequest {
    pub subject: String,
    pub topic: String,
    pub count: u8,
    pub difficulty: Difficulty,
}

/// Raw generation response; either `problems` or `question` is expected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateProblemsResponse {
    pub problems: Option<Vec<ProblemData>>,
    pub question: Option<String>,
}

/// One problem as the server describes it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProblemData {
    pub problem_id: Option<String>,
    pub question: String,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

/// Request to evaluate a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluateSolutionRequest {
    pub problem_id: String,
    pub solution: String,
}

/// Raw evaluation response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EvaluationResponse {
    pub problem_id: Option<String>,
    pub is_correct: bool,
    pub performance_score: f64,
    pub feedback: String,
}

/// Progress report for one session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgressReport {
    pub session_id: String,
    pub student_id: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Aggregated analytics for a student.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentAnalytics {
    pub student_id: String,
    pub total_sessions: u64,
    pub total_problems_solved: u64,
    pub average_score: f64,
    pub subjects_studied: Vec<String>,
    pub skill_progression: HashMap<String, HashMap<String, f64>>,
    /// Minutes.
    pub time_spent_learning: u64,
}

/// Dashboard data for a student.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub student_id: String,
    pub summary: DashboardSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub recent_activity: Vec<serde_json::Value>,
    pub performance_summary: HashMap<String, f64>,
    pub recommended_actions: Vec<String>,
    pub active_sessions: u64,
}

/// Editable learning preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningPreferences {
    pub default_difficulty: Difficulty,
    pub preferred_learning_style: LearningStyle,
    pub notification_settings: HashMap<String, bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AchievementBadge {
    pub badge_id: String,
    pub name: String,
    pub description: String,
    pub earned_at: String,
    pub subject: Option<String>,
}

/// Student profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub student_id: String,
    pub learning_preferences: LearningPreferences,
    pub achievement_badges: Vec<AchievementBadge>,
    pub total_sessions: u64,
}

/// Request to replace learning preferences.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest<'a> {
    pub learning_preferences: &'a LearningPreferences,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
    pub timestamp: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Conversation history of a session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConversationHistory {
    pub session_id: String,
    pub messages: Vec<ConversationMessage>,
    pub total_messages: u64,
}

/// Error body returned by the API; `detail` may be a string or a
/// structured validation report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub(crate) fn message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_serialization() {
        let req = GenerateProblemsRequest {
            subject: "Mathematics".into(),
            topic: "Algebra".into(),
            count: 1,
            difficulty: Difficulty::Medium,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["difficulty"], "medium");
        assert_eq!(json["count"], 1);
    }

    #[test]
    fn test_explain_request_defaults() {
        let req = ExplainConceptRequest::new("Physics", "Optics");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["difficulty_level"], "medium");
        assert_eq!(json["learning_style"], "visual");
    }

    #[test]
    fn test_analytics_tolerates_missing_fields() {
        let analytics: StudentAnalytics =
            serde_json::from_str(r#"{"student_id":"s1","average_score":0.5}"#).unwrap();
        assert_eq!(analytics.student_id, "s1");
        assert_eq!(analytics.total_sessions, 0);
        assert!(analytics.subjects_studied.is_empty());
    }

    #[test]
    fn test_dashboard_nested_summary() {
        let json = r#"{
            "student_id": "s1",
            "summary": {
                "recent_activity": [{"type": "practice"}],
                "performance_summary": {"Mathematics": 0.8},
                "recommended_actions": ["Review algebra"],
                "active_sessions": 2
            }
        }"#;
        let dashboard: Dashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.summary.active_sessions, 2);
        assert_eq!(dashboard.summary.recommended_actions.len(), 1);
        assert_eq!(dashboard.summary.performance_summary["Mathematics"], 0.8);
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Session not found"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Session not found"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","subject"]}]}"#).unwrap();
        assert!(body.message().unwrap().contains("subject"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message().is_none());
    }

    #[test]
    fn test_learning_style_parse() {
        assert_eq!("Auditory".parse::<LearningStyle>().unwrap(), LearningStyle::Auditory);
        assert!("telepathic".parse::<LearningStyle>().is_err());
    }
}
