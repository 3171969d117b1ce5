//! Practice problem records and response normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::{EvaluationResponse, GenerateProblemsResponse, ProblemData};
use crate::error::TutorError;

/// Difficulty level of a practice problem or explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(TutorError::Validation(format!(
                "unknown difficulty '{}' (expected easy, medium or hard)",
                other
            ))),
        }
    }
}

/// What the student asked the workflow to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRequest {
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Number of problems the server should generate (1..=5).
    pub count: u8,
}

impl ProblemRequest {
    pub const MAX_COUNT: u8 = 5;

    pub fn new(subject: impl Into<String>, topic: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            difficulty,
            count: 1,
        }
    }

    pub fn with_count(mut self, count: u8) -> Self {
        self.count = count.clamp(1, Self::MAX_COUNT);
        self
    }

    /// Check that subject and topic are present.
    pub fn validate(&self) -> crate::Result<()> {
        if self.subject.trim().is_empty() {
            return Err(TutorError::Validation("subject is required".into()));
        }
        if self.topic.trim().is_empty() {
            return Err(TutorError::Validation("topic is required".into()));
        }
        Ok(())
    }
}

/// The problem currently loaded into a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PracticeProblem {
    pub problem_id: String,
    pub question: String,
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
}

impl PracticeProblem {
    fn from_data(data: ProblemData, request: &ProblemRequest) -> Self {
        let difficulty = data
            .difficulty
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or(request.difficulty);

        Self {
            problem_id: non_empty(data.problem_id).unwrap_or_else(local_problem_id),
            question: data.question,
            subject: non_empty(data.subject).unwrap_or_else(|| request.subject.clone()),
            topic: non_empty(data.topic).unwrap_or_else(|| request.topic.clone()),
            difficulty,
        }
    }

    fn from_question(question: String, request: &ProblemRequest) -> Self {
        Self {
            problem_id: local_problem_id(),
            question,
            subject: request.subject.clone(),
            topic: request.topic.clone(),
            difficulty: request.difficulty,
        }
    }
}

/// The two shapes a generation response can take, made explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedProblems {
    /// `{ "problems": [...] }` with at least one entry.
    Listed(Vec<ProblemData>),
    /// `{ "question": "..." }` without a problem list.
    SingleQuestion(String),
    /// Neither shape carried anything usable.
    Empty,
}

impl From<GenerateProblemsResponse> for GeneratedProblems {
    fn from(response: GenerateProblemsResponse) -> Self {
        match (response.problems, non_empty(response.question)) {
            (Some(problems), _) if !problems.is_empty() => GeneratedProblems::Listed(problems),
            (_, Some(question)) => GeneratedProblems::SingleQuestion(question),
            _ => GeneratedProblems::Empty,
        }
    }
}

impl GeneratedProblems {
    /// Resolve to the single problem the workflow will present.
    pub fn into_problem(self, request: &ProblemRequest) -> crate::Result<PracticeProblem> {
        match self {
            GeneratedProblems::Listed(problems) => problems
                .into_iter()
                .next()
                .map(|data| PracticeProblem::from_data(data, request))
                .ok_or(TutorError::EmptyResult),
            GeneratedProblems::SingleQuestion(question) => {
                Ok(PracticeProblem::from_question(question, request))
            }
            GeneratedProblems::Empty => Err(TutorError::EmptyResult),
        }
    }
}

/// Outcome of evaluating a submitted solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub is_correct: bool,
    /// Fraction in `[0, 1]`.
    pub performance_score: f64,
    pub feedback: String,
}

impl From<EvaluationResponse> for Evaluation {
    fn from(response: EvaluationResponse) -> Self {
        let score = if response.performance_score.is_finite() {
            response.performance_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            is_correct: response.is_correct,
            performance_score: score,
            feedback: response.feedback.trim().to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// The backend may not recognise ids minted here when evaluating.
fn local_problem_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
