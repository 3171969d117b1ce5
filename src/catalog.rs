//! Subject and topic lists with offline fallbacks.

use tracing::warn;

use crate::api::TutorApi;

/// Subjects offered when the API cannot list them.
pub const FALLBACK_SUBJECTS: &[&str] = &["Mathematics", "Physics", "Chemistry", "Biology"];

/// Topics offered when the API cannot list them.
pub const FALLBACK_TOPICS: &[&str] = &["Algebra", "Geometry", "Calculus"];

fn or_fallback(what: &str, result: crate::Result<Vec<String>>, fallback: &[&str]) -> Vec<String> {
    match result {
        Ok(list) if !list.is_empty() => list,
        Ok(_) => fallback.iter().map(|s| s.to_string()).collect(),
        Err(e) => {
            warn!("Error loading {}: {}", what, e);
            fallback.iter().map(|s| s.to_string()).collect()
        }
    }
}

/// Available subjects; never empty.
pub async fn load_subjects(api: &dyn TutorApi) -> Vec<String> {
    or_fallback("subjects", api.subjects().await, FALLBACK_SUBJECTS)
}

/// Topics of `subject`; never empty.
pub async fn load_topics(api: &dyn TutorApi, subject: &str) -> Vec<String> {
    or_fallback("topics", api.topics(subject).await, FALLBACK_TOPICS)
}
