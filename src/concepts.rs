//! Concept explanations.

use tracing::info;

use crate::api::{ConceptExplanation, ExplainConceptRequest, TutorApi};
use crate::error::TutorError;
use crate::session::Session;
use crate::Result;

/// Ask the tutor to explain a concept within `session`.
///
/// Requires an active session and a non-blank subject and topic.
pub async fn explain_concept(
    api: &dyn TutorApi,
    session: Option<&Session>,
    request: &ExplainConceptRequest,
) -> Result<ConceptExplanation> {
    let session = session.ok_or(TutorError::NoActiveSession)?;
    if request.subject.trim().is_empty() || request.topic.trim().is_empty() {
        return Err(TutorError::Validation(
            "please select both subject and topic".into(),
        ));
    }

    let explanation = api.explain_concept(&session.id, request).await?;
    info!(subject = %request.subject, topic = %request.topic, "Concept explanation generated");
    Ok(explanation)
}
