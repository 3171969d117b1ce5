//! Session identifier and record types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a tutoring session.
///
/// The value is opaque to the client; it is only compared, displayed and
/// sent back to the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Get the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw identifier.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for SessionId {
    type Err = crate::error::TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::error::TutorError::Validation(
                "session id must not be empty".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// A tutoring session as reported by the API.
///
/// Sessions are replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Server-assigned identifier.
    #[serde(rename = "session_id")]
    pub id: SessionId,
    /// Student the session belongs to.
    pub student_id: String,
    /// Creation timestamp as reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Server-side status (e.g. "active").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Session {
    pub fn new(id: impl Into<SessionId>, student_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            student_id: student_id.into(),
            created_at: None,
            status: None,
        }
    }
}
