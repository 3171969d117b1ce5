//! Session bootstrap, restore and creation.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::{BootstrapState, IdentityStore, PersistedIdentity, Session, SessionId};
use crate::api::TutorApi;
use crate::error::TutorError;
use crate::practice::ProblemWorkflow;
use crate::Result;

/// Student id assigned when nothing has been persisted yet.
pub const DEFAULT_STUDENT_ID: &str = "student_demo_001";

/// Owns the single current [`Session`] of a running client.
///
/// Other components receive the session through [`current_session`] or a
/// clone handed to them (see [`workflow`]); only the manager replaces it.
///
/// [`current_session`]: SessionManager::current_session
/// [`workflow`]: SessionManager::workflow
pub struct SessionManager {
    api: Arc<dyn TutorApi>,
    identity: Arc<dyn IdentityStore>,
    default_student_id: String,
    student_id: String,
    state: BootstrapState,
    current: Option<Session>,
    created: bool,
    failure: Option<String>,
}

impl SessionManager {
    /// Create a manager; nothing is loaded until [`bootstrap`](Self::bootstrap).
    pub fn new(api: Arc<dyn TutorApi>, identity: Arc<dyn IdentityStore>) -> Self {
        Self {
            api,
            identity,
            default_student_id: DEFAULT_STUDENT_ID.to_string(),
            student_id: DEFAULT_STUDENT_ID.to_string(),
            state: BootstrapState::Start,
            current: None,
            created: false,
            failure: None,
        }
    }

    /// Override the student id used when none is persisted.
    pub fn with_default_student(mut self, student_id: impl Into<String>) -> Self {
        let student_id = student_id.into();
        if !student_id.trim().is_empty() {
            self.default_student_id = student_id.clone();
            self.student_id = student_id;
        }
        self
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    pub fn is_usable(&self) -> bool {
        self.state.is_usable()
    }

    /// The current session, if one has been established.
    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Whether the current session was created, not restored, by this manager.
    pub fn created_session(&self) -> bool {
        self.created && self.current.is_some()
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Reason bootstrap failed, for a blocking connectivity screen.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Shared handle to the API collaborator.
    pub fn api(&self) -> Arc<dyn TutorApi> {
        Arc::clone(&self.api)
    }

    /// A practice workflow bound to the current session.
    pub fn workflow(&self) -> ProblemWorkflow {
        ProblemWorkflow::new(self.api(), self.current.clone())
    }

    /// Establish the current session.
    ///
    /// Checks connectivity, restores the persisted session if the API still
    /// knows it, and otherwise creates a new one. Any failure to reach the
    /// API or to create a session is fatal: the manager ends in
    /// [`BootstrapState::Failed`] and a fresh manager is needed to retry.
    pub async fn bootstrap(&mut self) -> Result<&Session> {
        self.state.transition_to(BootstrapState::CheckingConnectivity)?;

        if let Err(e) = self.api.health_check().await {
            return Err(self.fail(format!("API unreachable: {}", e)));
        }
        info!("API connection established");

        let persisted = self.identity.load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable persisted identity: {}", e);
            PersistedIdentity::default()
        });

        match persisted.student_id.filter(|id| !id.trim().is_empty()) {
            Some(student_id) => self.student_id = student_id,
            None => {
                self.student_id = self.default_student_id.clone();
                self.persist(persisted.current_session_id.clone());
            }
        }

        if let Some(saved) = persisted.current_session_id.filter(|id| !id.trim().is_empty()) {
            self.state.transition_to(BootstrapState::RestoringSession)?;
            let saved = SessionId::from(saved);

            match self.api.get_session(&saved).await {
                Ok(session) => {
                    info!("Restored session: {}", session.id);
                    self.current = Some(session);
                    self.created = false;
                    self.state.transition_to(BootstrapState::Ready)?;
                    return self.ready_session();
                }
                Err(e) => {
                    warn!("Saved session {} invalid ({}), creating new session", saved, e);
                }
            }
        }

        let student_id = self.student_id.clone();
        self.establish(&student_id).await
    }

    /// Create a new session for `student_id` and make it current.
    ///
    /// Only valid once bootstrap has completed. The previous session stays
    /// current if creation fails.
    pub async fn create_session(&mut self, student_id: &str) -> Result<&Session> {
        if student_id.trim().is_empty() {
            return Err(TutorError::Validation("student id is required".into()));
        }
        if !self.state.is_usable() {
            return Err(TutorError::InvalidBootstrapTransition {
                from: self.state,
                to: BootstrapState::CreatingSession,
            });
        }
        self.establish(student_id.trim()).await
    }

    async fn establish(&mut self, student_id: &str) -> Result<&Session> {
        let replacing = self.state.is_usable();
        self.state.transition_to(BootstrapState::CreatingSession)?;

        match self.api.create_session(student_id).await {
            Ok(session) => {
                info!("New session created: {}", session.id);
                self.student_id = student_id.to_string();
                self.persist(Some(session.id.clone().into_inner()));
                self.current = Some(session);
                self.created = true;
                self.state.transition_to(BootstrapState::Ready)?;
                self.ready_session()
            }
            Err(e) if replacing => {
                warn!("Failed to create session: {}", e);
                self.state.transition_to(BootstrapState::Ready)?;
                Err(TutorError::Connectivity(format!("failed to create session: {}", e)))
            }
            Err(e) => Err(self.fail(format!("failed to create session: {}", e))),
        }
    }

    fn ready_session(&self) -> Result<&Session> {
        self.current.as_ref().ok_or(TutorError::NoActiveSession)
    }

    fn persist(&self, current_session_id: Option<String>) {
        let identity = PersistedIdentity {
            student_id: Some(self.student_id.clone()),
            current_session_id,
        };
        if let Err(e) = self.identity.save(&identity) {
            warn!("Failed to persist identity: {}", e);
        }
    }

    fn fail(&mut self, reason: String) -> TutorError {
        error!("Bootstrap failed: {}", reason);
        if let Err(e) = self.state.transition_to(BootstrapState::Failed) {
            warn!("{}", e);
        }
        self.failure = Some(reason.clone());
        TutorError::Connectivity(reason)
    }
}
