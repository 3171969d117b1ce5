//! Session bootstrap state machine.

/// Lifecycle state of [`SessionManager`](super::SessionManager) bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootstrapState {
    /// Nothing has happened yet.
    #[default]
    Start,
    /// Health check against the API is outstanding.
    CheckingConnectivity,
    /// Fetching the persisted session.
    RestoringSession,
    /// Creating a fresh session.
    CreatingSession,
    /// A session is current; the application is usable.
    Ready,
    /// Bootstrap failed; the application is not usable.
    Failed,
}

impl BootstrapState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Start -> CheckingConnectivity
    /// - CheckingConnectivity -> RestoringSession | CreatingSession
    /// - RestoringSession -> Ready | CreatingSession
    /// - CreatingSession -> Ready
    /// - Ready -> CreatingSession (explicit replacement)
    /// - any non-terminal state except Ready -> Failed
    pub fn can_transition_to(&self, target: BootstrapState) -> bool {
        use BootstrapState::*;
        matches!(
            (*self, target),
            (Start, CheckingConnectivity)
                | (CheckingConnectivity, RestoringSession)
                | (CheckingConnectivity, CreatingSession)
                | (RestoringSession, Ready)
                | (RestoringSession, CreatingSession)
                | (CreatingSession, Ready)
                | (Ready, CreatingSession)
                | (Start, Failed)
                | (CheckingConnectivity, Failed)
                | (RestoringSession, Failed)
                | (CreatingSession, Failed)
        )
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: BootstrapState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::TutorError::InvalidBootstrapTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, BootstrapState::Failed)
    }

    /// Check if the application may be used.
    pub fn is_usable(&self) -> bool {
        matches!(self, BootstrapState::Ready)
    }
}
