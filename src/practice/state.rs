//! Practice workflow state machine.

/// Where a [`ProblemWorkflow`](super::ProblemWorkflow) is in its
/// generate → solve → evaluate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// No problem in flight.
    #[default]
    Idle,
    /// Generation request outstanding.
    Generating,
    /// A problem is loaded; no solution submitted yet.
    Ready,
    /// Evaluation request outstanding.
    Evaluating,
    /// An evaluation is loaded.
    Reviewed,
}

impl WorkflowState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Idle -> Generating
    /// - Generating -> Ready | Idle
    /// - Ready -> Evaluating | Idle
    /// - Evaluating -> Reviewed | Ready
    /// - Reviewed -> Idle | Ready
    pub fn can_transition_to(&self, target: WorkflowState) -> bool {
        use WorkflowState::*;
        matches!(
            (*self, target),
            (Idle, Generating)
                | (Generating, Ready)
                | (Generating, Idle)
                | (Ready, Evaluating)
                | (Ready, Idle)
                | (Evaluating, Reviewed)
                | (Evaluating, Ready)
                | (Reviewed, Idle)
                | (Reviewed, Ready)
        )
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: WorkflowState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::TutorError::InvalidWorkflowTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if a request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowState::Generating | WorkflowState::Evaluating)
    }

    /// Check if a problem is loaded.
    pub fn has_problem(&self) -> bool {
        matches!(
            self,
            WorkflowState::Ready | WorkflowState::Evaluating | WorkflowState::Reviewed
        )
    }
}

/// One observed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub from: WorkflowState,
    pub to: WorkflowState,
}
