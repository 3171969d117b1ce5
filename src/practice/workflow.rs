//! Generate → solve → evaluate workflow for one practice screen.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{
    Evaluation, GeneratedProblems, PracticeProblem, ProblemRequest, StateChange, WorkflowState,
};
use crate::api::{
    EvaluateSolutionRequest, EvaluationResponse, GenerateProblemsRequest,
    GenerateProblemsResponse, TutorApi,
};
use crate::error::TutorError;
use crate::session::{Session, SessionId};
use crate::Result;

/// Drives one practice problem through generation, solving and evaluation.
///
/// The state machine can be driven two ways:
///
/// - [`request`](Self::request) / [`submit`](Self::submit) perform the API
///   call and apply the result.
/// - `begin_*` / `complete_*` split each step so a caller that owns its own
///   event loop can issue the call itself.
///
/// At most one request is in flight: beginning a request or submission
/// while `Generating` or `Evaluating` returns `Ok(None)` and changes
/// nothing.
pub struct ProblemWorkflow {
    api: Arc<dyn TutorApi>,
    session: Option<Session>,
    state: WorkflowState,
    pending: Option<ProblemRequest>,
    problem: Option<PracticeProblem>,
    evaluation: Option<Evaluation>,
    solution: String,
    notice: Option<String>,
    observers: Vec<mpsc::UnboundedSender<StateChange>>,
}

impl ProblemWorkflow {
    /// Create an idle workflow bound to `session`.
    pub fn new(api: Arc<dyn TutorApi>, session: Option<Session>) -> Self {
        Self {
            api,
            session,
            state: WorkflowState::Idle,
            pending: None,
            problem: None,
            evaluation: None,
            solution: String::new(),
            notice: None,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn problem(&self) -> Option<&PracticeProblem> {
        self.problem.as_ref()
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    /// Solution text as the student typed it.
    pub fn solution(&self) -> &str {
        &self.solution
    }

    /// Message describing the last transient failure, if not dismissed.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Receive every state change from now on, in order.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    /// Update the draft solution while a problem is being solved.
    ///
    /// Returns `false` (and keeps the previous text) in any other state.
    pub fn set_solution(&mut self, text: impl Into<String>) -> bool {
        if self.state != WorkflowState::Ready {
            return false;
        }
        self.solution = text.into();
        true
    }

    /// Start generating a problem.
    ///
    /// Returns the payload to send, or `None` if a request is already in
    /// flight. Fails with `Validation` when there is no session or the
    /// subject/topic is missing, and with `InvalidWorkflowTransition` when a
    /// problem is already loaded.
    pub fn begin_request(
        &mut self,
        request: ProblemRequest,
    ) -> Result<Option<GenerateProblemsRequest>> {
        if self.state.is_busy() {
            debug!("Ignoring problem request while {:?}", self.state);
            return Ok(None);
        }
        if self.state != WorkflowState::Idle {
            return Err(TutorError::InvalidWorkflowTransition {
                from: self.state,
                to: WorkflowState::Generating,
            });
        }
        if self.session.is_none() {
            return Err(TutorError::Validation(
                "no active session; restart the client to create one".into(),
            ));
        }
        request.validate()?;

        let payload = GenerateProblemsRequest {
            subject: request.subject.trim().to_string(),
            topic: request.topic.trim().to_string(),
            count: request.count.clamp(1, ProblemRequest::MAX_COUNT),
            difficulty: request.difficulty,
        };

        self.move_to(WorkflowState::Generating)?;
        self.notice = None;
        self.pending = Some(request);
        Ok(Some(payload))
    }

    /// Apply the outcome of a generation request.
    ///
    /// On success the first usable problem becomes current. Any failure,
    /// including a response without problems, rolls back to `Idle`.
    pub fn complete_generation(
        &mut self,
        result: Result<GenerateProblemsResponse>,
    ) -> Result<PracticeProblem> {
        let request = match (self.state, self.pending.take()) {
            (WorkflowState::Generating, Some(request)) => request,
            (from, _) => {
                return Err(TutorError::InvalidWorkflowTransition {
                    from,
                    to: WorkflowState::Ready,
                })
            }
        };

        let outcome = match result {
            Ok(response) => GeneratedProblems::from(response).into_problem(&request),
            Err(e) => Err(TutorError::Generation(e.to_string())),
        };

        match outcome {
            Ok(problem) => {
                info!(
                    problem_id = %problem.problem_id,
                    subject = %problem.subject,
                    topic = %problem.topic,
                    "Practice problem generated"
                );
                self.problem = Some(problem.clone());
                self.move_to(WorkflowState::Ready)?;
                Ok(problem)
            }
            Err(e) => {
                warn!("Failed to generate problem: {}", e);
                self.notice = Some(e.to_string());
                self.move_to(WorkflowState::Idle)?;
                Err(e)
            }
        }
    }

    /// Start evaluating a solution.
    ///
    /// Returns the payload to send (with the solution trimmed), or `None` if
    /// a request is already in flight. Blank solutions fail with
    /// `Validation` and leave the workflow untouched.
    pub fn begin_submit(&mut self, solution: &str) -> Result<Option<EvaluateSolutionRequest>> {
        if self.state.is_busy() {
            debug!("Ignoring submission while {:?}", self.state);
            return Ok(None);
        }
        if self.state != WorkflowState::Ready {
            return Err(TutorError::InvalidWorkflowTransition {
                from: self.state,
                to: WorkflowState::Evaluating,
            });
        }

        let trimmed = solution.trim();
        if trimmed.is_empty() {
            return Err(TutorError::Validation("please enter your solution".into()));
        }

        let problem_id = match &self.problem {
            Some(problem) => problem.problem_id.clone(),
            None => {
                return Err(TutorError::InvalidWorkflowTransition {
                    from: self.state,
                    to: WorkflowState::Evaluating,
                })
            }
        };

        let payload = EvaluateSolutionRequest {
            problem_id,
            solution: trimmed.to_string(),
        };

        self.move_to(WorkflowState::Evaluating)?;
        self.solution = solution.to_string();
        self.notice = None;
        Ok(Some(payload))
    }

    /// Apply the outcome of an evaluation request.
    ///
    /// Failure returns to `Ready` with the problem and typed solution kept.
    pub fn complete_evaluation(&mut self, result: Result<EvaluationResponse>) -> Result<Evaluation> {
        if self.state != WorkflowState::Evaluating {
            return Err(TutorError::InvalidWorkflowTransition {
                from: self.state,
                to: WorkflowState::Reviewed,
            });
        }

        match result {
            Ok(response) => {
                let evaluation = Evaluation::from(response);
                info!(
                    correct = evaluation.is_correct,
                    score = evaluation.performance_score,
                    "Solution evaluated"
                );
                self.evaluation = Some(evaluation.clone());
                self.move_to(WorkflowState::Reviewed)?;
                Ok(evaluation)
            }
            Err(e) => {
                let err = TutorError::Evaluation(e.to_string());
                warn!("{}", err);
                self.notice = Some(err.to_string());
                self.move_to(WorkflowState::Ready)?;
                Err(err)
            }
        }
    }

    /// Generate a problem through the API.
    ///
    /// Returns `Ok(None)` when ignored because a request is in flight.
    pub async fn request(&mut self, request: ProblemRequest) -> Result<Option<PracticeProblem>> {
        let Some(payload) = self.begin_request(request)? else {
            return Ok(None);
        };

        let session_id = match self.session_id() {
            Ok(id) => id,
            Err(e) => {
                self.abandon();
                return Err(e);
            }
        };

        let api = Arc::clone(&self.api);
        let mut in_flight = InFlight::new(self);
        let result = api.generate_problems(&session_id, &payload).await;
        let outcome = in_flight.finish().complete_generation(result);
        outcome.map(Some)
    }

    /// Submit a solution for evaluation through the API.
    ///
    /// Returns `Ok(None)` when ignored because a request is in flight.
    pub async fn submit(&mut self, solution: &str) -> Result<Option<Evaluation>> {
        let Some(payload) = self.begin_submit(solution)? else {
            return Ok(None);
        };

        let session_id = match self.session_id() {
            Ok(id) => id,
            Err(e) => {
                self.abandon();
                return Err(e);
            }
        };

        let api = Arc::clone(&self.api);
        let mut in_flight = InFlight::new(self);
        let result = api.evaluate_solution(&session_id, &payload).await;
        let outcome = in_flight.finish().complete_evaluation(result);
        outcome.map(Some)
    }

    /// Give up on the request in flight.
    ///
    /// `Generating` returns to `Idle` and `Evaluating` returns to `Ready`
    /// with the problem and typed solution kept. Returns `false` when
    /// nothing is in flight.
    pub fn abandon(&mut self) -> bool {
        let target = match self.state {
            WorkflowState::Generating => WorkflowState::Idle,
            WorkflowState::Evaluating => WorkflowState::Ready,
            _ => return false,
        };
        if self.move_to(target).is_err() {
            return false;
        }
        self.pending = None;
        warn!("Abandoned request; workflow back to {:?}", target);
        true
    }

    /// Drop the current problem and return to `Idle`.
    ///
    /// Accepted from `Ready` and `Reviewed`; returns `false` otherwise.
    pub fn new_problem(&mut self) -> bool {
        if !matches!(self.state, WorkflowState::Ready | WorkflowState::Reviewed) {
            return false;
        }
        if self.move_to(WorkflowState::Idle).is_err() {
            return false;
        }
        self.problem = None;
        self.evaluation = None;
        self.solution.clear();
        self.notice = None;
        true
    }

    /// Try the same problem again after an incorrect answer.
    ///
    /// Returns `false` without changing anything unless the workflow is
    /// `Reviewed` and the evaluation was incorrect.
    pub fn retry(&mut self) -> bool {
        if self.state != WorkflowState::Reviewed {
            return false;
        }
        if self.evaluation.as_ref().map_or(true, |e| e.is_correct) {
            debug!("Retry ignored after a correct answer");
            return false;
        }
        if self.move_to(WorkflowState::Ready).is_err() {
            return false;
        }
        self.evaluation = None;
        self.solution.clear();
        true
    }

    fn session_id(&self) -> Result<SessionId> {
        self.session
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or_else(|| TutorError::Validation("no active session".into()))
    }

    fn move_to(&mut self, target: WorkflowState) -> Result<()> {
        let from = self.state;
        self.state.transition_to(target)?;
        debug!("Workflow {:?} -> {:?}", from, target);

        let change = StateChange { from, to: target };
        self.observers.retain(|tx| tx.send(change).is_ok());
        Ok(())
    }
}

/// Rolls the workflow back with [`ProblemWorkflow::abandon`] unless the
/// request completes; dropping a driver future mid-call never leaves the
/// workflow busy.
struct InFlight<'a> {
    workflow: &'a mut ProblemWorkflow,
    done: bool,
}

impl<'a> InFlight<'a> {
    fn new(workflow: &'a mut ProblemWorkflow) -> Self {
        Self {
            workflow,
            done: false,
        }
    }

    /// Disarm the guard and hand the workflow back for completion.
    fn finish(&mut self) -> &mut ProblemWorkflow {
        self.done = true;
        self.workflow
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.workflow.abandon();
        }
    }
}
