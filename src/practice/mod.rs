//! Practice problem workflow.
//!
//! A [`ProblemWorkflow`] walks one problem through
//! `Idle → Generating → Ready → Evaluating → Reviewed`, rolling back to
//! `Idle` when generation fails and to `Ready` when evaluation fails.

mod problem;
mod state;
mod workflow;

pub use problem::{Difficulty, Evaluation, GeneratedProblems, PracticeProblem, ProblemRequest};
pub use state::{StateChange, WorkflowState};
pub use workflow::ProblemWorkflow;
