//! # tutor-client
//!
//! Client for the Educational Tutor API.
//!
//! The crate owns the two stateful pieces of a tutoring client: the
//! session lifecycle and the practice problem workflow. Everything else
//! (dashboards, analytics, explanations) is a thin pass-through to the
//! remote API.
//!
//! ## Features
//!
//! - **Session bootstrap**: connectivity check, restore of the persisted
//!   session, creation of a new one when needed
//! - **Practice workflow**: `Idle → Generating → Ready → Evaluating → Reviewed`
//!   with rollback on failure
//! - **Pluggable API**: the [`TutorApi`] trait with an HTTP implementation
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tutor_client::{Difficulty, HttpTutorApi, MemoryIdentityStore, ProblemRequest, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> tutor_client::Result<()> {
//!     tutor_client::logging::try_init().ok();
//!
//!     let api = Arc::new(HttpTutorApi::new("http://127.0.0.1:8000")?);
//!     let mut manager = SessionManager::new(api, Arc::new(MemoryIdentityStore::new()));
//!     manager.bootstrap().await?;
//!
//!     let mut workflow = manager.workflow();
//!     let request = ProblemRequest::new("Mathematics", "Algebra", Difficulty::Easy);
//!     if let Some(problem) = workflow.request(request).await? {
//!         println!("{}", problem.question);
//!         if let Some(evaluation) = workflow.submit("x = 4").await? {
//!             println!("correct: {}", evaluation.is_correct);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod concepts;
pub mod config;
pub mod error;
pub mod insights;
pub mod logging;
pub mod practice;
pub mod session;

// Re-export commonly used types
pub use api::{HttpTutorApi, TutorApi};
pub use error::{Result, TutorError};
pub use practice::{
    Difficulty, Evaluation, PracticeProblem, ProblemRequest, ProblemWorkflow, StateChange,
    WorkflowState,
};
pub use session::{
    BootstrapState, FileIdentityStore, IdentityStore, MemoryIdentityStore, Session, SessionId,
    SessionManager,
};
