//! Session management module.
//!
//! This module owns the client's session identity: the server-assigned
//! session, the persisted student/session ids, and the bootstrap state
//! machine that restores or creates a session at startup.

mod id;
mod manager;
mod state;
mod store;

pub use id::{Session, SessionId};
pub use manager::{SessionManager, DEFAULT_STUDENT_ID};
pub use state::BootstrapState;
pub use store::{FileIdentityStore, IdentityStore, MemoryIdentityStore, PersistedIdentity};
