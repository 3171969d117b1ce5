//! Persisted client identity.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::Result;

/// The two values that survive application restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedIdentity {
    /// Student the client acts for.
    #[serde(rename = "studentId", skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Last session established by this client.
    #[serde(rename = "currentSessionId", skip_serializing_if = "Option::is_none")]
    pub current_session_id: Option<String>,
}

/// Storage for [`PersistedIdentity`].
///
/// Writes must be durable by the time `save` returns.
pub trait IdentityStore: Send + Sync {
    /// Load the persisted identity; missing storage yields an empty identity.
    fn load(&self) -> Result<PersistedIdentity>;

    /// Replace the persisted identity.
    fn save(&self, identity: &PersistedIdentity) -> Result<()>;
}

/// In-memory identity storage.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identity: RwLock<PersistedIdentity>,
}

impl MemoryIdentityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with an identity.
    pub fn with_identity(identity: PersistedIdentity) -> Self {
        Self {
            identity: RwLock::new(identity),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<PersistedIdentity> {
        let identity = self
            .identity
            .read()
            .map_err(|_| TutorError::LockPoisoned)?;
        Ok(identity.clone())
    }

    fn save(&self, identity: &PersistedIdentity) -> Result<()> {
        let mut current = self
            .identity
            .write()
            .map_err(|_| TutorError::LockPoisoned)?;
        *current = identity.clone();
        Ok(())
    }
}

/// Identity stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// File name used inside the default directory.
    pub const FILE_NAME: &'static str = "identity.json";

    /// Store identity at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `<config dir>/tutor-client/identity.json`.
    ///
    /// Returns `None` when the platform has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tutor-client").join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<PersistedIdentity> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(PersistedIdentity::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PersistedIdentity::default()),
            Err(e) => Err(TutorError::Io(e)),
        }
    }

    fn save(&self, identity: &PersistedIdentity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write-then-rename: readers never observe a partial file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(identity)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
