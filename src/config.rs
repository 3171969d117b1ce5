//! Configuration management for tutor-client.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{HttpTutorApi, DEFAULT_BASE_URL};
use crate::cli::Args;
use crate::practice::{Difficulty, ProblemRequest};
use crate::session::{FileIdentityStore, DEFAULT_STUDENT_ID};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tutor API connection.
    pub api: ApiSection,
    /// Student identity.
    pub student: StudentSection,
    /// Practice defaults.
    pub practice: PracticeSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// API connection section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL of the tutor API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Student identity section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentSection {
    /// Student id used when none has been persisted.
    pub default_id: String,
    /// Identity file; defaults to the platform config directory.
    pub identity_file: Option<PathBuf>,
}

impl Default for StudentSection {
    fn default() -> Self {
        Self {
            default_id: DEFAULT_STUDENT_ID.to_string(),
            identity_file: None,
        }
    }
}

/// Practice defaults section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeSection {
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Problems generated per request (1-5).
    pub count: u8,
}

impl Default for PracticeSection {
    fn default() -> Self {
        Self {
            subject: "Mathematics".to_string(),
            topic: "Algebra".to_string(),
            difficulty: Difficulty::Medium,
            count: 1,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("TUTOR_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }

        if let Some(secs) = var("TUTOR_TIMEOUT_SECS") {
            if let Ok(secs) = secs.trim().parse() {
                self.api.timeout_secs = secs;
            }
        }

        if let Some(student) = var("TUTOR_STUDENT_ID") {
            if !student.trim().is_empty() {
                self.student.default_id = student;
            }
        }

        if let Some(path) = var("TUTOR_IDENTITY_FILE") {
            if !path.is_empty() {
                self.student.identity_file = Some(PathBuf::from(path));
            }
        }

        if let Some(level) = var("TUTOR_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    ///
    /// `--student` is not applied here: it names the student of a new
    /// session rather than the fallback identity.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }

        if let Some(ref path) = args.identity_file {
            self.student.identity_file = Some(path.clone());
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Build the HTTP client for the configured API.
    pub fn to_api_client(&self) -> Result<HttpTutorApi, ConfigError> {
        HttpTutorApi::with_timeout(&self.api.base_url, self.timeout())
            .map_err(|_| ConfigError::InvalidApiUrl(self.api.base_url.clone()))
    }

    /// Per-request timeout; zero is treated as one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    /// Where the identity is persisted, if anywhere.
    pub fn identity_path(&self) -> Option<PathBuf> {
        self.student
            .identity_file
            .clone()
            .or_else(FileIdentityStore::default_path)
    }

    /// Practice defaults as a request.
    pub fn default_problem_request(&self) -> ProblemRequest {
        ProblemRequest::new(
            self.practice.subject.clone(),
            self.practice.topic.clone(),
            self.practice.difficulty,
        )
        .with_count(self.practice.count)
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// API base URL is not an absolute http(s) URL.
    InvalidApiUrl(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidApiUrl(url) => write!(f, "invalid API URL: {}", url),
        }
    }
}

impl std::error::Error for ConfigError {}
