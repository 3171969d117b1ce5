//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use tutor_client::cli::{parse_args_from, Args, Command};
use tutor_client::config::Config;
use tutor_client::Difficulty;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("tutor-client")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert_eq!(result.command, Command::Status);
    assert!(result.api_url.is_none());
    assert!(result.config.is_none());
    assert!(result.student_id.is_none());
    assert!(result.solution.is_none());
    assert!(!result.help);
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "practice",
        "-u",
        "http://tutor.local:8000",
        "-s",
        "student_42",
        "-l",
        "debug",
        "--subject",
        "Chemistry",
        "--topic",
        "Stoichiometry",
        "-d",
        "easy",
        "--solution",
        "2 mol",
    ]))
    .unwrap();

    assert_eq!(result.command, Command::Practice);
    assert_eq!(result.api_url.as_deref(), Some("http://tutor.local:8000"));
    assert_eq!(result.student_id.as_deref(), Some("student_42"));
    assert_eq!(result.log_level.as_deref(), Some("debug"));
    assert_eq!(result.subject.as_deref(), Some("Chemistry"));
    assert_eq!(result.topic.as_deref(), Some("Stoichiometry"));
    assert_eq!(result.difficulty, Some(Difficulty::Easy));
    assert_eq!(result.solution.as_deref(), Some("2 mol"));
}

#[test]
fn test_cli_options_before_command() {
    let result = parse_args_from(args(&["-u", "http://x:1", "history", "--limit", "10"])).unwrap();
    assert_eq!(result.command, Command::History);
    assert_eq!(result.limit, 10);
}

#[test]
fn test_cli_config_file() {
    let result = parse_args_from(args(&["-c", "/etc/tutor-client.json"])).unwrap();

    assert_eq!(
        result.config.unwrap().to_str().unwrap(),
        "/etc/tutor-client.json"
    );
}

#[test]
fn test_cli_missing_value() {
    let result = parse_args_from(args(&["--subject"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_unknown_flag() {
    let result = parse_args_from(args(&["--port", "3000"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_invalid_style() {
    let result = parse_args_from(args(&["profile", "--style", "telepathic"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let json = r#"{
        "api": {
            "base_url": "http://192.168.1.100:8000",
            "timeout_secs": 10
        },
        "student": {
            "default_id": "student_file",
            "identity_file": "/tmp/tutor/identity.json"
        },
        "practice": {
            "subject": "Biology",
            "topic": "Genetics",
            "difficulty": "easy",
            "count": 2
        },
        "logging": {
            "level": "debug"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.api.base_url, "http://192.168.1.100:8000");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.student.default_id, "student_file");
    assert_eq!(
        config.student.identity_file,
        Some(PathBuf::from("/tmp/tutor/identity.json"))
    );
    assert_eq!(config.practice.subject, "Biology");
    assert_eq!(config.practice.difficulty, Difficulty::Easy);
    assert_eq!(config.practice.count, 2);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_priority_cli_over_file() {
    let json = r#"{
        "api": { "base_url": "http://10.0.0.1:5000" },
        "logging": { "level": "warn" }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        api_url: Some("http://192.168.1.1:8080".to_string()),
        log_level: Some("trace".to_string()),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    // CLI values should win
    assert_eq!(config.api.base_url, "http://192.168.1.1:8080");
    assert_eq!(config.log_filter(), "trace");
}

#[test]
fn test_config_missing_file() {
    let args = Args {
        config: Some(PathBuf::from("/nonexistent/tutor-client.json")),
        ..Args::default()
    };

    assert!(Config::load(&args).is_err());
}

#[test]
fn test_cli_overrides_practice_defaults() {
    let json = r#"{ "practice": { "subject": "Physics", "topic": "Waves", "count": 4 } }"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let parsed = parse_args_from(args(&[
        "practice",
        "-c",
        file.path().to_str().unwrap(),
        "--topic",
        "Optics",
    ]))
    .unwrap();
    let config = Config::load(&parsed).unwrap();
    let request = parsed.problem_request(&config.default_problem_request());

    assert_eq!(request.subject, "Physics");
    assert_eq!(request.topic, "Optics");
    assert_eq!(request.count, 4);
}

#[test]
fn test_config_to_api_client() {
    let args = Args {
        api_url: Some("https://tutor.example.com/base".to_string()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    let client = config.to_api_client().unwrap();

    assert_eq!(client.base_url().host_str(), Some("tutor.example.com"));
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_partial_deserialization() {
    // Only specify some fields, others should use defaults
    let json = r#"{"api": {"timeout_secs": 99}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.api.timeout_secs, 99);
    assert_eq!(config.api.base_url, "http://127.0.0.1:8000"); // Default
    assert_eq!(config.practice.subject, "Mathematics"); // Default
}
