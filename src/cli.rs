//! Command-line interface for tutor-client.
//!
//! Parsed with lexopt; the first positional argument names the command.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::api::LearningStyle;
use crate::practice::{Difficulty, ProblemRequest};

/// Default number of conversation messages shown by `history`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// What the client should do once a session is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Show the current session.
    #[default]
    Status,
    /// Replace the current session with a new one.
    NewSession,
    /// Show dashboard data and analytics.
    Dashboard,
    /// Show analytics and the session's progress report.
    Progress,
    /// Explain a concept.
    Explain,
    /// Generate a problem, read a solution, evaluate it.
    Practice,
    /// List subjects.
    Subjects,
    /// List topics of a subject.
    Topics,
    /// Show conversation history.
    History,
    /// Show or update the student profile.
    Profile,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Status => "status",
            Command::NewSession => "new-session",
            Command::Dashboard => "dashboard",
            Command::Progress => "progress",
            Command::Explain => "explain",
            Command::Practice => "practice",
            Command::Subjects => "subjects",
            Command::Topics => "topics",
            Command::History => "history",
            Command::Profile => "profile",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "status" => Command::Status,
            "new-session" => Command::NewSession,
            "dashboard" => Command::Dashboard,
            "progress" => Command::Progress,
            "explain" | "learn" => Command::Explain,
            "practice" => Command::Practice,
            "subjects" => Command::Subjects,
            "topics" => Command::Topics,
            "history" => Command::History,
            "profile" => Command::Profile,
            other => return Err(ArgsError::UnknownCommand(other.to_string())),
        })
    }
}

/// Command-line arguments.
#[derive(Debug, Clone)]
pub struct Args {
    /// Command to run.
    pub command: Command,
    /// API base URL (overrides config file).
    pub api_url: Option<String>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Student id to use instead of the persisted/default one.
    pub student_id: Option<String>,
    /// Path of the persisted identity file.
    pub identity_file: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Subject for `explain`, `practice` and `topics`.
    pub subject: Option<String>,
    /// Topic for `explain` and `practice`.
    pub topic: Option<String>,
    /// Difficulty for `explain`, `practice` and `profile`.
    pub difficulty: Option<Difficulty>,
    /// Number of problems the server should generate.
    pub count: Option<u8>,
    /// Learning style for `explain` and `profile`.
    pub style: Option<LearningStyle>,
    /// Solution for `practice`; read from stdin when absent.
    pub solution: Option<String>,
    /// Number of messages for `history`.
    pub limit: u32,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::default(),
            api_url: None,
            config: None,
            student_id: None,
            identity_file: None,
            log_level: None,
            subject: None,
            topic: None,
            difficulty: None,
            count: None,
            style: None,
            solution: None,
            limit: DEFAULT_HISTORY_LIMIT,
            version: false,
            help: false,
        }
    }
}

impl Args {
    /// Build a problem request, filling gaps from the given defaults.
    pub fn problem_request(&self, defaults: &ProblemRequest) -> ProblemRequest {
        ProblemRequest::new(
            self.subject.clone().unwrap_or_else(|| defaults.subject.clone()),
            self.topic.clone().unwrap_or_else(|| defaults.topic.clone()),
            self.difficulty.unwrap_or(defaults.difficulty),
        )
        .with_count(self.count.unwrap_or(defaults.count))
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut command_seen = false;
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('u') | Long("api-url") => {
                result.api_url = Some(parser.value()?.parse()?);
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("student") => {
                result.student_id = Some(parser.value()?.parse()?);
            }
            Short('i') | Long("identity-file") => {
                result.identity_file = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Long("subject") => {
                result.subject = Some(parser.value()?.parse()?);
            }
            Long("topic") => {
                result.topic = Some(parser.value()?.parse()?);
            }
            Short('d') | Long("difficulty") => {
                let value: String = parser.value()?.parse()?;
                result.difficulty = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("difficulty", value))?,
                );
            }
            Short('n') | Long("count") => {
                let value: String = parser.value()?.parse()?;
                let count: u8 = value
                    .parse()
                    .ok()
                    .filter(|n| (1..=ProblemRequest::MAX_COUNT).contains(n))
                    .ok_or(ArgsError::InvalidValue("count", value))?;
                result.count = Some(count);
            }
            Long("style") => {
                let value: String = parser.value()?.parse()?;
                result.style = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("style", value))?,
                );
            }
            Long("solution") => {
                result.solution = Some(parser.value()?.parse()?);
            }
            Long("limit") => {
                let value: String = parser.value()?.parse()?;
                result.limit = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidValue("limit", value))?;
            }
            Value(val) if !command_seen => {
                result.command = val.string()?.parse()?;
                command_seen = true;
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"tutor-client {version}
Client for the Educational Tutor API

USAGE:
    tutor-client [OPTIONS] [COMMAND]

COMMANDS:
    status          Show the current session [default]
    new-session     Start a new session (optionally for --student)
    dashboard       Show dashboard data and analytics
    progress        Show analytics and the session progress report
    explain         Explain --subject/--topic
    practice        Generate a problem, answer it, get feedback
    subjects        List available subjects
    topics          List topics of --subject
    history         Show the session conversation history
    profile         Show the profile; --difficulty/--style update it

OPTIONS:
    -u, --api-url <URL>         API base URL [default: http://127.0.0.1:8000]
    -c, --config <FILE>         Path to configuration file (JSON)
    -s, --student <ID>          Student id
    -i, --identity-file <FILE>  Where the student/session ids are persisted
    -l, --log-level <LVL>       Log level (error, warn, info, debug, trace)
        --subject <NAME>        Subject
        --topic <NAME>          Topic
    -d, --difficulty <LVL>      easy, medium or hard
    -n, --count <N>             Problems to generate (1-5)
        --style <STYLE>         visual, auditory or kinesthetic
        --solution <TEXT>       Solution for practice (default: read stdin)
        --limit <N>             Messages shown by history [default: 50]
    -h, --help                  Print help
    -V, --version               Print version

ENVIRONMENT VARIABLES:
    TUTOR_API_URL           API base URL (overrides config)
    TUTOR_TIMEOUT_SECS      Request timeout in seconds (overrides config)
    TUTOR_STUDENT_ID        Student id used when none is persisted
    TUTOR_IDENTITY_FILE     Identity file path (overrides config)
    TUTOR_LOG_LEVEL         Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXAMPLES:
    # Connect and show the session
    tutor-client

    # Practice quadratic equations, answering on stdin
    tutor-client practice --subject Mathematics --topic "Quadratic Equations" -d hard

    # Against a remote API
    tutor-client -u https://tutor.example.com dashboard
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("tutor-client {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unknown command name.
    UnknownCommand(String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnknownCommand(cmd) => {
                write!(f, "unknown command: '{}'", cmd)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("tutor-client")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert_eq!(result.command, Command::Status);
        assert!(result.api_url.is_none());
        assert_eq!(result.limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_command() {
        let result = parse_args_from(args(&["dashboard"])).unwrap();
        assert_eq!(result.command, Command::Dashboard);

        let result = parse_args_from(args(&["learn"])).unwrap();
        assert_eq!(result.command, Command::Explain);
    }

    #[test]
    fn test_unknown_command() {
        let result = parse_args_from(args(&["teleport"]));
        assert!(matches!(result, Err(ArgsError::UnknownCommand(_))));
    }

    #[test]
    fn test_second_positional_rejected() {
        let result = parse_args_from(args(&["status", "extra"]));
        assert!(matches!(result, Err(ArgsError::UnexpectedArgument(_))));
    }

    #[test]
    fn test_practice_options() {
        let result = parse_args_from(args(&[
            "practice",
            "--subject",
            "Physics",
            "--topic",
            "Kinematics",
            "-d",
            "HARD",
            "-n",
            "2",
        ]))
        .unwrap();
        assert_eq!(result.command, Command::Practice);
        assert_eq!(result.subject.as_deref(), Some("Physics"));
        assert_eq!(result.topic.as_deref(), Some("Kinematics"));
        assert_eq!(result.difficulty, Some(Difficulty::Hard));
        assert_eq!(result.count, Some(2));
    }

    #[test]
    fn test_invalid_difficulty() {
        let result = parse_args_from(args(&["-d", "extreme"]));
        assert!(matches!(result, Err(ArgsError::InvalidValue("difficulty", _))));
    }

    #[test]
    fn test_count_out_of_range() {
        assert!(parse_args_from(args(&["-n", "0"])).is_err());
        assert!(parse_args_from(args(&["-n", "6"])).is_err());
        assert!(parse_args_from(args(&["-n", "many"])).is_err());
    }

    #[test]
    fn test_api_url_and_student() {
        let result =
            parse_args_from(args(&["-u", "http://10.0.0.5:8000", "-s", "student_42"])).unwrap();
        assert_eq!(result.api_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(result.student_id.as_deref(), Some("student_42"));
    }

    #[test]
    fn test_identity_and_config_files() {
        let result = parse_args_from(args(&["-c", "/etc/tutor.json", "-i", "/tmp/id.json"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/tutor.json")));
        assert_eq!(result.identity_file, Some(PathBuf::from("/tmp/id.json")));
    }

    #[test]
    fn test_help_flag() {
        let result = parse_args_from(args(&["-h"])).unwrap();
        assert!(result.help);

        let result = parse_args_from(args(&["--help"])).unwrap();
        assert!(result.help);
    }

    #[test]
    fn test_version_flag() {
        let result = parse_args_from(args(&["-V"])).unwrap();
        assert!(result.version);
    }

    #[test]
    fn test_style_and_limit() {
        let result = parse_args_from(args(&["--style", "kinesthetic", "--limit", "5"])).unwrap();
        assert_eq!(result.style, Some(LearningStyle::Kinesthetic));
        assert_eq!(result.limit, 5);
        assert!(parse_args_from(args(&["--limit", "-3"])).is_err());
    }

    #[test]
    fn test_problem_request_defaults() {
        let defaults = ProblemRequest::new("Mathematics", "Algebra", Difficulty::Medium);
        let parsed = parse_args_from(args(&["practice", "--topic", "Geometry"])).unwrap();
        let request = parsed.problem_request(&defaults);
        assert_eq!(request.subject, "Mathematics");
        assert_eq!(request.topic, "Geometry");
        assert_eq!(request.difficulty, Difficulty::Medium);
        assert_eq!(request.count, 1);
    }
}
