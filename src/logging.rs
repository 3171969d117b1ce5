//! Logging initialization and configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor a configured level is available.
pub const DEFAULT_FILTER: &str = "tutor_client=info";

/// Expand a bare level (`debug`) into a directive scoped to this crate.
fn directive(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("tutor_client={}", level)
    }
}

fn filter_for(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => {
            EnvFilter::try_new(directive(level)).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Initialize the logging system.
///
/// Uses the `RUST_LOG` environment variable for filtering. If not set,
/// defaults to `tutor_client=info`. Output goes to stderr.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init() {
    tracing_subscriber::registry()
        .with(filter_for(None))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Try to initialize the logging system with an explicit filter.
///
/// `level` accepts either a bare level (`debug`) or a full filter
/// directive (`tutor_client=debug,reqwest=warn`). An unparsable value
/// falls back to the default filter.
pub fn try_init_with(level: Option<&str>) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()
}

/// Try to initialize the logging system.
///
/// Returns `Ok(())` if successful, or `Err` if logging has already been
/// initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    try_init_with(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_idempotent() {
        // Whichever test runs first wins; the rest get an error.
        let _ = try_init();
        let _ = try_init();
    }

    #[test]
    fn test_try_init_with_level() {
        let _ = try_init_with(Some("debug"));
        tracing::debug!("debug after explicit level");
    }

    #[test]
    fn test_directive_scopes_bare_levels() {
        assert_eq!(directive("debug"), "tutor_client=debug");
        assert_eq!(directive("reqwest=warn"), "reqwest=warn");
        assert_eq!(directive("info,hyper=off"), "info,hyper=off");
    }

    #[test]
    fn test_invalid_level_falls_back() {
        // Building the filter must not panic on garbage input.
        let _ = filter_for(Some("=[not a filter"));
    }
}
