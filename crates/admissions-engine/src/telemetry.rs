use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow the configured level. Everything else is held
/// at `warn` unless the level is already a full filter expression.
const ENGINE_TARGETS: &[&str] = &["admissions_engine", "admissions_normalizer"];

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directives: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directives, .. } => {
                write!(f, "invalid ADMISSIONS_LOG_LEVEL '{directives}'")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "log subscriber already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` wins over the configured
/// level. Output goes to stderr so stdout stays free for records.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

fn configured_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    let directives = filter_directives(level);
    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::InvalidFilter {
        directives,
        source,
    })
}

/// Expands a bare level ("debug") into per-crate directives so dependency
/// noise stays at `warn`. Anything with a target or a list is used verbatim.
fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let mut directives = String::from("warn");
    for target in ENGINE_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_engine_crates() {
        assert_eq!(
            filter_directives(" debug "),
            "warn,admissions_engine=debug,admissions_normalizer=debug"
        );
    }

    #[test]
    fn explicit_directives_pass_through() {
        assert_eq!(filter_directives("info,rayon=debug"), "info,rayon=debug");
        assert_eq!(filter_directives("admissions_engine=trace"), "admissions_engine=trace");
    }

    #[test]
    fn rejects_malformed_level() {
        match configured_filter("admissions_engine=verbose") {
            Err(TelemetryError::InvalidFilter { directives, .. }) => {
                assert_eq!(directives, "admissions_engine=verbose")
            }
            other => panic!("expected filter error, got {other:?}"),
        }
    }
}
