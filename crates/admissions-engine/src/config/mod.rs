use std::env;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different deployment stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEnvironment {
    Development,
    Test,
    Production,
}

impl EngineEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the normalization engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub environment: EngineEnvironment,
    pub reference: ReferenceConfig,
    pub batch: BatchConfig,
    pub telemetry: TelemetryConfig,
}

impl EngineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = EngineEnvironment::from_str(
            &env::var("ADMISSIONS_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let reference = ReferenceConfig {
            undergraduate_aliases: path_var("ADMISSIONS_UNDERGRAD_ALIASES"),
            graduate_aliases: path_var("ADMISSIONS_GRADUATE_ALIASES"),
            rank_phrases: path_var("ADMISSIONS_RANK_PHRASES"),
        };

        let workers = match env::var("ADMISSIONS_WORKERS") {
            Ok(value) if !value.trim().is_empty() => Some(parse_workers(&value)?),
            _ => None,
        };

        let log_level = env::var("ADMISSIONS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            reference,
            batch: BatchConfig { workers },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn parse_workers(value: &str) -> Result<NonZeroUsize, ConfigError> {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| ConfigError::InvalidWorkers {
            value: value.to_string(),
        })
}

/// Optional replacements for the bundled reference tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceConfig {
    pub undergraduate_aliases: Option<PathBuf>,
    pub graduate_aliases: Option<PathBuf>,
    pub rank_phrases: Option<PathBuf>,
}

/// Parallelism for batch normalization. `None` leaves rayon's default pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchConfig {
    pub workers: Option<NonZeroUsize>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidWorkers { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidWorkers { value } => write!(
                f,
                "ADMISSIONS_WORKERS must be a positive integer, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
