use crate::logging::formatter::LogFormat;
use std::path::PathBuf;

/// Environment variable naming an append-mode log file
pub const LOG_FILE_ENV: &str = "ACE_LOG_FILE";

/// Environment variable selecting `text` or `json` output
pub const LOG_FORMAT_ENV: &str = "ACE_LOG_FORMAT";

/// Configuration for logging system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level or filter directive (error, warn, info, debug, trace)
    pub level: String,
    /// Path to log file (None = no file logging)
    pub file: Option<PathBuf>,
    /// Log to stderr (true) or only to file (false)
    pub console: bool,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            file: env_log_file(),
            console: true,
            format: env_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn new(
        level: impl Into<String>,
        file: Option<PathBuf>,
        console: bool,
        format: LogFormat,
    ) -> Self {
        Self {
            level: level.into(),
            file,
            console,
            format,
        }
    }
}

pub(crate) fn env_log_file() -> Option<PathBuf> {
    std::env::var(LOG_FILE_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub(crate) fn env_log_format() -> LogFormat {
    std::env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}
