pub mod config;
pub mod file_writer;
pub mod formatter;

use anyhow::{Context, Result};
use config::LoggingConfig;
use file_writer::FileWriter;
use formatter::LogFormat;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

fn output_layer<S, W>(writer: W, format: LogFormat, ansi: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(ansi)
        .with_timer(fmt::time::ChronoUtc::rfc_3339());

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Initialize logging system with the given configuration
///
/// Console output goes to stderr so reports written to stdout stay clean.
/// Fails if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init(config: LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let file_layer = match &config.file {
        Some(path) => {
            let writer = FileWriter::open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(output_layer(writer, config.format, false))
        }
        None => None,
    };
    let console_layer = config
        .console
        .then(|| output_layer(std::io::stderr, config.format, true));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Initialize logging with default configuration
pub fn init_default() -> Result<()> {
    init(LoggingConfig::default())
}

/// Initialize logging from environment variables and CLI arguments
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug`, then
/// `log_level`, then `info`.
pub fn init_from_args(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let level = if verbose {
        "debug".to_string()
    } else {
        log_level.unwrap_or_else(|| "info".to_string())
    };

    let config = LoggingConfig {
        level,
        file: log_file.or_else(config::env_log_file),
        console: true,
        format: config::env_log_format(),
    };

    init(config)
}
