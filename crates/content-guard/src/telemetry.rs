//! Tracing subscriber setup shared by the server and the command line tools.

use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Where formatted log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// Long-running service output.
    Stdout,
    /// Command line runs, keeping stdout free for results such as `--json`.
    Stderr,
}

impl LogSink {
    fn writer(self) -> BoxMakeWriter {
        match self {
            LogSink::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogSink::Stderr => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

/// Which setting supplied a log filter directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    Environment,
    Config,
}

impl FilterSource {
    fn label(self) -> &'static str {
        match self {
            FilterSource::Environment => "RUST_LOG",
            FilterSource::Config => "APP_LOG_LEVEL",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid {} filter '{value}'", .origin.label())]
    Filter {
        origin: FilterSource,
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("subscriber already installed or unusable: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Build the log filter. A non-blank `RUST_LOG` value replaces the configured level.
pub fn log_filter(
    rust_log: Option<&str>,
    config: &TelemetryConfig,
) -> Result<EnvFilter, TelemetryError> {
    let (origin, value) = match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => (FilterSource::Environment, value),
        None => (FilterSource::Config, config.log_level.trim()),
    };

    EnvFilter::try_new(value).map_err(|source| TelemetryError::Filter {
        origin,
        value: value.to_string(),
        source,
    })
}

/// Install the global subscriber, writing compact lines to `sink`.
pub fn init(config: &TelemetryConfig, sink: LogSink) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(sink.writer())
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
