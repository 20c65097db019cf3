//! Logging setup for Quanta tools
//!
//! Console output goes to stderr so results on stdout stay machine-readable.
//! Format: `2025-01-01T00:00:00.000000Z [INFO] message key=value`.

use quanta_errors::{QuantaError, QuantaResult};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    fmt::{
        self,
        format::{FormatEvent, FormatFields, Writer},
        FmtContext,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Level used when neither configuration nor RUST_LOG says otherwise
pub const DEFAULT_LEVEL: &str = "warn";

/// Logging section of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive (`info`, `quanta_calc=debug`, ...)
    pub level: String,
    /// One JSON object per event instead of the bracketed console format
    pub json: bool,
    /// Colored level tags on the console format
    pub ansi: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            json: false,
            ansi: true,
        }
    }
}

impl LoggingSettings {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

/// Timestamp, bracketed level, then the event fields
pub struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::TRACE => "\x1b[35m",
                Level::DEBUG => "\x1b[34m",
                Level::INFO => "\x1b[32m",
                Level::WARN => "\x1b[33m",
                Level::ERROR => "\x1b[31m",
            };
            write!(writer, "{}{}\x1b[0m ", color, format_level(&level))?;
        } else {
            write!(writer, "{} ", format_level(&level))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Resolve the filter: RUST_LOG when set, otherwise the configured level.
pub fn build_filter(settings: &LoggingSettings) -> QuantaResult<EnvFilter> {
    match std::env::var("RUST_LOG") {
        Ok(directive) if !directive.trim().is_empty() => parse_filter(&directive),
        _ => parse_filter(&settings.level),
    }
}

fn parse_filter(directive: &str) -> QuantaResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| {
        QuantaError::InvalidConfig {
            field: "logging.level".to_string(),
            reason: format!("invalid log filter '{}': {}", directive, e),
        }
    })
}

/// Install the global subscriber.
///
/// Fails when a subscriber is already installed or the filter does not parse.
pub fn init(settings: &LoggingSettings) -> QuantaResult<()> {
    let filter = build_filter(settings)?;

    let layer = if settings.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_ansi(settings.ansi)
            .with_writer(std::io::stderr)
            .event_format(BracketedLevelFormat)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| QuantaError::Logging(e.to_string()))
}
