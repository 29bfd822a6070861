use std::env;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Error type for telemetry initialisation failures.
///
/// This is intentionally lightweight so `eveprobe-telemetry` can be used
/// without depending on `eveprobe-core`. Callers can map this into their own
/// error types as needed.
#[derive(Debug)]
pub enum TelemetryError {
    /// Provided log level string could not be parsed.
    InvalidLevel(String),

    /// Failed to configure the subscriber (should be rare).
    SubscriberInit(String),
}

impl std::fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelemetryError::InvalidLevel(level) => {
                write!(f, "invalid log level: {}", level)
            }
            TelemetryError::SubscriberInit(msg) => write!(f, "failed to init telemetry: {}", msg),
        }
    }
}

impl std::error::Error for TelemetryError {}

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Initialise the global telemetry / logging subscriber.
///
/// This sets up a `tracing_subscriber` using `EnvFilter` and a formatted
/// output layer writing to **stderr**. Stdout stays untouched: it belongs to
/// the plugin protocol line the monitoring scheduler parses. Intended to be
/// called once at process startup, before anything else logs.
///
/// # Parameters
///
/// - `level`: Optional log level string. If `None`, the function will:
///   - Respect `RUST_LOG` if it is set, or
///   - Default to `"warn"` otherwise (a probe should stay quiet on healthy
///     runs).
///   If `Some(level)` is provided, it takes precedence over `RUST_LOG`.
///
/// # Examples
///
/// Basic usage with default level:
///
/// ```ignore
/// eveprobe_telemetry::init(None)?;
/// ```
///
/// Explicit level:
///
/// ```ignore
/// eveprobe_telemetry::init(Some("debug"))?;
/// ```
///
/// Respect `RUST_LOG` (when `level` is `None`):
///
/// ```ignore
/// // RUST_LOG=eveprobe_api=trace check_eve_ng ...
/// eveprobe_telemetry::init(None)?;
/// ```
pub fn init(level: Option<&str>) -> Result<()> {
    let filter = if let Some(level_str) = level {
        parse_level_filter(level_str)?
    } else if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("warn")
    };

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

    subscriber
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    Ok(())
}

/// Parse a simple level string into an `EnvFilter`.
///
/// Supports both plain levels ("info", "debug", etc.) and full `EnvFilter`
/// expressions (like "warn,eveprobe_api=debug").
///
/// The heuristic is:
/// - If the string parses cleanly as a `Level`, we use it as a simple
///   global filter (`EnvFilter::new(level_str)`).
/// - Otherwise, we treat the string as an `EnvFilter` expression and let
///   `EnvFilter::builder()` handle it.
fn parse_level_filter(level_str: &str) -> Result<EnvFilter> {
    if Level::from_str(level_str).is_ok() {
        return Ok(EnvFilter::new(level_str));
    }

    EnvFilter::builder()
        .parse(level_str)
        .map_err(|e| TelemetryError::InvalidLevel(format!("{} ({})", level_str, e)))
}
