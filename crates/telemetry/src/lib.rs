//! Structured logging for appshell tools
//!
//! Diagnostics meant for the user go to stdout through `appshell-cli`.
//! Everything here is operational logging on stderr:
//! - `tracing` subscriber setup with an `EnvFilter`
//! - A session id correlating all events of one invocation
//! - A timer that logs how long an operation took

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Environment variable holding a log filter directive
pub const LOG_ENV: &str = "APPSHELL_LOG";

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_target(config.show_target))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .compact(),
            )
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `APPSHELL_LOG` is unset
    pub log_level: String,
    /// One JSON object per event instead of compact text
    pub json: bool,
    /// Include the event target in each line
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Map `-v` counts and `--quiet` to a filter level
    #[must_use]
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let log_level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        Self {
            log_level: log_level.to_string(),
            ..Self::default()
        }
    }

    /// Switch the stderr layer to JSON lines
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Timer for measuring operation duration
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Stop the timer and log the duration
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = self.name,
            duration_ms = duration.as_millis(),
            "Timer completed"
        );
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(TelemetryConfig::from_verbosity(0, false).log_level, "warn");
        assert_eq!(TelemetryConfig::from_verbosity(1, false).log_level, "info");
        assert_eq!(TelemetryConfig::from_verbosity(2, false).log_level, "debug");
        assert_eq!(TelemetryConfig::from_verbosity(9, false).log_level, "trace");
        assert_eq!(TelemetryConfig::from_verbosity(3, true).log_level, "error");
    }

    #[test]
    fn test_with_json_keeps_level() {
        let config = TelemetryConfig::from_verbosity(1, false).with_json(true);
        assert!(config.json);
        assert_eq!(config.log_level, "info");
        assert!(!TelemetryConfig::default().json);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(!id.is_empty());
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(id, session_id());
    }
}
