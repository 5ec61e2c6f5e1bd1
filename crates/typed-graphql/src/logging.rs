//! Structured logging setup and redaction of sensitive request variables.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Keys scrubbed from logged variables unless configured otherwise.
pub const DEFAULT_REDACT_FIELDS: [&str; 5] =
    ["password", "api_key", "secret", "token", "authorization"];

const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    #[error("failed to initialise logging: {0}")]
    Init(String),
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "typed_graphql=debug").
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Variable keys whose values are never logged.
    pub redact_fields: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            redact_fields: DEFAULT_REDACT_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE);

        subscriber
            .with(json_layer)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))
    } else {
        let pretty_layer = fmt::layer()
            .with_ansi(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true);

        subscriber
            .with(pretty_layer)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))
    }
}

/// Replace the value of every key containing one of `fields` (case-insensitive).
#[must_use]
pub fn redact_sensitive(value: &Value, fields: &[String]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lowered = key.to_lowercase();
                    let redacted = if fields
                        .iter()
                        .any(|field| lowered.contains(&field.to_lowercase()))
                    {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_sensitive(val, fields)
                    };
                    (key.clone(), redacted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| redact_sensitive(item, fields))
                .collect(),
        ),
        other => other.clone(),
    }
}
