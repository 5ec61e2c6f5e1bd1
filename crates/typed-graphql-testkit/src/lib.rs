//! Test support for the typed GraphQL client crates.
//!
//! - [`init_test_tracing`] installs a test-writer subscriber once per process.
//! - [`LogCapture`] collects one structured JSON entry per test and checks
//!   that every entry carries the fields downstream log tooling expects.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::sync::{Arc, Mutex, Once, PoisonError};

use chrono::DateTime;
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Keys every structured test log entry must carry.
pub const REQUIRED_KEYS: [&str; 7] = [
    "timestamp",
    "level",
    "test_name",
    "module",
    "phase",
    "correlation_id",
    "result",
];

/// Initialize tracing for tests.
///
/// Safe to call from every test; only the first call installs the subscriber.
/// Uses `RUST_LOG` when set, otherwise `info,typed_graphql=debug`.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,typed_graphql=debug"));

        // Another harness may have installed a global subscriber already.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .compact(),
            )
            .try_init();
    });
}

/// Rejected structured log entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogEntryError {
    #[error("log entry must be a JSON object")]
    NotAnObject,
    #[error("log entry is missing `{0}`")]
    MissingKey(&'static str),
    #[error("log entry timestamp is not RFC 3339: {0}")]
    BadTimestamp(String),
    #[error("log entry result must be pass, fail or skip, got {0}")]
    BadResult(String),
}

/// In-memory sink for structured per-test log entries.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    entries: Arc<Mutex<Vec<Value>>>,
}

impl LogCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record an entry.
    pub fn push_value(&self, entry: &Value) -> Result<(), LogEntryError> {
        validate_entry(entry)?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        Ok(())
    }

    /// Recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Value> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Entries as JSON lines.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        self.entries()
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Assert that at least one entry was recorded and all are well formed.
    ///
    /// # Panics
    ///
    /// Panics if the capture is empty or an entry is malformed.
    pub fn assert_valid(&self) {
        let entries = self.entries();
        assert!(!entries.is_empty(), "no structured test log entries recorded");
        for entry in &entries {
            if let Err(err) = validate_entry(entry) {
                panic!("invalid structured test log entry {entry}: {err}");
            }
        }
    }
}

fn validate_entry(entry: &Value) -> Result<(), LogEntryError> {
    let map = entry.as_object().ok_or(LogEntryError::NotAnObject)?;
    for key in REQUIRED_KEYS {
        if !map.contains_key(key) {
            return Err(LogEntryError::MissingKey(key));
        }
    }
    let timestamp = map["timestamp"].as_str().unwrap_or_default();
    DateTime::parse_from_rfc3339(timestamp)
        .map_err(|_| LogEntryError::BadTimestamp(map["timestamp"].to_string()))?;
    match map["result"].as_str() {
        Some("pass" | "fail" | "skip") => Ok(()),
        _ => Err(LogEntryError::BadResult(map["result"].to_string())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn entry() -> Value {
        json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": "info",
            "test_name": "t",
            "module": "m",
            "phase": "verify",
            "correlation_id": "c",
            "result": "pass",
        })
    }

    #[test]
    fn accepts_complete_entries() {
        let capture = LogCapture::new();
        capture.push_value(&entry()).expect("valid");
        capture.assert_valid();
        assert_eq!(capture.to_jsonl().lines().count(), 1);
    }

    #[test]
    fn rejects_missing_keys_and_bad_values() {
        let capture = LogCapture::new();
        let mut missing = entry();
        missing.as_object_mut().expect("object").remove("phase");
        assert_eq!(
            capture.push_value(&missing),
            Err(LogEntryError::MissingKey("phase"))
        );

        let mut bad = entry();
        bad["result"] = json!("maybe");
        assert!(matches!(capture.push_value(&bad), Err(LogEntryError::BadResult(_))));

        let mut stale = entry();
        stale["timestamp"] = json!("yesterday");
        assert!(matches!(capture.push_value(&stale), Err(LogEntryError::BadTimestamp(_))));
        assert!(capture.entries().is_empty());
    }

    #[test]
    fn shared_between_clones() {
        let capture = LogCapture::new();
        capture.clone().push_value(&entry()).expect("valid");
        assert_eq!(capture.entries().len(), 1);
    }
}
