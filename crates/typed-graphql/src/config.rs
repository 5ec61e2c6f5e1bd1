//! Client profiles loaded from TOML.
//!
//! ```toml
//! endpoint = "https://api.example.com/graphql"
//! timeout_secs = 15
//! selection_depth = 3
//! model_namespaces = ["billing"]
//! bearer_token_env = "EXAMPLE_TOKEN"
//!
//! [depth_overrides]
//! Invoice = 5
//!
//! [headers]
//! x-client = "reporting"
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LoggingConfig;
use crate::selection::DEFAULT_SELECTION_DEPTH;
use crate::validate::{CatalogOracle, ModelCatalog};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading or applying a profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read profile {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse profile TOML: {0}")]
    Toml(String),

    #[error("invalid profile field `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error("environment variable `{0}` is not set")]
    MissingEnv(String),

    /// Header name or value rejected by the HTTP layer.
    #[error("invalid header `{name}`: {message}")]
    Header { name: String, message: String },

    /// HTTP client construction failed.
    #[error("failed to build HTTP client: {0}")]
    Http(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

/// Declarative client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientProfile {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Selection depth used when a result type has no override.
    #[serde(default = "default_selection_depth")]
    pub selection_depth: usize,
    /// Per-model selection depth, keyed by model name.
    #[serde(default)]
    pub depth_overrides: BTreeMap<String, usize>,
    /// Namespaces whose models the schema validator may resolve.
    #[serde(default)]
    pub model_namespaces: Vec<String>,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Name of the environment variable holding a bearer token.
    #[serde(default)]
    pub bearer_token_env: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_selection_depth() -> usize {
    DEFAULT_SELECTION_DEPTH
}

impl ClientProfile {
    /// Parse a profile from TOML and validate it.
    pub fn parse_str(input: &str) -> Result<Self, ConfigError> {
        let profile: Self = toml::from_str(input)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read, parse and validate a profile file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::parse_str(&text)
    }

    /// Check internal consistency. Fails closed on the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "endpoint",
                message: "must be an http:// or https:// URL".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                message: "must be > 0".into(),
            });
        }
        if self.selection_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "selection_depth",
                message: "must be > 0".into(),
            });
        }
        if let Some((name, _)) = self.depth_overrides.iter().find(|(_, depth)| **depth == 0) {
            return Err(ConfigError::Invalid {
                field: "depth_overrides",
                message: format!("depth for `{name}` must be > 0"),
            });
        }
        if self.model_namespaces.iter().any(|ns| ns.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "model_namespaces",
                message: "namespaces must not be blank".into(),
            });
        }
        if let Some(var) = &self.bearer_token_env {
            if var.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "bearer_token_env",
                    message: "must name an environment variable".into(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Type oracle over `catalog` that only resolves models registered under
    /// one of `model_namespaces`.
    #[must_use]
    pub fn oracle(&self, catalog: ModelCatalog) -> CatalogOracle {
        CatalogOracle::new(catalog, self.model_namespaces.iter().cloned())
    }

    /// Resolve the bearer token from the environment, if one is configured.
    pub fn bearer_token(&self) -> Result<Option<String>, ConfigError> {
        self.bearer_token_env
            .as_ref()
            .map(|var| std::env::var(var).map_err(|_| ConfigError::MissingEnv(var.clone())))
            .transpose()
    }
}
