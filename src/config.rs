//! Explainer configuration, persisted as TOML.
//!
//! ```toml
//! max_duty_depth = 32
//! max_duties = 4096
//! source_language = "en"
//!
//! [fetch]
//! enabled = true
//! timeout_secs = 5
//! retries = 2
//! backoff_ms = 250
//! accept = "text/turtle"
//! preload = ["https://www.w3.org/ns/odrl/2/ODRL22.ttl"]
//!
//! [translation]
//! endpoint = "http://localhost:5000/translate"
//! timeout_secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_DUTIES};

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainConfig {
    /// Deepest allowed nesting of duties, remedies and consequences.
    #[serde(default = "default_max_duty_depth")]
    pub max_duty_depth: usize,
    /// Most duties, remedies and consequences built for one policy.
    #[serde(default = "default_max_duties")]
    pub max_duties: usize,
    /// Language the sentences are generated in.
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

/// Remote ontology fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// When false, labels come only from the dictionary and the policy graph.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    /// Extra attempts after a transport error or a 5xx answer.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Delay before the first retry; doubled on each further one.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    #[serde(default = "default_accept")]
    pub accept: String,
    /// Vocabulary documents merged into every policy graph.
    #[serde(default = "default_preload")]
    pub preload: Vec<String>,
}

/// Text translation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// LibreTranslate-compatible `/translate` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

fn default_max_duty_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_max_duties() -> usize {
    DEFAULT_MAX_DUTIES
}
fn default_source_language() -> String {
    "en".into()
}
fn default_true() -> bool {
    true
}
fn default_fetch_timeout() -> u64 {
    5
}
fn default_retries() -> u32 {
    2
}
fn default_backoff_ms() -> u64 {
    250
}
fn default_accept() -> String {
    "text/turtle".into()
}
fn default_preload() -> Vec<String> {
    vec!["https://www.w3.org/ns/odrl/2/ODRL22.ttl".into()]
}
fn default_translation_timeout() -> u64 {
    10
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            max_duty_depth: default_max_duty_depth(),
            max_duties: default_max_duties(),
            source_language: default_source_language(),
            fetch: FetchConfig::default(),
            translation: TranslationConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_fetch_timeout(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
            accept: default_accept(),
            preload: default_preload(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_translation_timeout(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

impl ExplainConfig {
    /// Configuration that never touches the network.
    pub fn offline() -> Self {
        let mut config = Self::default();
        config.fetch.enabled = false;
        config.fetch.preload.clear();
        config
    }

    /// Reject values no run could work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_duty_depth == 0 {
            return Err(ConfigError::Invalid {
                message: "max_duty_depth must be at least 1".into(),
            });
        }
        if self.max_duties == 0 {
            return Err(ConfigError::Invalid {
                message: "max_duties must be at least 1".into(),
            });
        }
        if self.source_language.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "source_language must not be empty".into(),
            });
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "fetch.timeout_secs must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}
