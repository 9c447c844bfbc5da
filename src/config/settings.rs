//! Hook settings file (`ai-dev-kit.json`).
//!
//! ```json
//! {
//!   "processors": [
//!     { "name": "linear", "enabled": false },
//!     { "name": "command", "enabled": true }
//!   ],
//!   "linear": { "timeoutSecs": 5 },
//!   "commands": {
//!     ":fr": { "prefix": "Traduire en français : ", "description": "French" }
//!   }
//! }
//! ```
//!
//! Every field is optional; processors not listed are enabled.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{ConfigError, ConfigResult};
use crate::commands::CommandDefinition;

pub const DEFAULT_LINEAR_ENDPOINT: &str = "https://api.linear.app/graphql";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSettings {
    #[serde(default)]
    pub processors: Vec<ProcessorSettings>,

    #[serde(default)]
    pub linear: LinearSettings,

    #[serde(default)]
    pub commands: BTreeMap<String, CommandDefinition>,
}

/// Enable flag for one processor, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorSettings {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl ProcessorSettings {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

impl Default for LinearSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl LinearSettings {
    pub fn endpoint_url(&self) -> ConfigResult<Url> {
        let raw = self.endpoint.as_deref().unwrap_or(DEFAULT_LINEAR_ENDPOINT);
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
            key: "linear.endpoint".into(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "linear.endpoint".into(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    pub fn timeout(&self) -> ConfigResult<Duration> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "linear.timeoutSecs".into(),
                message: "timeout must be at least one second".into(),
            });
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }
}

impl HookSettings {
    /// Load settings; a missing file yields the defaults.
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub async fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Settings enabling exactly the named processors out of `available`.
    pub fn with_enabled<S: AsRef<str>>(available: &[&str], enabled: &[S]) -> Self {
        let processors = available
            .iter()
            .map(|name| {
                ProcessorSettings::new(*name, enabled.iter().any(|e| e.as_ref() == *name))
            })
            .collect();
        Self {
            processors,
            ..Default::default()
        }
    }

    /// Enable flag for `name`; unlisted processors are enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.processors
            .iter()
            .rev()
            .find(|p| p.name == name)
            .map(|p| p.enabled)
            .unwrap_or(true)
    }
}
