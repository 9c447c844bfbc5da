//! Credential file (`.env`) lookup.
//!
//! The file is parsed into a map rather than loaded into the process
//! environment; environment variables are treated as immutable at runtime.
//! Lookups check the process environment first, then the file, matching the
//! usual dotenv rule that existing variables are never overridden.

use std::collections::HashMap;
use std::path::Path;

use secrecy::SecretString;

use super::ConfigResult;

/// Linear personal API key.
pub const LINEAR_API_KEY: &str = "LINEAR_API_KEY";

/// Variable lookup consulted before the file.
pub type EnvLookup = fn(&str) -> Option<String>;

/// Reads the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parsed `.env` file.
#[derive(Debug, Clone)]
pub struct EnvFile {
    values: HashMap<String, String>,
    lookup: EnvLookup,
}

impl Default for EnvFile {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            lookup: process_env,
        }
    }
}

impl EnvFile {
    /// Parse the file at `path`. A missing file yields an empty set.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item?;
            values.insert(key, value);
        }
        tracing::debug!(path = %path.display(), keys = values.len(), "Loaded env file");
        Ok(Self {
            values,
            ..Self::default()
        })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Replace the process environment lookup.
    pub fn with_lookup(mut self, lookup: EnvLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Value from the file only.
    pub fn file_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Process environment first, then the file. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                self.file_value(key)
                    .filter(|v| !v.trim().is_empty())
                    .map(String::from)
            })
    }

    /// The Linear API key, if configured anywhere.
    pub fn linear_api_key(&self) -> Option<SecretString> {
        self.get(LINEAR_API_KEY).map(SecretString::from)
    }
}
