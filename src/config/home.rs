//! Configuration root resolution.

use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the configuration root.
pub const CLAUDE_HOME_ENV: &str = "CLAUDE_HOME";

const HOOKS_DIR: &str = "hooks";
const PROMPTS_DIR: &str = "prompts";
const ENV_FILE: &str = ".env";
const SETTINGS_FILE: &str = "ai-dev-kit.json";
const HOST_SETTINGS_FILE: &str = "settings.json";
const VARIATIONS_TEMPLATE: &str = "variations.md";

/// The per-user configuration directory and the well-known paths inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudeHome {
    root: PathBuf,
}

impl ClaudeHome {
    /// Resolve from `CLAUDE_HOME`, falling back to `<home>/.claude`.
    pub fn resolve() -> ConfigResult<Self> {
        Self::resolve_from(std::env::var_os(CLAUDE_HOME_ENV).map(PathBuf::from))
    }

    /// Resolve with an explicit override instead of reading the environment.
    pub fn resolve_from(override_root: Option<PathBuf>) -> ConfigResult<Self> {
        if let Some(root) = override_root.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self::from_root(root));
        }

        directories::UserDirs::new()
            .map(|dirs| Self::from_root(dirs.home_dir().join(".claude")))
            .ok_or(ConfigError::HomeUnavailable)
    }

    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.root.join(HOOKS_DIR)
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.root.join(PROMPTS_DIR)
    }

    pub fn env_path(&self) -> PathBuf {
        self.root.join(ENV_FILE)
    }

    /// Hook settings (`ai-dev-kit.json`).
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    /// Host application settings (`settings.json`).
    pub fn host_settings_path(&self) -> PathBuf {
        self.root.join(HOST_SETTINGS_FILE)
    }

    pub fn variations_template_path(&self) -> PathBuf {
        self.prompts_dir().join(VARIATIONS_TEMPLATE)
    }
}
