//! Installation into a host configuration directory.
//!
//! An adapter knows where a host expects hook executables, how a hook is
//! registered in the host's settings, and which support files it needs.

mod claude;

pub use claude::{ClaudeAdapter, ENV_TEMPLATE, HOOK_BINARY_NAME, VARIATIONS_TEMPLATE};

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::hooks::HookRule;
use crate::processors::ProcessorKind;

/// Options shared by every adapter.
#[derive(Debug, Clone, Default)]
pub struct AdapterConfig {
    /// Processors to enable; `None` enables all of them.
    pub processors: Option<Vec<String>>,
    /// Directory for the hook executable; defaults to the adapter's choice.
    pub target_dir: Option<PathBuf>,
    /// Overwrite templates and hook settings that already exist.
    pub force: bool,
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processors<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.processors = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(dir.into());
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Selected processor names in pipeline order. Unknown names are dropped
    /// with a warning.
    pub fn selected_processors(&self) -> Vec<&'static str> {
        let Some(requested) = &self.processors else {
            return ProcessorKind::names();
        };

        let mut kinds = Vec::new();
        for name in requested {
            match name.parse::<ProcessorKind>() {
                Ok(kind) => kinds.push(kind),
                Err(e) => tracing::warn!(error = %e, "Ignoring processor"),
            }
        }

        ProcessorKind::all()
            .iter()
            .filter(|k| kinds.contains(*k))
            .map(ProcessorKind::name)
            .collect()
    }
}

/// Outcome of an installation. Failures are reported here rather than as an
/// error so the files written before the failure stay visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallResult {
    pub success: bool,
    pub target_dir: PathBuf,
    pub files_created: Vec<PathBuf>,
    pub message: String,
}

#[async_trait]
pub trait IdeAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Directory the hook executable is installed into.
    fn install_path(&self) -> PathBuf;

    /// Settings entry that makes the host run the installed hook.
    fn hook_registration(&self) -> HookRule;

    async fn install(&self) -> InstallResult;
}
