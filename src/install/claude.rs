//! Claude Code adapter.
//!
//! Layout after installation:
//!
//! ```text
//! <root>/hooks/ai-dev-kit          hook executable
//! <root>/prompts/variations.md     variation template
//! <root>/.env                      credential template (never overwritten)
//! <root>/ai-dev-kit.json           processor selection
//! <root>/settings.json             hooks.UserPromptSubmit registration
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{AdapterConfig, IdeAdapter, InstallResult};
use crate::config::{ClaudeHome, HookSettings};
use crate::hooks::{HookRule, USER_PROMPT_SUBMIT};
use crate::processors::ProcessorKind;
use crate::Error;

pub const HOOK_BINARY_NAME: &str = "ai-dev-kit";
pub const VARIATIONS_TEMPLATE: &str = include_str!("../../templates/prompts/variations.md");
pub const ENV_TEMPLATE: &str = include_str!("../../templates/env.template");

fn step_error(step: &'static str) -> impl Fn(std::io::Error) -> Error {
    move |e| Error::install(step, e.to_string())
}

pub struct ClaudeAdapter {
    home: ClaudeHome,
    config: AdapterConfig,
    executable: Option<PathBuf>,
}

impl ClaudeAdapter {
    pub fn new(home: ClaudeHome, config: AdapterConfig) -> Self {
        Self {
            home,
            config,
            executable: None,
        }
    }

    /// Install this file instead of the running executable.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn hook_binary_path(&self) -> PathBuf {
        self.install_path().join(HOOK_BINARY_NAME)
    }

    fn hook_command(&self) -> String {
        let binary = self.hook_binary_path().display().to_string();
        if binary.contains(char::is_whitespace) {
            format!("\"{}\" hook", binary)
        } else {
            format!("{} hook", binary)
        }
    }

    async fn run_steps(&self, files: &mut Vec<PathBuf>) -> crate::Result<()> {
        let hooks_dir = self.install_path();
        tokio::fs::create_dir_all(&hooks_dir)
            .await
            .map_err(step_error("directories"))?;
        tokio::fs::create_dir_all(self.home.prompts_dir())
            .await
            .map_err(step_error("directories"))?;

        self.install_binary(files).await?;

        write_file(
            &self.home.variations_template_path(),
            VARIATIONS_TEMPLATE,
            self.config.force,
            files,
        )
        .await
        .map_err(step_error("templates"))?;

        write_file(&self.home.env_path(), ENV_TEMPLATE, false, files)
            .await
            .map_err(step_error("env"))?;

        self.write_hook_settings(files).await?;
        self.register_hook(files).await
    }

    async fn install_binary(&self, files: &mut Vec<PathBuf>) -> crate::Result<()> {
        let source = match &self.executable {
            Some(path) => path.clone(),
            None => std::env::current_exe().map_err(step_error("binary"))?,
        };
        let dest = self.hook_binary_path();

        if same_file(&source, &dest).await {
            tracing::debug!(path = %dest.display(), "Hook binary already in place");
            return Ok(());
        }

        tokio::fs::copy(&source, &dest)
            .await
            .map_err(step_error("binary"))?;
        tracing::info!(from = %source.display(), to = %dest.display(), "Installed hook binary");
        files.push(dest);
        Ok(())
    }

    async fn write_hook_settings(&self, files: &mut Vec<PathBuf>) -> crate::Result<()> {
        let path = self.home.settings_path();
        let exists = path.exists();
        if exists && !self.config.force {
            tracing::info!(path = %path.display(), "Keeping existing hook settings");
            return Ok(());
        }

        let selected = self.config.selected_processors();
        let fresh = HookSettings::with_enabled(&ProcessorKind::names(), &selected);

        // Forced reinstall only resets processor flags.
        let settings = if exists {
            match HookSettings::load(&path).await {
                Ok(existing) => HookSettings {
                    processors: fresh.processors,
                    ..existing
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Replacing unreadable hook settings");
                    fresh
                }
            }
        } else {
            fresh
        };

        settings
            .save(&path)
            .await
            .map_err(|e| Error::install("hook settings", e.to_string()))?;
        files.push(path);
        Ok(())
    }

    async fn register_hook(&self, files: &mut Vec<PathBuf>) -> crate::Result<()> {
        let path = self.home.host_settings_path();

        let mut settings = if path.exists() {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(step_error("settings"))?;
            serde_json::from_str(&content)
                .map_err(|e| Error::install("settings", format!("invalid settings.json: {}", e)))?
        } else {
            json!({})
        };

        if !merge_registration(&mut settings, &self.hook_registration())? {
            tracing::info!(path = %path.display(), "Hook already registered");
            return Ok(());
        }

        let content = serde_json::to_string_pretty(&settings)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(step_error("settings"))?;
        files.push(path);
        Ok(())
    }

    fn success_message(&self) -> String {
        format!(
            "Installed ai-dev-kit into {}.\n\
             Next steps:\n  \
             1. Restart Claude Code.\n  \
             2. (Optional) Set LINEAR_API_KEY in {} to expand issue references.",
            self.install_path().display(),
            self.home.env_path().display(),
        )
    }
}

#[async_trait]
impl IdeAdapter for ClaudeAdapter {
    fn name(&self) -> &str {
        "claude"
    }

    fn install_path(&self) -> PathBuf {
        self.config
            .target_dir
            .clone()
            .unwrap_or_else(|| self.home.hooks_dir())
    }

    fn hook_registration(&self) -> HookRule {
        HookRule::command(self.hook_command())
    }

    async fn install(&self) -> InstallResult {
        let mut files = Vec::new();
        let outcome = self.run_steps(&mut files).await;

        let (success, message) = match outcome {
            Ok(()) => (true, self.success_message()),
            Err(e) => {
                tracing::error!(error = %e, "Installation failed");
                (false, e.to_string())
            }
        };

        InstallResult {
            success,
            target_dir: self.install_path(),
            files_created: files,
            message,
        }
    }
}

/// Add `rule` under `hooks.UserPromptSubmit` unless an entry already runs the
/// same command. Returns whether `settings` changed.
pub fn merge_registration(settings: &mut Value, rule: &HookRule) -> crate::Result<bool> {
    let invalid = |what: &str| Error::install("settings", format!("{} is not a JSON object", what));

    let root = settings
        .as_object_mut()
        .ok_or_else(|| invalid("settings.json"))?;
    let hooks = root
        .entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| invalid("hooks"))?;
    let rules = hooks
        .entry(USER_PROMPT_SUBMIT)
        .or_insert_with(|| json!([]))
        .as_array_mut()
        .ok_or_else(|| {
            Error::install("settings", "hooks.UserPromptSubmit is not a JSON array")
        })?;

    let commands: Vec<&str> = rule.hooks.iter().filter_map(|a| a.command_line()).collect();
    let registered = rules
        .iter()
        .filter_map(|v| serde_json::from_value::<HookRule>(v.clone()).ok())
        .any(|existing| commands.iter().all(|c| existing.runs(c)));
    if registered {
        return Ok(false);
    }

    rules.push(serde_json::to_value(rule)?);
    Ok(true)
}

async fn write_file(
    path: &Path,
    content: &str,
    overwrite: bool,
    files: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    if path.exists() && !overwrite {
        tracing::info!(path = %path.display(), "Keeping existing file");
        return Ok(());
    }
    tokio::fs::write(path, content).await?;
    files.push(path.to_path_buf());
    Ok(())
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (
        tokio::fs::canonicalize(a).await,
        tokio::fs::canonicalize(b).await,
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
