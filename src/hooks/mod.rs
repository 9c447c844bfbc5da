//! Hook entry point.
//!
//! One invocation reads a single JSON payload from stdin, runs the pipeline
//! over its `prompt` and writes the result to stdout. Any failure after the
//! prompt was parsed falls back to echoing the original prompt.

mod input;
mod rule;

pub use input::{HookInput, USER_PROMPT_SUBMIT};
pub use rule::{HookAction, HookRule};

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::config::{ClaudeHome, EnvLookup, HookSettings, process_env};
use crate::{Error, Pipeline};

/// A failed invocation, with the prompt to fall back to when one was parsed.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct HookError {
    pub original: Option<String>,
    #[source]
    pub source: Error,
}

impl HookError {
    pub fn unparsed(source: Error) -> Self {
        Self {
            original: None,
            source,
        }
    }

    pub fn with_prompt(original: impl Into<String>, source: Error) -> Self {
        Self {
            original: Some(original.into()),
            source,
        }
    }

    /// Text to emit instead of the processed prompt.
    pub fn fallback_output(&self) -> &str {
        self.original.as_deref().unwrap_or("")
    }

    pub fn has_prompt(&self) -> bool {
        self.original.is_some()
    }
}

/// Process one payload with an already built pipeline.
pub async fn run(raw: &str, pipeline: &Pipeline) -> Result<String, HookError> {
    let input = HookInput::parse(raw).map_err(HookError::unparsed)?;
    log_input(&input);

    match pipeline.run(&input.prompt).await {
        Ok(output) => Ok(output),
        Err(source) => Err(HookError::with_prompt(input.prompt, source)),
    }
}

/// Process one payload, building the pipeline from the configuration root.
///
/// `env` is consulted before the credential file. Settings and credential
/// errors fall back like processor errors.
pub async fn run_in(
    raw: &str,
    home: &ClaudeHome,
    env: EnvLookup,
) -> Result<String, HookError> {
    let input = HookInput::parse(raw).map_err(HookError::unparsed)?;
    log_input(&input);

    match build_and_run(home, &input.prompt, env).await {
        Ok(output) => Ok(output),
        Err(source) => Err(HookError::with_prompt(input.prompt, source)),
    }
}

/// Process one payload against the resolved configuration root.
pub async fn handle(raw: &str) -> Result<String, HookError> {
    let input = HookInput::parse(raw).map_err(HookError::unparsed)?;
    log_input(&input);

    let result = match ClaudeHome::resolve() {
        Ok(home) => build_and_run(&home, &input.prompt, process_env).await,
        Err(e) => Err(e.into()),
    };
    result.map_err(|source| HookError::with_prompt(input.prompt, source))
}

async fn build_and_run(home: &ClaudeHome, prompt: &str, env: EnvLookup) -> crate::Result<String> {
    let settings = HookSettings::load(&home.settings_path()).await?;
    let pipeline = Pipeline::from_settings_with_env(home, &settings, env)?;
    pipeline.run(prompt).await
}

fn log_input(input: &HookInput) {
    tracing::debug!(
        session_id = input.session_id.as_deref().unwrap_or("-"),
        event = input.hook_event_name.as_deref().unwrap_or("-"),
        len = input.prompt.len(),
        "Received prompt"
    );
    if !input.is_prompt_submit() {
        tracing::warn!(
            event = input.hook_event_name.as_deref().unwrap_or("-"),
            "Hook invoked for an unexpected event"
        );
    }
}

/// Read stdin to the end.
pub async fn read_stdin() -> std::io::Result<String> {
    let mut raw = String::new();
    tokio::io::stdin().read_to_string(&mut raw).await?;
    Ok(raw)
}

/// Write `text` to stdout as is, without a trailing newline.
pub async fn write_stdout(text: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}
