//! `UserPromptSubmit` payload.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Event name the host sends for prompt submissions.
pub const USER_PROMPT_SUBMIT: &str = "UserPromptSubmit";

/// JSON object the host writes to the hook's stdin.
///
/// Only `prompt` is required. The remaining fields are informational.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HookInput {
    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_event_name: Option<String>,
}

impl HookInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            session_id: None,
            transcript_path: None,
            cwd: None,
            hook_event_name: Some(USER_PROMPT_SUBMIT.into()),
        }
    }

    /// Parse and validate one payload.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let Some(object) = value.as_object() else {
            return Err(Error::InvalidInput("expected a JSON object".into()));
        };

        match object.get("prompt") {
            None => return Err(Error::InvalidInput("missing 'prompt' field".into())),
            Some(Value::String(p)) if p.is_empty() => {
                return Err(Error::InvalidInput("'prompt' is empty".into()));
            }
            Some(Value::String(_)) => {}
            Some(_) => return Err(Error::InvalidInput("'prompt' must be a string".into())),
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn is_prompt_submit(&self) -> bool {
        self.hook_event_name
            .as_deref()
            .is_none_or(|e| e == USER_PROMPT_SUBMIT)
    }
}
