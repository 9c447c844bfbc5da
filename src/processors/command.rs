//! Command suffix expansion.
//!
//! `Hello World :zh` becomes `将以下内容翻译成中文：Hello World`.

use std::sync::Arc;

use async_trait::async_trait;

use super::Processor;
use crate::commands::CommandRegistry;

pub struct CommandProcessor {
    registry: Arc<CommandRegistry>,
}

impl CommandProcessor {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn builtin() -> Self {
        Self::new(Arc::new(CommandRegistry::builtin()))
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Expand a trailing command token.
    ///
    /// Returns `prompt` untouched when no token ends the trimmed prompt or
    /// when nothing precedes the token.
    pub fn apply(&self, prompt: &str) -> String {
        let trimmed = prompt.trim();

        let Some(entry) = self.registry.match_suffix(trimmed) else {
            return prompt.to_string();
        };

        let task = trimmed[..trimmed.len() - entry.token.len()].trim();
        if task.is_empty() {
            return prompt.to_string();
        }

        tracing::debug!(token = %entry.token, "Expanding command");
        format!("{}{}", entry.prefix, task)
    }
}

#[async_trait]
impl Processor for CommandProcessor {
    fn name(&self) -> &str {
        "command"
    }

    async fn process(&self, prompt: &str) -> crate::Result<String> {
        Ok(self.apply(prompt))
    }
}
