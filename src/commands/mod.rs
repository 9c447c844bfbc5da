//! Command table - trailing `:token` markers mapped to prompt prefixes.

pub mod builtin;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult};

/// Sentinel every command token starts with.
pub const TOKEN_SENTINEL: char = ':';

/// Prefix and description of a command, as written in settings files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub prefix: String,
    #[serde(default)]
    pub description: String,
}

/// A registered command token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub token: String,
    pub prefix: String,
    pub description: String,
}

impl CommandEntry {
    pub fn new(
        token: impl Into<String>,
        prefix: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            prefix: prefix.into(),
            description: description.into(),
        }
    }

    pub fn from_definition(token: impl Into<String>, definition: &CommandDefinition) -> Self {
        Self::new(token, &definition.prefix, &definition.description)
    }
}

/// Immutable, ordered command registry.
///
/// Iteration order is definition order. Suffix matching walks the entries in
/// that order and stops at the first hit, so table order is the tie-break
/// when several tokens end the same prompt.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in tables.
    pub fn builtin() -> Self {
        Self {
            entries: builtin::all(),
        }
    }

    /// Built-in tables followed by user-defined commands.
    ///
    /// Invalid or duplicate user commands are skipped with a warning.
    pub fn with_user_commands(definitions: &BTreeMap<String, CommandDefinition>) -> Self {
        let mut registry = Self::builtin();
        for (token, definition) in definitions {
            if let Err(e) = registry.register(CommandEntry::from_definition(token, definition)) {
                tracing::warn!(token = %token, error = %e, "Ignoring user command");
            }
        }
        registry
    }

    pub fn register(&mut self, entry: CommandEntry) -> ConfigResult<()> {
        if !entry.token.starts_with(TOKEN_SENTINEL) || entry.token.len() < 2 {
            return Err(ConfigError::InvalidValue {
                key: format!("commands.{}", entry.token),
                message: format!("command tokens must start with '{}'", TOKEN_SENTINEL),
            });
        }
        if entry.token.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                key: format!("commands.{}", entry.token),
                message: "command tokens cannot contain whitespace".into(),
            });
        }
        if self.contains(&entry.token) {
            return Err(ConfigError::InvalidValue {
                key: format!("commands.{}", entry.token),
                message: "token is already registered".into(),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, token: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.token == token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    /// First entry, in registry order, whose token ends `text`.
    pub fn match_suffix(&self, text: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| text.ends_with(&e.token))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CommandEntry> for CommandRegistry {
    fn from_iter<I: IntoIterator<Item = CommandEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
