//! Configuration root, credential file and hook settings.
//!
//! Everything lives under one directory, `$CLAUDE_HOME` or `~/.claude`:
//!
//! ```text
//! ~/.claude/
//! ├── .env                 LINEAR_API_KEY=...
//! ├── ai-dev-kit.json      hook settings (optional)
//! ├── settings.json        host settings, hook registration
//! ├── hooks/ai-dev-kit     installed hook binary
//! └── prompts/variations.md
//! ```

pub mod env;
pub mod home;
pub mod settings;

pub use env::{EnvFile, EnvLookup, LINEAR_API_KEY, process_env};
pub use home::ClaudeHome;
pub use settings::{HookSettings, LinearSettings, ProcessorSettings};

use thiserror::Error;

/// Errors that can occur in configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The key with invalid value
        key: String,
        /// Error message
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed `.env` file
    #[error("Invalid env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// Neither CLAUDE_HOME nor a user home directory is available
    #[error("Cannot locate the configuration directory: set CLAUDE_HOME")]
    HomeUnavailable,
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
