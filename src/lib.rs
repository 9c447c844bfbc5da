//! # ai-dev-kit
//!
//! Prompt preprocessing hooks for Claude Code.
//!
//! The host application runs the `ai-dev-kit hook` binary on every prompt
//! submission. The prompt goes through a small chain of processors before it
//! reaches the model:
//!
//! - issue references such as `linear(TEAM-123)` or `eng(42)` are replaced by
//!   the issue fetched from Linear,
//! - a trailing command token such as `:zh` or `:plan` is expanded into its
//!   prefix,
//! - a `v(3)` marker wraps the prompt in the variations template.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_dev_kit::{ClaudeHome, HookSettings, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ai_dev_kit::Error> {
//!     let home = ClaudeHome::resolve()?;
//!     let settings = HookSettings::load(&home.settings_path()).await?;
//!     let pipeline = Pipeline::from_settings(&home, &settings)?;
//!
//!     let prompt = pipeline.run("Design API v(5) :plan").await?;
//!     println!("{}", prompt);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod commands;
pub mod config;
pub mod hooks;
pub mod install;
pub mod observability;
pub mod pipeline;
pub mod processors;
pub mod tracker;

pub use commands::{CommandEntry, CommandRegistry};
pub use config::{ClaudeHome, ConfigError, EnvFile, HookSettings};
pub use hooks::{HookError, HookInput};
pub use install::{AdapterConfig, ClaudeAdapter, IdeAdapter, InstallResult};
pub use pipeline::{Pipeline, ProcessorEntry};
pub use processors::{
    CommandProcessor, IssueReferenceProcessor, Processor, ProcessorKind, VariationProcessor,
};
pub use tracker::{FetchError, IssueRecord, IssueTracker, LinearClient};

/// Error type for ai-dev-kit operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Hook payload is missing a usable prompt.
    #[error("Invalid hook input: {0}")]
    InvalidInput(String),

    /// Variation template could not be read.
    #[error("Failed to read template {path}: {source}")]
    Template {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Issue tracker request failed.
    #[error("Issue tracker error: {0}")]
    Tracker(#[from] tracker::FetchError),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Installation step failed.
    #[error("Install failed at {step}: {message}")]
    Install { step: &'static str, message: String },
}

impl Error {
    pub fn install(step: &'static str, message: impl Into<String>) -> Self {
        Error::Install {
            step,
            message: message.into(),
        }
    }
}

/// Result type for ai-dev-kit operations.
pub type Result<T> = std::result::Result<T, Error>;
