//! Prompt processors.
//!
//! A processor takes one prompt string and returns one prompt string. When its
//! marker is absent it returns the input unchanged; absence is never an error.

pub mod command;
pub mod issue;
pub mod variation;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

pub use command::CommandProcessor;
pub use issue::{IssueReference, IssueReferenceProcessor};
pub use variation::{VariationProcessor, VariationRequest};

/// A single text transform in the pipeline.
#[async_trait]
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    async fn process(&self, prompt: &str) -> crate::Result<String>;
}

/// The processors the pipeline knows about, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessorKind {
    /// Issue references, `linear(TEAM-1)` and `team(1)`
    Linear,
    /// Trailing command tokens, `:zh`
    Command,
    /// Variation marker, `v(3)`
    Variation,
}

impl ProcessorKind {
    /// All kinds in pipeline order.
    pub fn all() -> &'static [ProcessorKind] {
        &[
            ProcessorKind::Linear,
            ProcessorKind::Command,
            ProcessorKind::Variation,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProcessorKind::Linear => "linear",
            ProcessorKind::Command => "command",
            ProcessorKind::Variation => "variation",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(ProcessorKind::name).collect()
    }
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProcessorKind {
    type Err = crate::config::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::config::ConfigError::InvalidValue {
                key: "processors".into(),
                message: format!(
                    "unknown processor '{}', expected one of: {}",
                    s,
                    Self::names().join(", ")
                ),
            })
    }
}
