//! Ordered processor chain.
//!
//! ```text
//! raw prompt ─▶ linear ─▶ command ─▶ variation ─▶ final prompt
//! ```
//!
//! The order matters: a command prefix becomes part of the instruction the
//! variation template wraps, and issue JSON is inserted before command
//! suffixes are detected.

use std::sync::Arc;

use crate::commands::CommandRegistry;
use crate::config::{ClaudeHome, EnvFile, EnvLookup, HookSettings, process_env};
use crate::processors::{
    CommandProcessor, IssueReferenceProcessor, Processor, ProcessorKind, VariationProcessor,
};
use crate::tracker::{IssueTracker, LinearClient};

/// One processor with its enable flag.
#[derive(Clone)]
pub struct ProcessorEntry {
    pub name: String,
    pub processor: Arc<dyn Processor>,
    pub enabled: bool,
}

impl ProcessorEntry {
    pub fn new(processor: Arc<dyn Processor>, enabled: bool) -> Self {
        Self {
            name: processor.name().to_string(),
            processor,
            enabled,
        }
    }
}

impl std::fmt::Debug for ProcessorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorEntry")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    entries: Vec<ProcessorEntry>,
}

impl Pipeline {
    pub fn new(entries: Vec<ProcessorEntry>) -> Self {
        Self { entries }
    }

    /// Standard pipeline for a configuration root.
    ///
    /// Reads the credential file; the issue processor only gets a tracker
    /// when `LINEAR_API_KEY` is set.
    pub fn from_settings(home: &ClaudeHome, settings: &HookSettings) -> crate::Result<Self> {
        Self::from_settings_with_env(home, settings, process_env)
    }

    /// Like [`Pipeline::from_settings`], resolving variables through `lookup`
    /// before the credential file.
    ///
    /// Nothing Linear-specific is read or validated while the `linear`
    /// processor is disabled.
    pub fn from_settings_with_env(
        home: &ClaudeHome,
        settings: &HookSettings,
        lookup: EnvLookup,
    ) -> crate::Result<Self> {
        if !settings.is_enabled(ProcessorKind::Linear.name()) {
            return Self::with_tracker(home, settings, None);
        }

        let env = EnvFile::load(&home.env_path())?.with_lookup(lookup);
        let tracker: Option<Arc<dyn IssueTracker>> = match env.linear_api_key() {
            Some(key) => {
                let client = LinearClient::with_endpoint(
                    key,
                    settings.linear.endpoint_url()?,
                    settings.linear.timeout()?,
                )?;
                Some(Arc::new(client))
            }
            None => {
                tracing::debug!("LINEAR_API_KEY not set, issue references disabled");
                None
            }
        };

        Self::with_tracker(home, settings, tracker)
    }

    /// Standard pipeline with an explicit tracker.
    pub fn with_tracker(
        home: &ClaudeHome,
        settings: &HookSettings,
        tracker: Option<Arc<dyn IssueTracker>>,
    ) -> crate::Result<Self> {
        for p in &settings.processors {
            if p.name.parse::<ProcessorKind>().is_err() {
                tracing::warn!(processor = %p.name, "Unknown processor in settings, ignoring");
            }
        }

        let registry = Arc::new(CommandRegistry::with_user_commands(&settings.commands));
        let mut entries = Vec::with_capacity(ProcessorKind::all().len());

        for kind in ProcessorKind::all() {
            let enabled = settings.is_enabled(kind.name());
            let processor: Arc<dyn Processor> = match kind {
                ProcessorKind::Linear => match tracker.clone() {
                    Some(t) if enabled => Arc::new(
                        IssueReferenceProcessor::new(t).with_timeout(settings.linear.timeout()?),
                    ),
                    _ => Arc::new(IssueReferenceProcessor::disabled()),
                },
                ProcessorKind::Command => Arc::new(CommandProcessor::new(registry.clone())),
                ProcessorKind::Variation => {
                    Arc::new(VariationProcessor::new(home.variations_template_path()))
                }
            };
            entries.push(ProcessorEntry::new(processor, enabled));
        }

        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[ProcessorEntry] {
        &self.entries
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ProcessorEntry> {
        self.entries.iter().filter(|e| e.enabled)
    }

    /// Run every enabled processor in order. The first error aborts the run.
    pub async fn run(&self, prompt: &str) -> crate::Result<String> {
        let mut current = prompt.to_string();
        for entry in self.enabled() {
            current = entry.processor.process(&current).await.inspect_err(|e| {
                tracing::debug!(processor = %entry.name, error = %e, "Processor failed");
            })?;
            tracing::trace!(processor = %entry.name, len = current.len(), "Processor done");
        }
        Ok(current)
    }
}
