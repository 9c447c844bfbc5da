//! Issue reference resolution.
//!
//! Two marker forms are recognised:
//! - `linear(TEAM-123)` - the captured text is the identifier
//! - `4t(1111)` - shorthand for `4t-1111`
//!
//! Each resolved marker is replaced by the issue serialized as pretty JSON.
//! Markers whose lookup fails stay in the prompt verbatim. At most
//! [`MAX_CONCURRENT_FETCHES`] lookups are in flight; a transient failure is
//! retried once within the same timeout.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use regex::Regex;

use super::Processor;
use crate::config::settings::DEFAULT_FETCH_TIMEOUT_SECS;
use crate::tracker::{FetchError, IssueTracker};

const QUALIFIED_PREFIX: &str = "linear";

/// Upper bound on concurrent tracker requests for one prompt.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

fn qualified_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"linear\((.*?)\)").expect("valid linear regex"))
}

fn shorthand_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z0-9]+)\((\d+)\)").expect("valid shorthand regex"))
}

/// A marker found in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReference {
    pub raw_marker: String,
    pub identifier: String,
    start: usize,
    end: usize,
}

impl IssueReference {
    /// All markers of `prompt`, ordered by position.
    ///
    /// Shorthand markers overlapping a `linear(...)` marker are dropped, as are
    /// shorthand prefixes starting with `linear`.
    pub fn scan(prompt: &str) -> Vec<Self> {
        let mut refs: Vec<Self> = qualified_regex()
            .captures_iter(prompt)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(Self {
                    raw_marker: whole.as_str().to_string(),
                    identifier: caps.get(1)?.as_str().to_string(),
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect();

        let shorthand: Vec<Self> = shorthand_regex()
            .captures_iter(prompt)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let prefix = caps.get(1)?.as_str();
                if prefix.starts_with(QUALIFIED_PREFIX) {
                    return None;
                }
                let overlaps = refs
                    .iter()
                    .any(|r| whole.start() < r.end && r.start < whole.end());
                if overlaps {
                    return None;
                }
                Some(Self {
                    raw_marker: whole.as_str().to_string(),
                    identifier: format!("{}-{}", prefix, caps.get(2)?.as_str()),
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect();

        refs.extend(shorthand);
        refs.sort_by_key(|r| r.start);
        refs
    }
}

pub struct IssueReferenceProcessor {
    tracker: Option<Arc<dyn IssueTracker>>,
    timeout: Duration,
}

impl IssueReferenceProcessor {
    /// Processor backed by `tracker`.
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self {
            tracker: Some(tracker),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    /// Processor without a tracker; every prompt passes through.
    pub fn disabled() -> Self {
        Self {
            tracker: None,
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.tracker.is_some()
    }

    async fn resolve(&self, tracker: &dyn IssueTracker, identifier: &str) -> Option<String> {
        if identifier.trim().is_empty() {
            return None;
        }

        let fetch = async {
            match tracker.fetch_issue(identifier).await {
                Err(e) if e.is_transient() => {
                    tracing::debug!(identifier = %identifier, error = %e, "Retrying issue fetch");
                    tracker.fetch_issue(identifier).await
                }
                other => other,
            }
        };

        let result = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        match result.map(|issue| issue.to_pretty_json()) {
            Ok(Ok(json)) => Some(json),
            Ok(Err(e)) => {
                tracing::warn!(identifier = %identifier, error = %e, "Failed to serialize issue");
                None
            }
            Err(FetchError::NotFound(_)) => {
                tracing::debug!(tracker = tracker.name(), identifier = %identifier, "Issue not found");
                None
            }
            Err(e) => {
                tracing::warn!(
                    tracker = tracker.name(),
                    identifier = %identifier,
                    error = %e,
                    "Failed to fetch issue"
                );
                None
            }
        }
    }

    /// Replace every resolvable marker of `prompt`.
    pub async fn expand(&self, prompt: &str) -> String {
        let Some(tracker) = self.tracker.as_deref() else {
            return prompt.to_string();
        };

        let refs = IssueReference::scan(prompt);
        if refs.is_empty() {
            return prompt.to_string();
        }

        let mut identifiers: Vec<&str> = Vec::new();
        for r in &refs {
            if !identifiers.contains(&r.identifier.as_str()) {
                identifiers.push(&r.identifier);
            }
        }

        let pending: Vec<_> = identifiers
            .iter()
            .map(|id| self.resolve(tracker, id))
            .collect();
        let fetched: Vec<Option<String>> = stream::iter(pending)
            .buffered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;
        let resolved: HashMap<&str, String> = identifiers
            .into_iter()
            .zip(fetched)
            .filter_map(|(id, json)| json.map(|j| (id, j)))
            .collect();

        // Substitute by literal marker text: the first successful expansion
        // of a marker wins for every occurrence of that text.
        let mut by_marker: HashMap<&str, &str> = HashMap::new();
        for r in &refs {
            if let Some(json) = resolved.get(r.identifier.as_str()) {
                by_marker.entry(r.raw_marker.as_str()).or_insert(json.as_str());
            }
        }

        let mut result = String::with_capacity(prompt.len());
        let mut cursor = 0;
        for r in &refs {
            result.push_str(&prompt[cursor..r.start]);
            match by_marker.get(r.raw_marker.as_str()) {
                Some(json) => result.push_str(json),
                None => result.push_str(&r.raw_marker),
            }
            cursor = r.end;
        }
        result.push_str(&prompt[cursor..]);

        tracing::debug!(
            markers = refs.len(),
            resolved = by_marker.len(),
            "Expanded issue references"
        );
        result
    }
}

#[async_trait]
impl Processor for IssueReferenceProcessor {
    fn name(&self) -> &str {
        "linear"
    }

    async fn process(&self, prompt: &str) -> crate::Result<String> {
        Ok(self.expand(prompt).await)
    }
}
