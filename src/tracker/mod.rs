//! Issue tracker capability and the issue record it returns.

pub mod linear;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use linear::LinearClient;

/// Errors returned by an [`IssueTracker`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Tracker answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or error message
        message: String,
    },

    /// Credential rejected
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// GraphQL-level error
    #[error("Query failed: {0}")]
    Query(String),

    /// No issue with this identifier
    #[error("Issue not found: {0}")]
    NotFound(String),

    /// Request did not complete in time
    #[error("Request timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Http(_)
                | FetchError::Timeout(_)
                | FetchError::Api {
                    status: 429 | 500..=599,
                    ..
                }
        )
    }
}

/// Something that can look up an issue by identifier.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Tracker name for logging
    fn name(&self) -> &str;

    async fn fetch_issue(&self, identifier: &str) -> Result<IssueRecord, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    pub key: String,
    pub name: String,
}

/// A work item as inserted into prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: String,
    pub identifier: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl IssueRecord {
    pub fn new(
        id: impl Into<String>,
        identifier: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            identifier: identifier.into(),
            title: title.into(),
            description: None,
            url: String::new(),
            priority: None,
            priority_label: None,
            estimate: None,
            state: None,
            assignee: None,
            team: None,
            labels: Vec::new(),
            due_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Two-space indented JSON.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
