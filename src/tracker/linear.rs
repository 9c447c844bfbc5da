//! Linear GraphQL client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use super::{FetchError, IssueRecord, IssueTracker, NamedRef, TeamRef};
use crate::config::settings::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_LINEAR_ENDPOINT};

const ISSUE_QUERY: &str = r#"query Issue($id: String!) {
  issue(id: $id) {
    id
    identifier
    title
    description
    url
    priority
    priorityLabel
    estimate
    dueDate
    createdAt
    updatedAt
    state { name type }
    assignee { name email }
    team { key name }
    labels { nodes { name } }
  }
}"#;

const MAX_ERROR_BODY: usize = 512;

/// Linear API client implementing [`IssueTracker`].
pub struct LinearClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
}

impl LinearClient {
    /// Client for the public Linear API with the default timeout.
    pub fn new(api_key: SecretString) -> Result<Self, FetchError> {
        let endpoint = Url::parse(DEFAULT_LINEAR_ENDPOINT)
            .map_err(|e| FetchError::Decode(format!("invalid default endpoint: {}", e)))?;
        Self::with_endpoint(
            api_key,
            endpoint,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        )
    }

    pub fn with_endpoint(
        api_key: SecretString,
        endpoint: Url,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ai-dev-kit/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    fn auth_header(&self) -> Result<HeaderValue, FetchError> {
        let mut value = HeaderValue::from_str(self.api_key.expose_secret())
            .map_err(|_| FetchError::Unauthorized("API key is not a valid header value".into()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for LinearClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .finish()
    }
}

#[async_trait]
impl IssueTracker for LinearClient {
    fn name(&self) -> &str {
        "linear"
    }

    async fn fetch_issue(&self, identifier: &str) -> Result<IssueRecord, FetchError> {
        let body = serde_json::json!({
            "query": ISSUE_QUERY,
            "variables": { "id": identifier },
        });

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, self.auth_header()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FetchError::Unauthorized(truncate(&text)));
        }

        // Linear reports GraphQL errors with a 400 and a regular error body.
        let parsed = serde_json::from_str::<GraphQlResponse>(&text);

        if let Ok(ref payload) = parsed
            && !payload.errors.is_empty()
        {
            return Err(classify_errors(identifier, &payload.errors));
        }

        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: truncate(&text),
            });
        }

        let payload = parsed.map_err(|e| FetchError::Decode(e.to_string()))?;
        payload
            .data
            .and_then(|d| d.issue)
            .map(IssueRecord::from)
            .ok_or_else(|| FetchError::NotFound(identifier.to_string()))
    }
}

fn classify_errors(identifier: &str, errors: &[GraphQlError]) -> FetchError {
    let not_found = errors.iter().any(|e| {
        e.message.to_lowercase().contains("not found")
            || e.extensions
                .as_ref()
                .and_then(|x| x.code.as_deref())
                .is_some_and(|c| c.eq_ignore_ascii_case("entity_not_found"))
    });
    if not_found {
        return FetchError::NotFound(identifier.to_string());
    }

    let authentication = errors.iter().any(|e| {
        e.extensions
            .as_ref()
            .and_then(|x| x.code.as_deref())
            .is_some_and(|c| c.eq_ignore_ascii_case("authentication_error"))
    });
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    if authentication {
        FetchError::Unauthorized(message)
    } else {
        FetchError::Query(message)
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<IssueData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Deserialize)]
struct GraphQlErrorExtensions {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Deserialize)]
struct IssueData {
    issue: Option<RawIssue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIssue {
    id: String,
    identifier: String,
    title: String,
    description: Option<String>,
    #[serde(default)]
    url: String,
    priority: Option<f64>,
    priority_label: Option<String>,
    estimate: Option<f64>,
    due_date: Option<NaiveDate>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    state: Option<NamedRef>,
    assignee: Option<NamedRef>,
    team: Option<TeamRef>,
    labels: Option<LabelConnection>,
}

#[derive(Deserialize)]
struct LabelConnection {
    #[serde(default)]
    nodes: Vec<Label>,
}

#[derive(Deserialize)]
struct Label {
    name: String,
}

impl From<RawIssue> for IssueRecord {
    fn from(raw: RawIssue) -> Self {
        IssueRecord {
            id: raw.id,
            identifier: raw.identifier,
            title: raw.title,
            description: raw.description,
            url: raw.url,
            priority: raw.priority,
            priority_label: raw.priority_label,
            estimate: raw.estimate,
            state: raw.state,
            assignee: raw.assignee,
            team: raw.team,
            labels: raw
                .labels
                .map(|l| l.nodes.into_iter().map(|n| n.name).collect())
                .unwrap_or_default(),
            due_date: raw.due_date,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}
