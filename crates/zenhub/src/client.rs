//! GraphQL transport and the [`IssueTracker`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use automation::{
    AutomationError, IssueNumber, IssueTracker, RepositoryGhId, RepositoryPage, RetryPolicy,
    TrackedIssue,
};
use reqwest::header::{self, HeaderMap};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::wire::{
    merge_issue_page, GraphQlResponse, IssueByInfoData, WorkspaceData, ISSUE_BY_INFO,
    WORKSPACE_REPOSITORIES,
};

/// Public ZenHub GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://api.zenhub.com/public/graphql";

pub(crate) const SERVICE: &str = "ZenHub";
const USER_AGENT: &str = concat!("pr-automation/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    operation_name: &'a str,
    query: &'a str,
    variables: Value,
}

/// [`IssueTracker`] backed by one ZenHub workspace.
#[derive(Clone)]
pub struct ZenHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    workspace_id: String,
}

impl std::fmt::Debug for ZenHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZenHubClient")
            .field("api_url", &self.api_url)
            .field("workspace_id", &self.workspace_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ZenHubClient {
    pub fn new(
        token: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Result<Self, AutomationError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AutomationError::Configuration {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            workspace_id: workspace_id.into(),
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    async fn query<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, AutomationError> {
        let request = GraphQlRequest {
            operation_name,
            query,
            variables,
        };
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| AutomationError::external(SERVICE, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, retry_after, &body));
        }

        let envelope: GraphQlResponse<T> = response.json().await.map_err(|e| {
            crate::wire::non_retryable(format!("unexpected response body: {e}"))
        })?;
        envelope.into_data()
    }
}

#[async_trait]
impl IssueTracker for ZenHubClient {
    #[instrument(skip(self), fields(workspace = %self.workspace_id))]
    async fn get_issue(
        &self,
        repository: RepositoryGhId,
        number: IssueNumber,
    ) -> Result<TrackedIssue, AutomationError> {
        let mut tracked: Option<TrackedIssue> = None;
        let mut cursor: Option<String> = None;
        loop {
            let variables = json!({
                "repositoryGhId": repository,
                "issueNumber": number,
                "after": cursor,
            });
            let data: IssueByInfoData = self
                .query("IssueByInfo", ISSUE_BY_INFO, variables)
                .await?;
            let page = data.into_page()?;
            if page.is_none() {
                debug!(?cursor, "Issue unknown to the tracker");
            }
            match merge_issue_page(&mut tracked, page)? {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        let tracked = tracked.unwrap_or_default();
        debug!(
            events = tracked.timeline.len(),
            estimated = tracked.estimate.is_some(),
            "Fetched tracker issue"
        );
        Ok(tracked)
    }

    #[instrument(skip(self), fields(workspace = %self.workspace_id))]
    async fn workspace_repositories(
        &self,
        cursor: Option<&str>,
    ) -> Result<RepositoryPage, AutomationError> {
        let variables = json!({
            "workspaceId": self.workspace_id,
            "after": cursor,
        });
        let data: WorkspaceData = self
            .query("WorkspaceRepositories", WORKSPACE_REPOSITORIES, variables)
            .await?;
        data.into_page(&self.workspace_id)
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn status_error(status: StatusCode, retry_after: Option<Duration>, body: &str) -> AutomationError {
    AutomationError::ExternalApi {
        service: SERVICE.to_string(),
        message: format!("{status}: {}", body.trim()),
        retry: RetryPolicy::for_http_status(status.as_u16(), retry_after),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
