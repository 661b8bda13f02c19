//! GraphQL documents and response shapes, and their conversion into domain types.

use automation::{
    AutomationError, Estimate, IssueRef, RepoRef, RepositoryGhId, RepositoryPage, RetryPolicy,
    TimelineEvent, TimelineEventKind, Timestamp, TrackedIssue, WorkspaceRepository,
};
use serde::Deserialize;

use crate::client::SERVICE;

pub(crate) const ISSUE_BY_INFO: &str = r#"
query IssueByInfo($repositoryGhId: Int!, $issueNumber: Int!, $after: String) {
  issueByInfo(repositoryGhId: $repositoryGhId, issueNumber: $issueNumber) {
    estimate { value }
    timelineItems(first: 100, after: $after) {
      nodes { id key createdAt data }
      pageInfo { hasNextPage endCursor }
    }
  }
}"#;

pub(crate) const WORKSPACE_REPOSITORIES: &str = r#"
query WorkspaceRepositories($workspaceId: ID!, $after: String) {
  workspace(id: $workspaceId) {
    repositoriesConnection(first: 100, after: $after) {
      nodes { ghId name }
      pageInfo { hasNextPage endCursor }
    }
  }
}"#;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

impl<T> GraphQlResponse<T> {
    /// Returns `data`, or the reported errors when the server sent any.
    pub(crate) fn into_data(self) -> Result<T, AutomationError> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(non_retryable(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| non_retryable("response carried neither data nor errors"))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    nodes: Vec<T>,
    page_info: PageInfo,
}

// ---------------------------------------------------------------------------
// issueByInfo
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueByInfoData {
    issue_by_info: Option<IssueNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    estimate: Option<EstimateNode>,
    timeline_items: Connection<TimelineItemNode>,
}

#[derive(Deserialize)]
struct EstimateNode {
    value: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineItemNode {
    id: String,
    key: String,
    created_at: Timestamp,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct LinkPayload {
    issue: Option<IssueRef>,
    #[serde(alias = "repository")]
    repo: Option<RepoRef>,
}

/// One page of an issue's timeline.
pub(crate) struct IssuePage {
    pub estimate: Option<Estimate>,
    pub timeline: Vec<TimelineEvent>,
    pub page_info: PageInfo,
}

impl IssueByInfoData {
    /// `None` when the tracker does not know the issue.
    pub(crate) fn into_page(self) -> Result<Option<IssuePage>, AutomationError> {
        let Some(issue) = self.issue_by_info else {
            return Ok(None);
        };
        let estimate = match issue.estimate {
            Some(node) => Some(Estimate::new(node.value).ok_or_else(|| {
                non_retryable(format!("invalid estimate value {}", node.value))
            })?),
            None => None,
        };
        let timeline = issue
            .timeline_items
            .nodes
            .into_iter()
            .map(TimelineItemNode::into_event)
            .collect::<Result<_, _>>()?;
        Ok(Some(IssuePage {
            estimate,
            timeline,
            page_info: issue.timeline_items.page_info,
        }))
    }
}

/// Folds one timeline page into the issue assembled so far and returns the
/// cursor of the next page to fetch.
///
/// The estimate comes from the first page. A missing page (the tracker no
/// longer knows the issue) ends pagination and keeps what was collected.
pub(crate) fn merge_issue_page(
    tracked: &mut Option<TrackedIssue>,
    page: Option<IssuePage>,
) -> Result<Option<String>, AutomationError> {
    let Some(page) = page else {
        return Ok(None);
    };
    match tracked {
        Some(issue) => issue.timeline.extend(page.timeline),
        None => {
            *tracked = Some(TrackedIssue {
                estimate: page.estimate,
                timeline: page.timeline,
            })
        }
    }
    match (page.page_info.has_next_page, page.page_info.end_cursor) {
        (true, Some(next)) => Ok(Some(next)),
        (true, None) => Err(AutomationError::inconsistency(
            "timeline reports a next page without a cursor",
        )),
        (false, _) => Ok(None),
    }
}

impl TimelineItemNode {
    fn into_event(self) -> Result<TimelineEvent, AutomationError> {
        let kind = event_kind(&self.key);
        // Payloads of kinds we do not act on have arbitrary shapes.
        let payload = match kind {
            TimelineEventKind::Other => None,
            _ => Some(
                serde_json::from_value::<LinkPayload>(self.data).map_err(|e| {
                    non_retryable(format!("malformed payload of timeline item {}: {e}", self.id))
                })?,
            ),
        };
        let (issue, repo) = payload.map_or((None, None), |p| (p.issue, p.repo));
        Ok(TimelineEvent {
            id: self.id,
            kind,
            created_at: self.created_at,
            issue,
            repo,
        })
    }
}

/// Maps a timeline key such as `issue.connect_pr_to_issue` to its kind.
pub(crate) fn event_kind(key: &str) -> TimelineEventKind {
    match key.strip_prefix("issue.").unwrap_or(key) {
        "connect_pr_to_issue" => TimelineEventKind::ConnectPrToIssue,
        "disconnect_pr_from_issue" => TimelineEventKind::DisconnectPrFromIssue,
        "add_issue_to_epic" => TimelineEventKind::AddIssueToEpic,
        "remove_issue_from_epic" => TimelineEventKind::RemoveIssueFromEpic,
        _ => TimelineEventKind::Other,
    }
}

// ---------------------------------------------------------------------------
// workspace.repositoriesConnection
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub(crate) struct WorkspaceData {
    workspace: Option<WorkspaceNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceNode {
    repositories_connection: Connection<RepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    gh_id: RepositoryGhId,
    name: String,
}

impl WorkspaceData {
    pub(crate) fn into_page(self, workspace_id: &str) -> Result<RepositoryPage, AutomationError> {
        let workspace = self.workspace.ok_or_else(|| AutomationError::Configuration {
            message: format!("ZenHub workspace {workspace_id} not found"),
        })?;
        let connection = workspace.repositories_connection;
        Ok(RepositoryPage {
            repositories: connection
                .nodes
                .into_iter()
                .map(|n| WorkspaceRepository {
                    gh_id: n.gh_id,
                    name: n.name,
                })
                .collect(),
            has_next_page: connection.page_info.has_next_page,
            end_cursor: connection.page_info.end_cursor,
        })
    }
}

pub(crate) fn non_retryable(message: impl Into<String>) -> AutomationError {
    AutomationError::ExternalApi {
        service: SERVICE.to_string(),
        message: message.into(),
        retry: RetryPolicy::NonRetryable,
    }
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
