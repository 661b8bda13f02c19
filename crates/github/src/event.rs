//! Decoding of the webhook payload that triggered the run.
//!
//! GitHub Actions writes the payload to the file named by `GITHUB_EVENT_PATH`.
//! Only `pull_request` (and `pull_request_target`) payloads are accepted.

use automation::{
    AutomationError, BranchName, LabelName, Login, MilestoneNumber, PullRequestContext,
    PullRequestNumber, RepositoryGhId, RepositoryName, RepositoryRef,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    number: PullRequestNumber,
    user: UserPayload,
    #[serde(default)]
    assignees: Vec<UserPayload>,
    #[serde(default)]
    labels: Vec<LabelPayload>,
    milestone: Option<MilestonePayload>,
    base: BranchPayload,
    head: BranchPayload,
}

#[derive(Deserialize)]
struct UserPayload {
    login: Login,
}

#[derive(Deserialize)]
struct LabelPayload {
    name: LabelName,
}

#[derive(Deserialize)]
struct MilestonePayload {
    number: MilestoneNumber,
}

#[derive(Deserialize)]
struct BranchPayload {
    #[serde(rename = "ref")]
    ref_name: BranchName,
    repo: Option<RepoPayload>,
}

#[derive(Deserialize)]
struct RepoPayload {
    id: RepositoryGhId,
    name: RepositoryName,
    owner: UserPayload,
    default_branch: BranchName,
}

impl From<RepoPayload> for RepositoryRef {
    fn from(repo: RepoPayload) -> Self {
        Self {
            id: repo.id,
            name: repo.name,
            owner: repo.owner.login,
            default_branch: repo.default_branch,
        }
    }
}

/// Extracts the pull request from an event payload.
///
/// Fails with [`AutomationError::Configuration`] when the payload is not a
/// pull request event.
pub fn parse_pull_request_event(payload: &str) -> Result<PullRequestContext, AutomationError> {
    let event: EventPayload =
        serde_json::from_str(payload).map_err(|e| AutomationError::Configuration {
            message: format!("Invalid event payload: {e}"),
        })?;
    let pr = event.pull_request.ok_or_else(|| AutomationError::Configuration {
        message: "Action works only for PRs".to_string(),
    })?;
    let base_repo = pr.base.repo.ok_or_else(|| AutomationError::Configuration {
        message: "Pull request payload has no base repository".to_string(),
    })?;

    Ok(PullRequestContext {
        number: pr.number,
        author: pr.user.login,
        assignees: pr.assignees.into_iter().map(|u| u.login).collect(),
        labels: pr.labels.into_iter().map(|l| l.name).collect(),
        milestone: pr.milestone.map(|m| m.number),
        base_ref: pr.base.ref_name,
        base_repo: base_repo.into(),
        head_repo: pr.head.repo.map(Into::into),
    })
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
