//! Pull request operations on a single repository.

use async_trait::async_trait;
use automation::{
    AutomationError, LabelName, Login, Milestone, MilestoneNumber, PullRequestApi,
    PullRequestNumber, RepositoryName,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::GitHubClient;

/// [`PullRequestApi`] for one `owner/repo`, authenticated with the repository token.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    client: GitHubClient,
    owner: Login,
    repo: RepositoryName,
}

#[derive(Serialize)]
struct AssigneesUpdate<'a> {
    assignees: Vec<&'a str>,
}

#[derive(Serialize)]
struct MilestoneUpdate {
    milestone: MilestoneNumber,
}

#[derive(Serialize)]
struct LabelsRequest<'a> {
    labels: Vec<&'a str>,
}

#[derive(Serialize)]
struct ReviewRequest<'a> {
    body: &'a str,
    event: &'static str,
}

#[derive(Deserialize)]
struct ChangedFile {
    filename: String,
}

impl RepositoryClient {
    pub fn new(client: GitHubClient, owner: Login, repo: RepositoryName) -> Self {
        Self {
            client,
            owner,
            repo,
        }
    }

    /// `/repos/{owner}/{repo}` followed by `suffix`.
    pub(crate) fn repo_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{}", self.owner, self.repo, suffix)
    }

    async fn update_issue<B: Serialize + Sync>(
        &self,
        pr: PullRequestNumber,
        body: &B,
    ) -> Result<(), AutomationError> {
        // Assignees and milestone live on the issue side of a pull request.
        let path = self.repo_path(&format!("/issues/{pr}"));
        self.client.send_json(Method::PATCH, &path, body).await
    }
}

#[async_trait]
impl PullRequestApi for RepositoryClient {
    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn update_assignees(
        &self,
        pr: PullRequestNumber,
        assignees: &[Login],
    ) -> Result<(), AutomationError> {
        let body = AssigneesUpdate {
            assignees: assignees.iter().map(Login::as_str).collect(),
        };
        self.update_issue(pr, &body).await
    }

    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn set_milestone(
        &self,
        pr: PullRequestNumber,
        milestone: MilestoneNumber,
    ) -> Result<(), AutomationError> {
        self.update_issue(pr, &MilestoneUpdate { milestone }).await
    }

    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn list_milestones(&self) -> Result<Vec<Milestone>, AutomationError> {
        self.client
            .get_all_pages(&self.repo_path("/milestones"))
            .await
    }

    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn add_labels(
        &self,
        pr: PullRequestNumber,
        labels: &[LabelName],
    ) -> Result<(), AutomationError> {
        let body = LabelsRequest {
            labels: labels.iter().map(LabelName::as_str).collect(),
        };
        let path = self.repo_path(&format!("/issues/{pr}/labels"));
        self.client.send_json(Method::POST, &path, &body).await
    }

    #[instrument(skip(self, body), fields(repo = %self.repo))]
    async fn create_review_comment(
        &self,
        pr: PullRequestNumber,
        body: &str,
    ) -> Result<(), AutomationError> {
        let request = ReviewRequest {
            body,
            event: "COMMENT",
        };
        let path = self.repo_path(&format!("/pulls/{pr}/reviews"));
        self.client.send_json(Method::POST, &path, &request).await
    }

    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn list_changed_files(
        &self,
        pr: PullRequestNumber,
    ) -> Result<Vec<String>, AutomationError> {
        let files: Vec<ChangedFile> = self
            .client
            .get_all_pages(&self.repo_path(&format!("/pulls/{pr}/files")))
            .await?;
        Ok(files.into_iter().map(|f| f.filename).collect())
    }
}

#[cfg(test)]
#[path = "pulls_tests.rs"]
mod tests;
