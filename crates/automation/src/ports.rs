//! Port traits implemented by the infrastructure crates.
//!
//! The domain defines *what* it needs from GitHub and the issue tracker; the
//! `github` and `zenhub` crates define *how* to supply it. All traits are
//! dyn-compatible so the CLI can inject them as `Arc<dyn …>`.

use async_trait::async_trait;

use crate::{
    AutomationError, IssueNumber, LabelName, Login, Milestone, MilestoneNumber, PullRequestNumber,
    RepositoryGhId, Team, TeamSlug, TrackedIssue,
};

/// Pull request operations on the repository that triggered the run.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// Replaces the assignee list of a pull request.
    async fn update_assignees(
        &self,
        pr: PullRequestNumber,
        assignees: &[Login],
    ) -> Result<(), AutomationError>;

    /// Sets the milestone of a pull request.
    async fn set_milestone(
        &self,
        pr: PullRequestNumber,
        milestone: MilestoneNumber,
    ) -> Result<(), AutomationError>;

    /// Lists the repository's milestones in the order GitHub returns them.
    async fn list_milestones(&self) -> Result<Vec<Milestone>, AutomationError>;

    /// Adds labels to a pull request, keeping existing ones.
    async fn add_labels(
        &self,
        pr: PullRequestNumber,
        labels: &[LabelName],
    ) -> Result<(), AutomationError>;

    /// Posts a review comment (not an approval or change request).
    async fn create_review_comment(
        &self,
        pr: PullRequestNumber,
        body: &str,
    ) -> Result<(), AutomationError>;

    /// Lists paths of files changed by a pull request.
    async fn list_changed_files(
        &self,
        pr: PullRequestNumber,
    ) -> Result<Vec<String>, AutomationError>;
}

/// Read access to the organization's team structure.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    /// Lists direct child teams of `parent` in listing order.
    async fn list_child_teams(&self, parent: &TeamSlug) -> Result<Vec<Team>, AutomationError>;

    /// Lists member logins of `team`.
    async fn list_team_members(&self, team: &TeamSlug) -> Result<Vec<Login>, AutomationError>;
}

/// A repository that belongs to the tracker workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRepository {
    pub gh_id: RepositoryGhId,
    pub name: String,
}

/// One page of a cursor-paginated workspace repository listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPage {
    pub repositories: Vec<WorkspaceRepository>,
    pub has_next_page: bool,
    /// Cursor to pass for the next page; meaningful only when `has_next_page`.
    pub end_cursor: Option<String>,
}

/// Read access to the project-tracking system.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetches the estimate and timeline of an issue or pull request,
    /// addressed by GitHub repository id and number.
    async fn get_issue(
        &self,
        repository: RepositoryGhId,
        number: IssueNumber,
    ) -> Result<TrackedIssue, AutomationError>;

    /// Fetches one page of the workspace's repositories, starting after `cursor`.
    async fn workspace_repositories(
        &self,
        cursor: Option<&str>,
    ) -> Result<RepositoryPage, AutomationError>;
}
