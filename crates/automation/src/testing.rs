//! In-memory port implementations shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::{
    AutomationConfig, AutomationError, BranchName, IssueNumber, IssueTracker, LabelName, Login,
    Milestone, MilestoneNumber, MilestoneState, OrganizationName, PullRequestApi,
    PullRequestContext, PullRequestNumber, RepositoryGhId, RepositoryName, RepositoryPage,
    RepositoryRef, Team, TeamDirectory, TeamName, TeamSlug, Timestamp, TrackedIssue,
};

pub const ORG: &str = "apify";
pub const REPO_GH_ID: u64 = 264953367;

pub fn login(value: &str) -> Login {
    Login::new(value).unwrap()
}

pub fn team(name: &str, slug: &str) -> Team {
    Team {
        name: TeamName::new(name).unwrap(),
        slug: TeamSlug::new(slug).unwrap(),
    }
}

pub fn config() -> AutomationConfig {
    let mut config = AutomationConfig::new(
        OrganizationName::new(ORG).unwrap(),
        TeamSlug::new("product-engineering").unwrap(),
    );
    config.dry_run_cooldown = std::time::Duration::from_secs(60);
    config.verification_retry.max_retries = 2;
    config.verification_retry.delay = std::time::Duration::from_secs(10);
    config
}

pub fn milestone(number: u64, title: &str, state: MilestoneState, due_in_days: Option<i64>) -> Milestone {
    Milestone {
        number: MilestoneNumber::new(number),
        title: title.to_string(),
        state,
        due_on: due_in_days.map(|days| Timestamp::from_utc(Utc::now() + Duration::days(days))),
    }
}

pub fn repository(owner: &str) -> RepositoryRef {
    RepositoryRef {
        id: RepositoryGhId::new(REPO_GH_ID),
        name: RepositoryName::new("apify-proxy").unwrap(),
        owner: login(owner),
        default_branch: BranchName::new("master").unwrap(),
    }
}

pub fn pull_request(author: &str) -> PullRequestContext {
    PullRequestContext {
        number: PullRequestNumber::new(42),
        author: login(author),
        assignees: Vec::new(),
        labels: Vec::new(),
        milestone: None,
        base_ref: BranchName::new("master").unwrap(),
        base_repo: repository(ORG),
        head_repo: Some(repository(ORG)),
    }
}

// ---------------------------------------------------------------------------
// GitHub
// ---------------------------------------------------------------------------

/// A mutation or read recorded by [`FakeGitHub`].
#[derive(Debug, Clone, PartialEq)]
pub enum GitHubCall {
    UpdateAssignees(Vec<String>),
    SetMilestone(u64),
    ListMilestones,
    AddLabels(Vec<String>),
    ReviewComment(String),
    ListChangedFiles,
    ListChildTeams,
    ListMembers(String),
}

#[derive(Default)]
pub struct FakeGitHub {
    pub teams: Vec<Team>,
    pub members: HashMap<String, Vec<Login>>,
    pub milestones: Vec<Milestone>,
    pub changed_files: Vec<String>,
    pub calls: Mutex<Vec<GitHubCall>>,
}

impl FakeGitHub {
    pub fn with_team(mut self, team: Team, members: &[&str]) -> Self {
        self.members.insert(
            team.slug.to_string(),
            members.iter().map(|m| login(m)).collect(),
        );
        self.teams.push(team);
        self
    }

    pub fn calls(&self) -> Vec<GitHubCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitHubCall::ReviewComment(body) => Some(body),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GitHubCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PullRequestApi for FakeGitHub {
    async fn update_assignees(
        &self,
        _pr: PullRequestNumber,
        assignees: &[Login],
    ) -> Result<(), AutomationError> {
        self.record(GitHubCall::UpdateAssignees(
            assignees.iter().map(|a| a.to_string()).collect(),
        ));
        Ok(())
    }

    async fn set_milestone(
        &self,
        _pr: PullRequestNumber,
        milestone: MilestoneNumber,
    ) -> Result<(), AutomationError> {
        self.record(GitHubCall::SetMilestone(milestone.as_u64()));
        Ok(())
    }

    async fn list_milestones(&self) -> Result<Vec<Milestone>, AutomationError> {
        self.record(GitHubCall::ListMilestones);
        Ok(self.milestones.clone())
    }

    async fn add_labels(
        &self,
        _pr: PullRequestNumber,
        labels: &[LabelName],
    ) -> Result<(), AutomationError> {
        self.record(GitHubCall::AddLabels(
            labels.iter().map(|l| l.to_string()).collect(),
        ));
        Ok(())
    }

    async fn create_review_comment(
        &self,
        _pr: PullRequestNumber,
        body: &str,
    ) -> Result<(), AutomationError> {
        self.record(GitHubCall::ReviewComment(body.to_string()));
        Ok(())
    }

    async fn list_changed_files(
        &self,
        _pr: PullRequestNumber,
    ) -> Result<Vec<String>, AutomationError> {
        self.record(GitHubCall::ListChangedFiles);
        Ok(self.changed_files.clone())
    }
}

#[async_trait]
impl TeamDirectory for FakeGitHub {
    async fn list_child_teams(&self, _parent: &TeamSlug) -> Result<Vec<Team>, AutomationError> {
        self.record(GitHubCall::ListChildTeams);
        Ok(self.teams.clone())
    }

    async fn list_team_members(&self, team: &TeamSlug) -> Result<Vec<Login>, AutomationError> {
        self.record(GitHubCall::ListMembers(team.to_string()));
        Ok(self.members.get(team.as_str()).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Tracker fake whose answers can change between calls, to model the
/// tracker catching up with webhook lag.
#[derive(Default)]
pub struct FakeTracker {
    /// Responses per issue number; the last entry is repeated once exhausted.
    pub issues: Mutex<HashMap<u64, Vec<Result<TrackedIssue, AutomationError>>>>,
    pub pages: Vec<RepositoryPage>,
    pub issue_calls: Mutex<Vec<u64>>,
    pub page_calls: Mutex<Vec<Option<String>>>,
}

impl FakeTracker {
    pub fn with_issue(self, number: u64, issue: TrackedIssue) -> Self {
        self.with_responses(number, vec![Ok(issue)])
    }

    pub fn with_responses(
        self,
        number: u64,
        responses: Vec<Result<TrackedIssue, AutomationError>>,
    ) -> Self {
        self.issues.lock().unwrap().insert(number, responses);
        self
    }

    pub fn issue_calls(&self) -> Vec<u64> {
        self.issue_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn get_issue(
        &self,
        _repository: RepositoryGhId,
        number: IssueNumber,
    ) -> Result<TrackedIssue, AutomationError> {
        self.issue_calls.lock().unwrap().push(number.as_u64());
        let mut issues = self.issues.lock().unwrap();
        let Some(responses) = issues.get_mut(&number.as_u64()) else {
            return Ok(TrackedIssue::default());
        };
        if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses[0].clone()
        }
    }

    async fn workspace_repositories(
        &self,
        cursor: Option<&str>,
    ) -> Result<RepositoryPage, AutomationError> {
        let mut calls = self.page_calls.lock().unwrap();
        let index = calls.len();
        calls.push(cursor.map(str::to_string));
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}
