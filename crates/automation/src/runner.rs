//! Per-event orchestration.
//!
//! [`PullRequestAutomation::run`] drives one pull request event from start to
//! finish. Every step depends on the result of the previous external call, so
//! the steps run strictly in sequence.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::retry::retry;
use crate::teams::{find_current_team_milestone, resolve_team, team_label_name};
use crate::test_paths::touches_tests;
use crate::verifier::{verify_linking_and_estimates, FailureReason, Verdict};
use crate::{
    AutomationConfig, AutomationError, ClassifyRetry, IssueTracker, LabelName, PullRequestApi,
    PullRequestContext, RetryPolicy, Team, TeamDirectory, TeamName, Timestamp,
};

/// Why a run ended before touching the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The head branch lives outside the organization (a fork).
    NotFromOrganization,
    /// The pull request does not target the repository's default branch.
    NotTargetingDefaultBranch,
    /// The author is not a member of any product team.
    AuthorNotInTeam,
    /// The author's team is exempt from tracker checks.
    TeamExcluded(TeamName),
    /// The repository is not part of the tracker workspace.
    RepositoryNotInWorkspace,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFromOrganization => write!(f, "pull request is not from the organization"),
            Self::NotTargetingDefaultBranch => {
                write!(f, "pull request does not target the default branch")
            }
            Self::AuthorNotInTeam => write!(f, "author is not a member of any team"),
            Self::TeamExcluded(team) => write!(f, "team \"{team}\" is excluded from checks"),
            Self::RepositoryNotInWorkspace => {
                write!(f, "repository is not included in the tracker workspace")
            }
        }
    }
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Bookkeeping was applied and verification passed.
    Completed { team: TeamName },
    /// The run stopped early; see [`SkipReason`].
    Skipped(SkipReason),
}

/// Applies team bookkeeping to a pull request and verifies its tracker
/// linking and estimates.
pub struct PullRequestAutomation {
    config: AutomationConfig,
    pull_requests: Arc<dyn PullRequestApi>,
    teams: Arc<dyn TeamDirectory>,
    tracker: Arc<dyn IssueTracker>,
}

impl PullRequestAutomation {
    pub fn new(
        config: AutomationConfig,
        pull_requests: Arc<dyn PullRequestApi>,
        teams: Arc<dyn TeamDirectory>,
        tracker: Arc<dyn IssueTracker>,
    ) -> Self {
        Self {
            config,
            pull_requests,
            teams,
            tracker,
        }
    }

    /// Processes one pull request event.
    #[instrument(skip_all, fields(pr = %pr.number, author = %pr.author))]
    pub async fn run(&self, pr: &PullRequestContext) -> Result<RunOutcome, AutomationError> {
        let from_organization = pr.head_repo.as_ref().is_some_and(|repo| {
            repo.owner
                .as_str()
                .eq_ignore_ascii_case(self.config.organization.as_str())
        });
        if !from_organization {
            return Ok(self.skip(SkipReason::NotFromOrganization));
        }
        if pr.base_ref != pr.base_repo.default_branch {
            return Ok(self.skip(SkipReason::NotTargetingDefaultBranch));
        }

        let Some(team) = resolve_team(self.teams.as_ref(), &self.config, &pr.author).await? else {
            return Ok(self.skip(SkipReason::AuthorNotInTeam));
        };

        if self.config.is_team_excluded(&team.name) {
            return Ok(self.skip(SkipReason::TeamExcluded(team.name)));
        }
        if !self.is_repository_in_workspace(pr).await? {
            return Ok(self.skip(SkipReason::RepositoryNotInWorkspace));
        }

        self.assign_creator(pr).await?;
        self.fill_current_milestone(pr, &team).await?;
        self.add_team_label(pr, &team).await?;
        self.mark_tested(pr).await?;

        self.ensure_linking_and_estimates(pr).await?;
        info!(team = %team.name, "Pull request passed all checks");
        Ok(RunOutcome::Completed { team: team.name })
    }

    fn skip(&self, reason: SkipReason) -> RunOutcome {
        info!(%reason, "Skipping pull request");
        RunOutcome::Skipped(reason)
    }

    async fn assign_creator(&self, pr: &PullRequestContext) -> Result<(), AutomationError> {
        if pr.is_assigned_to(&pr.author) {
            return Ok(());
        }
        let assignees: Vec<_> = std::iter::once(pr.author.clone())
            .chain(pr.assignees.iter().cloned())
            .collect();
        self.pull_requests
            .update_assignees(pr.number, &assignees)
            .await?;
        info!("Creator successfully assigned");
        Ok(())
    }

    async fn fill_current_milestone(
        &self,
        pr: &PullRequestContext,
        team: &Team,
    ) -> Result<(), AutomationError> {
        if pr.milestone.is_some() {
            return Ok(());
        }
        let milestones = self.pull_requests.list_milestones().await?;
        if milestones.is_empty() {
            return Err(AutomationError::NoMilestones);
        }
        let milestone = find_current_team_milestone(&milestones, &team.name, Timestamp::now())?;
        self.pull_requests
            .set_milestone(pr.number, milestone.number)
            .await?;
        info!(milestone = %milestone.title, "Milestone successfully filled");
        Ok(())
    }

    async fn add_team_label(
        &self,
        pr: &PullRequestContext,
        team: &Team,
    ) -> Result<(), AutomationError> {
        let prefix = &self.config.team_label_prefix;
        if pr.labels.iter().any(|l| l.as_str().starts_with(prefix.as_str())) {
            return Ok(());
        }
        let label = to_label(team_label_name(&self.config, &team.name))?;
        self.pull_requests
            .add_labels(pr.number, std::slice::from_ref(&label))
            .await?;
        info!(%label, "Team label successfully added");
        Ok(())
    }

    async fn mark_tested(&self, pr: &PullRequestContext) -> Result<(), AutomationError> {
        if pr.has_label(&self.config.tested_label) {
            return Ok(());
        }
        let files = self.pull_requests.list_changed_files(pr.number).await?;
        if !touches_tests(files.iter().map(String::as_str)) {
            return Ok(());
        }
        let tested = to_label(self.config.tested_label.clone())?;
        self.pull_requests
            .add_labels(pr.number, std::slice::from_ref(&tested))
            .await?;
        info!(label = %tested, "Pull request touches tests");
        Ok(())
    }

    /// Walks the workspace's repository pages until the PR's repository shows up.
    ///
    /// Matches on the GitHub repository id; names are only unique per owner.
    async fn is_repository_in_workspace(
        &self,
        pr: &PullRequestContext,
    ) -> Result<bool, AutomationError> {
        let mut cursor: Option<String> = None;
        loop {
            let page = self.tracker.workspace_repositories(cursor.as_deref()).await?;
            if page.repositories.iter().any(|repo| repo.gh_id == pr.base_repo.id) {
                return Ok(true);
            }
            if !page.has_next_page {
                return Ok(false);
            }
            match page.end_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    return Err(AutomationError::inconsistency(
                        "workspace page reports a next page without an end cursor",
                    ))
                }
            }
        }
    }

    /// Two-phase verification.
    ///
    /// A dry run first; its failure is never shown to the user. After the
    /// cooldown the check runs again under [`retry`], and only the final
    /// attempt comments on the PR before failing the run.
    async fn ensure_linking_and_estimates(
        &self,
        pr: &PullRequestContext,
    ) -> Result<(), AutomationError> {
        match self.verify_once(pr, true).await {
            Ok(()) => return Ok(()),
            Err(error) if error.retry_policy() == RetryPolicy::NonRetryable => return Err(error),
            Err(error) => info!(
                %error,
                cooldown_secs = self.config.dry_run_cooldown.as_secs(),
                "Dry run failed, waiting before the real run"
            ),
        }
        tokio::time::sleep(self.config.dry_run_cooldown).await;

        let settings = self.config.verification_retry;
        retry(
            move |is_final_attempt| self.verify_once(pr, !is_final_attempt),
            settings.max_retries,
            settings.delay,
        )
        .await
    }

    async fn verify_once(
        &self,
        pr: &PullRequestContext,
        dry_run: bool,
    ) -> Result<(), AutomationError> {
        let verdict = verify_linking_and_estimates(self.tracker.as_ref(), &self.config, pr).await?;
        let Verdict::Fail(reason) = verdict else {
            return Ok(());
        };

        if dry_run {
            info!(%reason, "Verification failed (dry run)");
        } else {
            warn!(%reason, "Verification failed");
            self.pull_requests
                .create_review_comment(pr.number, &failure_comment(reason, &self.config.adhoc_label))
                .await?;
        }
        Err(AutomationError::Verification(reason))
    }
}

fn to_label(name: String) -> Result<LabelName, AutomationError> {
    LabelName::new(name).ok_or_else(|| AutomationError::Configuration {
        message: "label name must not be empty".to_string(),
    })
}

/// Body of the review comment posted when the real verification run fails.
pub fn failure_comment(reason: FailureReason, adhoc_label: &str) -> String {
    let hint = match reason {
        FailureReason::Unlinked => format!(
            "Link it to an issue or epic in ZenHub, or add the `{adhoc_label}` label if it is unplanned work."
        ),
        FailureReason::UnestimatedPullRequest => {
            "Set an estimate on the pull request in ZenHub or link it to an estimated issue."
                .to_string()
        }
        FailureReason::NoEstimate => {
            "Set an estimate on the pull request or on the linked issue in ZenHub.".to_string()
        }
    };
    format!("{reason}!\n\n{hint}")
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
