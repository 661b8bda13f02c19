//! Linking/estimate verification.
//!
//! A PR passes when the tracker shows it is tied to planned work and the work
//! is estimated:
//!
//! ```text
//! CHECK_LINK ──(no issue, no epic, not adhoc)──────────────▶ FAIL Unlinked
//!     │
//!     ▼
//! CHECK_ESTIMATE ──(no issue, PR unestimated)──────────────▶ FAIL UnestimatedPullRequest
//!     │         └──(issue, neither PR nor issue estimated)─▶ FAIL NoEstimate
//!     ▼
//!   PASS
//! ```
//!
//! The verifier only reports a [`Verdict`]; telling the user about a failure
//! is the caller's decision (see [`crate::runner`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    timeline, AutomationConfig, AutomationError, IssueNumber, IssueRef, IssueTracker,
    PullRequestContext,
};

/// Why a pull request failed verification. User-actionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum FailureReason {
    /// No linked issue, no linked epic, and no adhoc label.
    #[error("Pull request is not linked to issue/epic nor adhoc")]
    Unlinked,
    /// Not linked to an issue, so the PR itself must carry the estimate.
    #[error("You must estimate PR since no issue linked")]
    UnestimatedPullRequest,
    /// Linked to an issue, but neither side is estimated.
    #[error("Neither PR nor linked issue has an estimate")]
    NoEstimate,
}

/// Outcome of one verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(FailureReason),
}

/// Checks that `pr` is linked to tracked work and that the work is estimated.
///
/// Reads the PR's own tracker entry, replays its timeline, and, only when the
/// PR has no estimate of its own, fetches the linked issue's estimate.
#[instrument(skip_all, fields(pr = %pr.number))]
pub async fn verify_linking_and_estimates(
    tracker: &dyn IssueTracker,
    config: &AutomationConfig,
    pr: &PullRequestContext,
) -> Result<Verdict, AutomationError> {
    let tracked = tracker
        .get_issue(pr.base_repo.id, IssueNumber::new(pr.number.as_u64()))
        .await?;
    let linked_issue = timeline::linked_issue(&tracked.timeline)?;
    let linked_epics = timeline::linked_epics(&tracked.timeline)?;
    let is_adhoc = pr.has_label(&config.adhoc_label);

    debug!(
        linked_issue = ?linked_issue.as_ref().map(|issue| issue.number),
        linked_epics = linked_epics.len(),
        is_adhoc,
        pr_estimate = ?tracked.estimate,
        "Replayed tracker timeline"
    );

    let Some(issue) = linked_issue else {
        if linked_epics.is_empty() && !is_adhoc {
            return Ok(Verdict::Fail(FailureReason::Unlinked));
        }
        if tracked.estimate.is_none() {
            return Ok(Verdict::Fail(FailureReason::UnestimatedPullRequest));
        }
        return Ok(Verdict::Pass);
    };

    if tracked.estimate.is_some() {
        return Ok(Verdict::Pass);
    }

    let issue_estimate = linked_issue_estimate(tracker, pr, &issue).await?;
    if issue_estimate.is_none() {
        return Ok(Verdict::Fail(FailureReason::NoEstimate));
    }
    Ok(Verdict::Pass)
}

async fn linked_issue_estimate(
    tracker: &dyn IssueTracker,
    pr: &PullRequestContext,
    issue: &IssueRef,
) -> Result<Option<crate::Estimate>, AutomationError> {
    // Issues in the PR's own repository may come without a repository reference.
    let repository = issue
        .repo
        .as_ref()
        .map_or(pr.base_repo.id, |repo| repo.gh_id);
    let linked = tracker.get_issue(repository, issue.number).await?;
    Ok(linked.estimate)
}

#[cfg(test)]
#[path = "verifier_tests.rs"]
mod tests;
