//! Shared value types for the pull request automation domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (e.g. estimates are finite and
//! non-negative) and participate in domain computations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    BranchName, IssueId, IssueNumber, LabelName, Login, MilestoneNumber, PullRequestNumber,
    RepositoryGhId, RepositoryName, TeamName, TeamSlug, TrackerRepositoryId,
};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 string such as `"2021-05-23T07:00:00Z"`.
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Tracker issues and their event log
// ---------------------------------------------------------------------------

/// Open/closed state of a tracker issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// A repository as the tracker refers to it inside timeline payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// GitHub's repository id.
    pub gh_id: RepositoryGhId,
    /// The tracker's repository id.
    pub id: TrackerRepositoryId,
    pub name: String,
}

/// An issue referenced by a timeline event.
///
/// Identity is [`IssueRef::id`]; `repo` is only populated when the issue is
/// returned as a PR's linked issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub id: IssueId,
    /// Tracker-side kind of the item (e.g. `"GithubIssue"`).
    #[serde(rename = "type")]
    pub issue_type: String,
    pub state: IssueState,
    pub title: String,
    pub number: IssueNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoRef>,
}

/// The kind of a tracker timeline event.
///
/// Closed set: every kind the automation does not act on is [`Self::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    ConnectPrToIssue,
    DisconnectPrFromIssue,
    AddIssueToEpic,
    RemoveIssueFromEpic,
    Other,
}

/// One immutable entry of a tracker issue's timeline.
///
/// Timelines are append-only but are not delivered in chronological order;
/// consumers sort by [`TimelineEvent::created_at`] themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub kind: TimelineEventKind,
    pub created_at: Timestamp,
    /// The issue the event is about. Present for all link and epic events.
    pub issue: Option<IssueRef>,
    /// Repository of [`Self::issue`], when the tracker reports it.
    pub repo: Option<RepoRef>,
}

/// Effort estimate (story points) attached to an issue or pull request.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Estimate(f64);

impl Estimate {
    /// Creates an [`Estimate`].
    ///
    /// Returns `None` if `value` is negative, infinite, or NaN.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the estimate as an `f64`.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Estimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The tracker's view of a single issue or pull request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedIssue {
    pub estimate: Option<Estimate>,
    pub timeline: Vec<TimelineEvent>,
}

// ---------------------------------------------------------------------------
// GitHub-side types
// ---------------------------------------------------------------------------

/// Open/closed state of a GitHub milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneState {
    Open,
    Closed,
}

/// A GitHub milestone, used as a team sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub number: MilestoneNumber,
    pub title: String,
    pub state: MilestoneState,
    pub due_on: Option<Timestamp>,
}

impl Milestone {
    /// Returns `true` if the milestone is open and not yet past its due date.
    ///
    /// A milestone without a due date never expires.
    pub fn is_current(&self, now: Timestamp) -> bool {
        self.state == MilestoneState::Open && self.due_on.map_or(true, |due| due >= now)
    }
}

/// A child team of the configured parent team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: TeamName,
    pub slug: TeamSlug,
}

/// A GitHub repository as seen from a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub id: RepositoryGhId,
    pub name: RepositoryName,
    pub owner: Login,
    pub default_branch: BranchName,
}

/// Snapshot of a pull request taken from the triggering event.
///
/// The automation never mutates this value; every change is requested through
/// [`crate::PullRequestApi`] and becomes visible only in later events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestContext {
    pub number: PullRequestNumber,
    pub author: Login,
    pub assignees: Vec<Login>,
    pub labels: Vec<LabelName>,
    pub milestone: Option<MilestoneNumber>,
    /// Branch the pull request targets.
    pub base_ref: BranchName,
    pub base_repo: RepositoryRef,
    /// `None` when the head repository has been deleted.
    pub head_repo: Option<RepositoryRef>,
}

impl PullRequestContext {
    /// Returns `true` if the pull request carries a label with exactly this name.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.as_str() == name)
    }

    /// Returns `true` if `login` is already an assignee.
    pub fn is_assigned_to(&self, login: &Login) -> bool {
        self.assignees.contains(login)
    }
}
