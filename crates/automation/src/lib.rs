//! Core domain for the pull request automation.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, error type, and business rule used by the automation. Infrastructure
//! crates implement the port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed from GitHub and the issue tracker; the `github`
//! and `zenhub` crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype domain identifiers (`IssueId`, `Login`, etc.) |
//! | [`types`] | Shared value types (`TimelineEvent`, `Milestone`, `PullRequestContext`, etc.) |
//! | [`errors`] | Run-level error and retry-policy types |
//! | [`config`] | Immutable run configuration |
//! | [`ports`] | Traits implemented by the infrastructure crates |
//! | [`timeline`] | Replay of tracker timelines into linked issue/epics |
//! | [`teams`] | Team membership, sprint milestone, and team label resolution |
//! | [`retry`] | Bounded retry with fixed delay |
//! | [`verifier`] | Linking/estimate verification |
//! | [`test_paths`] | Test file detection |
//! | [`runner`] | Per-event orchestration |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod retry;
pub mod runner;
pub mod teams;
pub mod test_paths;
pub mod timeline;
pub mod types;
pub mod verifier;

#[cfg(test)]
mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{AutomationConfig, RetrySettings};
pub use errors::{AutomationError, ClassifyRetry, RetryPolicy};
pub use identifiers::{
    BranchName, IssueId, IssueNumber, LabelName, Login, MilestoneNumber, OrganizationName,
    PullRequestNumber, RepositoryGhId, RepositoryName, RunId, TeamName, TeamSlug,
    TrackerRepositoryId,
};
pub use ports::{IssueTracker, PullRequestApi, RepositoryPage, TeamDirectory, WorkspaceRepository};
pub use runner::{PullRequestAutomation, RunOutcome, SkipReason};
pub use types::{
    Estimate, IssueRef, IssueState, Milestone, MilestoneState, PullRequestContext, RepoRef,
    RepositoryRef, Team, TimelineEvent, TimelineEventKind, Timestamp, TrackedIssue,
};
pub use verifier::{FailureReason, Verdict};
