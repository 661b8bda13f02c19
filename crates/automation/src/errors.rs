//! Top-level error and retry-policy types for the automation domain.
//!
//! [`AutomationError`] covers every condition that ends a run with a failed
//! status. Adapter crates translate their transport failures into
//! [`AutomationError::ExternalApi`] so the domain never sees HTTP details.
//!
//! [`RetryPolicy`] is a cross-cutting concern: any error type that participates
//! in retry decisions must be able to produce a [`RetryPolicy`] (see
//! [`crate::retry`]).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::verifier::FailureReason;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// - `Retryable` errors: API timeouts, 5xx responses, rate limits, and
///   verification failures that may clear once the tracker catches up.
/// - `NonRetryable` errors: invalid configuration, rejected credentials,
///   inconsistent tracker data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt (e.g. derived from a
        /// `Retry-After` header). `None` means apply the caller's own delay.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

impl RetryPolicy {
    /// Classifies a failed HTTP response.
    ///
    /// Server errors and rate limits (429, or 403 carrying a `Retry-After`
    /// header) are retryable; every other client error is not.
    pub fn for_http_status(status: u16, retry_after: Option<Duration>) -> Self {
        match status {
            429 | 500..=599 => Self::Retryable { after: retry_after },
            403 if retry_after.is_some() => Self::Retryable { after: retry_after },
            _ => Self::NonRetryable,
        }
    }
}

/// Implemented by error types that can be fed to [`crate::retry::retry`].
pub trait ClassifyRetry {
    /// Returns whether this error may be retried.
    fn retry_policy(&self) -> RetryPolicy;
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that end an automation run with a failed status.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum AutomationError {
    /// The configured parent team has no child teams.
    #[error("No child teams found!")]
    NoTeamsConfigured,

    /// The repository has no milestones at all.
    #[error("No sprint milestone!")]
    NoMilestones,

    /// No open, current milestone title matches the team name.
    #[error("Cannot find milestone for \"{team}\" team")]
    MilestoneNotFound {
        /// Team name used as the title pattern.
        team: String,
    },

    /// The team name is not a valid pattern for matching milestone titles.
    #[error("Team name \"{team}\" is not a valid milestone pattern: {message}")]
    InvalidTeamPattern {
        /// Offending team name.
        team: String,
        /// Pattern compiler diagnostic.
        message: String,
    },

    /// The pull request failed linking/estimate verification.
    ///
    /// Retryable: the tracker may not have caught up with a fresh link yet.
    #[error("{0}")]
    Verification(FailureReason),

    /// Tracker data violates an assumption the event replay relies on.
    #[error("Internal inconsistency: {message}")]
    InternalInconsistency {
        /// Description of the violated assumption.
        message: String,
    },

    /// A call to GitHub or the issue tracker failed.
    #[error("{service} API error: {message}")]
    ExternalApi {
        /// Which collaborator failed (e.g. `"GitHub"`, `"ZenHub"`).
        service: String,
        /// Human-readable description of the failure.
        message: String,
        /// Whether the failed call may be repeated.
        retry: RetryPolicy,
    },

    /// The run configuration or triggering event is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl AutomationError {
    /// Builds a retryable [`AutomationError::ExternalApi`].
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalApi {
            service: service.into(),
            message: message.into(),
            retry: RetryPolicy::Retryable { after: None },
        }
    }

    /// Builds an [`AutomationError::InternalInconsistency`].
    pub fn inconsistency(message: impl Into<String>) -> Self {
        Self::InternalInconsistency {
            message: message.into(),
        }
    }
}

impl ClassifyRetry for AutomationError {
    fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::ExternalApi { retry, .. } => retry.clone(),
            Self::Verification(_) => RetryPolicy::Retryable { after: None },
            Self::NoTeamsConfigured
            | Self::NoMilestones
            | Self::MilestoneNotFound { .. }
            | Self::InvalidTeamPattern { .. }
            | Self::InternalInconsistency { .. }
            | Self::Configuration { .. } => RetryPolicy::NonRetryable,
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
