//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! an [`IssueNumber`] with a [`PullRequestNumber`] even though both are `u64`
//! under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (integers assigned by GitHub or ZenHub).
// Generates: struct (Copy), new(), as_u64(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: integer-backed
// ---------------------------------------------------------------------------

u64_id! {
    /// Tracker-wide identity of an issue as reported in timeline payloads.
    ///
    /// This is the replay key for epic membership; two references with the same
    /// id denote the same issue regardless of their other fields.
    IssueId
}

u64_id! {
    /// Repository-scoped issue number (the `#123` users see).
    IssueNumber
}

u64_id! {
    /// Repository-scoped pull request number.
    PullRequestNumber
}

u64_id! {
    /// Repository-scoped GitHub milestone number.
    MilestoneNumber
}

u64_id! {
    /// GitHub's numeric repository id, which the tracker uses to address issues.
    RepositoryGhId
}

u64_id! {
    /// The tracker's own repository id.
    TrackerRepositoryId
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single automation run (one invocation for one PR event).
///
/// Generated fresh for every CLI invocation; attached to the root span so all
/// activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// A GitHub user login (e.g. `"octocat"`).
    Login
}

string_id! {
    /// A GitHub organization login.
    OrganizationName
}

string_id! {
    /// The URL slug of a GitHub team (e.g. `"platform-team"`).
    TeamSlug
}

string_id! {
    /// The display name of a GitHub team (e.g. `"Cash & Community"`).
    ///
    /// Also used as a case-insensitive pattern against milestone titles.
    TeamName
}

string_id! {
    /// A GitHub issue/PR label name.
    LabelName
}

string_id! {
    /// A repository name without its owner.
    RepositoryName
}

string_id! {
    /// A Git branch name (e.g. `"main"`).
    BranchName
}
