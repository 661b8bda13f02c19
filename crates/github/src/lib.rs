//! GitHub infrastructure adapter.
//!
//! Implements the GitHub-facing traits defined in the [`automation`] crate
//! ([`automation::PullRequestApi`], [`automation::TeamDirectory`]) over the
//! GitHub REST API using `reqwest`, and decodes the Actions event payload into
//! an [`automation::PullRequestContext`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! All GitHub API details (authentication, pagination, status mapping) are
//! handled here; the [`automation`] crate never sees them.
//!
//! Two tokens are involved: the repository token drives [`RepositoryClient`],
//! the organization read token drives [`OrganizationClient`].

mod client;
mod event;
mod pulls;
mod teams;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use event::parse_pull_request_event;
pub use pulls::RepositoryClient;
pub use teams::OrganizationClient;
