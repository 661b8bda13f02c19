//! ZenHub infrastructure adapter.
//!
//! Implements [`automation::IssueTracker`] over the ZenHub public GraphQL API.
//! Estimates and timelines are read with `issueByInfo`, which addresses issues
//! and pull requests by GitHub repository id and number. Workspace membership
//! comes from `workspace.repositoriesConnection`.
//!
//! ## Module Layout
//!
//! | Module   | Contents                                                    |
//! |----------|-------------------------------------------------------------|
//! | `client` | [`ZenHubClient`]: transport, status mapping, pagination     |
//! | `wire`   | GraphQL documents and response decoding into domain types  |

mod client;
mod wire;

pub use client::{ZenHubClient, DEFAULT_API_URL};
