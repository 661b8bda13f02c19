//! Organization team listing.

use async_trait::async_trait;
use automation::{AutomationError, Login, OrganizationName, Team, TeamDirectory, TeamSlug};
use serde::Deserialize;
use tracing::instrument;

use crate::GitHubClient;

/// [`TeamDirectory`] backed by the organization's teams API.
///
/// Needs a token with `read:org`; the repository token usually lacks it.
#[derive(Debug, Clone)]
pub struct OrganizationClient {
    client: GitHubClient,
    org: OrganizationName,
}

#[derive(Deserialize)]
struct Member {
    login: Login,
}

impl OrganizationClient {
    pub fn new(client: GitHubClient, org: OrganizationName) -> Self {
        Self { client, org }
    }

    pub(crate) fn team_path(&self, team: &TeamSlug, suffix: &str) -> String {
        format!("/orgs/{}/teams/{}{}", self.org, team, suffix)
    }
}

#[async_trait]
impl TeamDirectory for OrganizationClient {
    #[instrument(skip(self), fields(org = %self.org))]
    async fn list_child_teams(&self, parent: &TeamSlug) -> Result<Vec<Team>, AutomationError> {
        self.client
            .get_all_pages(&self.team_path(parent, "/teams"))
            .await
    }

    #[instrument(skip(self), fields(org = %self.org))]
    async fn list_team_members(&self, team: &TeamSlug) -> Result<Vec<Login>, AutomationError> {
        let members: Vec<Member> = self
            .client
            .get_all_pages(&self.team_path(team, "/members"))
            .await?;
        Ok(members.into_iter().map(|m| m.login).collect())
    }
}

#[cfg(test)]
#[path = "teams_tests.rs"]
mod tests;
