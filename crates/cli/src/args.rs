//! Command-line arguments and their validation into [`AutomationConfig`].
//!
//! Every flag can also be supplied through the environment variable GitHub
//! Actions sets for the matching action input (`INPUT_<NAME>`).

use std::path::PathBuf;
use std::time::Duration;

use automation::{
    AutomationConfig, AutomationError, Login, OrganizationName, RepositoryName, RetrySettings,
    TeamName, TeamSlug,
};
use clap::Parser;

/// Assigns team bookkeeping to a pull request and verifies its ZenHub
/// linking and estimates.
#[derive(Parser, Debug)]
#[command(name = "pr-automation", version, about, long_about = None)]
pub struct Args {
    /// Token for the repository the pull request belongs to
    #[arg(long, env = "INPUT_REPO_TOKEN", hide_env_values = true)]
    pub repo_token: String,

    /// Token able to read organization teams
    #[arg(long, env = "INPUT_ORG_TOKEN", hide_env_values = true)]
    pub org_token: String,

    /// ZenHub GraphQL API key
    #[arg(long, env = "INPUT_ZENHUB_TOKEN", hide_env_values = true)]
    pub zenhub_token: String,

    #[arg(long, env = "INPUT_ZENHUB_WORKSPACE_ID")]
    pub zenhub_workspace_id: String,

    #[arg(long, env = "INPUT_ORGANIZATION", default_value = "apify")]
    pub organization: String,

    /// Slug of the team whose child teams are product teams
    #[arg(long, env = "INPUT_PARENT_TEAM", default_value = "product-engineering")]
    pub parent_team: String,

    /// Team label override as `TEAM NAME=label`; added to the built-in ones
    #[arg(
        long = "team-label-override",
        env = "INPUT_TEAM_LABEL_OVERRIDES",
        value_delimiter = ',',
        value_parser = parse_override
    )]
    pub team_label_overrides: Vec<(String, String)>,

    /// Team whose pull requests skip the ZenHub checks
    #[arg(long = "excluded-team", env = "INPUT_EXCLUDED_TEAMS", value_delimiter = ',')]
    pub excluded_teams: Vec<String>,

    #[arg(long, env = "INPUT_DRY_RUN_COOLDOWN_SECS", default_value_t = 60)]
    pub dry_run_cooldown_secs: u64,

    #[arg(long, env = "INPUT_VERIFICATION_RETRIES", default_value_t = 2)]
    pub verification_retries: u32,

    #[arg(long, env = "INPUT_VERIFICATION_RETRY_DELAY_SECS", default_value_t = 30)]
    pub verification_retry_delay_secs: u64,

    #[arg(long, env = "INPUT_TESTED_LABEL", default_value = "tested")]
    pub tested_label: String,

    #[arg(long, env = "INPUT_TEAM_LABEL_PREFIX", default_value = "t-")]
    pub team_label_prefix: String,

    #[arg(long, env = "INPUT_ADHOC_LABEL", default_value = "adhoc")]
    pub adhoc_label: String,

    /// Path of the webhook payload that triggered the workflow
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// Repository the workflow runs in, as `owner/repo`
    #[arg(long, env = "GITHUB_REPOSITORY", value_parser = parse_repository)]
    pub repository: (Login, RepositoryName),
}

impl Args {
    /// Builds and validates the automation configuration.
    pub fn automation_config(&self) -> Result<AutomationConfig, AutomationError> {
        let organization = OrganizationName::new(self.organization.trim())
            .ok_or_else(|| configuration("organization must not be empty"))?;
        let parent_team = TeamSlug::new(self.parent_team.trim())
            .ok_or_else(|| configuration("parent team must not be empty"))?;

        let mut config = AutomationConfig::new(organization, parent_team);
        config.team_label_overrides.extend(self.team_label_overrides.iter().cloned());
        config.excluded_teams = self
            .excluded_teams
            .iter()
            .filter_map(|name| TeamName::new(name.trim()))
            .collect();
        config.team_label_prefix = self.team_label_prefix.clone();
        config.adhoc_label = self.adhoc_label.clone();
        config.tested_label = self.tested_label.clone();
        config.dry_run_cooldown = Duration::from_secs(self.dry_run_cooldown_secs);
        config.verification_retry = RetrySettings {
            max_retries: self.verification_retries,
            delay: Duration::from_secs(self.verification_retry_delay_secs),
        };

        config.validate()?;
        Ok(config)
    }
}

fn configuration(message: &str) -> AutomationError {
    AutomationError::Configuration {
        message: message.to_string(),
    }
}

fn parse_override(value: &str) -> Result<(String, String), String> {
    let (team, label) = value
        .split_once('=')
        .ok_or_else(|| format!("expected TEAM=LABEL, got \"{value}\""))?;
    let (team, label) = (team.trim(), label.trim());
    if team.is_empty() || label.is_empty() {
        return Err(format!("expected TEAM=LABEL, got \"{value}\""));
    }
    Ok((team.to_string(), label.to_string()))
}

fn parse_repository(value: &str) -> Result<(Login, RepositoryName), String> {
    let invalid = || format!("expected OWNER/REPO, got \"{value}\"");
    let (owner, repo) = value.split_once('/').ok_or_else(invalid)?;
    if repo.contains('/') {
        return Err(invalid());
    }
    let owner = Login::new(owner).ok_or_else(invalid)?;
    let repo = RepositoryName::new(repo).ok_or_else(invalid)?;
    Ok((owner, repo))
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
