//! Run configuration.
//!
//! [`AutomationConfig`] is built once by the CLI and passed by reference into
//! every component. Nothing in the domain reads the environment directly.

use std::collections::HashMap;
use std::time::Duration;

use crate::{AutomationError, OrganizationName, TeamName, TeamSlug};

/// Default prefix of generated team labels.
pub const DEFAULT_TEAM_LABEL_PREFIX: &str = "t-";

/// Bounded retry schedule for the real verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

/// Immutable configuration for one automation run.
#[derive(Debug, Clone)]
pub struct AutomationConfig {
    /// Organization that owns the repositories and teams.
    pub organization: OrganizationName,

    /// Team whose child teams define the product teams.
    pub parent_team: TeamSlug,

    /// Explicit team name to label name mapping (e.g. `"Cash & Community"` → `"t-c&c"`).
    pub team_label_overrides: HashMap<String, String>,

    /// Prefix of generated team labels; a PR carrying any label with this
    /// prefix is considered already labelled.
    pub team_label_prefix: String,

    /// Teams whose PRs skip the tracker linking/estimate check.
    pub excluded_teams: Vec<TeamName>,

    /// Label marking a PR as intentionally unlinked.
    pub adhoc_label: String,

    /// Label added to PRs that touch test files.
    pub tested_label: String,

    /// Wait between the dry verification run and the real one.
    pub dry_run_cooldown: Duration,

    /// Retry schedule of the real verification run.
    pub verification_retry: RetrySettings,
}

impl AutomationConfig {
    /// Creates a configuration with the defaults used by the organization's
    /// repositories.
    pub fn new(organization: OrganizationName, parent_team: TeamSlug) -> Self {
        let mut team_label_overrides = HashMap::new();
        team_label_overrides.insert("Cash & Community".to_string(), "t-c&c".to_string());

        Self {
            organization,
            parent_team,
            team_label_overrides,
            team_label_prefix: DEFAULT_TEAM_LABEL_PREFIX.to_string(),
            excluded_teams: Vec::new(),
            adhoc_label: "adhoc".to_string(),
            tested_label: "tested".to_string(),
            dry_run_cooldown: Duration::from_secs(60),
            verification_retry: RetrySettings {
                max_retries: 2,
                delay: Duration::from_secs(30),
            },
        }
    }

    /// Returns `true` if the team's PRs are exempt from tracker checks.
    pub fn is_team_excluded(&self, team: &TeamName) -> bool {
        self.excluded_teams.contains(team)
    }

    /// Checks invariants that cannot be expressed in the field types.
    pub fn validate(&self) -> Result<(), AutomationError> {
        let invalid = |message: &str| AutomationError::Configuration {
            message: message.to_string(),
        };

        if self.team_label_prefix.is_empty() {
            return Err(invalid("team label prefix must not be empty"));
        }
        if self.adhoc_label.is_empty() {
            return Err(invalid("adhoc label must not be empty"));
        }
        if self.tested_label.is_empty() {
            return Err(invalid("tested label must not be empty"));
        }
        if let Some((name, _)) = self
            .team_label_overrides
            .iter()
            .find(|(name, label)| name.is_empty() || label.is_empty())
        {
            return Err(AutomationError::Configuration {
                message: format!("team label override for \"{name}\" is incomplete"),
            });
        }
        Ok(())
    }
}
