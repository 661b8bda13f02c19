//! Team and milestone resolution.
//!
//! Product teams are the child teams of a configured parent team. A PR author
//! belongs to the first child team that lists them as a member; that team
//! decides the PR's sprint milestone and team label.

use regex::RegexBuilder;
use tracing::{debug, info, instrument};

use crate::{
    AutomationConfig, AutomationError, Login, Milestone, Team, TeamDirectory, TeamName,
    Timestamp,
};

/// Returns the first child team of the parent team that `actor` belongs to.
///
/// Teams are checked in listing order and membership is fetched lazily, so
/// teams after the first match are never queried. `Ok(None)` means the actor
/// is not in any product team.
#[instrument(skip(directory, config), fields(parent = %config.parent_team))]
pub async fn resolve_team(
    directory: &dyn TeamDirectory,
    config: &AutomationConfig,
    actor: &Login,
) -> Result<Option<Team>, AutomationError> {
    let teams = directory.list_child_teams(&config.parent_team).await?;
    if teams.is_empty() {
        return Err(AutomationError::NoTeamsConfigured);
    }

    for team in teams {
        let members = directory.list_team_members(&team.slug).await?;
        if members.contains(actor) {
            info!(user = %actor, team = %team.name, "User belongs to a team");
            return Ok(Some(team));
        }
        debug!(team = %team.name, "User is not a member");
    }
    Ok(None)
}

/// Finds the team's current sprint milestone.
///
/// Only open milestones that are not past due (or have no due date) are
/// eligible. Among them, the first one in input order whose title matches
/// `team_name` wins. The team name is compiled as a case-insensitive regular
/// expression and may match anywhere in the title, so `"Console"` matches
/// `"14th Sprint - Console team"`.
pub fn find_current_team_milestone<'a>(
    milestones: &'a [Milestone],
    team_name: &TeamName,
    now: Timestamp,
) -> Result<&'a Milestone, AutomationError> {
    let pattern = RegexBuilder::new(team_name.as_str())
        .case_insensitive(true)
        .build()
        .map_err(|e| AutomationError::InvalidTeamPattern {
            team: team_name.to_string(),
            message: e.to_string(),
        })?;

    milestones
        .iter()
        .filter(|milestone| milestone.is_current(now))
        .find(|milestone| pattern.is_match(&milestone.title))
        .ok_or_else(|| AutomationError::MilestoneNotFound {
            team: team_name.to_string(),
        })
}

/// Returns the label that marks PRs of `team_name`.
///
/// An explicit override wins; otherwise the label is the configured prefix
/// followed by the lower-cased team name.
pub fn team_label_name(config: &AutomationConfig, team_name: &TeamName) -> String {
    match config.team_label_overrides.get(team_name.as_str()) {
        Some(label) => label.clone(),
        None => format!(
            "{}{}",
            config.team_label_prefix,
            team_name.as_str().to_lowercase()
        ),
    }
}

#[cfg(test)]
#[path = "teams_tests.rs"]
mod tests;
