//! Event-log reducer for tracker timelines.
//!
//! A PR's tracker timeline is an append-only log of link and epic events. The
//! functions here replay it into the PR's *current* linked issue and linked
//! epics. Both are pure: the result depends only on the events passed in and is
//! recomputed on every call.

use crate::{AutomationError, IssueId, IssueRef, TimelineEvent, TimelineEventKind, Timestamp};

/// Link-state transition carried by a connect/disconnect event.
enum LinkChange<'a> {
    Connected(&'a TimelineEvent),
    Disconnected,
}

/// Epic-membership transition carried by an add/remove event.
enum EpicChange<'a> {
    Added(&'a IssueRef),
    Removed(IssueId),
}

/// Returns the issue the PR is currently linked to, if any.
///
/// Only connect/disconnect events are considered. They are stable-sorted by
/// creation time, so events sharing a timestamp keep their input order, and
/// the last one decides: a disconnect means no linked issue, a connect yields
/// its issue with the event's repository attached.
pub fn linked_issue(events: &[TimelineEvent]) -> Result<Option<IssueRef>, AutomationError> {
    let mut changes: Vec<(Timestamp, LinkChange<'_>)> = events
        .iter()
        .filter_map(|event| match event.kind {
            TimelineEventKind::ConnectPrToIssue => {
                Some((event.created_at, LinkChange::Connected(event)))
            }
            TimelineEventKind::DisconnectPrFromIssue => {
                Some((event.created_at, LinkChange::Disconnected))
            }
            TimelineEventKind::AddIssueToEpic
            | TimelineEventKind::RemoveIssueFromEpic
            | TimelineEventKind::Other => None,
        })
        .collect();
    changes.sort_by_key(|(created_at, _)| *created_at);

    match changes.pop() {
        None | Some((_, LinkChange::Disconnected)) => Ok(None),
        Some((_, LinkChange::Connected(event))) => {
            let mut issue = event_issue(event)?.clone();
            if let Some(repo) = &event.repo {
                issue.repo = Some(repo.clone());
            }
            Ok(Some(issue))
        }
    }
}

/// Returns the epics the PR currently belongs to.
///
/// Add/remove events are stable-sorted by creation time and replayed into a
/// map keyed by issue id: an add inserts the issue, or overwrites it in place
/// when already present; a remove deletes it. The result lists survivors in the
/// map's insertion order, not in the order of their latest event.
pub fn linked_epics(events: &[TimelineEvent]) -> Result<Vec<IssueRef>, AutomationError> {
    let mut changes: Vec<(Timestamp, EpicChange<'_>)> = Vec::new();
    for event in events {
        let change = match event.kind {
            TimelineEventKind::AddIssueToEpic => EpicChange::Added(event_issue(event)?),
            TimelineEventKind::RemoveIssueFromEpic => EpicChange::Removed(event_issue(event)?.id),
            TimelineEventKind::ConnectPrToIssue
            | TimelineEventKind::DisconnectPrFromIssue
            | TimelineEventKind::Other => continue,
        };
        changes.push((event.created_at, change));
    }
    changes.sort_by_key(|(created_at, _)| *created_at);

    let mut epics: Vec<IssueRef> = Vec::new();
    for (_, change) in changes {
        match change {
            EpicChange::Added(issue) => {
                match epics.iter_mut().find(|existing| existing.id == issue.id) {
                    Some(existing) => *existing = issue.clone(),
                    None => epics.push(issue.clone()),
                }
            }
            EpicChange::Removed(id) => epics.retain(|existing| existing.id != id),
        }
    }
    Ok(epics)
}

fn event_issue(event: &TimelineEvent) -> Result<&IssueRef, AutomationError> {
    event.issue.as_ref().ok_or_else(|| {
        AutomationError::inconsistency(format!(
            "timeline event {} ({:?}) carries no issue",
            event.id, event.kind
        ))
    })
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
