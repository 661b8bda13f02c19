#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

fn repo(owner: &str) -> serde_json::Value {
    json!({
        "id": 264953367,
        "name": "apify-proxy",
        "full_name": format!("{owner}/apify-proxy"),
        "owner": { "login": owner, "type": "Organization" },
        "default_branch": "master"
    })
}

fn payload(head_repo: serde_json::Value) -> String {
    json!({
        "action": "opened",
        "number": 7,
        "pull_request": {
            "number": 7,
            "title": "Rotate upstream sessions",
            "user": { "login": "alice" },
            "assignees": [{ "login": "bob" }],
            "labels": [{ "id": 1, "name": "adhoc", "color": "ededed" }],
            "milestone": null,
            "base": { "ref": "master", "repo": repo("apify") },
            "head": { "ref": "feature/sessions", "repo": head_repo }
        }
    })
    .to_string()
}

#[test]
fn parses_pull_request_context() {
    let pr = parse_pull_request_event(&payload(repo("apify"))).unwrap();

    assert_eq!(pr.number, PullRequestNumber::new(7));
    assert_eq!(pr.author.as_str(), "alice");
    assert_eq!(pr.assignees, vec![Login::new("bob").unwrap()]);
    assert!(pr.has_label("adhoc"));
    assert_eq!(pr.milestone, None);
    assert_eq!(pr.base_ref.as_str(), "master");
    assert_eq!(pr.base_repo.id, RepositoryGhId::new(264953367));
    assert_eq!(pr.base_repo.default_branch.as_str(), "master");
    assert_eq!(pr.head_repo.unwrap().owner.as_str(), "apify");
}

#[test]
fn deleted_fork_has_no_head_repository() {
    let pr = parse_pull_request_event(&payload(serde_json::Value::Null)).unwrap();
    assert_eq!(pr.head_repo, None);
}

#[test]
fn milestone_number_is_kept() {
    let mut value: serde_json::Value = serde_json::from_str(&payload(repo("apify"))).unwrap();
    value["pull_request"]["milestone"] = json!({ "number": 22, "title": "14th Sprint" });
    let pr = parse_pull_request_event(&value.to_string()).unwrap();
    assert_eq!(pr.milestone, Some(MilestoneNumber::new(22)));
}

#[test]
fn non_pull_request_event_is_rejected() {
    let err = parse_pull_request_event(r#"{"action":"opened","issue":{"number":1}}"#).unwrap_err();
    assert_eq!(err.to_string(), "Configuration error: Action works only for PRs");
}

#[test]
fn malformed_payload_is_rejected() {
    let err = parse_pull_request_event("not json").unwrap_err();
    assert!(matches!(err, AutomationError::Configuration { .. }));
}
