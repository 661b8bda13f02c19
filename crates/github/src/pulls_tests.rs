#![allow(clippy::unwrap_used)]

use super::*;
use automation::{MilestoneState, Timestamp};
use serde_json::json;

fn client() -> RepositoryClient {
    RepositoryClient::new(
        GitHubClient::new("token").unwrap(),
        Login::new("apify").unwrap(),
        RepositoryName::new("apify-proxy").unwrap(),
    )
}

#[test]
fn paths_are_scoped_to_the_repository() {
    assert_eq!(
        client().repo_path("/issues/7/labels"),
        "/repos/apify/apify-proxy/issues/7/labels"
    );
}

#[test]
fn request_bodies_match_rest_schema() {
    let assignees = [Login::new("alice").unwrap(), Login::new("bob").unwrap()];
    let body = AssigneesUpdate {
        assignees: assignees.iter().map(Login::as_str).collect(),
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({ "assignees": ["alice", "bob"] })
    );

    let body = MilestoneUpdate {
        milestone: MilestoneNumber::new(22),
    };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "milestone": 22 }));

    let body = ReviewRequest {
        body: "Please link an issue",
        event: "COMMENT",
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({ "body": "Please link an issue", "event": "COMMENT" })
    );
}

#[test]
fn milestones_decode_from_rest_payload() {
    let payload = json!([
        {
            "number": 20,
            "title": "13th Sprint - Platform team",
            "description": "",
            "open_issues": 9,
            "closed_issues": 19,
            "state": "open",
            "created_at": "2021-05-10T07:53:55Z",
            "updated_at": "2021-05-24T12:13:32Z",
            "due_on": null,
            "closed_at": null
        },
        {
            "number": 22,
            "title": "14th Sprint - Platform team",
            "description": "",
            "open_issues": 15,
            "closed_issues": 0,
            "state": "closed",
            "created_at": "2021-05-24T08:16:56Z",
            "updated_at": "2021-05-24T13:20:19Z",
            "due_on": "2021-06-06T07:00:00Z",
            "closed_at": null
        }
    ]);

    let milestones: Vec<Milestone> = serde_json::from_value(payload).unwrap();

    assert_eq!(milestones[0].number, MilestoneNumber::new(20));
    assert_eq!(milestones[0].due_on, None);
    assert_eq!(milestones[1].state, MilestoneState::Closed);
    assert_eq!(
        milestones[1].due_on,
        Timestamp::parse_rfc3339("2021-06-06T07:00:00Z")
    );
}

#[test]
fn changed_files_decode_filenames() {
    let payload = json!([
        { "sha": "bbcd538c", "filename": "src/index.js", "status": "modified", "additions": 3 },
        { "sha": "f00d", "filename": "test/index.test.js", "status": "added", "additions": 40 }
    ]);
    let files: Vec<ChangedFile> = serde_json::from_value(payload).unwrap();
    let names: Vec<_> = files.into_iter().map(|f| f.filename).collect();
    assert_eq!(names, vec!["src/index.js", "test/index.test.js"]);
}
