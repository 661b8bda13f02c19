#![allow(clippy::unwrap_used)]

use super::*;
use reqwest::header::HeaderValue;

#[test]
fn api_error_prefers_json_message() {
    let err = api_error(
        StatusCode::NOT_FOUND,
        None,
        r#"{"message":"Not Found","documentation_url":"https://docs.github.com/rest"}"#,
    );
    assert_eq!(err.to_string(), "GitHub API error: 404 Not Found: Not Found");
    assert!(matches!(
        err,
        AutomationError::ExternalApi {
            retry: RetryPolicy::NonRetryable,
            ..
        }
    ));
}

#[test]
fn api_error_falls_back_to_raw_body() {
    let err = api_error(StatusCode::BAD_GATEWAY, None, "upstream down\n");
    assert_eq!(
        err.to_string(),
        "GitHub API error: 502 Bad Gateway: upstream down"
    );
}

#[test]
fn rate_limit_carries_retry_after() {
    let mut headers = HeaderMap::new();
    headers.insert(header::RETRY_AFTER, HeaderValue::from_static("30"));
    let wait = retry_after(&headers);
    assert_eq!(wait, Some(Duration::from_secs(30)));

    let err = api_error(StatusCode::FORBIDDEN, wait, r#"{"message":"secondary rate limit"}"#);
    assert!(matches!(
        err,
        AutomationError::ExternalApi {
            retry: RetryPolicy::Retryable { after: Some(_) },
            ..
        }
    ));
}

#[test]
fn unparseable_retry_after_is_ignored() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::RETRY_AFTER,
        HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
    );
    assert_eq!(retry_after(&headers), None);
    assert_eq!(retry_after(&HeaderMap::new()), None);
}

#[test]
fn debug_output_redacts_token() {
    let client = GitHubClient::new("ghp_secret")
        .unwrap()
        .with_api_url("https://github.example.com/api/v3/");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("ghp_secret"));
    assert!(rendered.contains("https://github.example.com/api/v3\""));
}

#[test]
fn full_page_asks_for_the_next_one() {
    assert_eq!(next_page(1, PER_PAGE), Some(2));
    assert_eq!(next_page(7, PER_PAGE), Some(8));
}

#[test]
fn short_or_empty_page_ends_pagination() {
    assert_eq!(next_page(1, PER_PAGE - 1), None);
    assert_eq!(next_page(3, 0), None);
}
