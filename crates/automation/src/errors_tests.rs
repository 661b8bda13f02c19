use super::*;

#[test]
fn server_errors_and_rate_limits_are_retryable() {
    assert_eq!(
        RetryPolicy::for_http_status(502, None),
        RetryPolicy::Retryable { after: None }
    );
    assert_eq!(
        RetryPolicy::for_http_status(429, Some(Duration::from_secs(5))),
        RetryPolicy::Retryable {
            after: Some(Duration::from_secs(5))
        }
    );
    assert_eq!(
        RetryPolicy::for_http_status(403, Some(Duration::from_secs(60))),
        RetryPolicy::Retryable {
            after: Some(Duration::from_secs(60))
        }
    );
}

#[test]
fn client_errors_are_not_retryable() {
    assert_eq!(RetryPolicy::for_http_status(401, None), RetryPolicy::NonRetryable);
    assert_eq!(RetryPolicy::for_http_status(403, None), RetryPolicy::NonRetryable);
    assert_eq!(RetryPolicy::for_http_status(404, None), RetryPolicy::NonRetryable);
    assert_eq!(RetryPolicy::for_http_status(422, None), RetryPolicy::NonRetryable);
}

#[test]
fn verification_failures_may_clear_on_retry() {
    let err = AutomationError::Verification(FailureReason::NoEstimate);
    assert_eq!(err.retry_policy(), RetryPolicy::Retryable { after: None });
    assert_eq!(err.to_string(), "Neither PR nor linked issue has an estimate");
}

#[test]
fn domain_lookups_fail_fast() {
    assert_eq!(
        AutomationError::NoTeamsConfigured.retry_policy(),
        RetryPolicy::NonRetryable
    );
    assert_eq!(
        AutomationError::inconsistency("x").retry_policy(),
        RetryPolicy::NonRetryable
    );
    assert_eq!(
        AutomationError::MilestoneNotFound {
            team: "Platform".to_string()
        }
        .to_string(),
        "Cannot find milestone for \"Platform\" team"
    );
}
