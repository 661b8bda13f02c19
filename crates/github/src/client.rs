//! Authenticated REST transport shared by the repository and organization clients.

use std::time::Duration;

use automation::{AutomationError, RetryPolicy};
use reqwest::header::{self, HeaderMap};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const SERVICE: &str = "GitHub";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("pr-automation/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A GitHub REST client bound to one access token.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GitHubClient {
    /// Creates a client for the public API.
    pub fn new(token: impl Into<String>) -> Result<Self, AutomationError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AutomationError::Configuration {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
        })
    }

    /// Points the client at another API root (e.g. GitHub Enterprise).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_url, path))
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AutomationError> {
        let response = self
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        response.json::<T>().await.map_err(decode_error)
    }

    /// Fetches every page of a list endpoint.
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, AutomationError> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let query = [("per_page", PER_PAGE.to_string()), ("page", page.to_string())];
            let batch: Vec<T> = self.get_json(path, &query).await?;
            let next = next_page(page, batch.len());
            items.extend(batch);
            match next {
                Some(n) => page = n,
                None => break,
            }
        }
        debug!(path, items = items.len(), pages = page, "Fetched paginated list");
        Ok(items)
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), AutomationError> {
        let response = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}

/// A short page is the last one.
fn next_page(page: u32, batch_len: usize) -> Option<u32> {
    (batch_len >= PER_PAGE).then(|| page + 1)
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

async fn check_status(response: Response) -> Result<Response, AutomationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after = retry_after(response.headers());
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status, retry_after, &body))
}

/// Reads a `Retry-After` header given in seconds.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Builds the error for a non-success response, preferring GitHub's JSON
/// `message` over the raw body.
pub(crate) fn api_error(
    status: StatusCode,
    retry_after: Option<Duration>,
    body: &str,
) -> AutomationError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());
    AutomationError::ExternalApi {
        service: SERVICE.to_string(),
        message: format!("{status}: {message}"),
        retry: RetryPolicy::for_http_status(status.as_u16(), retry_after),
    }
}

fn transport_error(error: reqwest::Error) -> AutomationError {
    AutomationError::external(SERVICE, format!("request failed: {error}"))
}

fn decode_error(error: reqwest::Error) -> AutomationError {
    AutomationError::ExternalApi {
        service: SERVICE.to_string(),
        message: format!("unexpected response body: {error}"),
        retry: RetryPolicy::NonRetryable,
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
