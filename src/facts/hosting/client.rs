//! GitHub API client
//!
//! Minimal HTTP client for the GitHub REST and GraphQL endpoints. Calls are classified into
//! [`HostingApiResult`] so callers can tell rate limiting and missing repositories apart from
//! other failures.

use chrono::{DateTime, Utc};
use ohno::{EnrichableExt, IntoAppError};
use reqwest::header::HeaderMap;
use serde::Serialize;

const LOG_TARGET: &str = "    github";

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Result of a hosting API call
#[derive(Debug)]
pub enum HostingApiResult<T> {
    /// Request succeeded - contains data and optional rate limit info
    Success(T, Option<RateLimitInfo>),

    /// Rate limited
    RateLimited(RateLimitInfo),

    /// The requested resource was not found (404)
    NotFound(Option<RateLimitInfo>),

    /// Request failed
    Failed(ohno::AppError, Option<RateLimitInfo>),
}

impl<T> HostingApiResult<T> {
    /// Rate limit information that came with the response, if any.
    pub const fn rate_limit(&self) -> Option<RateLimitInfo> {
        match self {
            Self::Success(_, rate_limit) | Self::NotFound(rate_limit) | Self::Failed(_, rate_limit) => *rate_limit,
            Self::RateLimited(rate_limit) => Some(*rate_limit),
        }
    }

    /// Collapse the classification into a plain result, describing non-success outcomes.
    pub fn into_result(self, what: impl AsRef<str>) -> crate::Result<T> {
        let what = what.as_ref();

        if let Some(info) = self.rate_limit() {
            log::debug!(
                target: LOG_TARGET,
                "{} GitHub API requests left after fetching {what}, quota resets at {}",
                info.remaining,
                info.reset_at.to_rfc3339()
            );
        }

        match self {
            Self::Success(data, _) => Ok(data),
            Self::RateLimited(rate_limit) => Err(ohno::app_err!(
                "rate limited while fetching {what}, limit resets at {}",
                rate_limit.reset_at.to_rfc3339()
            )),
            Self::NotFound(_) => Err(ohno::app_err!("{what} not found")),
            Self::Failed(e, _) => Err(e),
        }
    }
}

/// Hosting API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new hosting API client with optional authentication token and base URL
    pub fn new(token: Option<&str>, base_url: impl Into<String>) -> crate::Result<Self> {
        use reqwest::header::{AUTHORIZATION, HeaderValue};

        let mut client_builder = reqwest::Client::builder().user_agent("pkg-rate");

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("bearer {t}")).into_app_err("invalid GitHub token")?;
            auth_val.set_sensitive(true);

            let mut headers = HeaderMap::new();
            let _ = headers.insert(AUTHORIZATION, auth_val);

            client_builder = client_builder.default_headers(headers);
        }

        Ok(Self {
            client: client_builder.build().into_app_err("unable to create HTTP client")?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET request against a path relative to the base URL
    pub async fn get(&self, path: &str) -> HostingApiResult<reqwest::Response> {
        let url = format!("{}{path}", self.base_url);
        Self::classify(self.client.get(&url).send().await, &url)
    }

    /// Issue a POST request with a JSON body against a path relative to the base URL
    pub async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> HostingApiResult<reqwest::Response> {
        let url = format!("{}{path}", self.base_url);
        Self::classify(self.client.post(&url).json(body).send().await, &url)
    }

    fn classify(resp: reqwest::Result<reqwest::Response>, url: &str) -> HostingApiResult<reqwest::Response> {
        let resp = match resp {
            Ok(r) => r,
            Err(e) => return HostingApiResult::Failed(ohno::AppError::new(e).enrich(format!("request to '{url}' failed")), None),
        };

        // Extract rate limit info from response headers before checking status
        let rate_limit = extract_rate_limit_from_headers(resp.headers());

        let status = resp.status();
        if status.is_success() {
            return HostingApiResult::Success(resp, rate_limit);
        }

        let status_code = status.as_u16();
        if matches!(status_code, 403 | 429) && rate_limit.is_none_or(|info| info.remaining == 0) {
            let rate_limit = rate_limit.unwrap_or_else(|| RateLimitInfo {
                remaining: 0,
                reset_at: Utc::now() + chrono::Duration::hours(1),
            });
            return HostingApiResult::RateLimited(rate_limit);
        }

        if status_code == 404 {
            return HostingApiResult::NotFound(rate_limit);
        }

        HostingApiResult::Failed(ohno::app_err!("request to '{url}' failed with HTTP status {status}"), rate_limit)
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}
