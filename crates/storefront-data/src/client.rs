//! JSON-over-HTTP client with timeout and retry.

use crate::error::error_message;
use crate::retry::{retry_with_backoff, BackoffStrategy, RetryPolicy};
use crate::timeout::TimeoutConfig;
use crate::FetchError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: TimeoutConfig,
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Total timeout, attempt count and first retry delay, as found in
    /// client configuration files.
    pub fn from_settings(timeout: Duration, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(timeout),
            retry: RetryPolicy::new(max_attempts)
                .with_backoff(BackoffStrategy::exponential(retry_delay)),
        }
    }
}

/// HTTP client bound to one API base URL.
///
/// Requests are sent as `{base_url}{path}`; every request gets the policy's
/// timeout and is retried according to its retry policy.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: String,
    policy: FetchPolicy,
}

impl FetchClient {
    pub fn new(base_url: impl Into<String>, policy: FetchPolicy) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(policy.timeout.connect)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// `GET` a JSON document.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        bearer: Option<&str>,
    ) -> Result<T, FetchError> {
        let url = self.url(path);
        self.send(&url, || {
            let request = self.http.get(&url).query(query);
            with_bearer(request, bearer)
        })
        .await
    }

    /// `POST` a JSON body and read a JSON answer.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        self.send(&url, || with_bearer(self.http.post(&url).json(body), bearer))
            .await
    }

    async fn send<T, F>(&self, url: &str, build: F) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        F: Fn() -> reqwest::RequestBuilder,
    {
        retry_with_backoff(&self.policy.retry, || {
            let request = build().timeout(self.policy.timeout.total);
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| FetchError::from_reqwest(e, url))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(FetchError::Http {
                        status: status.as_u16(),
                        url: url.to_string(),
                        message: error_message(&body),
                    });
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| FetchError::from_reqwest(e, url))?;
                debug!(url, status = status.as_u16(), bytes = bytes.len(), "fetched");
                Ok(serde_json::from_slice(&bytes)?)
            }
        })
        .await
    }
}

fn with_bearer(request: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// The payload of a `{ "data": ..., "meta": ... }` envelope, or the value
/// itself when it is not enveloped.
pub(crate) fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut obj) if obj.contains_key("data") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joining() {
        let client = FetchClient::new("http://localhost:5000/api/", FetchPolicy::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/products"), "http://localhost:5000/api/products");
        assert_eq!(client.url("products"), "http://localhost:5000/api/products");
        assert_eq!(client.url("https://other.example/x"), "https://other.example/x");
    }

    #[test]
    fn test_policy_from_settings() {
        let policy = FetchPolicy::from_settings(Duration::from_secs(10), 3, Duration::from_millis(1000));
        assert_eq!(policy.timeout.total, Duration::from_secs(10));
        assert_eq!(policy.retry.max_attempts, 3);
        assert_eq!(policy, FetchPolicy::default());
    }

    #[test]
    fn test_unwrap_data() {
        assert_eq!(unwrap_data(json!({"data": [1], "meta": {}})), json!([1]));
        assert_eq!(unwrap_data(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_data(json!({"user": 1})), json!({"user": 1}));
    }
}
