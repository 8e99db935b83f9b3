//! Fetch client with dependency tagging.

use std::collections::HashMap;
use std::time::Instant;

use cartscout_commerce::LookupError;
use cartscout_observability::StructuredLogger;
use serde::de::DeserializeOwned;

use crate::dependency::DependencyTag;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// User agent sent with every request; Overpass and OSRM ask clients to identify themselves.
pub const USER_AGENT: &str = concat!("cartscout/", env!("CARGO_PKG_VERSION"));

/// Error type for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl From<FetchError> for LookupError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Timeout(msg) => LookupError::Timeout(msg),
            FetchError::Deserialization(msg) => LookupError::Malformed(msg),
            FetchError::Http { .. } | FetchError::Connection(_) | FetchError::Request(_) => {
                LookupError::Unavailable(e.to_string())
            }
        }
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from a dependency tag's defaults.
    pub fn from_tag(tag: DependencyTag) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(tag.default_timeout()),
            retry: RetryPolicy::new(tag.default_max_retries()),
        }
    }
}

/// An outbound request.
#[derive(Debug, Clone)]
pub enum FetchRequest {
    /// GET `url`.
    Get(String),
    /// POST `body` as plain text to `url`.
    PostText { url: String, body: String },
}

impl FetchRequest {
    /// Target URL.
    pub fn url(&self) -> &str {
        match self {
            FetchRequest::Get(url) => url,
            FetchRequest::PostText { url, .. } => url,
        }
    }
}

struct Lane {
    policy: FetchPolicy,
    http: reqwest::Client,
}

fn build_http(timeout: &TimeoutConfig) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(timeout.connect)
        .timeout(timeout.total)
        .build()
        .map_err(|e| FetchError::Request(e.to_string()))
}

/// HTTP client shared by the locator and the route planner.
///
/// Each dependency gets its own timeout and retry policy. Every request
/// outcome is logged with its dependency, URL, attempt count and duration.
pub struct FetchClient {
    lanes: HashMap<DependencyTag, Lane>,
    logger: StructuredLogger,
}

impl FetchClient {
    /// Create a client with each dependency's default policy.
    pub fn new(logger: StructuredLogger) -> Result<Self, FetchError> {
        let mut lanes = HashMap::new();
        for tag in DependencyTag::ALL {
            let policy = FetchPolicy::from_tag(tag);
            let http = build_http(&policy.timeout)?;
            lanes.insert(tag, Lane { policy, http });
        }
        Ok(Self {
            lanes,
            logger: logger.component("fetch"),
        })
    }

    /// Override the policy for one dependency.
    pub fn with_policy(mut self, tag: DependencyTag, policy: FetchPolicy) -> Result<Self, FetchError> {
        let http = build_http(&policy.timeout)?;
        self.lanes.insert(tag, Lane { policy, http });
        Ok(self)
    }

    /// Policy in effect for a dependency.
    pub fn policy(&self, tag: DependencyTag) -> FetchPolicy {
        self.lanes
            .get(&tag)
            .map(|lane| lane.policy.clone())
            .unwrap_or_else(|| FetchPolicy::from_tag(tag))
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        tag: DependencyTag,
    ) -> Result<T, FetchError> {
        self.fetch(FetchRequest::Get(url.to_string()), tag).await
    }

    /// POST a text body and decode the JSON response.
    pub async fn post_text_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: String,
        tag: DependencyTag,
    ) -> Result<T, FetchError> {
        self.fetch(
            FetchRequest::PostText {
                url: url.to_string(),
                body,
            },
            tag,
        )
        .await
    }

    /// Send with the dependency's timeout and retry policy.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: FetchRequest,
        tag: DependencyTag,
    ) -> Result<T, FetchError> {
        let lane = match self.lanes.get(&tag) {
            Some(lane) => lane,
            None => return Err(FetchError::Request(format!("no client for {}", tag))),
        };

        let started = Instant::now();
        let mut attempt = 0u32;
        loop {
            match self.attempt(&lane.http, &request).await {
                Ok(value) => {
                    self.logger
                        .debug_builder("fetch succeeded")
                        .field("dependency", tag.name())
                        .field("url", request.url())
                        .field_i64("attempts", i64::from(attempt) + 1)
                        .field_bool("retried", attempt > 0)
                        .duration_ms("duration_ms", started.elapsed())
                        .emit();
                    return Ok(value);
                }
                Err(e) if lane.policy.retry.should_retry(&e, attempt) => {
                    let delay = lane.policy.retry.backoff.delay_for_attempt(attempt);
                    self.logger
                        .debug_builder("fetch retrying")
                        .field("dependency", tag.name())
                        .field("url", request.url())
                        .field("error", e.to_string())
                        .duration_ms("backoff_ms", delay)
                        .emit();
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    self.logger
                        .warn_builder("fetch failed")
                        .field("dependency", tag.name())
                        .field("url", request.url())
                        .field("error", e.to_string())
                        .field_i64("attempts", i64::from(attempt) + 1)
                        .field_bool("retried", attempt > 0)
                        .duration_ms("duration_ms", started.elapsed())
                        .emit();
                    return Err(e);
                }
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        http: &reqwest::Client,
        request: &FetchRequest,
    ) -> Result<T, FetchError> {
        let builder = match request {
            FetchRequest::Get(url) => http.get(url),
            FetchRequest::PostText { url, body } => http
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(body.clone()),
        };

        let resp = builder.send().await?;

        let status = resp.status().as_u16();
        if status >= 400 {
            return Err(FetchError::Http {
                status,
                url: request.url().to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Deserialization(e.to_string()))
    }

    /// The logger used for fetch outcomes.
    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }
}
