//! Generation API interaction with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`CompletionClient`]: core trait for sending a system + user prompt to the model
//! - [`AnthropicClient`]: single-attempt client for the Anthropic Messages API
//! - [`RetryingClient`]: decorator adding retries and backoff to any [`CompletionClient`]
//! - [`CallContext`]: cancellation token plus optional deadline, observed by
//!   in-flight requests and backoff waits alike
//!
//! # Retry Strategy
//!
//! - 3 attempts in total
//! - Before retry `k` the caller waits `2^k` seconds (2s, then 4s)
//! - Only transient failures are retried, see [`ApiError::is_retryable`]

use crate::config::AiConfig;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Cancellation signal and optional deadline for one generation run.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`ApiError::DeadlineExceeded`] once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Cancel this context and every clone of it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The error the context is already in, if any.
    pub fn err(&self) -> Option<ApiError> {
        if self.cancel.is_cancelled() {
            Some(ApiError::Cancelled)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(ApiError::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Resolves when the context is cancelled or its deadline passes.
    pub async fn done(&self) -> ApiError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.cancel.cancelled() => ApiError::Cancelled,
                _ = sleep_until(deadline) => ApiError::DeadlineExceeded,
            },
            None => {
                self.cancel.cancelled().await;
                ApiError::Cancelled
            }
        }
    }
}

/// Trait for sending prompts to a language model.
///
/// Implementors perform exactly one request per call; retrying is layered on
/// top by [`RetryingClient`].
pub trait CompletionClient {
    /// Send `system_prompt` and `user_prompt`, returning the model's raw text.
    async fn complete(
        &self,
        ctx: &CallContext,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ApiError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Single-attempt client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, ai: &AiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("awful_autoblog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            api_url: ai.api_url.clone(),
            model: ai.model.clone(),
            max_tokens: ai.max_tokens,
            temperature: ai.temperature,
            timeout: Duration::from_secs(ai.timeout_seconds),
        })
    }

    async fn send(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ApiError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: system_prompt,
            messages: [Message {
                role: "user",
                content: user_prompt,
            }],
        };

        debug!(
            url = %self.api_url,
            model = %self.model,
            max_tokens = self.max_tokens,
            temperature = self.temperature,
            "Sending request to generation API"
        );

        let t0 = std::time::Instant::now();
        let resp = self
            .http
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;

        debug!(
            status = status.as_u16(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Received response from generation API"
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)?;
        let first = parsed.content.into_iter().next().ok_or(ApiError::NoContent)?;
        if first.text.trim().is_empty() {
            return Err(ApiError::NoContent);
        }
        debug!(response_length = first.text.len(), "Received content from API");
        Ok(first.text)
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e)
    }
}

impl CompletionClient for AnthropicClient {
    #[instrument(level = "debug", skip_all)]
    async fn complete(
        &self,
        ctx: &CallContext,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ApiError> {
        if let Some(e) = ctx.err() {
            return Err(e);
        }
        tokio::select! {
            res = self.send(system_prompt, user_prompt) => {
                if let Err(e) = &res {
                    warn!(error = %e, "API call failed");
                }
                res
            }
            e = ctx.done() => Err(e),
        }
    }
}

/// Retry budget and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: usize,
    /// Backoff before retry `k` is `unit * 2^k`.
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based).
    pub fn backoff(&self, retry: usize) -> Duration {
        self.unit.saturating_mul(1u32 << retry.min(16))
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`CompletionClient`].
pub struct RetryingClient<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> RetryingClient<T> {
    pub fn with_policy(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T> fmt::Debug for RetryingClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<T> CompletionClient for RetryingClient<T>
where
    T: CompletionClient,
{
    #[instrument(level = "info", skip_all)]
    async fn complete(
        &self,
        ctx: &CallContext,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ApiError> {
        let max = self.policy.max_attempts.max(1);
        let total_t0 = Instant::now();
        let mut last_err = None;

        for attempt in 0..max {
            if attempt > 0 {
                let delay = self.policy.backoff(attempt);
                info!(
                    attempt = attempt + 1,
                    max,
                    ?delay,
                    "Retrying API call after backoff"
                );
                tokio::select! {
                    _ = sleep(delay) => {}
                    e = ctx.done() => {
                        warn!(attempt = attempt + 1, error = %e, "Context done during retry backoff");
                        return Err(e);
                    }
                }
            }

            let attempt_t0 = Instant::now();
            match self.inner.complete(ctx, system_prompt, user_prompt).await {
                Ok(text) => {
                    if attempt > 0 {
                        info!(attempt = attempt + 1, "API call succeeded after retry");
                    }
                    return Ok(text);
                }
                Err(e) if !e.is_retryable() => {
                    warn!(attempt = attempt + 1, error = %e, "Non-retryable error encountered");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max,
                        elapsed_ms_attempt = attempt_t0.elapsed().as_millis() as u64,
                        error = %e,
                        "Retryable error encountered"
                    );
                    last_err = Some(e);
                }
            }
        }

        let last = last_err.unwrap_or(ApiError::NoContent);
        error!(
            max,
            elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
            last_error = %last,
            "Max retries exceeded"
        );
        Err(ApiError::MaxRetriesExceeded {
            attempts: max,
            source: Box::new(last),
        })
    }
}

impl<T: CompletionClient> CompletionClient for &T {
    async fn complete(
        &self,
        ctx: &CallContext,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ApiError> {
        (**self).complete(ctx, system_prompt, user_prompt).await
    }
}

/// Call the model with exponential backoff retry logic.
///
/// Wraps `client` in a [`RetryingClient`] for the duration of one call, so
/// transient failures (5xx, 429, timeouts, refused connections) are retried
/// and everything else is returned immediately. Backoff waits and in-flight
/// requests both end early when `ctx` is cancelled or its deadline passes.
///
/// # Arguments
///
/// * `client` - Single-attempt client, borrowed for the call
/// * `policy` - Attempt budget and backoff unit; [`RetryPolicy::default`] is
///   3 attempts waiting 2s then 4s
/// * `ctx` - Cancellation token and optional deadline
/// * `system_prompt` - System prompt sent with the request
/// * `user_prompt` - The article prompt
///
/// # Returns
///
/// The model's raw text on success, the first non-retryable error, the
/// context's `Cancelled`/`DeadlineExceeded`, or
/// [`ApiError::MaxRetriesExceeded`] wrapping the last transient error.
///
/// # Examples
///
/// ```ignore
/// let client = AnthropicClient::new(api_key, &config.ai)?;
/// let text = call_with_retry(&client, RetryPolicy::default(), &ctx, system, prompt).await?;
/// ```
pub async fn call_with_retry<T: CompletionClient>(
    client: &T,
    policy: RetryPolicy,
    ctx: &CallContext,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<String, ApiError> {
    RetryingClient::with_policy(client, policy)
        .complete(ctx, system_prompt, user_prompt)
        .await
}
