//! Publishing generated articles to Medium.
//!
//! Publishing is a two-step exchange with the Medium API:
//!
//! 1. `GET /me` resolves the integration token to a user id
//! 2. `POST /users/{id}/posts` creates a public Markdown post
//!
//! The [`Publisher`] trait is the seam `main` depends on; [`MediumPublisher`]
//! is the only production implementation.

use crate::api::CallContext;
use crate::config::DEFAULT_MEDIUM_API_URL;
use crate::error::PublishError;
use crate::models::GeneratedArticle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Something that can publish an article and return its public URL.
pub trait Publisher {
    async fn publish(
        &self,
        ctx: &CallContext,
        article: &GeneratedArticle,
    ) -> Result<String, PublishError>;
}

/// A Medium user account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// Body of a Medium post creation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post<'a> {
    pub title: &'a str,
    pub content_format: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub tags: &'a [String],
    pub publish_status: &'a str,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct PostCreated {
    url: String,
}

/// Medium API client authenticated with an integration token.
pub struct MediumPublisher {
    http: reqwest::Client,
    token: String,
    api_url: String,
}

impl fmt::Debug for MediumPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediumPublisher")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl MediumPublisher {
    pub fn new(token: impl Into<String>) -> Result<Self, PublishError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("awful_autoblog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            token: token.into(),
            api_url: DEFAULT_MEDIUM_API_URL.to_string(),
        })
    }

    /// Point the publisher at a different API root (`medium.api_url` in the config).
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, PublishError> {
        let parsed = url::Url::parse(api_url)?;
        self.api_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Look up the account that owns the token.
    #[instrument(level = "debug", skip_all)]
    pub async fn user(&self, ctx: &CallContext) -> Result<User, PublishError> {
        let request = self
            .http
            .get(self.endpoint("me"))
            .bearer_auth(&self.token)
            .header("Accept", "application/json");

        let (status, body) = interruptible(ctx, async move {
            let resp = request.send().await?;
            let status = resp.status();
            Ok::<_, PublishError>((status, resp.text().await?))
        })
        .await?;

        debug!(status = status.as_u16(), "Received user info response");
        if !status.is_success() {
            error!(status = status.as_u16(), response_body = %body, "Failed to get user info");
            return Err(PublishError::Status {
                stage: "get user",
                status: status.as_u16(),
                body,
            });
        }

        let envelope: DataEnvelope<User> = serde_json::from_str(&body)?;
        debug!(user_id = %envelope.data.id, username = %envelope.data.username, "Retrieved user info");
        Ok(envelope.data)
    }
}

impl Publisher for MediumPublisher {
    #[instrument(
        level = "info",
        skip_all,
        fields(title = %article.title, tags = article.tags.len(), content_length = article.content.len())
    )]
    async fn publish(
        &self,
        ctx: &CallContext,
        article: &GeneratedArticle,
    ) -> Result<String, PublishError> {
        info!("Starting article publication to Medium");
        let user = self.user(ctx).await?;
        info!(user_id = %user.id, username = %user.username, "Resolved Medium user");

        let post = Post {
            title: &article.title,
            content_format: "markdown",
            content: &article.content,
            tags: &article.tags,
            publish_status: "public",
        };
        let request = self
            .http
            .post(self.endpoint(&format!("users/{}/posts", user.id)))
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(&post);

        let t0 = std::time::Instant::now();
        let (status, body) = interruptible(ctx, async move {
            let resp = request.send().await?;
            let status = resp.status();
            Ok::<_, PublishError>((status, resp.text().await?))
        })
        .await?;
        debug!(
            status = status.as_u16(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Received publish response"
        );

        if !status.is_success() {
            error!(status = status.as_u16(), response_body = %body, "Publication failed");
            return Err(PublishError::Status {
                stage: "publish",
                status: status.as_u16(),
                body,
            });
        }

        let created: DataEnvelope<PostCreated> = serde_json::from_str(&body)?;
        info!(published_url = %created.data.url, "Published article to Medium");
        Ok(created.data.url)
    }
}

/// Race a request against the run's cancellation and deadline.
async fn interruptible<T, F>(ctx: &CallContext, request: F) -> Result<T, PublishError>
where
    F: Future<Output = Result<T, PublishError>>,
{
    if let Some(e) = ctx.err() {
        return Err(PublishError::Interrupted(e));
    }
    tokio::select! {
        res = request => res,
        e = ctx.done() => Err(PublishError::Interrupted(e)),
    }
}
