//! Article generation: prompt → API call with retry → parse → timestamp.

use crate::api::{CallContext, CompletionClient, RetryPolicy, call_with_retry};
use crate::config::Config;
use crate::error::GenerateError;
use crate::models::{ArticleHistory, GeneratedArticle};
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::utils::truncate_for_log;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Used when the system prompt file cannot be read.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an expert technical writer specializing in software engineering topics.";

/// Generates one article per call from a topic and the publish history.
pub struct Generator<C> {
    client: C,
    policy: RetryPolicy,
    config: Arc<Config>,
    prompts: PromptBuilder,
}

impl<C: CompletionClient> Generator<C> {
    pub fn new(client: C, config: Arc<Config>) -> Self {
        Self::with_retry_policy(client, config, RetryPolicy::default())
    }

    pub fn with_retry_policy(client: C, config: Arc<Config>, policy: RetryPolicy) -> Self {
        let prompts = PromptBuilder::from_config(&config);
        Self {
            client,
            policy,
            config,
            prompts,
        }
    }

    /// The system prompt from disk, or [`DEFAULT_SYSTEM_PROMPT`].
    pub fn system_prompt(&self) -> String {
        match self.config.system_prompt() {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("System prompt file is empty; using default");
                DEFAULT_SYSTEM_PROMPT.to_string()
            }
            Err(e) => {
                warn!(
                    path = %self.config.system_prompt.display(),
                    error = %e,
                    "Failed to load system prompt; using default"
                );
                DEFAULT_SYSTEM_PROMPT.to_string()
            }
        }
    }

    /// Generate an article about `topic`.
    ///
    /// Titles already published on `topic` are passed into the prompt so the
    /// model avoids repeating them. The API call goes through
    /// [`call_with_retry`] with this generator's retry policy.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Cancellation token and optional deadline for the call
    /// * `topic` - Topic name; details are looked up in the config when present
    /// * `history` - Published articles, read only
    ///
    /// # Returns
    ///
    /// The parsed article stamped with the current UTC time. Fails with
    /// [`GenerateError::Api`] when the API call fails (after retries) and
    /// [`GenerateError::Parse`] when the response holds no usable article.
    /// No partial article is ever returned.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let generator = Generator::new(AnthropicClient::new(key, &config.ai)?, Arc::new(config));
    /// let article = generator.generate(&CallContext::new(), "Rust Ownership", &history).await?;
    /// println!("{}", article.title);
    /// ```
    #[instrument(
        level = "info",
        skip_all,
        fields(%topic, previous_articles = history.articles.len())
    )]
    pub async fn generate(
        &self,
        ctx: &CallContext,
        topic: &str,
        history: &ArticleHistory,
    ) -> Result<GeneratedArticle, GenerateError> {
        info!("Starting article generation");

        let previous_titles = history.previous_titles(topic);
        if !previous_titles.is_empty() {
            info!(
                count = previous_titles.len(),
                titles = ?previous_titles,
                "Found previous articles on this topic"
            );
        }

        let details = self.config.topic_details(topic);
        match details {
            Some(d) => debug!(description = %d.description, keywords = ?d.keywords, "Retrieved topic details"),
            None => warn!("No topic details found for topic"),
        }

        let prompt = self.prompts.build(topic, details, &previous_titles);
        let system_prompt = self.system_prompt();

        info!(
            model = %self.config.ai.model,
            max_tokens = self.config.ai.max_tokens,
            "Calling generation API"
        );
        let response = call_with_retry(&self.client, self.policy, ctx, &system_prompt, &prompt)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to call generation API");
                GenerateError::Api(e)
            })?;

        let mut article = parse_response(&response).map_err(|e| {
            error!(
                error = %e,
                response_length = response.len(),
                response_preview = %truncate_for_log(&response, 300),
                "Failed to parse model response"
            );
            GenerateError::Parse(e)
        })?;
        article.created_at = Some(Utc::now());

        info!(
            title = %article.title,
            content_length = article.content.len(),
            tags = ?article.tags,
            "Successfully generated article"
        );
        Ok(article)
    }
}
