//! Data models for topics, prompts, generated articles and publish history.
//!
//! - [`GeneratedArticle`]: the structured article extracted from the model response
//! - [`PromptContext`]: the values a prompt template is rendered against
//! - [`ArticleRecord`] / [`ArticleHistory`]: what has already been published
//!
//! Topic and style settings live in [`crate::config`] because they are read
//! straight out of `config.yaml`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An article produced by the generation API.
///
/// `created_at` stays `None` until the orchestrator has successfully parsed the
/// model response, so an article with a timestamp is always a complete one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeneratedArticle {
    /// The article headline.
    pub title: String,
    /// The article body in Markdown.
    pub content: String,
    /// Tags suggested by the model (3-5 expected, not enforced).
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the article was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Values available to the prompt template for a single generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptContext {
    pub topic: String,
    pub topic_description: String,
    /// Topic keywords joined with `", "`.
    pub keywords: String,
    pub tone: String,
    pub length: String,
    pub target_audience: String,
    pub include_code: bool,
    /// Titles already published for this topic, oldest first.
    pub previous_titles: Vec<String>,
}

/// A single published article.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub topic: String,
    pub published_at: DateTime<Utc>,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Everything published so far, in publication order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ArticleHistory {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
}

impl ArticleHistory {
    /// Titles previously written about `topic`, oldest first.
    pub fn previous_titles(&self, topic: &str) -> Vec<String> {
        self.articles
            .iter()
            .filter(|record| record.topic == topic)
            .map(|record| record.title.clone())
            .collect()
    }

    /// Record a freshly published article.
    pub fn record(&mut self, topic: &str, article: &GeneratedArticle, url: String) {
        self.articles.push(ArticleRecord {
            title: article.title.clone(),
            topic: topic.to_string(),
            published_at: article.created_at.unwrap_or_else(Utc::now),
            url,
            tags: article.tags.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(topic: &str, title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            topic: topic.to_string(),
            published_at: Utc::now(),
            url: format!("https://medium.com/@me/{}", title.to_lowercase()),
            tags: vec!["rust".to_string()],
        }
    }

    #[test]
    fn test_previous_titles_filters_by_topic_in_order() {
        let history = ArticleHistory {
            articles: vec![record("X", "A"), record("Y", "B"), record("X", "C")],
        };
        assert_eq!(history.previous_titles("X"), vec!["A", "C"]);
        assert_eq!(history.previous_titles("Y"), vec!["B"]);
        assert!(history.previous_titles("Z").is_empty());
    }

    #[test]
    fn test_record_appends_entry() {
        let mut history = ArticleHistory::default();
        let article = GeneratedArticle {
            title: "Ownership in Practice".to_string(),
            content: "# Ownership".to_string(),
            tags: vec!["rust".to_string(), "memory".to_string()],
            created_at: Some(Utc::now()),
        };
        history.record("Rust", &article, "https://medium.com/p/1".to_string());

        assert_eq!(history.articles.len(), 1);
        let entry = &history.articles[0];
        assert_eq!(entry.title, "Ownership in Practice");
        assert_eq!(entry.topic, "Rust");
        assert_eq!(entry.url, "https://medium.com/p/1");
        assert_eq!(entry.published_at, article.created_at.unwrap());
        assert_eq!(entry.tags, article.tags);
    }

    #[test]
    fn test_history_deserialization() {
        let json = r#"{
            "articles": [
                {
                    "title": "Test Article",
                    "topic": "Go",
                    "published_at": "2025-05-06T14:30:00Z",
                    "url": "https://medium.com/p/abc",
                    "tags": ["go", "testing"]
                }
            ]
        }"#;

        let history: ArticleHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.articles.len(), 1);
        assert_eq!(history.articles[0].topic, "Go");
        assert_eq!(history.articles[0].tags, vec!["go", "testing"]);
    }

    #[test]
    fn test_empty_history_object() {
        let history: ArticleHistory = serde_json::from_str("{}").unwrap();
        assert!(history.articles.is_empty());
    }
}
