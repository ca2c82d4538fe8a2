//! JSON persistence for the article history.
//!
//! ```text
//! articles.json
//! {
//!   "articles": [
//!     { "title": "...", "topic": "...", "published_at": "...", "url": "...", "tags": [...] }
//!   ]
//! }
//! ```
//!
//! A missing file is an empty history, so the first run needs no setup.

use crate::error::StoreError;
use crate::models::ArticleHistory;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Reads and writes [`ArticleHistory`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<ArticleHistory, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("History file does not exist yet; starting empty");
                return Ok(ArticleHistory::default());
            }
            Err(e) => return Err(e.into()),
        };
        let history: ArticleHistory = serde_json::from_str(&raw)?;
        info!(articles = history.articles.len(), "Loaded article history");
        Ok(history)
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self, history: &ArticleHistory) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(history)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, json).await?;
        info!(articles = history.articles.len(), "Saved article history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;
    use chrono::{TimeZone, Utc};

    fn sample() -> ArticleHistory {
        ArticleHistory {
            articles: vec![ArticleRecord {
                title: "Test Article".to_string(),
                topic: "Go".to_string(),
                published_at: Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap(),
                url: "https://medium.com/p/abc".to_string(),
                tags: vec!["go".to_string(), "testing".to_string()],
            }],
        }
    }

    #[tokio::test]
    async fn test_load_nonexistent_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("articles.json"));
        let history = store.load().await.unwrap();
        assert!(history.articles.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested").join("articles.json"));
        store.save(&sample()).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"articles\""));
        assert!(raw.contains("\n  "), "expected pretty-printed JSON");

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, sample());
    }

    #[tokio::test]
    async fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(
            &path,
            r#"{"articles":[{"title":"A","topic":"X","published_at":"2025-01-01T00:00:00Z","url":"u","tags":[]}]}"#,
        )
        .unwrap();

        let history = JsonStore::new(&path).load().await.unwrap();
        assert_eq!(history.articles.len(), 1);
        assert_eq!(history.articles[0].title, "A");
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, "not json").unwrap();

        let result = JsonStore::new(&path).load().await;
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
