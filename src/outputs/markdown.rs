//! Local Markdown copies of generated articles and the dry-run preview.

use crate::models::GeneratedArticle;
use crate::utils::{ensure_writable_dir, sanitize_filename};
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Characters of content shown in the dry-run preview.
pub const PREVIEW_CHARS: usize = 500;

/// Write the article body to `{output_dir}/{sanitized-title}.md`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), title = %article.title))]
pub async fn save_article(
    article: &GeneratedArticle,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    ensure_writable_dir(output_dir).await?;
    let path = output_dir.join(format!("{}.md", sanitize_filename(&article.title)));
    fs::write(&path, &article.content).await?;
    info!(path = %path.display(), "Saved article locally");
    Ok(path)
}

/// Human-readable preview printed in dry-run mode.
pub fn preview(article: &GeneratedArticle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n--- ARTICLE PREVIEW ---");
    let _ = writeln!(out, "Title: {}", article.title);
    let _ = writeln!(out, "Tags: {}", article.tags.join(", "));
    let body: String = article.content.chars().take(PREVIEW_CHARS).collect();
    let _ = writeln!(out, "\n{body}");
    if article.content.chars().count() > PREVIEW_CHARS {
        let _ = writeln!(out, "\n... (truncated)");
    }
    out
}
