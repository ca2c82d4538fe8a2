//! Extraction of the article JSON from free-form model output.
//!
//! Models often wrap the requested JSON in prose or code fences. The parser
//! takes everything from the first `{` to the last `}` and decodes it as one
//! object. No attempt is made to salvage partial or multiple objects.

use crate::error::ParseError;
use crate::models::GeneratedArticle;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArticlePayload {
    title: String,
    content: String,
    tags: Vec<String>,
}

/// Parse the raw model text into an article.
///
/// The span from the first `{` to the last `}` is decoded as a single JSON
/// object with `title`, `content` and `tags`. Missing fields decode as empty.
///
/// # Arguments
///
/// * `raw` - The model's reply, possibly wrapped in prose or code fences
///
/// # Returns
///
/// The article with `created_at` left unset, [`ParseError::NoJson`] when no
/// `{ ... }` span exists, or [`ParseError::Json`] when the span is not a
/// valid article object.
///
/// # Examples
///
/// ```ignore
/// let raw = r#"Here you go: {"title":"T","content":"Body","tags":["a"]} Enjoy!"#;
/// let article = parse_response(raw)?;
/// assert_eq!(article.title, "T");
/// ```
pub fn parse_response(raw: &str) -> Result<GeneratedArticle, ParseError> {
    let start = raw.find('{').ok_or(ParseError::NoJson)?;
    let end = raw.rfind('}').ok_or(ParseError::NoJson)?;
    if end < start {
        return Err(ParseError::NoJson);
    }

    let payload: ArticlePayload = serde_json::from_str(&raw[start..=end])?;
    Ok(GeneratedArticle {
        title: payload.title,
        content: payload.content,
        tags: payload.tags,
        created_at: None,
    })
}
