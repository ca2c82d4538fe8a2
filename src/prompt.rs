//! Prompt construction for article generation.
//!
//! The prompt comes from the user's template when it loads and renders
//! cleanly. Any problem with the template is logged and the built-in prompt
//! is used instead, so a broken template never stops a scheduled run.

use crate::config::{Config, StyleConfig, TopicConfig};
use crate::models::PromptContext;
use crate::template::Template;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

/// The JSON contract every prompt ends with.
pub const OUTPUT_FORMAT: &str = "Return your response in this JSON format:\n\
{\n  \
\"title\": \"Article Title\",\n  \
\"content\": \"Full article content in Markdown...\",\n  \
\"tags\": [\"tag1\", \"tag2\", \"tag3\"]\n\
}\n";

/// Builds user prompts from a template file and the configured style.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template_path: PathBuf,
    style: StyleConfig,
}

impl PromptBuilder {
    pub fn new(template_path: impl Into<PathBuf>, style: StyleConfig) -> Self {
        Self {
            template_path: template_path.into(),
            style,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.prompt_template.clone(), config.style.clone())
    }

    /// Assemble the values a template is rendered against.
    pub fn context(
        &self,
        topic: &str,
        details: Option<&TopicConfig>,
        previous_titles: &[String],
    ) -> PromptContext {
        let (topic_description, keywords) = match details {
            Some(d) => (d.description.clone(), d.keywords.join(", ")),
            None => (String::new(), String::new()),
        };
        PromptContext {
            topic: topic.to_string(),
            topic_description,
            keywords,
            tone: self.style.tone.clone(),
            length: self.style.length.clone(),
            target_audience: self.style.target_audience.clone(),
            include_code: self.style.include_code,
            previous_titles: previous_titles.to_vec(),
        }
    }

    /// Build the user prompt, falling back to the built-in one on any template error.
    #[instrument(level = "debug", skip_all, fields(%topic, previous = previous_titles.len()))]
    pub fn build(
        &self,
        topic: &str,
        details: Option<&TopicConfig>,
        previous_titles: &[String],
    ) -> String {
        let ctx = self.context(topic, details, previous_titles);

        let source = match std::fs::read_to_string(&self.template_path) {
            Ok(source) => source,
            Err(e) => {
                warn!(
                    template_path = %self.template_path.display(),
                    error = %e,
                    "Failed to load prompt template, falling back to built-in"
                );
                return fallback_prompt(&ctx);
            }
        };

        let template = match Template::parse(&source) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "Failed to parse prompt template, falling back to built-in");
                return fallback_prompt(&ctx);
            }
        };

        match template.render(&ctx) {
            Ok(mut prompt) => {
                if !prompt.contains("\"title\"") {
                    debug!("Template has no output format section; appending it");
                    if !prompt.ends_with('\n') {
                        prompt.push('\n');
                    }
                    prompt.push('\n');
                    prompt.push_str(OUTPUT_FORMAT);
                }
                debug!(prompt_length = prompt.len(), "Built prompt from template");
                prompt
            }
            Err(e) => {
                warn!(error = %e, "Failed to render prompt template, falling back to built-in");
                fallback_prompt(&ctx)
            }
        }
    }
}

/// The built-in prompt, used whenever the template cannot be used.
pub fn fallback_prompt(ctx: &PromptContext) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a technical writer creating an engaging article for Medium. ");
    let _ = writeln!(prompt, "Write a {} article about: {}\n", ctx.length, ctx.topic);

    // keywords only accompany a described topic
    if !ctx.topic_description.is_empty() {
        let _ = writeln!(prompt, "Focus area: {}\n", ctx.topic_description);
        if !ctx.keywords.is_empty() {
            let _ = writeln!(prompt, "Include these concepts: {}\n", ctx.keywords);
        }
    }

    prompt.push_str("Style requirements:\n");
    let _ = writeln!(prompt, "- Tone: {}", ctx.tone);
    let _ = writeln!(prompt, "- Target audience: {}", ctx.target_audience);
    if ctx.include_code {
        prompt.push_str("- Include practical code examples\n");
    }
    prompt.push('\n');

    if !ctx.previous_titles.is_empty() {
        prompt.push_str("Previously written articles on this topic (avoid duplicating):\n");
        for title in &ctx.previous_titles {
            let _ = writeln!(prompt, "- {title}");
        }
        prompt.push('\n');
    }

    prompt.push_str("Article requirements:\n");
    prompt.push_str("1. Create a compelling, SEO-friendly title\n");
    prompt.push_str("2. Write the article in Markdown format\n");
    prompt.push_str("3. Include an engaging introduction\n");
    prompt.push_str("4. Use proper headings (##, ###) for structure\n");
    prompt.push_str("5. Add a conclusion with key takeaways\n");
    prompt.push_str("6. Suggest 3-5 relevant tags\n\n");

    prompt.push_str(OUTPUT_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(include_code: bool) -> StyleConfig {
        StyleConfig {
            tone: "casual".to_string(),
            length: "long".to_string(),
            target_audience: "advanced".to_string(),
            include_code,
        }
    }

    fn details() -> TopicConfig {
        TopicConfig {
            name: "Rust Ownership".to_string(),
            description: "Memory safety without GC".to_string(),
            keywords: vec!["borrowing".to_string(), "lifetimes".to_string()],
            weight: 1,
        }
    }

    fn titles() -> Vec<String> {
        vec!["Old Title 1".to_string(), "Old Title 2".to_string()]
    }

    #[test]
    fn test_missing_template_falls_back() {
        let builder = PromptBuilder::new("/nonexistent/article-prompt.md", style(true));
        let prompt = builder.build("Rust Ownership", Some(&details()), &titles());

        assert!(prompt.contains("Write a long article about: Rust Ownership"));
        assert!(prompt.contains("Focus area: Memory safety without GC"));
        assert!(prompt.contains("Include these concepts: borrowing, lifetimes"));
        assert!(prompt.contains("- Tone: casual"));
        assert!(prompt.contains("- Target audience: advanced"));
        assert!(prompt.contains("- Include practical code examples"));
        assert!(prompt.contains("- Old Title 1\n- Old Title 2\n"));
        assert!(prompt.contains("Markdown"));
        assert!(prompt.contains("3-5 relevant tags"));
        assert!(prompt.contains("\"title\""));
        assert!(prompt.contains("\"content\""));
        assert!(prompt.contains("\"tags\""));
    }

    #[test]
    fn test_fallback_without_details_or_history() {
        let builder = PromptBuilder::new("/nonexistent.md", style(false));
        let prompt = builder.build("Test Topic", None, &[]);

        assert!(prompt.contains("Test Topic"));
        assert!(!prompt.contains("Focus area"));
        assert!(!prompt.contains("Include these concepts"));
        assert!(!prompt.contains("code examples"));
        assert!(!prompt.contains("Previously written"));
        assert!(prompt.ends_with(OUTPUT_FORMAT));
    }

    #[test]
    fn test_fallback_omits_keywords_without_description() {
        let builder = PromptBuilder::new("/nonexistent.md", style(false));
        let mut bare = details();
        bare.description = String::new();
        let prompt = builder.build("Rust Ownership", Some(&bare), &[]);

        assert!(!prompt.contains("Focus area"));
        assert!(!prompt.contains("Include these concepts"));
        assert!(!prompt.contains("borrowing"));
    }

    #[test]
    fn test_valid_template_is_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.md");
        std::fs::write(
            &path,
            "Write about: {{.Topic}}\nKeywords: {{.Keywords}}\n\
             {{range .PreviousTitles}}Previous: {{.}}\n{{end}}\
             Return JSON with \"title\", \"content\" and \"tags\".",
        )
        .unwrap();

        let builder = PromptBuilder::new(&path, style(true));
        let prompt = builder.build("Rust Ownership", Some(&details()), &titles());

        assert!(prompt.starts_with("Write about: Rust Ownership"));
        assert!(prompt.contains("Keywords: borrowing, lifetimes"));
        assert!(prompt.contains("Previous: Old Title 1\nPrevious: Old Title 2\n"));
        assert!(!prompt.contains("Article requirements"));
        assert!(!prompt.contains(OUTPUT_FORMAT));
    }

    #[test]
    fn test_template_without_output_format_gets_it_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.md");
        std::fs::write(&path, "Write about {{.Topic}}").unwrap();

        let builder = PromptBuilder::new(&path, style(false));
        let prompt = builder.build("Go", None, &[]);

        assert!(prompt.starts_with("Write about Go\n\n"));
        assert!(prompt.ends_with(OUTPUT_FORMAT));
    }

    #[test]
    fn test_invalid_template_syntax_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.md");
        std::fs::write(&path, "{{.Topic} - missing closing brace").unwrap();

        let builder = PromptBuilder::new(&path, style(false));
        let prompt = builder.build("Test Topic", None, &[]);

        assert!(prompt.contains("Write a long article about: Test Topic"));
        assert!(prompt.contains("Article requirements"));
    }

    #[test]
    fn test_render_error_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unknown-field.md");
        std::fs::write(&path, "Write about {{.Subject}}").unwrap();

        let builder = PromptBuilder::new(&path, style(false));
        let prompt = builder.build("Test Topic", None, &[]);

        assert!(prompt.contains("Write a long article about: Test Topic"));
    }

    #[test]
    fn test_context_joins_keywords() {
        let builder = PromptBuilder::new("unused.md", style(true));
        let ctx = builder.context("Rust Ownership", Some(&details()), &titles());
        assert_eq!(ctx.keywords, "borrowing, lifetimes");
        assert_eq!(ctx.topic_description, "Memory safety without GC");
        assert_eq!(ctx.previous_titles, titles());
        assert!(ctx.include_code);

        let bare = builder.context("Other", None, &[]);
        assert!(bare.keywords.is_empty());
        assert!(bare.topic_description.is_empty());
    }
}
