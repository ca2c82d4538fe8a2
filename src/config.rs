//! `config.yaml` loading, defaults and validation.
//!
//! Missing sections fall back to sensible defaults, API keys can be supplied
//! through `ANTHROPIC_API_KEY` / `MEDIUM_TOKEN` (optionally from a `.env`
//! file), topics can come from a CSV file, and the result is validated
//! before any network call is made.
//!
//! # Topics CSV
//!
//! ```text
//! name,description,keywords,weight
//! Rust Ownership,Memory safety without GC,"borrowing, lifetimes",3
//! ```
//!
//! Header names are matched case-insensitively and only `name` is required.
//! Keywords are split on commas, a missing or unparseable weight counts as 1,
//! and rows with an empty name are skipped.

use crate::error::{ConfigError, TopicsCsvError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MEDIUM_API_URL: &str = "https://api.medium.com/v1";
pub const DEFAULT_TOPIC: &str = "Software Engineering Best Practices";

const ANTHROPIC_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const MEDIUM_TOKEN_ENV: &str = "MEDIUM_TOKEN";

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub topics: Vec<TopicConfig>,
    #[serde(default)]
    pub style: StyleConfig,
    /// Optional CSV file whose topics replace `topics`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics_file: Option<PathBuf>,
    #[serde(default)]
    pub medium: MediumConfig,
    /// Path to the article prompt template.
    #[serde(default = "default_prompt_template")]
    pub prompt_template: PathBuf,
    /// Path to the system prompt text.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: PathBuf,
}

/// Credentials for the generation API and Medium.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiKeysConfig {
    #[serde(default)]
    pub anthropic: String,
    #[serde(default)]
    pub medium: String,
}

/// Model parameters for the generation API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 1.0).
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Per-attempt request timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Messages endpoint; overridable for proxies and tests.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            api_url: default_api_url(),
        }
    }
}

/// Where articles get published.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediumConfig {
    /// API root; overridable for proxies and tests.
    #[serde(default = "default_medium_api_url")]
    pub api_url: String,
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self {
            api_url: default_medium_api_url(),
        }
    }
}

/// A subject articles can be written about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TopicConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Relative selection weight. Zero counts as one.
    #[serde(default = "default_weight")]
    pub weight: i64,
}

/// Writing style preferences passed into every prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleConfig {
    /// e.g. "professional", "casual", "technical"
    #[serde(default = "default_tone")]
    pub tone: String,
    /// e.g. "short", "medium", "long"
    #[serde(default = "default_length")]
    pub length: String,
    /// e.g. "beginners", "intermediate", "advanced"
    #[serde(default = "default_audience")]
    pub target_audience: String,
    #[serde(default)]
    pub include_code: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            tone: default_tone(),
            length: default_length(),
            target_audience: default_audience(),
            include_code: false,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_max_tokens() -> u32 {
    8192
}
fn default_temperature() -> f64 {
    1.0
}
fn default_timeout_seconds() -> u64 {
    120
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_medium_api_url() -> String {
    DEFAULT_MEDIUM_API_URL.to_string()
}
fn default_weight() -> i64 {
    1
}
fn default_tone() -> String {
    "professional".to_string()
}
fn default_length() -> String {
    "medium".to_string()
}
fn default_audience() -> String {
    "intermediate".to_string()
}
fn default_prompt_template() -> PathBuf {
    PathBuf::from("templates/article-prompt.md")
}
fn default_system_prompt() -> PathBuf {
    PathBuf::from("templates/system-prompt.md")
}

fn default_topics() -> Vec<TopicConfig> {
    vec![TopicConfig {
        name: DEFAULT_TOPIC.to_string(),
        description: "General best practices in software development".to_string(),
        keywords: vec![
            "clean code".to_string(),
            "testing".to_string(),
            "architecture".to_string(),
        ],
        weight: 1,
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_keys: ApiKeysConfig::default(),
            ai: AiConfig::default(),
            topics: default_topics(),
            style: StyleConfig::default(),
            topics_file: None,
            medium: MediumConfig::default(),
            prompt_template: default_prompt_template(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Config {
    /// Read, default, override from the environment and validate a config file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_yaml(&raw)?;
        config.load_topics_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        info!(
            topics = config.topics.len(),
            model = %config.ai.model,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse YAML and fill in defaults. Does not validate.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid, all-defaults config.
        let mut config: Config = if raw.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(raw)?
        };
        if config.topics.is_empty() {
            debug!("No topics configured; using default topic");
            config.topics = default_topics();
        }
        Ok(config)
    }

    /// Replace `topics` with the rows of `topics_file`, when one is configured.
    ///
    /// If every CSV row is skipped the configured topics stay in place.
    pub fn load_topics_file(&mut self) -> Result<(), ConfigError> {
        let Some(path) = self.topics_file.clone() else {
            return Ok(());
        };
        let topics = load_topics_csv(&path).map_err(ConfigError::TopicsCsv)?;
        if topics.is_empty() {
            warn!(path = %path.display(), "Topics CSV has no usable rows; keeping configured topics");
        } else {
            info!(path = %path.display(), count = topics.len(), "Loaded topics from CSV");
            self.topics = topics;
        }
        Ok(())
    }

    /// Write the current topics to `path` in the format [`load_topics_csv`] reads.
    #[instrument(level = "info", skip_all, fields(path = %path.display(), topics = self.topics.len()))]
    pub fn export_topics_csv(&self, path: &Path) -> Result<(), TopicsCsvError> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["name", "description", "keywords", "weight"])?;
        for topic in &self.topics {
            let keywords = topic.keywords.join(",");
            let weight = topic.weight.to_string();
            writer.write_record([
                topic.name.as_str(),
                topic.description.as_str(),
                keywords.as_str(),
                weight.as_str(),
            ])?;
        }
        writer.flush()?;
        info!("Exported topics to CSV");
        Ok(())
    }

    /// Apply API key overrides. Non-empty values from `lookup` win over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ANTHROPIC_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api_keys.anthropic = key;
        }
        if let Some(token) = lookup(MEDIUM_TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.api_keys.medium = token;
        }
    }

    /// Check ranges and topic sanity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ai = &self.ai;
        if !(1..=200_000).contains(&ai.max_tokens) {
            return Err(ConfigError::Invalid(format!(
                "ai.max_tokens must be between 1 and 200000, got {}",
                ai.max_tokens
            )));
        }
        if !(0.0..=1.0).contains(&ai.temperature) {
            return Err(ConfigError::Invalid(format!(
                "ai.temperature must be between 0.0 and 1.0, got {:.2}",
                ai.temperature
            )));
        }
        if !(1..=600).contains(&ai.timeout_seconds) {
            return Err(ConfigError::Invalid(format!(
                "ai.timeout_seconds must be between 1 and 600, got {}",
                ai.timeout_seconds
            )));
        }
        if ai.model.trim().is_empty() {
            return Err(ConfigError::Invalid("ai.model cannot be empty".to_string()));
        }
        if let Err(e) = url::Url::parse(&ai.api_url) {
            return Err(ConfigError::Invalid(format!(
                "ai.api_url is not a valid URL ({}): {e}",
                ai.api_url
            )));
        }

        if let Err(e) = url::Url::parse(&self.medium.api_url) {
            return Err(ConfigError::Invalid(format!(
                "medium.api_url is not a valid URL ({}): {e}",
                self.medium.api_url
            )));
        }
        if let Some(path) = &self.topics_file {
            if !path.exists() {
                return Err(ConfigError::Invalid(format!(
                    "topics_file not found: {}",
                    path.display()
                )));
            }
        }

        if self.topics.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one topic must be configured".to_string(),
            ));
        }
        for (i, topic) in self.topics.iter().enumerate() {
            if topic.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("topic {i} has empty name")));
            }
            if topic.weight < 0 {
                return Err(ConfigError::Invalid(format!(
                    "topic {:?} has negative weight: {}",
                    topic.name, topic.weight
                )));
            }
        }
        Ok(())
    }

    /// Look up a configured topic by exact name.
    pub fn topic_details(&self, name: &str) -> Option<&TopicConfig> {
        self.topics.iter().find(|topic| topic.name == name)
    }

    /// Contents of the system prompt file.
    pub fn system_prompt(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.system_prompt)
    }
}

/// Read topics from a CSV file with a header row.
///
/// See the module docs for the accepted columns.
pub fn load_topics_csv(path: &Path) -> Result<Vec<TopicConfig>, TopicsCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;

    let Some((header, rows)) = records.split_first() else {
        return Err(TopicsCsvError::MissingRows);
    };
    if rows.is_empty() {
        return Err(TopicsCsvError::MissingRows);
    }

    let column = |wanted: &str| {
        header
            .iter()
            .collect::<Vec<_>>()
            .into_iter()
            .rposition(|col| col.trim().eq_ignore_ascii_case(wanted))
    };
    let name_idx = column("name").ok_or(TopicsCsvError::MissingNameColumn)?;
    let description_idx = column("description");
    let keywords_idx = column("keywords");
    let weight_idx = column("weight");

    let mut topics = Vec::with_capacity(rows.len());
    for (i, record) in rows.iter().enumerate() {
        let field = |idx: Option<usize>| idx.and_then(|col| record.get(col)).map_or("", str::trim);

        let name = field(Some(name_idx));
        if name.is_empty() {
            // +2: one for the header, one for 1-based line numbers
            warn!(row = i + 2, "Skipping topic row with empty name");
            continue;
        }

        topics.push(TopicConfig {
            name: name.to_string(),
            description: field(description_idx).to_string(),
            keywords: field(keywords_idx)
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            weight: field(weight_idx).parse().unwrap_or(1),
        });
    }
    Ok(topics)
}

/// Load `KEY=value` pairs from `path` into the process environment.
///
/// Variables that are already set keep their value. Returns `Ok(false)`
/// when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::Env(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_CONFIG: &str = r#"
api_keys:
  anthropic: file-key
  medium: file-token
ai:
  model: claude-3-haiku
  max_tokens: 4096
  temperature: 0.7
  timeout_seconds: 60
topics:
  - name: Rust Ownership
    description: Memory safety without GC
    keywords: [borrowing, lifetimes]
    weight: 3
  - name: Go Concurrency
    weight: 0
style:
  tone: casual
  length: long
  target_audience: advanced
  include_code: true
prompt_template: prompts/article.md
system_prompt: prompts/system.md
"#;

    #[test]
    fn test_from_yaml_full() {
        let config = Config::from_yaml(FULL_CONFIG).unwrap();
        assert_eq!(config.ai.model, "claude-3-haiku");
        assert_eq!(config.ai.max_tokens, 4096);
        assert_eq!(config.ai.temperature, 0.7);
        assert_eq!(config.ai.timeout_seconds, 60);
        assert_eq!(config.topics.len(), 2);
        assert_eq!(config.topics[0].keywords, vec!["borrowing", "lifetimes"]);
        assert_eq!(config.topics[1].weight, 0);
        assert_eq!(config.topics[1].description, "");
        assert_eq!(config.style.tone, "casual");
        assert!(config.style.include_code);
        assert_eq!(config.prompt_template, PathBuf::from("prompts/article.md"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_defaults() {
        let config = Config::from_yaml("topics:\n  - name: Testing\n").unwrap();
        assert_eq!(config.ai.model, DEFAULT_MODEL);
        assert_eq!(config.ai.max_tokens, 8192);
        assert_eq!(config.ai.temperature, 1.0);
        assert_eq!(config.ai.timeout_seconds, 120);
        assert_eq!(config.ai.api_url, DEFAULT_API_URL);
        assert_eq!(config.style.tone, "professional");
        assert_eq!(config.style.length, "medium");
        assert_eq!(config.style.target_audience, "intermediate");
        assert_eq!(config.topics[0].weight, 1);
        assert_eq!(
            config.prompt_template,
            PathBuf::from("templates/article-prompt.md")
        );
        assert_eq!(
            config.system_prompt,
            PathBuf::from("templates/system-prompt.md")
        );
    }

    #[test]
    fn test_no_topics_uses_default() {
        let config = Config::from_yaml("ai:\n  model: m\n").unwrap();
        assert_eq!(config.topics.len(), 1);
        assert_eq!(config.topics[0].name, DEFAULT_TOPIC);

        let empty = Config::from_yaml("").unwrap();
        assert_eq!(empty.topics[0].name, DEFAULT_TOPIC);
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Config::from_yaml("topics: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config = Config::from_yaml(FULL_CONFIG).unwrap();
        config.apply_overrides(|key| match key {
            "ANTHROPIC_API_KEY" => Some("env-key".to_string()),
            "MEDIUM_TOKEN" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api_keys.anthropic, "env-key");
        // empty env values do not clobber the file
        assert_eq!(config.api_keys.medium, "file-token");
    }

    #[test]
    fn test_validate_error_cases() {
        let base = Config::from_yaml(FULL_CONFIG).unwrap();

        let mut c = base.clone();
        c.ai.max_tokens = 0;
        assert!(c.validate().unwrap_err().to_string().contains("max_tokens"));

        let mut c = base.clone();
        c.ai.max_tokens = 200_001;
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.ai.temperature = 1.5;
        assert!(c.validate().unwrap_err().to_string().contains("temperature"));

        let mut c = base.clone();
        c.ai.timeout_seconds = 0;
        assert!(c.validate().unwrap_err().to_string().contains("timeout_seconds"));

        let mut c = base.clone();
        c.ai.model = " ".to_string();
        assert!(c.validate().unwrap_err().to_string().contains("model"));

        let mut c = base.clone();
        c.ai.api_url = "not a url".to_string();
        assert!(c.validate().unwrap_err().to_string().contains("api_url"));

        let mut c = base.clone();
        c.topics[0].name = String::new();
        assert!(c.validate().unwrap_err().to_string().contains("empty name"));

        let mut c = base.clone();
        c.topics[0].weight = -2;
        assert!(c.validate().unwrap_err().to_string().contains("negative weight"));

        let mut c = base;
        c.topics.clear();
        assert!(c.validate().unwrap_err().to_string().contains("at least one topic"));
    }

    #[test]
    fn test_topic_details() {
        let config = Config::from_yaml(FULL_CONFIG).unwrap();
        let details = config.topic_details("Rust Ownership").unwrap();
        assert_eq!(details.description, "Memory safety without GC");
        assert!(config.topic_details("Nonexistent").is_none());
    }

    #[test]
    fn test_load_from_file_and_read_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("article.md");
        let system_path = dir.path().join("system.md");
        std::fs::write(&template_path, "Write about {{.Topic}}").unwrap();
        std::fs::write(&system_path, "You are a writer.").unwrap();

        let config_path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            "topics:\n  - name: Rust\nprompt_template: {}\nsystem_prompt: {}",
            template_path.display(),
            system_path.display()
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.topics[0].name, "Rust");
        assert_eq!(config.prompt_template, template_path);
        assert_eq!(config.system_prompt().unwrap(), "You are a writer.");
    }

    fn write_csv(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("topics.csv");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_topics_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            " Name ,DESCRIPTION,Keywords,weight\n\
             Rust Ownership,Memory safety,\"borrowing, lifetimes ,\",3\n\
             Go Channels,,,not-a-number\n\
             ,Orphan row,,5\n\
             Testing ,  Unit and integration  ,tdd,\n",
        );

        let topics = load_topics_csv(&path).unwrap();
        assert_eq!(topics.len(), 3);

        assert_eq!(topics[0].name, "Rust Ownership");
        assert_eq!(topics[0].description, "Memory safety");
        assert_eq!(topics[0].keywords, vec!["borrowing", "lifetimes"]);
        assert_eq!(topics[0].weight, 3);

        assert_eq!(topics[1].name, "Go Channels");
        assert!(topics[1].keywords.is_empty());
        assert_eq!(topics[1].weight, 1);

        assert_eq!(topics[2].name, "Testing");
        assert_eq!(topics[2].description, "Unit and integration");
        assert_eq!(topics[2].weight, 1);
    }

    #[test]
    fn test_load_topics_csv_name_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "name\nSolo\n");
        let topics = load_topics_csv(&path).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].name, "Solo");
        assert_eq!(topics[0].weight, 1);
    }

    #[test]
    fn test_load_topics_csv_errors() {
        let dir = tempfile::tempdir().unwrap();

        let header_only = write_csv(dir.path(), "name,weight\n");
        assert!(matches!(
            load_topics_csv(&header_only),
            Err(TopicsCsvError::MissingRows)
        ));

        let no_name = write_csv(dir.path(), "title,weight\nRust,2\n");
        assert!(matches!(
            load_topics_csv(&no_name),
            Err(TopicsCsvError::MissingNameColumn)
        ));

        let ragged = write_csv(dir.path(), "name,weight\nRust,2,extra\n");
        assert!(matches!(load_topics_csv(&ragged), Err(TopicsCsvError::Csv(_))));

        assert!(load_topics_csv(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_load_with_topics_file_replaces_yaml_topics() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(dir.path(), "name,weight\nFrom CSV,4\n");
        let config_path = dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            format!(
                "topics:\n  - name: From YAML\ntopics_file: {}\n",
                csv_path.display()
            ),
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.topics.len(), 1);
        assert_eq!(config.topics[0].name, "From CSV");
        assert_eq!(config.topics[0].weight, 4);
    }

    #[test]
    fn test_load_with_bad_topics_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(dir.path(), "title\nNo name column\n");
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, format!("topics_file: {}\n", csv_path.display())).unwrap();

        let err = Config::load(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::TopicsCsv(TopicsCsvError::MissingNameColumn)));
        assert!(err.to_string().starts_with("failed to load topics from CSV"));

        let missing_path = dir.path().join("missing.yaml");
        std::fs::write(&missing_path, "topics_file: /nonexistent/topics.csv\n").unwrap();
        assert!(matches!(
            Config::load(&missing_path),
            Err(ConfigError::TopicsCsv(_))
        ));
    }

    #[test]
    fn test_validate_topics_file_must_exist() {
        let mut config = Config::from_yaml(FULL_CONFIG).unwrap();
        config.topics_file = Some(PathBuf::from("/nonexistent/topics.csv"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("topics_file not found"));
    }

    #[test]
    fn test_export_topics_csv_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_yaml(FULL_CONFIG).unwrap();
        let path = dir.path().join("out").join("topics.csv");

        config.export_topics_csv(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("name,description,keywords,weight\n"));
        assert!(raw.contains("Rust Ownership,Memory safety without GC,\"borrowing,lifetimes\",3"));
        assert_eq!(load_topics_csv(&path).unwrap(), config.topics);
    }

    #[test]
    fn test_medium_api_url() {
        let config = Config::from_yaml(FULL_CONFIG).unwrap();
        assert_eq!(config.medium.api_url, DEFAULT_MEDIUM_API_URL);

        let custom = Config::from_yaml("medium:\n  api_url: http://localhost:9999/v1\n").unwrap();
        assert_eq!(custom.medium.api_url, "http://localhost:9999/v1");

        let mut bad = custom;
        bad.medium.api_url = "nope".to_string();
        assert!(bad.validate().unwrap_err().to_string().contains("medium.api_url"));
    }

    #[test]
    fn test_load_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "AUTOBLOG_ENV_FILE_TEST_KEY=from-dotenv\n").unwrap();

        assert!(load_env_file(&path).unwrap());
        assert_eq!(
            std::env::var("AUTOBLOG_ENV_FILE_TEST_KEY").unwrap(),
            "from-dotenv"
        );
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_env_file(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/config.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
