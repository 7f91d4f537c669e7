use crate::common::constants::{DEFAULT_SUBREDDITS, GEOCODE_QUALIFIER};
use crate::common::error::Result;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

const CONFIG_PATH: &str = "config.toml";

/// Pipeline configuration. Everything has a default so a missing
/// `config.toml` still yields a runnable setup; credentials come from the
/// environment, never the file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub filter: FilterConfig,
    pub enrich: EnrichConfig,
    pub llm: LlmConfig,
    pub geocode: GeocodeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub subreddits: Vec<String>,
    pub post_limit: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            subreddits: DEFAULT_SUBREDDITS.iter().map(|s| s.to_string()).collect(),
            post_limit: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub min_body_len: usize,
    pub min_score: i64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_body_len: 30,
            min_score: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Fraction of filtered records enriched per run, to bound API cost.
    pub sample_frac: f64,
    pub sample_seed: u64,
    /// Concurrent in-flight records; 1 means strictly sequential.
    pub workers: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            sample_frac: 0.01,
            sample_seed: 42,
            workers: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub classify_temperature: f64,
    pub extract_temperature: f64,
    pub answer_temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            classify_temperature: 0.3,
            extract_temperature: 0.2,
            answer_temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    pub qualifier: String,
    /// Minimum spacing between geocode requests, enforced globally.
    pub min_interval_ms: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            qualifier: GEOCODE_QUALIFIER.to_string(),
            min_interval_ms: 1000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// The chat-completion credential. Missing credentials are a setup error
/// surfaced before any batch starts.
pub fn openai_api_key() -> Result<String> {
    Ok(env::var("OPENAI_API_KEY")?)
}

/// User agent for the ingestion client's listing requests.
pub fn reddit_user_agent() -> String {
    env::var("REDDIT_USER_AGENT").unwrap_or_else(|_| "road_sentiment_ai/0.1".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load_from(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.filter.min_body_len, 30);
        assert_eq!(config.filter.min_score, 2);
        assert_eq!(config.enrich.workers, 1);
        assert!((config.enrich.sample_frac - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[filter]\nmin_score = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.filter.min_score, 5);
        assert_eq!(config.filter.min_body_len, 30);
        assert_eq!(config.llm.model, "gpt-4");
    }
}
