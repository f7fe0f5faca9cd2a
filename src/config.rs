use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATASET: &str = "hao-li/AIDev";
pub const DEFAULT_ENDPOINT: &str = "https://datasets-server.huggingface.co";

/// The datasets-server rejects pages longer than this.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset: String,
    pub split: String,
    pub endpoint: String,
    pub hf_token: Option<String>,
    pub output_dir: PathBuf,
    pub page_size: u32,
    pub requests_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            split: "train".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            hf_token: None,
            output_dir: PathBuf::from("."),
            page_size: MAX_PAGE_SIZE,
            requests_per_minute: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let dataset = env::var("AIDEV_DATASET").unwrap_or(defaults.dataset);

        let split = env::var("AIDEV_SPLIT").unwrap_or(defaults.split);

        let endpoint = env::var("AIDEV_ROWS_ENDPOINT")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.endpoint);

        let hf_token = env::var("HF_TOKEN").ok().filter(|v| !v.trim().is_empty());

        let output_dir = env::var("AIDEV_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let page_size = match env::var("AIDEV_PAGE_SIZE") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| {
                Error::Config(format!("AIDEV_PAGE_SIZE must be an integer, got '{}'", raw))
            })?,
            Err(_) => defaults.page_size,
        };

        let requests_per_minute = env::var("AIDEV_REQUESTS_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.requests_per_minute);

        let config = Self {
            dataset,
            split,
            endpoint,
            hf_token,
            output_dir,
            page_size,
            requests_per_minute,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.dataset.trim().is_empty() {
            return Err(Error::Config("dataset name is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub show_progress: bool,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dataset, "hao-li/AIDev");
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn test_page_size_out_of_range() {
        let mut config = Config::default();
        config.page_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.page_size = 101;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
