use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FilterError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Messages scoring strictly above this value are spam
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spam_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ham_dir: Option<PathBuf>,
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            spam_dir: None,
            ham_dir: None,
            max_concurrent_reads: default_max_concurrent_reads(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_words")]
    pub top_words: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_words: default_top_words(),
        }
    }
}

fn default_threshold() -> f64 {
    0.5
}

fn default_max_concurrent_reads() -> usize {
    16
}

fn default_top_words() -> usize {
    10
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FilterError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| FilterError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    FilterError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| FilterError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| FilterError::ConfigError(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let threshold = self.classifier.threshold;
        if !threshold.is_finite() {
            return Err(FilterError::ConfigError(
                "classifier.threshold must be a finite number".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(FilterError::ConfigError(format!(
                "classifier.threshold must be between 0 and 1, got {}",
                threshold
            )));
        }

        if self.corpus.max_concurrent_reads == 0 {
            return Err(FilterError::ConfigError(
                "corpus.max_concurrent_reads must be at least 1".to_string(),
            ));
        }
        if self.corpus.max_concurrent_reads > 64 {
            return Err(FilterError::ConfigError(
                "corpus.max_concurrent_reads cannot exceed 64".to_string(),
            ));
        }

        if self.report.top_words == 0 {
            return Err(FilterError::ConfigError(
                "report.top_words must be greater than 0".to_string(),
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Create an example configuration file
    pub async fn create_example(path: &Path) -> Result<()> {
        let mut config = Self::default();
        config.corpus.spam_dir = Some(PathBuf::from("corpus/spam"));
        config.corpus.ham_dir = Some(PathBuf::from("corpus/ham"));
        config.save(path).await
    }
}
