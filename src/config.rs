use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::detect::statistical::DEFAULT_MIN_CONFIDENCE;
use crate::error::{Result, MixlateError};
use crate::language::{self, LanguageTag};

fn default_target() -> String {
    "Arabic".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target language used when the command line does not name one
    #[serde(default = "default_target")]
    pub default_target: String,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ollama endpoint URL
    pub endpoint: String,
    /// LLM model to use for translation
    pub model: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Keep successful translations on disk and reuse them
    pub use_cache: bool,
    /// Directory holding cached translations
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Registry code of the initial context language
    pub default_language: String,
    /// Latin-only tokens at or below this length inherit the context language
    pub short_token_max_len: usize,
    /// Latin-only tokens at or above this length go to the statistical identifier
    pub statistical_min_len: usize,
    /// Disable to rely on script detection and context alone
    pub statistical_fallback: bool,
    /// Statistical guesses below this confidence keep the context language
    pub min_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Added when the translation ends with a sentence terminator
    pub end_bonus: f64,
    /// Subtracted per character of a script foreign to the target
    pub leftover_penalty: f64,
    /// Length ratios below this are considered truncated
    pub short_ratio_cutoff: f64,
    /// Subtracted from truncated translations
    pub short_penalty: f64,
    /// Score given to an empty translation
    pub empty_sentinel: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_target: default_target(),
            engine: EngineConfig::default(),
            detection: DetectionConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            timeout_secs: 300,
            use_cache: true,
            cache_dir: PathBuf::from(".mixlate/cache/translations"),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            default_language: LanguageTag::ENGLISH.code().to_string(),
            short_token_max_len: 3,
            statistical_min_len: 4,
            statistical_fallback: true,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            end_bonus: 0.25,
            leftover_penalty: 0.02,
            short_ratio_cutoff: 0.55,
            short_penalty: 0.7,
            empty_sentinel: -999.0,
        }
    }
}

impl DetectionConfig {
    pub fn default_language_tag(&self) -> Result<LanguageTag> {
        LanguageTag::from_code(&self.default_language).ok_or_else(|| {
            MixlateError::Config(format!(
                "default_language '{}' is not a registered language code",
                self.default_language
            ))
        })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MixlateError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MixlateError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| MixlateError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.detection.default_language_tag()?;

        if self.detection.statistical_min_len == 0 {
            return Err(MixlateError::Config(
                "statistical_min_len must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.detection.min_confidence) {
            return Err(MixlateError::Config(format!(
                "min_confidence must be between 0 and 1, got {}",
                self.detection.min_confidence
            )));
        }

        if language::from_name(&self.default_target).is_none() {
            return Err(MixlateError::Config(format!(
                "default_target '{}' is not a supported language",
                self.default_target
            )));
        }

        Ok(())
    }
}
