// Translation engine boundary
//
// - ollama: HTTP adapter for a local ollama server
// - cache: on-disk cache decorator usable with any engine

pub mod cache;
pub mod ollama;

use async_trait::async_trait;

pub use cache::{CachingEngine, TranslationCache, TranslationCacheEntry};
pub use ollama::{OllamaEngine, check_ollama_availability};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::language::LanguageTag;

/// Black-box translation of a whole passage.
///
/// The declared source is authoritative for the engine even when it is wrong;
/// implementations must return a best-effort string rather than fail on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: LanguageTag,
        target: LanguageTag,
    ) -> Result<String>;
}

/// Factory for the configured engine stack
pub struct EngineFactory;

impl EngineFactory {
    /// Ollama adapter, wrapped in the disk cache when enabled.
    pub fn create(config: &EngineConfig) -> Result<Box<dyn TranslationEngine>> {
        let engine = OllamaEngine::new(config.clone())?;
        if config.use_cache {
            let cache = TranslationCache::new(&config.cache_dir);
            Ok(Box::new(CachingEngine::new(Box::new(engine), cache, config.model.clone())))
        } else {
            Ok(Box::new(engine))
        }
    }
}
