use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, MixlateError};
use crate::language::LanguageTag;
use super::TranslationEngine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationCacheEntry {
    pub source_text: String,
    pub source_language: String,
    pub target_language: String,
    pub translation: String,
    pub model: String,
    pub cached_at: u64,
}

/// JSON files keyed by a hash of the request, one file per translation.
pub struct TranslationCache {
    cache_dir: PathBuf,
}

impl TranslationCache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            warn!("Failed to create translation cache directory: {}", e);
        }
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn key(text: &str, source: LanguageTag, target: LanguageTag, model: &str) -> String {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        source.code().hash(&mut hasher);
        target.code().hash(&mut hasher);
        model.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Unreadable or malformed entries count as misses.
    pub async fn load(&self, key: &str) -> Option<TranslationCacheEntry> {
        let content = tokio::fs::read_to_string(self.entry_path(key)).await.ok()?;
        match serde_json::from_str::<TranslationCacheEntry>(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Failed to parse translation cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub async fn save(&self, key: &str, entry: &TranslationCacheEntry) -> Result<()> {
        let content = serde_json::to_string_pretty(entry)?;

        tokio::fs::write(self.entry_path(key), content)
            .await
            .map_err(|e| MixlateError::Cache(format!("Failed to write translation cache: {}", e)))?;

        debug!("Saved translation to cache: {}", key);
        Ok(())
    }

    /// All readable entries, newest first.
    pub async fn list(&self) -> Result<Vec<TranslationCacheEntry>> {
        let mut entries = Vec::new();

        if let Ok(mut dir_entries) = tokio::fs::read_dir(&self.cache_dir).await {
            while let Ok(Some(entry)) = dir_entries.next_entry().await {
                if entry.path().extension().is_some_and(|ext| ext == "json") {
                    if let Ok(content) = tokio::fs::read_to_string(entry.path()).await {
                        if let Ok(cache_entry) = serde_json::from_str::<TranslationCacheEntry>(&content) {
                            entries.push(cache_entry);
                        }
                    }
                }
            }
        }

        entries.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        Ok(entries)
    }

    /// Remove every entry, returning how many were deleted.
    pub async fn clear(&self) -> Result<u64> {
        let mut count = 0;
        if let Ok(mut entries) = tokio::fs::read_dir(&self.cache_dir).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                if entry.path().extension().is_some_and(|ext| ext == "json")
                    && tokio::fs::remove_file(entry.path()).await.is_ok()
                {
                    count += 1;
                }
            }
        }
        info!("Cleared {} translation cache entries", count);
        Ok(count)
    }
}

/// Serves repeated requests from a [`TranslationCache`] before asking the
/// wrapped engine. Only non-empty translations are stored.
pub struct CachingEngine {
    inner: Box<dyn TranslationEngine>,
    cache: TranslationCache,
    model: String,
}

impl CachingEngine {
    pub fn new(inner: Box<dyn TranslationEngine>, cache: TranslationCache, model: String) -> Self {
        Self { inner, cache, model }
    }
}

#[async_trait]
impl TranslationEngine for CachingEngine {
    async fn translate(
        &self,
        text: &str,
        source: LanguageTag,
        target: LanguageTag,
    ) -> Result<String> {
        let key = TranslationCache::key(text, source, target, &self.model);

        if let Some(entry) = self.cache.load(&key).await {
            debug!("Using cached translation {} ({} -> {})", key, source, target);
            return Ok(entry.translation);
        }

        let translation = self.inner.translate(text, source, target).await?;

        if !translation.trim().is_empty() {
            let entry = TranslationCacheEntry {
                source_text: text.to_string(),
                source_language: source.code().to_string(),
                target_language: target.code().to_string(),
                translation: translation.clone(),
                model: self.model.clone(),
                cached_at: std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs(),
            };
            if let Err(e) = self.cache.save(&key, &entry).await {
                warn!("Failed to save translation to persistent cache: {}", e);
            }
        }

        Ok(translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::MockTranslationEngine;
    use assert_fs::TempDir;

    fn entry(text: &str, cached_at: u64) -> TranslationCacheEntry {
        TranslationCacheEntry {
            source_text: text.to_string(),
            source_language: "eng_Latn".to_string(),
            target_language: "arb_Arab".to_string(),
            translation: format!("{} (ar)", text),
            model: "test".to_string(),
            cached_at,
        }
    }

    #[test]
    fn test_key_depends_on_every_field() {
        let base = TranslationCache::key("hi", LanguageTag::ENGLISH, LanguageTag::ARABIC, "m");
        assert_eq!(base.len(), 16);
        assert_eq!(base, TranslationCache::key("hi", LanguageTag::ENGLISH, LanguageTag::ARABIC, "m"));
        assert_ne!(base, TranslationCache::key("hi", LanguageTag::FRENCH, LanguageTag::ARABIC, "m"));
        assert_ne!(base, TranslationCache::key("hi", LanguageTag::ENGLISH, LanguageTag::RUSSIAN, "m"));
        assert_ne!(base, TranslationCache::key("hi", LanguageTag::ENGLISH, LanguageTag::ARABIC, "n"));
        assert_ne!(base, TranslationCache::key("ho", LanguageTag::ENGLISH, LanguageTag::ARABIC, "m"));
    }

    #[test]
    fn test_list_newest_first_and_clear() {
        let temp = TempDir::new().unwrap();
        let cache = TranslationCache::new(temp.path());

        tokio_test::block_on(async {
            cache.save("a", &entry("old", 10)).await.unwrap();
            cache.save("b", &entry("new", 20)).await.unwrap();
            tokio::fs::write(temp.path().join("broken.json"), "{").await.unwrap();

            let listed = cache.list().await.unwrap();
            let texts: Vec<_> = listed.iter().map(|e| e.source_text.as_str()).collect();
            assert_eq!(texts, vec!["new", "old"]);

            assert!(cache.load("broken").await.is_none());
            assert_eq!(cache.clear().await.unwrap(), 3);
            assert!(cache.list().await.unwrap().is_empty());
        });
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let temp = TempDir::new().unwrap();
        let mut inner = MockTranslationEngine::new();
        inner
            .expect_translate()
            .times(1)
            .returning(|_, _, _| Ok("مرحبا".to_string()));

        let engine = CachingEngine::new(Box::new(inner), TranslationCache::new(temp.path()), "m".to_string());

        let first = engine.translate("Hello", LanguageTag::ENGLISH, LanguageTag::ARABIC).await.unwrap();
        let second = engine.translate("Hello", LanguageTag::ENGLISH, LanguageTag::ARABIC).await.unwrap();
        assert_eq!(first, "مرحبا");
        assert_eq!(second, "مرحبا");
    }

    #[tokio::test]
    async fn test_empty_translations_not_cached() {
        let temp = TempDir::new().unwrap();
        let mut inner = MockTranslationEngine::new();
        inner
            .expect_translate()
            .times(2)
            .returning(|_, _, _| Ok(String::new()));

        let engine = CachingEngine::new(Box::new(inner), TranslationCache::new(temp.path()), "m".to_string());

        for _ in 0..2 {
            let out = engine.translate("Hello", LanguageTag::ENGLISH, LanguageTag::ARABIC).await.unwrap();
            assert!(out.is_empty());
        }
    }
}
