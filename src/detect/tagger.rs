use tracing::debug;

use crate::config::DetectionConfig;
use crate::language::LanguageTag;
use super::script;
use super::statistical::StatisticalClassifier;

/// Per-token language decision.
///
/// The caller owns the rolling context: it passes the current context language
/// in and uses the returned tag as the next context.
pub struct WordTagger {
    statistical: StatisticalClassifier,
    short_token_max_len: usize,
    statistical_min_len: usize,
}

impl WordTagger {
    pub fn new(statistical: StatisticalClassifier, config: &DetectionConfig) -> Self {
        Self {
            statistical,
            short_token_max_len: config.short_token_max_len,
            statistical_min_len: config.statistical_min_len,
        }
    }

    /// Tag one word token. Decision order: script, short Latin suppression,
    /// statistical fallback, then context.
    pub fn tag(&self, token: &str, context: LanguageTag) -> LanguageTag {
        let token = token.trim();
        if token.is_empty() {
            return context;
        }

        if let Some(tag) = script::classify(token) {
            debug!("'{}' -> {} (script)", token, tag);
            return tag;
        }

        if !script::is_latin_word(token) {
            return context;
        }

        let len = token.chars().count();
        if len <= self.short_token_max_len {
            return context;
        }

        if len >= self.statistical_min_len {
            if let Some(tag) = self.statistical.classify(token) {
                debug!("'{}' -> {} (statistical)", token, tag);
                return tag;
            }
        }

        context
    }
}

impl Default for WordTagger {
    fn default() -> Self {
        Self::new(StatisticalClassifier::default(), &DetectionConfig::default())
    }
}
