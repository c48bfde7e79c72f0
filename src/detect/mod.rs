// Word-level language detection
//
// - script: Unicode range based script classification
// - statistical: fallback identifier for ambiguous Latin tokens
// - tagger: per-token decision with a rolling context language
// - analyzer: tokenization and aggregation over a passage

pub mod script;
pub mod statistical;
pub mod tagger;
pub mod analyzer;

pub use analyzer::{AnalysisResult, MixedTextAnalyzer, TaggedWord, WordTag, PUNCTUATION_MARKER};
pub use statistical::{DisabledIdentifier, LanguageIdentifier, StatisticalClassifier, WhatlangIdentifier};
pub use tagger::WordTagger;

use crate::config::DetectionConfig;
use crate::error::Result;

/// Build an analyzer from configuration and an identifier.
///
/// When the statistical fallback is disabled the identifier is ignored.
pub fn build_analyzer(
    config: &DetectionConfig,
    identifier: Box<dyn LanguageIdentifier>,
) -> Result<MixedTextAnalyzer> {
    let default_language = config.default_language_tag()?;
    let statistical = if config.statistical_fallback {
        StatisticalClassifier::new(identifier)
    } else {
        StatisticalClassifier::disabled()
    };
    Ok(MixedTextAnalyzer::new(WordTagger::new(statistical, config), default_language))
}
