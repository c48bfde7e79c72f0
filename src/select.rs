//! Candidate source hypotheses and best-of-N translation selection.
//!
//! The engine treats the declared source language as authoritative, so the
//! same passage is translated once per plausible source and the outputs are
//! ranked with [`TranslationScorer`].

use serde::Serialize;
use tracing::{info, warn};

use crate::detect::{AnalysisResult, MixedTextAnalyzer};
use crate::error::{Result, MixlateError};
use crate::language::LanguageTag;
use crate::quality::TranslationScorer;
use crate::text::normalize;
use crate::translate::TranslationEngine;

/// Source hypotheses to try for a passage, in call order. Always 1 to 3
/// entries, never duplicated.
pub fn candidate_sources(detected: &[LanguageTag]) -> Vec<LanguageTag> {
    let mut candidates = Vec::with_capacity(3);

    if detected.contains(&LanguageTag::ARABIC) {
        candidates.push(LanguageTag::ARABIC);
    }

    candidates.push(LanguageTag::ENGLISH);

    if detected.contains(&LanguageTag::FRENCH) {
        candidates.push(LanguageTag::FRENCH);
    } else if detected.contains(&LanguageTag::SPANISH) {
        candidates.push(LanguageTag::SPANISH);
    }

    let mut unique = Vec::with_capacity(candidates.len());
    for tag in candidates {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationCandidate {
    pub source: LanguageTag,
    pub translation: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionResult {
    pub translation: String,
    /// `None` only for empty input.
    pub source: Option<LanguageTag>,
    pub score: Option<f64>,
    pub analysis: AnalysisResult,
}

impl SelectionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }
}

pub struct BestCandidateSelector {
    analyzer: MixedTextAnalyzer,
    scorer: TranslationScorer,
    engine: Box<dyn TranslationEngine>,
}

impl BestCandidateSelector {
    pub fn new(
        analyzer: MixedTextAnalyzer,
        scorer: TranslationScorer,
        engine: Box<dyn TranslationEngine>,
    ) -> Self {
        Self { analyzer, scorer, engine }
    }

    pub fn analyzer(&self) -> &MixedTextAnalyzer {
        &self.analyzer
    }

    /// Translate `text` into `target` once per source hypothesis and keep the
    /// best scoring output.
    ///
    /// Engine failures skip that hypothesis. Fails with
    /// [`MixlateError::AllCandidatesFailed`] when every call errored and
    /// [`MixlateError::NoValidCandidates`] when every output was empty.
    pub async fn select(&self, text: &str, target: LanguageTag) -> Result<SelectionResult> {
        let text = normalize(text);
        if text.is_empty() {
            return Ok(SelectionResult::empty());
        }

        let analysis = self.analyzer.analyze(&text);
        let sources = candidate_sources(&analysis.languages);
        info!(
            "Detected {} language(s) {:?}, trying sources {:?} -> {}",
            analysis.languages_count(),
            analysis.languages,
            sources,
            target
        );

        let mut candidates = Vec::with_capacity(sources.len());
        let mut last_error = None;

        for source in &sources {
            match self.engine.translate(&text, *source, target).await {
                Ok(translation) => {
                    let score = self.scorer.score(&text, &translation, target);
                    info!("│ {} -> {}: score {:.3}", source, target, score);
                    candidates.push(TranslationCandidate {
                        source: *source,
                        translation: translation.trim().to_string(),
                        score,
                    });
                }
                Err(e) => {
                    warn!("│ {} -> {} failed: {}", source, target, e);
                    last_error = Some(e.to_string());
                }
            }
        }

        if candidates.is_empty() {
            return Err(MixlateError::AllCandidatesFailed {
                attempts: sources.len(),
                last_error: last_error.unwrap_or_default(),
            });
        }

        let best = pick_best(&candidates)
            .cloned()
            .ok_or_else(|| MixlateError::NoValidCandidates(candidates.len()))?;
        info!("Best candidate: {} (score {:.3})", best.source, best.score);

        Ok(SelectionResult {
            translation: best.translation,
            source: Some(best.source),
            score: Some(best.score),
            analysis,
        })
    }
}

/// Stable arg-max over non-empty candidates: the earliest wins ties.
pub fn pick_best(candidates: &[TranslationCandidate]) -> Option<&TranslationCandidate> {
    let mut best: Option<&TranslationCandidate> = None;
    for candidate in candidates.iter().filter(|c| !c.translation.is_empty()) {
        if best.is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionConfig;
    use crate::detect::{LanguageIdentifier, StatisticalClassifier, WordTagger};
    use crate::translate::MockTranslationEngine;
    use mockall::Sequence;
    use mockall::predicate::{always, eq};

    struct FrenchWords;

    impl LanguageIdentifier for FrenchWords {
        fn identify(&self, token: &str) -> Option<&'static str> {
            match token {
                "Bonjour" | "monde" => Some("fr"),
                "Hola" | "mundo" => Some("es"),
                _ => None,
            }
        }
    }

    fn selector(engine: MockTranslationEngine) -> BestCandidateSelector {
        let tagger = WordTagger::new(
            StatisticalClassifier::new(Box::new(FrenchWords)),
            &DetectionConfig::default(),
        );
        BestCandidateSelector::new(
            MixedTextAnalyzer::new(tagger, LanguageTag::ENGLISH),
            TranslationScorer::default(),
            Box::new(engine),
        )
    }

    fn candidate(source: LanguageTag, translation: &str, score: f64) -> TranslationCandidate {
        TranslationCandidate { source, translation: translation.to_string(), score }
    }

    #[test]
    fn test_candidate_sources_policy() {
        assert_eq!(candidate_sources(&[]), vec![LanguageTag::ENGLISH]);
        assert_eq!(
            candidate_sources(&[LanguageTag::ENGLISH, LanguageTag::ARABIC]),
            vec![LanguageTag::ARABIC, LanguageTag::ENGLISH]
        );
        assert_eq!(
            candidate_sources(&[LanguageTag::SPANISH, LanguageTag::FRENCH, LanguageTag::ARABIC]),
            vec![LanguageTag::ARABIC, LanguageTag::ENGLISH, LanguageTag::FRENCH]
        );
        assert_eq!(
            candidate_sources(&[LanguageTag::SPANISH, LanguageTag::RUSSIAN]),
            vec![LanguageTag::ENGLISH, LanguageTag::SPANISH]
        );
    }

    #[test]
    fn test_candidate_sources_bounds_for_all_subsets() {
        let pool = [
            LanguageTag::ARABIC,
            LanguageTag::ENGLISH,
            LanguageTag::FRENCH,
            LanguageTag::SPANISH,
            LanguageTag::RUSSIAN,
        ];
        for mask in 0u32..(1 << pool.len()) {
            let detected: Vec<_> = pool
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, tag)| *tag)
                .collect();
            let sources = candidate_sources(&detected);
            assert!((1..=3).contains(&sources.len()), "{:?}", detected);
            for (i, tag) in sources.iter().enumerate() {
                assert!(!sources[i + 1..].contains(tag), "duplicate in {:?}", sources);
            }
            assert!(sources.contains(&LanguageTag::ENGLISH));
        }
    }

    #[test]
    fn test_pick_best_is_stable() {
        let candidates = vec![
            candidate(LanguageTag::ARABIC, "a", 1.0),
            candidate(LanguageTag::ENGLISH, "b", 1.0),
        ];
        assert_eq!(pick_best(&candidates).unwrap().source, LanguageTag::ARABIC);
    }

    #[test]
    fn test_pick_best_ignores_empty() {
        let candidates = vec![
            candidate(LanguageTag::ARABIC, "", -999.0),
            candidate(LanguageTag::ENGLISH, "x", -1200.0),
        ];
        assert_eq!(pick_best(&candidates).unwrap().source, LanguageTag::ENGLISH);
        assert!(pick_best(&candidates[..1]).is_none());
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let mut engine = MockTranslationEngine::new();
        engine.expect_translate().never();

        let selector = selector(engine);
        for input in ["", "   ", "\n\t"] {
            let result = selector.select(input, LanguageTag::ARABIC).await.unwrap();
            assert!(result.is_empty());
            assert_eq!(result.translation, "");
            assert!(result.analysis.is_empty());
        }
    }

    #[tokio::test]
    async fn test_arabic_first_then_english() {
        let mut engine = MockTranslationEngine::new();
        let mut seq = Sequence::new();
        engine
            .expect_translate()
            .with(eq("Hello عالم"), eq(LanguageTag::ARABIC), eq(LanguageTag::ARABIC))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("مرحبا".to_string()));
        engine
            .expect_translate()
            .with(eq("Hello عالم"), eq(LanguageTag::ENGLISH), eq(LanguageTag::ARABIC))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("مرحبا عالم.".to_string()));

        let result = selector(engine).select("Hello   عالم", LanguageTag::ARABIC).await.unwrap();

        assert_eq!(result.analysis.languages, vec![LanguageTag::ENGLISH, LanguageTag::ARABIC]);
        assert_eq!(result.translation, "مرحبا عالم.");
        assert_eq!(result.source, Some(LanguageTag::ENGLISH));
    }

    #[tokio::test]
    async fn test_french_hypothesis_wins_on_score() {
        let mut engine = MockTranslationEngine::new();
        let mut seq = Sequence::new();
        engine
            .expect_translate()
            .with(always(), eq(LanguageTag::ENGLISH), eq(LanguageTag::ENGLISH))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("Bonjour".to_string()));
        engine
            .expect_translate()
            .with(always(), eq(LanguageTag::FRENCH), eq(LanguageTag::ENGLISH))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("Hello world.".to_string()));

        let result = selector(engine).select("Bonjour le monde", LanguageTag::ENGLISH).await.unwrap();

        assert!(result.analysis.contains(LanguageTag::FRENCH));
        assert_eq!(result.source, Some(LanguageTag::FRENCH));
        assert_eq!(result.translation, "Hello world.");
    }

    #[tokio::test]
    async fn test_failed_hypothesis_is_skipped() {
        let mut engine = MockTranslationEngine::new();
        engine
            .expect_translate()
            .with(always(), eq(LanguageTag::ARABIC), always())
            .times(1)
            .returning(|_, _, _| Err(MixlateError::Engine("out of memory".to_string())));
        engine
            .expect_translate()
            .with(always(), eq(LanguageTag::ENGLISH), always())
            .times(1)
            .returning(|_, _, _| Ok("Hello world".to_string()));

        let result = selector(engine).select("مرحبا world", LanguageTag::ENGLISH).await.unwrap();
        assert_eq!(result.source, Some(LanguageTag::ENGLISH));
        assert_eq!(result.translation, "Hello world");
    }

    #[tokio::test]
    async fn test_all_hypotheses_failing_is_an_error() {
        let mut engine = MockTranslationEngine::new();
        engine
            .expect_translate()
            .times(2)
            .returning(|_, _, _| Err(MixlateError::Engine("connection refused".to_string())));

        let err = selector(engine).select("مرحبا world", LanguageTag::ENGLISH).await.unwrap_err();
        match err {
            MixlateError::AllCandidatesFailed { attempts, last_error } => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_all_empty_outputs_is_distinct_error() {
        let mut engine = MockTranslationEngine::new();
        engine
            .expect_translate()
            .times(1)
            .returning(|_, _, _| Ok("   ".to_string()));

        let err = selector(engine).select("Hello there", LanguageTag::ARABIC).await.unwrap_err();
        assert!(matches!(err, MixlateError::NoValidCandidates(1)));
    }
}
