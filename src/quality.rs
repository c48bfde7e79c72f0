use serde::Serialize;
use tracing::debug;

use crate::config::ScoringConfig;
use crate::language::LanguageTag;
use crate::text::{char_len, normalize};

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '؟'];

/// Scripts whose presence in an output may indicate untranslated leftovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftoverScript {
    Latin,
    Arabic,
    Cyrillic,
    Cjk,
}

impl LeftoverScript {
    pub fn matches(self, c: char) -> bool {
        match self {
            LeftoverScript::Latin => c.is_ascii_alphabetic(),
            LeftoverScript::Arabic => ('\u{0600}'..='\u{06FF}').contains(&c),
            LeftoverScript::Cyrillic => ('\u{0400}'..='\u{04FF}').contains(&c),
            LeftoverScript::Cjk => ('\u{4E00}'..='\u{9FFF}').contains(&c),
        }
    }
}

// Target script family -> scripts that should not appear in its output.
const FORBIDDEN_SCRIPTS: &[(&[&str], &[LeftoverScript])] = &[
    (
        &["Arab"],
        &[LeftoverScript::Latin, LeftoverScript::Cyrillic, LeftoverScript::Cjk],
    ),
    (
        &["Latn"],
        &[LeftoverScript::Arabic, LeftoverScript::Cyrillic, LeftoverScript::Cjk],
    ),
    (
        &["Cyrl"],
        &[LeftoverScript::Latin, LeftoverScript::Arabic, LeftoverScript::Cjk],
    ),
    (
        &["Hans", "Hant", "Jpan", "Hang"],
        &[LeftoverScript::Latin, LeftoverScript::Arabic, LeftoverScript::Cyrillic],
    ),
];

const DEFAULT_FORBIDDEN: &[LeftoverScript] = &[LeftoverScript::Latin, LeftoverScript::Arabic];

/// Scripts counted as leftovers for a given target.
pub fn forbidden_scripts(target: LanguageTag) -> &'static [LeftoverScript] {
    let script = target.script();
    FORBIDDEN_SCRIPTS
        .iter()
        .find(|(families, _)| families.contains(&script))
        .map(|(_, forbidden)| *forbidden)
        .unwrap_or(DEFAULT_FORBIDDEN)
}

/// Number of characters in `text` written in a script foreign to `target`.
pub fn count_leftover(text: &str, target: LanguageTag) -> usize {
    let forbidden = forbidden_scripts(target);
    text.chars()
        .filter(|&c| forbidden.iter().any(|script| script.matches(c)))
        .count()
}

/// Individual terms of a translation score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub length_ratio: f64,
    pub end_bonus: f64,
    pub leftover_count: usize,
    pub leftover_penalty: f64,
    pub short_penalty: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        (self.length_ratio + self.end_bonus) - (self.leftover_penalty + self.short_penalty)
    }
}

/// Surface-level quality estimate of a translation: rewards completeness,
/// penalizes truncation and characters in scripts foreign to the target.
#[derive(Debug, Clone)]
pub struct TranslationScorer {
    config: ScoringConfig,
}

impl TranslationScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score terms, or `None` for a translation that is empty once normalized.
    pub fn breakdown(&self, source: &str, translation: &str, target: LanguageTag) -> Option<ScoreBreakdown> {
        let source = normalize(source);
        let translation = normalize(translation);
        let last = translation.chars().last()?;

        let length_ratio = char_len(&translation) as f64 / char_len(&source).max(1) as f64;
        let end_bonus = if SENTENCE_TERMINATORS.contains(&last) {
            self.config.end_bonus
        } else {
            0.0
        };
        let leftover_count = count_leftover(&translation, target);
        let short_penalty = if length_ratio < self.config.short_ratio_cutoff {
            self.config.short_penalty
        } else {
            0.0
        };

        Some(ScoreBreakdown {
            length_ratio,
            end_bonus,
            leftover_count,
            leftover_penalty: leftover_count as f64 * self.config.leftover_penalty,
            short_penalty,
        })
    }

    /// Higher is better. Empty translations get the sentinel.
    pub fn score(&self, source: &str, translation: &str, target: LanguageTag) -> f64 {
        match self.breakdown(source, translation, target) {
            Some(breakdown) => {
                debug!("Score breakdown for {}: {:?}", target, breakdown);
                breakdown.total()
            }
            None => self.config.empty_sentinel,
        }
    }
}

impl Default for TranslationScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn scorer() -> TranslationScorer {
        TranslationScorer::default()
    }

    #[test]
    fn test_empty_translation_gets_sentinel() {
        let scorer = scorer();
        assert_eq!(scorer.score("Hello world", "", LanguageTag::ARABIC), -999.0);
        assert_eq!(scorer.score("", "", LanguageTag::ENGLISH), -999.0);
        assert_eq!(scorer.score("anything", "  \n ", LanguageTag::FRENCH), -999.0);
    }

    #[test]
    fn test_complete_terminated_translation() {
        // 12 chars each, ratio 1.0, terminator bonus, no leftovers.
        let score = scorer().score("Hello world.", "Bonjour tout", LanguageTag::FRENCH);
        assert!((score - 1.0).abs() < EPS);

        let score = scorer().score("Hello world.", "Salut monde.", LanguageTag::FRENCH);
        assert!((score - 1.25).abs() < EPS);
    }

    #[test]
    fn test_arabic_question_mark_is_terminator() {
        let b = scorer().breakdown("كيف حالك", "كيف حالك؟", LanguageTag::ARABIC).unwrap();
        assert_eq!(b.end_bonus, 0.25);
        assert_eq!(b.leftover_count, 0);
    }

    #[test]
    fn test_normalization_before_measuring() {
        let a = scorer().score("Hello   world", "  Salut \n monde ", LanguageTag::FRENCH);
        let b = scorer().score("Hello world", "Salut monde", LanguageTag::FRENCH);
        assert!((a - b).abs() < EPS);
    }

    #[test]
    fn test_leftover_penalty_monotonic() {
        let scorer = scorer();
        let source = "abcdefghij";
        // Same length, increasing count of Latin letters in an Arabic target.
        let outputs = ["عععععععععع", "aععععععععع", "aaعععععععع", "aaaaaaaaaa"];
        let scores: Vec<f64> = outputs
            .iter()
            .map(|out| scorer.score(source, out, LanguageTag::ARABIC))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] > w[1]), "{:?}", scores);
        assert!((scores[0] - scores[1] - 0.02).abs() < EPS);
    }

    #[test]
    fn test_short_penalty_step() {
        let scorer = scorer();
        let source = "abcdefghijklmnopqrst"; // 20 chars
        let at_cutoff = scorer.breakdown(source, "abcdefghijk", LanguageTag::ENGLISH).unwrap();
        let below = scorer.breakdown(source, "abcdefghij", LanguageTag::ENGLISH).unwrap();

        assert!((at_cutoff.length_ratio - 0.55).abs() < EPS);
        assert_eq!(at_cutoff.short_penalty, 0.0);
        assert_eq!(below.short_penalty, 0.7);

        let drop = at_cutoff.total() - below.total();
        assert!((drop - (0.05 + 0.7)).abs() < EPS);
    }

    #[test]
    fn test_forbidden_scripts_by_target_family() {
        assert_eq!(count_leftover("abc мир 中", LanguageTag::ARABIC), 7);
        assert_eq!(count_leftover("abc عالم мир 中", LanguageTag::ENGLISH), 8);
        assert_eq!(count_leftover("abc عالم 中", LanguageTag::RUSSIAN), 8);
        assert_eq!(count_leftover("abc عالم мир 中", LanguageTag::JAPANESE), 10);
        assert_eq!(count_leftover("abc عالم мир 中", LanguageTag::CHINESE_SIMPLIFIED), 10);

        let polish = LanguageTag::from_code("pol_Latn").unwrap();
        assert_eq!(count_leftover("dzień dobry", polish), 0);

        // Greek has no dedicated table: Latin and Arabic are counted.
        assert_eq!(count_leftover("abc عالم мир", LanguageTag::GREEK), 7);
    }

    #[test]
    fn test_source_length_floor() {
        let b = scorer().breakdown("", "abc", LanguageTag::ENGLISH).unwrap();
        assert!((b.length_ratio - 3.0).abs() < EPS);
    }

    #[test]
    fn test_custom_constants() {
        let config = ScoringConfig {
            end_bonus: 1.0,
            ..ScoringConfig::default()
        };
        let score = TranslationScorer::new(config).score("ab.", "cd.", LanguageTag::ENGLISH);
        assert!((score - 2.0).abs() < EPS);
    }
}
