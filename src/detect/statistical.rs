use tracing::debug;
use whatlang::{Detector, Lang};

use crate::language::{self, LanguageTag};

/// A statistical language identifier for single tokens.
///
/// Returns a short ISO 639-1 code, or `None` when it has no opinion.
pub trait LanguageIdentifier: Send + Sync {
    fn identify(&self, token: &str) -> Option<&'static str>;
}

/// Confidence below which a whatlang guess counts as no opinion.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.1;

// Languages whatlang may answer with, paired with their short codes.
const WHATLANG_CODES: &[(Lang, &str)] = &[
    (Lang::Ara, "ar"),
    (Lang::Eng, "en"),
    (Lang::Fra, "fr"),
    (Lang::Spa, "es"),
    (Lang::Deu, "de"),
    (Lang::Ita, "it"),
    (Lang::Por, "pt"),
    (Lang::Rus, "ru"),
    (Lang::Tur, "tr"),
    (Lang::Nld, "nl"),
    (Lang::Pol, "pl"),
    (Lang::Swe, "sv"),
    (Lang::Ind, "id"),
    (Lang::Vie, "vi"),
];

/// Trigram based identification via `whatlang`, restricted to the languages
/// the short-code table knows.
pub struct WhatlangIdentifier {
    detector: Detector,
    min_confidence: f64,
}

impl WhatlangIdentifier {
    pub fn new(min_confidence: f64) -> Self {
        let allowlist = WHATLANG_CODES.iter().map(|(lang, _)| *lang).collect();
        Self {
            detector: Detector::with_allowlist(allowlist),
            min_confidence,
        }
    }
}

impl Default for WhatlangIdentifier {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE)
    }
}

impl LanguageIdentifier for WhatlangIdentifier {
    fn identify(&self, token: &str) -> Option<&'static str> {
        let info = self.detector.detect(token)?;
        if info.confidence() < self.min_confidence {
            debug!(
                "Discarding {:?} for '{}' (confidence {:.3})",
                info.lang(),
                token,
                info.confidence()
            );
            return None;
        }
        short_code(info.lang())
    }
}

/// Stands in for an identifier that is not available.
pub struct DisabledIdentifier;

impl LanguageIdentifier for DisabledIdentifier {
    fn identify(&self, _token: &str) -> Option<&'static str> {
        None
    }
}

fn short_code(lang: Lang) -> Option<&'static str> {
    WHATLANG_CODES
        .iter()
        .find(|(known, _)| *known == lang)
        .map(|(_, code)| *code)
}

/// Maps identifier output into the registry's tag space.
pub struct StatisticalClassifier {
    identifier: Box<dyn LanguageIdentifier>,
}

impl StatisticalClassifier {
    pub fn new(identifier: Box<dyn LanguageIdentifier>) -> Self {
        Self { identifier }
    }

    pub fn disabled() -> Self {
        Self::new(Box::new(DisabledIdentifier))
    }

    /// `None` means "no opinion": the identifier failed or reported a code
    /// outside the short-code table.
    pub fn classify(&self, token: &str) -> Option<LanguageTag> {
        let Some(code) = self.identifier.identify(token) else {
            debug!("No statistical opinion for '{}'", token);
            return None;
        };

        let tag = language::tag_for_short_code(code);
        if tag.is_none() {
            debug!("Identifier code '{}' for '{}' is not mapped", code, token);
        }
        tag
    }
}

impl Default for StatisticalClassifier {
    fn default() -> Self {
        Self::new(Box::new(WhatlangIdentifier::default()))
    }
}
