use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use crate::language::LanguageTag;
use super::tagger::WordTagger;

// Every character is either a word character, whitespace, or neither, so the
// three alternatives together cover the whole input.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)|([^\w\s]+)|(\s+)").expect("token pattern is a valid regex")
});

/// Marker used in place of a language for punctuation runs.
pub const PUNCTUATION_MARKER: &str = "punct";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Punctuation,
    Whitespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

/// Split text into maximal word, punctuation and whitespace runs.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    TOKEN_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            if let Some(m) = caps.get(1) {
                Some(Token { text: m.as_str(), kind: TokenKind::Word })
            } else if let Some(m) = caps.get(2) {
                Some(Token { text: m.as_str(), kind: TokenKind::Punctuation })
            } else {
                caps.get(3).map(|m| Token { text: m.as_str(), kind: TokenKind::Whitespace })
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordTag {
    Language(LanguageTag),
    Punctuation,
}

impl WordTag {
    pub fn language(self) -> Option<LanguageTag> {
        match self {
            WordTag::Language(tag) => Some(tag),
            WordTag::Punctuation => None,
        }
    }

    /// Registry display name, or the punctuation marker.
    pub fn display_name(self) -> &'static str {
        match self {
            WordTag::Language(tag) => tag.display_name(),
            WordTag::Punctuation => PUNCTUATION_MARKER,
        }
    }
}

impl fmt::Display for WordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordTag::Language(tag) => write!(f, "{}", tag),
            WordTag::Punctuation => f.write_str(PUNCTUATION_MARKER),
        }
    }
}

impl Serialize for WordTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            WordTag::Language(tag) => tag.serialize(serializer),
            WordTag::Punctuation => serializer.serialize_str(PUNCTUATION_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedWord {
    pub text: String,
    pub tag: WordTag,
}

/// Word-level analysis of one passage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Tagged words and punctuation in text order.
    pub words: Vec<TaggedWord>,
    /// Distinct languages in order of first occurrence, without punctuation.
    pub languages: Vec<LanguageTag>,
}

impl AnalysisResult {
    fn from_words(words: Vec<TaggedWord>) -> Self {
        let mut languages = Vec::new();
        for tag in words.iter().filter_map(|word| word.tag.language()) {
            if !languages.contains(&tag) {
                languages.push(tag);
            }
        }
        Self { words, languages }
    }

    pub fn languages_count(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, tag: LanguageTag) -> bool {
        self.languages.contains(&tag)
    }
}

/// Tokenizes a passage and tags every word with a rolling context language.
pub struct MixedTextAnalyzer {
    tagger: WordTagger,
    default_language: LanguageTag,
}

impl MixedTextAnalyzer {
    pub fn new(tagger: WordTagger, default_language: LanguageTag) -> Self {
        Self { tagger, default_language }
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        if text.trim().is_empty() {
            return AnalysisResult::default();
        }

        let mut words = Vec::new();
        let mut context = self.default_language;

        for token in tokenize(text) {
            match token.kind {
                TokenKind::Whitespace => continue,
                TokenKind::Punctuation => words.push(TaggedWord {
                    text: token.text.to_string(),
                    tag: WordTag::Punctuation,
                }),
                TokenKind::Word => {
                    context = self.tagger.tag(token.text, context);
                    words.push(TaggedWord {
                        text: token.text.to_string(),
                        tag: WordTag::Language(context),
                    });
                }
            }
        }

        let result = AnalysisResult::from_words(words);
        debug!(
            "Analyzed {} tokens, {} language(s): {:?}",
            result.words.len(),
            result.languages_count(),
            result.languages
        );
        result
    }
}

impl Default for MixedTextAnalyzer {
    fn default() -> Self {
        Self::new(WordTagger::default(), LanguageTag::ENGLISH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionConfig;
    use crate::detect::statistical::StatisticalClassifier;

    fn analyzer() -> MixedTextAnalyzer {
        let tagger = WordTagger::new(StatisticalClassifier::disabled(), &DetectionConfig::default());
        MixedTextAnalyzer::new(tagger, LanguageTag::ENGLISH)
    }

    #[test]
    fn test_tokenize_runs() {
        let tokens = tokenize("Hi, there!!  ok");
        let kinds: Vec<_> = tokens.iter().map(|t| (t.text, t.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("Hi", TokenKind::Word),
                (",", TokenKind::Punctuation),
                (" ", TokenKind::Whitespace),
                ("there", TokenKind::Word),
                ("!!", TokenKind::Punctuation),
                ("  ", TokenKind::Whitespace),
                ("ok", TokenKind::Word),
            ]
        );
    }

    #[test]
    fn test_tokenize_unicode_words() {
        let tokens = tokenize("مرحبا،世界");
        assert_eq!(tokens[0].text, "مرحبا");
        assert_eq!(tokens[1].kind, TokenKind::Punctuation);
        assert_eq!(tokens[2].text, "世界");
    }

    #[test]
    fn test_empty_and_blank_input() {
        for input in ["", "   ", "\n\t "] {
            let result = analyzer().analyze(input);
            assert!(result.words.is_empty());
            assert!(result.languages.is_empty());
            assert_eq!(result.languages_count(), 0);
        }
    }

    #[test]
    fn test_single_script_passage() {
        let result = analyzer().analyze("Привет мир, как дела?");
        assert_eq!(result.languages, vec![LanguageTag::RUSSIAN]);
        for word in result.words.iter().filter(|w| w.tag != WordTag::Punctuation) {
            assert_eq!(word.tag, WordTag::Language(LanguageTag::RUSSIAN));
        }
    }

    #[test]
    fn test_punctuation_never_counted() {
        let result = analyzer().analyze("عالم! ... ؟");
        assert_eq!(result.languages, vec![LanguageTag::ARABIC]);
        let punct: Vec<_> = result
            .words
            .iter()
            .filter(|w| w.tag == WordTag::Punctuation)
            .map(|w| w.text.as_str())
            .collect();
        assert_eq!(punct, vec!["!", "...", "؟"]);
    }

    #[test]
    fn test_context_carries_after_script_word() {
        // "ok" is short Latin, so it inherits Arabic from the preceding word.
        let result = analyzer().analyze("Hello عالم ok");
        assert_eq!(result.words[0].tag, WordTag::Language(LanguageTag::ENGLISH));
        assert_eq!(result.words[1].tag, WordTag::Language(LanguageTag::ARABIC));
        assert_eq!(result.words[2].tag, WordTag::Language(LanguageTag::ARABIC));
        assert_eq!(result.languages, vec![LanguageTag::ENGLISH, LanguageTag::ARABIC]);
    }

    #[test]
    fn test_languages_in_first_seen_order() {
        let result = analyzer().analyze("你好 привет 你好 שלום");
        assert_eq!(
            result.languages,
            vec![LanguageTag::CHINESE_SIMPLIFIED, LanguageTag::RUSSIAN, LanguageTag::HEBREW]
        );
        assert_eq!(result.languages_count(), 3);
    }

    #[test]
    fn test_serializes_punctuation_marker() {
        let result = analyzer().analyze("hi!");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["words"][0]["tag"], "eng_Latn");
        assert_eq!(json["words"][1]["tag"], "punct");
        assert_eq!(json["languages"][0], "eng_Latn");
    }
}
