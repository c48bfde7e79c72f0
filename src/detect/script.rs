use std::ops::RangeInclusive;

use crate::language::LanguageTag;

/// Writing systems recognized by Unicode range membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Arabic,
    Cyrillic,
    Greek,
    Hebrew,
    Thai,
    Devanagari,
    Hangul,
    Kana,
    Han,
}

// Checked top to bottom; the first script with any matching character wins.
// Kana precedes Han so mixed Japanese text is not read as Chinese.
const SCRIPT_RANGES: &[(Script, &[RangeInclusive<char>])] = &[
    (
        Script::Arabic,
        &['\u{0600}'..='\u{06FF}', '\u{0750}'..='\u{077F}', '\u{08A0}'..='\u{08FF}'],
    ),
    (Script::Cyrillic, &['\u{0400}'..='\u{04FF}']),
    (Script::Greek, &['\u{0370}'..='\u{03FF}']),
    (Script::Hebrew, &['\u{0590}'..='\u{05FF}']),
    (Script::Thai, &['\u{0E00}'..='\u{0E7F}']),
    (Script::Devanagari, &['\u{0900}'..='\u{097F}']),
    (Script::Hangul, &['\u{AC00}'..='\u{D7AF}']),
    (Script::Kana, &['\u{3040}'..='\u{30FF}']),
    (Script::Han, &['\u{4E00}'..='\u{9FFF}']),
];

impl Script {
    /// The language assumed for a token written in this script.
    pub fn default_tag(self) -> LanguageTag {
        match self {
            Script::Arabic => LanguageTag::ARABIC,
            Script::Cyrillic => LanguageTag::RUSSIAN,
            Script::Greek => LanguageTag::GREEK,
            Script::Hebrew => LanguageTag::HEBREW,
            Script::Thai => LanguageTag::THAI,
            Script::Devanagari => LanguageTag::HINDI,
            Script::Hangul => LanguageTag::KOREAN,
            Script::Kana => LanguageTag::JAPANESE,
            Script::Han => LanguageTag::CHINESE_SIMPLIFIED,
        }
    }
}

/// First recognized script present anywhere in the token.
pub fn detect_script(token: &str) -> Option<Script> {
    SCRIPT_RANGES
        .iter()
        .find(|(_, ranges)| {
            token
                .chars()
                .any(|c| ranges.iter().any(|range| range.contains(&c)))
        })
        .map(|(script, _)| *script)
}

/// Script-based classification: the script's default tag, if any script matched.
pub fn classify(token: &str) -> Option<LanguageTag> {
    detect_script(token).map(Script::default_tag)
}

/// ASCII letters plus the precomposed Latin letter blocks.
pub fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(c, '\u{00C0}'..='\u{00FF}' if c != '\u{00D7}' && c != '\u{00F7}')
        || matches!(c, '\u{0100}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}

/// True for a non-empty token made only of Latin letters.
pub fn is_latin_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_latin_letter)
}
