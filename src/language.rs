//! Fixed registry of supported languages.
//!
//! Every [`LanguageTag`] names a (language, script) pair in the form
//! `<iso639-3>_<iso15924>` (e.g. `arb_Arab`). Tags can only be obtained from
//! this registry, so any tag held by the rest of the crate is known to be valid
//! for the translation engine.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LanguageTag(&'static str);

impl LanguageTag {
    pub const ARABIC: Self = Self("arb_Arab");
    pub const ENGLISH: Self = Self("eng_Latn");
    pub const FRENCH: Self = Self("fra_Latn");
    pub const SPANISH: Self = Self("spa_Latn");
    pub const GERMAN: Self = Self("deu_Latn");
    pub const RUSSIAN: Self = Self("rus_Cyrl");
    pub const GREEK: Self = Self("ell_Grek");
    pub const HEBREW: Self = Self("heb_Hebr");
    pub const THAI: Self = Self("tha_Thai");
    pub const HINDI: Self = Self("hin_Deva");
    pub const KOREAN: Self = Self("kor_Hang");
    pub const JAPANESE: Self = Self("jpn_Jpan");
    pub const CHINESE_SIMPLIFIED: Self = Self("zho_Hans");

    pub fn code(self) -> &'static str {
        self.0
    }

    /// ISO 15924 script part of the tag (`Arab`, `Latn`, ...).
    pub fn script(self) -> &'static str {
        self.0.split_once('_').map(|(_, script)| script).unwrap_or("")
    }

    /// Look up a tag by its registry code, e.g. `"fra_Latn"`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        LANGUAGES
            .iter()
            .find(|(_, tag)| tag.0 == code)
            .map(|(_, tag)| *tag)
    }

    /// Human readable name, falling back to the code itself.
    pub fn display_name(self) -> &'static str {
        LANGUAGES
            .iter()
            .find(|(_, tag)| *tag == self)
            .map(|(name, _)| *name)
            .unwrap_or(self.0)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Display name to tag, in the order they are offered to users.
pub static LANGUAGES: &[(&str, LanguageTag)] = &[
    ("Arabic", LanguageTag::ARABIC),
    ("English", LanguageTag::ENGLISH),
    ("Spanish", LanguageTag::SPANISH),
    ("French", LanguageTag::FRENCH),
    ("German", LanguageTag::GERMAN),
    ("Italian", LanguageTag("ita_Latn")),
    ("Portuguese", LanguageTag("por_Latn")),
    ("Russian", LanguageTag::RUSSIAN),
    ("Chinese (Simplified)", LanguageTag::CHINESE_SIMPLIFIED),
    ("Chinese (Traditional)", LanguageTag("zho_Hant")),
    ("Japanese", LanguageTag::JAPANESE),
    ("Korean", LanguageTag::KOREAN),
    ("Hindi", LanguageTag::HINDI),
    ("Bengali", LanguageTag("ben_Beng")),
    ("Urdu", LanguageTag("urd_Arab")),
    ("Vietnamese", LanguageTag("vie_Latn")),
    ("Thai", LanguageTag::THAI),
    ("Indonesian", LanguageTag("ind_Latn")),
    ("Malay", LanguageTag("zsm_Latn")),
    ("Tamil", LanguageTag("tam_Taml")),
    ("Telugu", LanguageTag("tel_Telu")),
    ("Turkish", LanguageTag("tur_Latn")),
    ("Dutch", LanguageTag("nld_Latn")),
    ("Polish", LanguageTag("pol_Latn")),
    ("Swedish", LanguageTag("swe_Latn")),
    ("Greek", LanguageTag::GREEK),
    ("Czech", LanguageTag("ces_Latn")),
    ("Romanian", LanguageTag("ron_Latn")),
    ("Hungarian", LanguageTag("hun_Latn")),
    ("Ukrainian", LanguageTag("ukr_Cyrl")),
    ("Danish", LanguageTag("dan_Latn")),
    ("Finnish", LanguageTag("fin_Latn")),
    ("Norwegian", LanguageTag("nob_Latn")),
    ("Persian", LanguageTag("pes_Arab")),
    ("Hebrew", LanguageTag::HEBREW),
    ("Swahili", LanguageTag("swh_Latn")),
    ("Amharic", LanguageTag("amh_Ethi")),
    ("Hausa", LanguageTag("hau_Latn")),
    ("Yoruba", LanguageTag("yor_Latn")),
    ("Somali", LanguageTag("som_Latn")),
    ("Catalan", LanguageTag("cat_Latn")),
    ("Slovak", LanguageTag("slk_Latn")),
    ("Bulgarian", LanguageTag("bul_Cyrl")),
    ("Croatian", LanguageTag("hrv_Latn")),
    ("Serbian", LanguageTag("srp_Cyrl")),
    ("Lithuanian", LanguageTag("lit_Latn")),
    ("Latvian", LanguageTag("lvs_Latn")),
    ("Estonian", LanguageTag("est_Latn")),
    ("Slovenian", LanguageTag("slv_Latn")),
];

/// Short (ISO 639-1) codes reported by the statistical identifier that map
/// into the registry. Anything else is treated as "no opinion".
static SHORT_CODES: &[(&str, LanguageTag)] = &[
    ("ar", LanguageTag::ARABIC),
    ("en", LanguageTag::ENGLISH),
    ("fr", LanguageTag::FRENCH),
    ("es", LanguageTag::SPANISH),
    ("de", LanguageTag::GERMAN),
    ("it", LanguageTag("ita_Latn")),
    ("pt", LanguageTag("por_Latn")),
    ("ru", LanguageTag::RUSSIAN),
    ("tr", LanguageTag("tur_Latn")),
    ("nl", LanguageTag("nld_Latn")),
    ("pl", LanguageTag("pol_Latn")),
    ("sv", LanguageTag("swe_Latn")),
    ("id", LanguageTag("ind_Latn")),
    ("vi", LanguageTag("vie_Latn")),
];

/// Resolve a display name ("French") or a registry code ("fra_Latn").
/// Names match case-insensitively.
pub fn from_name(name: &str) -> Option<LanguageTag> {
    let name = name.trim();
    LANGUAGES
        .iter()
        .find(|(display, _)| display.eq_ignore_ascii_case(name))
        .map(|(_, tag)| *tag)
        .or_else(|| LanguageTag::from_code(name))
}

pub fn tag_for_short_code(code: &str) -> Option<LanguageTag> {
    SHORT_CODES
        .iter()
        .find(|(short, _)| *short == code)
        .map(|(_, tag)| *tag)
}

/// All display names, sorted alphabetically.
pub fn all_language_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = LANGUAGES.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}
