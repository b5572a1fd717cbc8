//! Session languages
//!
//! Every credential carries the language its owner prefers. Prompt texts are
//! not localized by the core; the code is stored and displayed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported session language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    #[default]
    En,
    Fr,
    Es,
    It,
    Tr,
}

impl Language {
    /// All supported languages in menu order
    pub fn all() -> &'static [Language] {
        &[
            Language::De,
            Language::En,
            Language::Fr,
            Language::Es,
            Language::It,
            Language::Tr,
        ]
    }

    /// Two-letter code
    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::It => "it",
            Language::Tr => "tr",
        }
    }

    /// Name of the language in itself
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::De => "Deutsch",
            Language::En => "English",
            Language::Fr => "Français",
            Language::Es => "Español",
            Language::It => "Italiano",
            Language::Tr => "Türkçe",
        }
    }

    /// Parse a two-letter code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::all().iter().copied().find(|lang| lang.code() == s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
