#![forbid(unsafe_code)]

//! Supported display languages.

use std::fmt;
use std::str::FromStr;

/// A language the application can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Portuguese];

    /// Two-letter language code (`en`, `pt`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Portuguese => "pt",
        }
    }

    /// The other supported language.
    ///
    /// Total over both variants, so toggling twice is the identity.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::English => Self::Portuguese,
            Self::Portuguese => Self::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A language code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageParseError {
    pub code: String,
}

impl fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language code: {:?}", self.code)
    }
}

impl std::error::Error for LanguageParseError {}

impl FromStr for Language {
    type Err = LanguageParseError;

    /// Accepts the code case-insensitively, ignoring a region suffix
    /// (`pt-BR`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Self::English),
            "pt" => Ok(Self::Portuguese),
            _ => Err(LanguageParseError { code: s.to_owned() }),
        }
    }
}
