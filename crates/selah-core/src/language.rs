//! Supported language codes.
//!
//! Any translation target must be one of these; parsing an unknown code is a
//! validation error and never reaches the vendor.

use crate::error::VoiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Am,
    Ar,
    Zh,
    Fr,
    De,
    Hi,
    It,
    Ja,
    Ko,
    Pt,
    Ru,
    Es,
    Sw,
    Tl,
    Tr,
    Vi,
    Yo,
    Zu,
}

impl LanguageCode {
    /// All supported codes in canonical order.
    pub const ALL: [LanguageCode; 19] = [
        LanguageCode::En,
        LanguageCode::Am,
        LanguageCode::Ar,
        LanguageCode::Zh,
        LanguageCode::Fr,
        LanguageCode::De,
        LanguageCode::Hi,
        LanguageCode::It,
        LanguageCode::Ja,
        LanguageCode::Ko,
        LanguageCode::Pt,
        LanguageCode::Ru,
        LanguageCode::Es,
        LanguageCode::Sw,
        LanguageCode::Tl,
        LanguageCode::Tr,
        LanguageCode::Vi,
        LanguageCode::Yo,
        LanguageCode::Zu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Am => "am",
            LanguageCode::Ar => "ar",
            LanguageCode::Zh => "zh",
            LanguageCode::Fr => "fr",
            LanguageCode::De => "de",
            LanguageCode::Hi => "hi",
            LanguageCode::It => "it",
            LanguageCode::Ja => "ja",
            LanguageCode::Ko => "ko",
            LanguageCode::Pt => "pt",
            LanguageCode::Ru => "ru",
            LanguageCode::Es => "es",
            LanguageCode::Sw => "sw",
            LanguageCode::Tl => "tl",
            LanguageCode::Tr => "tr",
            LanguageCode::Vi => "vi",
            LanguageCode::Yo => "yo",
            LanguageCode::Zu => "zu",
        }
    }

    pub fn is_english(&self) -> bool {
        matches!(self, LanguageCode::En)
    }

    /// Comma-separated list used in validation messages.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for LanguageCode {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| {
                VoiceError::Validation(format!(
                    "Unsupported language: {}. Supported: {}",
                    s,
                    Self::supported_list()
                ))
            })
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
