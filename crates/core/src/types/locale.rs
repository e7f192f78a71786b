//! Display language for the bilingual storefront.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown locale tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0} (expected `ar` or `en`)")]
pub struct LocaleError(pub String);

/// Storefront display language. Arabic is the primary locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
}

impl Locale {
    /// The BCP 47 language tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    /// Whether text in this locale is laid out right-to-left.
    #[must_use]
    pub const fn is_rtl(&self) -> bool {
        matches!(self, Self::Ar)
    }

    /// Pick the variant of a bilingual field for this locale, falling back
    /// to the other language when the preferred one is blank.
    #[must_use]
    pub fn pick<'a>(&self, ar: &'a str, en: &'a str) -> &'a str {
        let (preferred, fallback) = match self {
            Self::Ar => (ar, en),
            Self::En => (en, ar),
        };
        if preferred.trim().is_empty() {
            fallback
        } else {
            preferred
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Self::Ar),
            "en" => Ok(Self::En),
            _ => Err(LocaleError(s.to_owned())),
        }
    }
}
