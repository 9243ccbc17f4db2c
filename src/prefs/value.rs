use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{LOCALE_STORAGE_KEY, THEME_STORAGE_KEY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("unsupported {kind} '{value}'")]
    Unsupported { kind: &'static str, value: String },
    #[error("could not persist {key}: {reason}")]
    Storage { key: &'static str, reason: String },
}

/// A closed set of values one preference may take.
pub trait PreferenceValue:
    Copy + PartialEq + fmt::Debug + fmt::Display + FromStr<Err = PreferenceError> + 'static
{
    /// Human-readable name used in logs and errors.
    const KIND: &'static str;
    const STORAGE_KEY: &'static str;
    const DEFAULT: Self;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Parses a raw value, treating anything outside [`Self::ALL`] as invalid.
    fn parse(raw: &str) -> Result<Self, PreferenceError> {
        let wanted = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PreferenceError::Unsupported {
                kind: Self::KIND,
                value: raw.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
    Fr,
}

impl Locale {
    /// BCP 47 tag written to the document's `lang` attribute.
    pub fn language_tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh-CN",
            Locale::Fr => "fr",
        }
    }

    /// Short label shown in switches.
    pub fn label(self) -> &'static str {
        match self {
            Locale::En => "EN",
            Locale::Zh => "中文",
            Locale::Fr => "FR",
        }
    }

    /// Matches a platform locale such as `fr-CA` or `zh_Hans_CN` by its
    /// primary subtag.
    pub fn from_language_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?;
        Self::parse(primary).ok()
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }
}

impl PreferenceValue for Locale {
    const KIND: &'static str = "locale";
    const STORAGE_KEY: &'static str = LOCALE_STORAGE_KEY;
    const DEFAULT: Self = Locale::En;
    const ALL: &'static [Self] = &[Locale::En, Locale::Zh, Locale::Fr];

    fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
            Locale::Fr => "fr",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl PreferenceValue for Theme {
    const KIND: &'static str = "theme";
    const STORAGE_KEY: &'static str = THEME_STORAGE_KEY;
    const DEFAULT: Self = Theme::Dark;
    const ALL: &'static [Self] = &[Theme::Dark, Theme::Light];

    fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

macro_rules! preference_text {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PreferenceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as PreferenceValue>::parse(s)
            }
        }
    )*};
}

preference_text!(Locale, Theme);
