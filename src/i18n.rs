//! Locale text bundled into the binary. Keys missing from a bundle fall back
//! to the English defaults below.

use std::sync::OnceLock;

use log::error;
use serde::Deserialize;

use crate::prefs::value::Locale;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Translations {
    pub locale: Locale,
    pub brand: String,
    pub meta: Meta,
    pub nav: Nav,
    pub lang: LangText,
    pub theme: ThemeText,
    pub hero: Hero,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Nav {
    pub primary: String,
    pub quick: String,
    pub menu: String,
    pub more: String,
    pub home: String,
    pub products: String,
    pub services: String,
    pub portfolio: String,
    pub team: String,
    pub careers: String,
    pub blog: String,
    pub faq: String,
    pub contact: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LangText {
    pub select: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeText {
    pub select: String,
    pub dark: String,
    pub light: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Hero {
    pub title1: String,
    pub title2: String,
    pub cta: String,
}

impl Default for Translations {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            brand: "DevoTech".into(),
            meta: Meta::default(),
            nav: Nav::default(),
            lang: LangText::default(),
            theme: ThemeText::default(),
            hero: Hero::default(),
        }
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: "DevoTech".into(),
            description: "DevoTech builds focused software products and services.".into(),
        }
    }
}

impl Default for Nav {
    fn default() -> Self {
        Self {
            primary: "Primary".into(),
            quick: "Quick navigation".into(),
            menu: "Menu".into(),
            more: "More".into(),
            home: "Home".into(),
            products: "Products".into(),
            services: "Services".into(),
            portfolio: "Cases".into(),
            team: "Team".into(),
            careers: "Careers".into(),
            blog: "Blog".into(),
            faq: "FAQ".into(),
            contact: "Contact".into(),
        }
    }
}

impl Default for LangText {
    fn default() -> Self {
        Self {
            select: "Language".into(),
        }
    }
}

impl Default for ThemeText {
    fn default() -> Self {
        Self {
            select: "Theme".into(),
            dark: "Dark".into(),
            light: "Light".into(),
        }
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            title1: "Devotion · Evolution · Volition".into(),
            title2: "DevoTech keeps you on track".into(),
            cta: "Get in Touch".into(),
        }
    }
}

fn bundle_source(locale: Locale) -> &'static str {
    match locale {
        Locale::En => include_str!("../locales/en.json"),
        Locale::Zh => include_str!("../locales/zh.json"),
        Locale::Fr => include_str!("../locales/fr.json"),
    }
}

pub fn parse_bundle(source: &str) -> Result<Translations, serde_json::Error> {
    serde_json::from_str(source)
}

impl Translations {
    pub fn for_locale(locale: Locale) -> &'static Translations {
        static EN: OnceLock<Translations> = OnceLock::new();
        static ZH: OnceLock<Translations> = OnceLock::new();
        static FR: OnceLock<Translations> = OnceLock::new();

        let cell = match locale {
            Locale::En => &EN,
            Locale::Zh => &ZH,
            Locale::Fr => &FR,
        };
        cell.get_or_init(|| {
            parse_bundle(bundle_source(locale)).unwrap_or_else(|err| {
                error!("locale bundle '{}' is malformed: {}", locale, err);
                Translations {
                    locale,
                    ..Translations::default()
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::value::PreferenceValue;

    #[test]
    fn every_bundle_parses_and_declares_its_locale() {
        for locale in Locale::ALL {
            let bundle = parse_bundle(bundle_source(*locale)).expect("bundle should parse");
            assert_eq!(bundle.locale, *locale);
        }
    }

    #[test]
    fn bundles_carry_distinct_metadata() {
        let en = Translations::for_locale(Locale::En);
        let zh = Translations::for_locale(Locale::Zh);
        let fr = Translations::for_locale(Locale::Fr);
        assert_ne!(en.meta.title, zh.meta.title);
        assert_ne!(en.meta.description, fr.meta.description);
        assert_eq!(zh.nav.portfolio, "案例");
    }

    #[test]
    fn missing_keys_fall_back_to_english_defaults() {
        let fr = Translations::for_locale(Locale::Fr);
        assert_eq!(fr.hero.title2, Hero::default().title2);
        assert_eq!(fr.hero.cta, "Nous contacter");

        let partial = parse_bundle(r#"{"locale":"zh","nav":{"home":"首页"}}"#).unwrap();
        assert_eq!(partial.nav.home, "首页");
        assert_eq!(partial.nav.faq, "FAQ");
        assert_eq!(partial.meta, Meta::default());
    }

    #[test]
    fn unknown_locale_in_a_bundle_is_an_error() {
        assert!(parse_bundle(r#"{"locale":"de"}"#).is_err());
    }
}
