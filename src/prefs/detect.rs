//! Start-up resolution of preferences from the URL, storage and platform.

use log::debug;

use crate::config::LOCALE_QUERY_PARAM;
use crate::prefs::store::PreferenceStore;
use crate::prefs::value::{Locale, PreferenceValue, Theme};

/// What the platform tells us before any explicit choice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    /// Raw `location.search`, including the leading `?`.
    pub query: String,
    /// `navigator.languages`, most preferred first.
    pub languages: Vec<String>,
    /// `prefers-color-scheme: light`, `None` when the query isn't supported.
    pub prefers_light: Option<bool>,
}

impl Environment {
    pub fn detect() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let query = window.location().search().unwrap_or_default();

        let navigator = window.navigator();
        let mut languages: Vec<String> = navigator
            .languages()
            .iter()
            .filter_map(|tag| tag.as_string())
            .collect();
        if languages.is_empty() {
            languages.extend(navigator.language());
        }

        let prefers_light = window
            .match_media("(prefers-color-scheme: light)")
            .ok()
            .flatten()
            .map(|query| query.matches());

        Self {
            query,
            languages,
            prefers_light,
        }
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        query_param(&self.query, name)
    }
}

/// Value of `name` in a `?a=b&c=d` query string, percent-decoded.
pub fn query_param(search: &str, name: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then(|| value.replace('+', " "))
        })
        .map(|value| {
            urlencoding::decode(&value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or(value)
        })
        .next()
}

fn stored<P: PreferenceValue>(store: &dyn PreferenceStore) -> Option<P> {
    let raw = store.load(P::STORAGE_KEY)?;
    match P::parse(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("ignoring stored value: {}", err);
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Query,
    Stored,
    Detected,
    Default,
}

/// Locale for this load: `?lang=` override, then storage, then the platform
/// languages, then English.
pub fn resolve_locale(store: &dyn PreferenceStore, env: &Environment) -> (Locale, Source) {
    if let Some(locale) = env
        .query_param(LOCALE_QUERY_PARAM)
        .and_then(|raw| Locale::parse(&raw).ok())
    {
        return (locale, Source::Query);
    }
    if let Some(locale) = stored::<Locale>(store) {
        return (locale, Source::Stored);
    }
    if let Some(locale) = env
        .languages
        .iter()
        .find_map(|tag| Locale::from_language_tag(tag))
    {
        return (locale, Source::Detected);
    }
    (Locale::DEFAULT, Source::Default)
}

/// Theme for this load: storage, then `prefers-color-scheme`, then dark.
pub fn resolve_theme(store: &dyn PreferenceStore, env: &Environment) -> (Theme, Source) {
    if let Some(theme) = stored::<Theme>(store) {
        return (theme, Source::Stored);
    }
    match env.prefers_light {
        Some(true) => (Theme::Light, Source::Detected),
        Some(false) => (Theme::Dark, Source::Detected),
        None => (Theme::DEFAULT, Source::Default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LOCALE_STORAGE_KEY, THEME_STORAGE_KEY};
    use crate::prefs::store::MemoryStore;

    fn env(query: &str, languages: &[&str]) -> Environment {
        Environment {
            query: query.to_string(),
            languages: languages.iter().map(|l| l.to_string()).collect(),
            prefers_light: None,
        }
    }

    #[test]
    fn query_params_are_found_and_decoded() {
        assert_eq!(query_param("?lang=fr", "lang"), Some("fr".to_string()));
        assert_eq!(query_param("?utm=x&lang=zh&x=1", "lang"), Some("zh".to_string()));
        assert_eq!(query_param("?q=a%20b+c", "q"), Some("a b c".to_string()));
        assert_eq!(query_param("?flag", "flag"), Some(String::new()));
        assert_eq!(query_param("", "lang"), None);
        assert_eq!(query_param("?language=fr", "lang"), None);
    }

    #[test]
    fn query_override_beats_storage() {
        let store = MemoryStore::with(&[(LOCALE_STORAGE_KEY, "zh")]);
        assert_eq!(
            resolve_locale(&store, &env("?lang=fr", &["en-US"])),
            (Locale::Fr, Source::Query)
        );
    }

    #[test]
    fn invalid_query_falls_through_to_storage() {
        let store = MemoryStore::with(&[(LOCALE_STORAGE_KEY, "zh")]);
        assert_eq!(
            resolve_locale(&store, &env("?lang=klingon", &[])),
            (Locale::Zh, Source::Stored)
        );
    }

    #[test]
    fn unrecognized_stored_value_counts_as_absent() {
        let store = MemoryStore::with(&[(LOCALE_STORAGE_KEY, "en-GB-oxendict")]);
        assert_eq!(
            resolve_locale(&store, &env("", &["de-DE", "fr-CA"])),
            (Locale::Fr, Source::Detected)
        );
    }

    #[test]
    fn locale_defaults_to_english() {
        let store = MemoryStore::default();
        assert_eq!(
            resolve_locale(&store, &env("", &["de", "ja"])),
            (Locale::En, Source::Default)
        );
    }

    #[test]
    fn theme_prefers_storage_then_color_scheme() {
        let mut environment = env("", &[]);
        environment.prefers_light = Some(true);

        let empty = MemoryStore::default();
        assert_eq!(resolve_theme(&empty, &environment), (Theme::Light, Source::Detected));

        let stored = MemoryStore::with(&[(THEME_STORAGE_KEY, "dark")]);
        assert_eq!(resolve_theme(&stored, &environment), (Theme::Dark, Source::Stored));

        let garbage = MemoryStore::with(&[(THEME_STORAGE_KEY, "sepia")]);
        assert_eq!(resolve_theme(&garbage, &env("", &[])), (Theme::Dark, Source::Default));
    }
}
