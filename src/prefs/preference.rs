//! The locale and theme preferences shared by every control on the page.

use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::observable::{Observable, Subscription};
use crate::prefs::detect::{resolve_locale, resolve_theme, Environment, Source};
use crate::prefs::host::{apply_locale, apply_theme, HostDocument};
use crate::prefs::store::PreferenceStore;
use crate::prefs::value::{Locale, PreferenceError, PreferenceValue, Theme};

/// One preference: a single current value, persisted on change and published
/// to every subscriber before `set` returns.
pub struct Preference<P> {
    value: Observable<P>,
    store: Rc<dyn PreferenceStore>,
}

impl<P: PreferenceValue> Preference<P> {
    pub fn new(initial: P, store: Rc<dyn PreferenceStore>) -> Self {
        Self {
            value: Observable::new(initial),
            store,
        }
    }

    pub fn get(&self) -> P {
        self.value.get()
    }

    pub fn set(&self, value: P) {
        self.persist(value);
        if self.value.set(value) {
            info!("{} set to {}", P::KIND, value);
        }
    }

    /// Validates a raw value (e.g. from a `<select>`) before applying it. An
    /// unknown value leaves the preference untouched and notifies nobody.
    pub fn set_raw(&self, raw: &str) -> Result<P, PreferenceError> {
        match P::parse(raw) {
            Ok(value) => {
                self.set(value);
                Ok(value)
            }
            Err(err) => {
                warn!("rejected {}: {}", P::KIND, err);
                Err(err)
            }
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&P) + 'static) -> Subscription {
        self.value.subscribe(listener)
    }

    fn persist(&self, value: P) {
        if let Err(err) = self.store.save(P::STORAGE_KEY, value.as_str()) {
            warn!("{}", err);
        }
    }
}

impl<P> Clone for Preference<P> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            store: self.store.clone(),
        }
    }
}

impl<P> PartialEq for Preference<P> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<P: fmt::Debug> fmt::Debug for Preference<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preference").field("value", &self.value).finish()
    }
}

struct Shared {
    locale: Preference<Locale>,
    theme: Preference<Theme>,
    _document_bindings: [Subscription; 2],
}

/// Both preferences plus their document side effects. Built once at start-up
/// and handed to components through context; dropping the last clone tears
/// down the document bindings.
#[derive(Clone)]
pub struct Preferences {
    shared: Rc<Shared>,
}

impl PartialEq for Preferences {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("locale", &self.shared.locale.get())
            .field("theme", &self.shared.theme.get())
            .finish()
    }
}

impl Preferences {
    /// Resolves both preferences, applies them to the document and keeps the
    /// document in sync from then on.
    pub fn init(
        store: Rc<dyn PreferenceStore>,
        env: &Environment,
        host: Rc<dyn HostDocument>,
    ) -> Self {
        let (locale, locale_source) = resolve_locale(store.as_ref(), env);
        let (theme, theme_source) = resolve_theme(store.as_ref(), env);
        debug!(
            "locale {} from {:?}, theme {} from {:?}",
            locale, locale_source, theme, theme_source
        );

        let locale = Preference::new(locale, store.clone());
        let theme = Preference::new(theme, store);
        if locale_source == Source::Query {
            // Shared links stick for later visits.
            locale.persist(locale.get());
        }

        apply_locale(host.as_ref(), locale.get());
        apply_theme(host.as_ref(), theme.get());
        let locale_binding = {
            let host = host.clone();
            locale.subscribe(move |locale| apply_locale(host.as_ref(), *locale))
        };
        let theme_binding = theme.subscribe(move |theme| apply_theme(host.as_ref(), *theme));

        Self {
            shared: Rc::new(Shared {
                locale,
                theme,
                _document_bindings: [locale_binding, theme_binding],
            }),
        }
    }

    pub fn locale(&self) -> &Preference<Locale> {
        &self.shared.locale
    }

    pub fn theme(&self) -> &Preference<Theme> {
        &self.shared.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LOCALE_STORAGE_KEY, THEME_STORAGE_KEY};
    use crate::i18n::Translations;
    use crate::prefs::host::fake::RecordingHost;
    use crate::prefs::store::MemoryStore;
    use std::cell::RefCell;

    fn env(query: &str) -> Environment {
        Environment {
            query: query.to_string(),
            languages: vec!["en-US".to_string()],
            prefers_light: Some(false),
        }
    }

    fn boot(store: Rc<MemoryStore>, query: &str) -> (Preferences, Rc<RecordingHost>) {
        let host = Rc::new(RecordingHost::default());
        let prefs = Preferences::init(store, &env(query), host.clone());
        (prefs, host)
    }

    #[test]
    fn set_notifies_every_subscriber_exactly_once() {
        let (prefs, _) = boot(Rc::new(MemoryStore::default()), "");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<_> = ["header", "dock", "footer"]
            .into_iter()
            .map(|surface| {
                let seen = seen.clone();
                prefs
                    .theme()
                    .subscribe(move |theme| seen.borrow_mut().push((surface, *theme)))
            })
            .collect();

        prefs.theme().set(Theme::Light);

        assert_eq!(prefs.theme().get(), Theme::Light);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("header", Theme::Light),
                ("dock", Theme::Light),
                ("footer", Theme::Light)
            ]
        );
        drop(subs);
    }

    #[test]
    fn subscribers_never_observe_a_torn_value() {
        let (prefs, _) = boot(Rc::new(MemoryStore::default()), "");
        let reader = prefs.clone();
        let mismatches = Rc::new(RefCell::new(0));
        let _sub = {
            let mismatches = mismatches.clone();
            prefs.locale().subscribe(move |locale| {
                if reader.locale().get() != *locale {
                    *mismatches.borrow_mut() += 1;
                }
            })
        };

        prefs.locale().set(Locale::Zh);
        prefs.locale().set(Locale::Fr);
        assert_eq!(*mismatches.borrow(), 0);
    }

    #[test]
    fn invalid_raw_value_is_rejected_silently() {
        let store = Rc::new(MemoryStore::default());
        let (prefs, _) = boot(store.clone(), "");
        let calls = Rc::new(RefCell::new(0));
        let _sub = {
            let calls = calls.clone();
            prefs.theme().subscribe(move |_| *calls.borrow_mut() += 1)
        };

        assert!(prefs.theme().set_raw("xx").is_err());
        assert_eq!(prefs.theme().get(), Theme::Dark);
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(store.load(THEME_STORAGE_KEY), None);

        assert_eq!(prefs.theme().set_raw("light"), Ok(Theme::Light));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn changes_are_persisted() {
        let store = Rc::new(MemoryStore::default());
        let (prefs, _) = boot(store.clone(), "");
        prefs.theme().set(Theme::Light);
        prefs.locale().set(Locale::Zh);

        assert_eq!(store.load(THEME_STORAGE_KEY).as_deref(), Some("light"));
        assert_eq!(store.load(LOCALE_STORAGE_KEY).as_deref(), Some("zh"));

        let (reloaded, _) = boot(store, "");
        assert_eq!(reloaded.theme().get(), Theme::Light);
        assert_eq!(reloaded.locale().get(), Locale::Zh);
    }

    #[test]
    fn document_follows_the_preferences() {
        let (prefs, host) = boot(Rc::new(MemoryStore::default()), "");
        assert_eq!(host.last("lang").as_deref(), Some("en"));
        assert_eq!(host.last("data-theme").as_deref(), Some("dark"));

        prefs.locale().set(Locale::Zh);
        prefs.theme().set(Theme::Light);

        let zh = Translations::for_locale(Locale::Zh);
        assert_eq!(host.last("lang").as_deref(), Some("zh-CN"));
        assert_eq!(host.last("title"), Some(zh.meta.title.clone()));
        assert_eq!(host.last("description"), Some(zh.meta.description.clone()));
        assert_eq!(host.last("data-theme").as_deref(), Some("light"));
    }

    #[test]
    fn dropping_preferences_detaches_the_document() {
        let (prefs, host) = boot(Rc::new(MemoryStore::default()), "");
        let locale = prefs.locale().clone();
        let writes = host.writes.borrow().len();

        drop(prefs);
        locale.set(Locale::Fr);
        assert_eq!(host.writes.borrow().len(), writes);
    }

    #[test]
    fn shared_link_wins_once_then_explicit_choice_sticks() {
        let store = Rc::new(MemoryStore::with(&[(LOCALE_STORAGE_KEY, "zh")]));

        let (first, _) = boot(store.clone(), "?lang=fr");
        assert_eq!(first.locale().get(), Locale::Fr);

        first.locale().set(Locale::En);
        drop(first);

        let (second, _) = boot(store.clone(), "");
        assert_eq!(second.locale().get(), Locale::En);
        assert_eq!(store.load(LOCALE_STORAGE_KEY).as_deref(), Some("en"));
    }

    #[test]
    fn query_locale_is_remembered_for_plain_loads() {
        let store = Rc::new(MemoryStore::default());
        let (_first, _) = boot(store.clone(), "?lang=fr");

        let (second, _) = boot(store, "");
        assert_eq!(second.locale().get(), Locale::Fr);
    }
}
