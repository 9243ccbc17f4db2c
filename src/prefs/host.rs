use crate::i18n::Translations;
use crate::prefs::value::{Locale, PreferenceValue, Theme};

/// Document-level side effects of the preferences.
pub trait HostDocument {
    fn set_language_tag(&self, tag: &str);
    fn set_title(&self, title: &str);
    fn set_description(&self, description: &str);
    fn set_theme(&self, theme: &str);
}

pub fn apply_locale(host: &dyn HostDocument, locale: Locale) {
    let text = Translations::for_locale(locale);
    host.set_language_tag(locale.language_tag());
    host.set_title(&text.meta.title);
    host.set_description(&text.meta.description);
}

pub fn apply_theme(host: &dyn HostDocument, theme: Theme) {
    host.set_theme(theme.as_str());
}

/// The live `document`: `<html lang>`, `<title>`, `<meta name="description">`
/// and `<html data-theme>`. Missing nodes are skipped.
#[derive(Debug, Default)]
pub struct DomHost;

impl DomHost {
    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_root_attribute(name: &str, value: &str) {
        if let Some(root) = Self::document().and_then(|d| d.document_element()) {
            let _ = root.set_attribute(name, value);
        }
    }
}

impl HostDocument for DomHost {
    fn set_language_tag(&self, tag: &str) {
        Self::set_root_attribute("lang", tag);
    }

    fn set_title(&self, title: &str) {
        if let Some(document) = Self::document() {
            document.set_title(title);
        }
    }

    fn set_description(&self, description: &str) {
        let meta = Self::document()
            .and_then(|d| d.query_selector("meta[name=\"description\"]").ok().flatten());
        if let Some(meta) = meta {
            let _ = meta.set_attribute("content", description);
        }
    }

    fn set_theme(&self, theme: &str) {
        Self::set_root_attribute("data-theme", theme);
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::HostDocument;
    use std::cell::RefCell;

    /// Records every write in order.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub writes: RefCell<Vec<(&'static str, String)>>,
    }

    impl RecordingHost {
        pub fn last(&self, field: &str) -> Option<String> {
            self.writes
                .borrow()
                .iter()
                .rev()
                .find(|(f, _)| *f == field)
                .map(|(_, v)| v.clone())
        }

        fn push(&self, field: &'static str, value: &str) {
            self.writes.borrow_mut().push((field, value.to_string()));
        }
    }

    impl HostDocument for RecordingHost {
        fn set_language_tag(&self, tag: &str) {
            self.push("lang", tag);
        }

        fn set_title(&self, title: &str) {
            self.push("title", title);
        }

        fn set_description(&self, description: &str) {
            self.push("description", description);
        }

        fn set_theme(&self, theme: &str) {
            self.push("data-theme", theme);
        }
    }
}
