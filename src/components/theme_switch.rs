use yew::prelude::*;

use crate::hooks::{use_preference, use_preferences};
use crate::i18n::Translations;
use crate::prefs::value::{PreferenceValue, Theme};

#[derive(Properties, PartialEq)]
pub struct ThemeSwitchProps {
    #[prop_or(AttrValue::Static("sm"))]
    pub size: AttrValue,
    #[prop_or_default]
    pub onchoose: Callback<Theme>,
}

/// Segmented Dark / Light control. Subscribes to the theme preference, so a
/// change made by any other control shows up here immediately.
#[function_component(ThemeSwitch)]
pub fn theme_switch(props: &ThemeSwitchProps) -> Html {
    let preferences = use_preferences();
    let current = use_preference(preferences.theme());
    let locale = use_preference(preferences.locale());
    let text = Translations::for_locale(locale);

    let button = |theme: Theme, label: &str| {
        let active = theme == current;
        let onclick = {
            let preferences = preferences.clone();
            let onchoose = props.onchoose.clone();
            Callback::from(move |_: MouseEvent| {
                preferences.theme().set(theme);
                onchoose.emit(theme);
            })
        };
        html! {
            <button
                type="button"
                key={theme.as_str()}
                class={classes!("seg-btn", active.then(|| "active"))}
                aria-pressed={active.to_string()}
                {onclick}
            >
                {label.to_string()}
            </button>
        }
    };

    html! {
        <div class={classes!("seg", format!("seg-{}", props.size))} role="group" aria-label={text.theme.select.clone()}>
            { button(Theme::Dark, &text.theme.dark) }
            { button(Theme::Light, &text.theme.light) }
        </div>
    }
}

/// Single header button flipping between the two themes.
#[function_component(ThemeToggle)]
pub fn theme_toggle() -> Html {
    let preferences = use_preferences();
    let current = use_preference(preferences.theme());
    let locale = use_preference(preferences.locale());
    let text = Translations::for_locale(locale);

    let onclick = {
        let preferences = preferences.clone();
        Callback::from(move |_: MouseEvent| {
            let theme = preferences.theme();
            theme.set(theme.get().toggled());
        })
    };
    let label = match current.toggled() {
        Theme::Dark => &text.theme.dark,
        Theme::Light => &text.theme.light,
    };

    html! {
        <button class="btn ghost" type="button" aria-label={text.theme.select.clone()} {onclick}>
            {label}
        </button>
    }
}
