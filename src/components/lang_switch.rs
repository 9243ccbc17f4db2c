use yew::prelude::*;

use crate::hooks::{use_preference, use_preferences};
use crate::i18n::Translations;
use crate::prefs::value::{Locale, PreferenceValue};

#[derive(Properties, PartialEq)]
pub struct LangSwitchProps {
    #[prop_or(AttrValue::Static("sm"))]
    pub size: AttrValue,
    /// Fired after a new locale was picked.
    #[prop_or_default]
    pub onchoose: Callback<Locale>,
}

/// Segmented EN / 中文 / FR control.
#[function_component(LangSwitch)]
pub fn lang_switch(props: &LangSwitchProps) -> Html {
    let preferences = use_preferences();
    let current = use_preference(preferences.locale());
    let text = Translations::for_locale(current);

    html! {
        <div class={classes!("seg", format!("seg-{}", props.size))} role="group" aria-label={text.lang.select.clone()}>
            {
                for Locale::ALL.iter().map(|locale| {
                    let locale = *locale;
                    let active = locale == current;
                    let onclick = {
                        let preferences = preferences.clone();
                        let onchoose = props.onchoose.clone();
                        Callback::from(move |_: MouseEvent| {
                            if !active {
                                preferences.locale().set(locale);
                            }
                            onchoose.emit(locale);
                        })
                    };
                    html! {
                        <button
                            type="button"
                            key={locale.as_str()}
                            class={classes!("seg-btn", active.then(|| "active"))}
                            aria-pressed={active.to_string()}
                            {onclick}
                        >
                            {locale.label()}
                        </button>
                    }
                })
            }
        </div>
    }
}
