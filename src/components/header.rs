use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::anchor_link::AnchorLink;
use crate::components::lang_dropdown::LangDropdown;
use crate::components::lang_switch::LangSwitch;
use crate::components::theme_switch::{ThemeSwitch, ThemeToggle};
use crate::hooks::{use_preference, use_preferences};
use crate::i18n::Translations;
use crate::pages::landing::Section;
use crate::prefs::value::{Locale, PreferenceValue};

#[function_component(Logo)]
fn logo() -> Html {
    html! {
        <svg width="28" height="28" viewBox="0 0 24 24" role="img" aria-label="DevoTech logo">
            <path d="M12 2l8 4.5v9L12 20l-8-4.5v-9L12 2z" fill="none" stroke="currentColor" />
            <circle cx="12" cy="12" r="2.5" fill="currentColor" />
        </svg>
    }
}

#[function_component(Header)]
pub fn header() -> Html {
    let preferences = use_preferences();
    let locale = use_preference(preferences.locale());
    let text = Translations::for_locale(locale);
    let menu_open = use_state(|| false);

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: ()| {
            menu_open.set(false);
        })
    };

    // Plain <select> in the mobile menu; its value is validated before use.
    let on_locale_select = {
        let preferences = preferences.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                if preferences.locale().set_raw(&select.value()).is_err() {
                    select.set_value(preferences.locale().get().as_str());
                }
            }
        })
    };

    let links = |onnavigate: Callback<()>| -> Html {
        Section::ALL
            .iter()
            .map(|section| {
                html! {
                    <AnchorLink href={section.href()} onnavigate={onnavigate.clone()}>
                        {section.label(&text.nav)}
                    </AnchorLink>
                }
            })
            .collect()
    };

    html! {
        <header class="header">
            <div class="container nav">
                <div class="brand">
                    <Logo />
                    <span>{&text.brand}</span>
                </div>

                <nav class="nav-desktop" aria-label={text.nav.primary.clone()}>
                    { links(Callback::noop()) }
                </nav>

                <div class="nav-actions">
                    <LangDropdown />
                    <ThemeToggle />
                    <button
                        class="btn menu-btn"
                        type="button"
                        aria-expanded={menu_open.to_string()}
                        aria-controls="mobile-menu"
                        onclick={toggle_menu}
                    >
                        {&text.nav.menu}
                    </button>
                    <AnchorLink href={Section::Contact.href()} class="btn">
                        {&text.hero.cta}
                    </AnchorLink>
                </div>
            </div>

            if *menu_open {
                <div id="mobile-menu" class="container">
                    <div class="card mobile-menu">
                        <select
                            class="btn ghost"
                            aria-label={text.lang.select.clone()}
                            onchange={on_locale_select}
                        >
                            {
                                for Locale::ALL.iter().map(|option| html! {
                                    <option value={option.as_str()} selected={*option == locale}>
                                        {option.label()}
                                    </option>
                                })
                            }
                        </select>
                        <LangSwitch size="md" />
                        <ThemeSwitch size="md" />
                        { links(close_menu) }
                    </div>
                </div>
            }
        </header>
    }
}
