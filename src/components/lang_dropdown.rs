use web_sys::{Element, KeyboardEvent};
use yew::prelude::*;

use crate::dock::popover::{placement, KeyOutcome, Placement};
use crate::hooks::{use_popover, use_preference, use_preferences};
use crate::i18n::Translations;
use crate::prefs::value::{Locale, PreferenceValue};

#[derive(Properties, PartialEq)]
pub struct LangDropdownProps {
    #[prop_or(AttrValue::Static("sm"))]
    pub size: AttrValue,
}

fn measure(anchor: &NodeRef) -> Option<(Placement, f64)> {
    let rect = anchor.cast::<Element>()?.get_bounding_client_rect();
    let viewport = web_sys::window()?.inner_height().ok()?.as_f64()?;
    Some(placement(rect.top(), rect.height(), viewport))
}

/// Locale picker for the header: a listbox popover with keyboard support.
#[function_component(LangDropdown)]
pub fn lang_dropdown(props: &LangDropdownProps) -> Html {
    let preferences = use_preferences();
    let current = use_preference(preferences.locale());
    let text = Translations::for_locale(current);

    let wrap_ref = use_node_ref();
    let menu_ref = use_node_ref();
    let popover = use_popover(Locale::ALL.len(), wrap_ref.clone(), menu_ref.clone());
    let layout = use_state(|| (Placement::Below, None::<f64>));

    let place = {
        let layout = layout.clone();
        let wrap_ref = wrap_ref.clone();
        move || {
            if let Some((side, max_height)) = measure(&wrap_ref) {
                layout.set((side, Some(max_height)));
            }
        }
    };

    let choose = {
        let preferences = preferences.clone();
        move |index: usize| {
            if let Some(locale) = Locale::ALL.get(index) {
                preferences.locale().set(*locale);
            }
        }
    };

    let onclick = {
        let popover = popover.clone();
        let place = place.clone();
        Callback::from(move |_: MouseEvent| {
            if popover.toggle(current.index()) {
                place();
            }
        })
    };

    let onkeydown = {
        let popover = popover.clone();
        let choose = choose.clone();
        Callback::from(move |e: KeyboardEvent| {
            match popover.trigger_key(&e.key(), current.index()) {
                KeyOutcome::Opened => {
                    e.prevent_default();
                    place();
                }
                KeyOutcome::Moved => e.prevent_default(),
                KeyOutcome::Selected(index) => {
                    e.prevent_default();
                    choose(index);
                }
                KeyOutcome::Dismissed(_) | KeyOutcome::Ignored => {}
            }
        })
    };

    let (side, max_height) = *layout;
    let menu_style = max_height.map(|h| format!("max-height: {}px", h));

    html! {
        <div ref={wrap_ref} class={classes!("select", props.size.to_string())} aria-label={text.lang.select.clone()}>
            <button
                type="button"
                class="select-btn"
                aria-haspopup="listbox"
                aria-expanded={popover.is_open().to_string()}
                {onclick}
                {onkeydown}
            >
                <span>{current.label()}</span>
                <svg width="16" height="16" viewBox="0 0 24 24" aria-hidden="true">
                    <path d="M6 9l6 6 6-6" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round"/>
                </svg>
            </button>
            if popover.is_open() {
                <ul
                    ref={menu_ref}
                    class={classes!("select-menu", side.class())}
                    role="listbox"
                    aria-label={text.lang.select.clone()}
                    style={menu_style}
                >
                    {
                        for Locale::ALL.iter().enumerate().map(|(index, locale)| {
                            let selected = *locale == current;
                            let highlighted = index == popover.active();
                            let onclick = {
                                let popover = popover.clone();
                                let choose = choose.clone();
                                Callback::from(move |_: MouseEvent| {
                                    popover.select(index);
                                    choose(index);
                                })
                            };
                            let onmouseenter = {
                                let popover = popover.clone();
                                Callback::from(move |_: MouseEvent| popover.hover(index))
                            };
                            html! {
                                <li key={locale.as_str()}>
                                    <button
                                        type="button"
                                        role="option"
                                        aria-selected={selected.to_string()}
                                        class={classes!(
                                            "select-item",
                                            selected.then(|| "selected"),
                                            highlighted.then(|| "active")
                                        )}
                                        {onclick}
                                        {onmouseenter}
                                    >
                                        {locale.label()}
                                    </button>
                                </li>
                            }
                        })
                    }
                </ul>
            }
        </div>
    }
}
