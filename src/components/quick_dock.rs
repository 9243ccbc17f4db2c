use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::components::anchor_link::AnchorLink;
use crate::components::lang_switch::LangSwitch;
use crate::components::theme_switch::ThemeSwitch;
use crate::config::DockConfig;
use crate::dock::observe::use_dock_visible;
use crate::dock::popover::KeyOutcome;
use crate::hooks::{use_popover, use_preference, use_preferences};
use crate::i18n::Translations;
use crate::pages::landing::Section;
use crate::prefs::value::{Locale, Theme};
use crate::scroll::driver::ScrollDriver;

fn icon(section: Section) -> Html {
    let paths = match section {
        Section::Home => html! {
            <>
                <path d="M12 5l7 7m-7-7l-7 7" fill="none" stroke="currentColor" stroke-width="2" />
                <path d="M12 5v14" fill="none" stroke="currentColor" stroke-width="2" />
            </>
        },
        Section::Products => html! {
            <>
                <path d="M3 7l9 5 9-5-9-4-9 4z" fill="none" stroke="currentColor" stroke-width="2" />
                <path d="M3 7v10l9 5 9-5V7" fill="none" stroke="currentColor" stroke-width="2" />
            </>
        },
        Section::Services => html! {
            <path d="M12 2l2.5 7.5L22 12l-7.5 2.5L12 22l-2.5-7.5L2 12l7.5-2.5L12 2z" fill="none" stroke="currentColor" stroke-width="2" />
        },
        Section::Portfolio => html! {
            <>
                <rect x="3" y="7" width="18" height="12" rx="2" fill="none" stroke="currentColor" stroke-width="2" />
                <path d="M9 7V5h6v2" fill="none" stroke="currentColor" stroke-width="2" />
            </>
        },
        Section::Contact => html! {
            <>
                <rect x="3" y="5" width="18" height="14" rx="2" fill="none" stroke="currentColor" stroke-width="2" />
                <path d="M3 7l9 6 9-6" fill="none" stroke="currentColor" stroke-width="2" />
            </>
        },
        _ => html! {
            <circle cx="12" cy="12" r="3" fill="currentColor" />
        },
    };
    html! {
        <svg width="18" height="18" viewBox="0 0 24 24" aria-hidden="true">{paths}</svg>
    }
}

/// Floating quick navigation shown once the header has scrolled away, with a
/// "more" menu for the remaining sections and the preference controls.
#[function_component(QuickDock)]
pub fn quick_dock() -> Html {
    let preferences = use_preferences();
    let locale = use_preference(preferences.locale());
    let text = Translations::for_locale(locale);
    let driver = use_context::<ScrollDriver>();

    let visible = use_dock_visible(DockConfig::default());
    let more_ref = use_node_ref();
    let menu_ref = use_node_ref();
    let popover = use_popover(Section::DOCK_MENU.len(), more_ref.clone(), menu_ref.clone());

    // The menu can't outlive its anchor.
    {
        let popover = popover.clone();
        use_effect_with_deps(
            move |visible: &bool| {
                if !*visible {
                    popover.anchor_hidden();
                }
                || ()
            },
            visible,
        );
    }

    if !visible {
        return html! {};
    }

    let toggle = {
        let popover = popover.clone();
        Callback::from(move |_: MouseEvent| {
            popover.toggle(0);
        })
    };

    let onkeydown = {
        let popover = popover.clone();
        Callback::from(move |e: KeyboardEvent| {
            match popover.trigger_key(&e.key(), 0) {
                KeyOutcome::Opened | KeyOutcome::Moved => e.prevent_default(),
                KeyOutcome::Selected(index) => {
                    e.prevent_default();
                    if let (Some(driver), Some(section)) =
                        (driver.as_ref(), Section::DOCK_MENU.get(index))
                    {
                        driver.navigate(section.id());
                    }
                }
                KeyOutcome::Dismissed(_) | KeyOutcome::Ignored => {}
            }
        })
    };

    let close_after_choice = {
        let popover = popover.clone();
        move || {
            popover.select(popover.active());
        }
    };

    html! {
        <nav class="quickdock" aria-label={text.nav.quick.clone()}>
            <div class="dock" key={locale.to_string()}>
                {
                    for Section::DOCK.iter().map(|section| {
                        let label = section.label(&text.nav).to_string();
                        html! {
                            <AnchorLink href={section.href()} class="dock-btn" title={label.clone()}>
                                {icon(*section)}
                                <span class="label">{label}</span>
                            </AnchorLink>
                        }
                    })
                }
                <button
                    ref={more_ref}
                    type="button"
                    class={classes!("dock-btn", popover.is_open().then(|| "active"))}
                    aria-haspopup="menu"
                    aria-expanded={popover.is_open().to_string()}
                    onclick={toggle}
                    {onkeydown}
                >
                    {icon(Section::Team)}
                    <span class="label">{&text.nav.more}</span>
                </button>
            </div>
            if popover.is_open() {
                <div ref={menu_ref} class="dock-menu" role="menu">
                    {
                        for Section::DOCK_MENU.iter().enumerate().map(|(index, section)| {
                            let onnavigate = {
                                let popover = popover.clone();
                                Callback::from(move |_: ()| {
                                    popover.select(index);
                                })
                            };
                            html! {
                                <AnchorLink
                                    href={section.href()}
                                    class={classes!("dock-menu-item", (index == popover.active()).then(|| "active"))}
                                    {onnavigate}
                                >
                                    {section.label(&text.nav)}
                                </AnchorLink>
                            }
                        })
                    }
                    <div class="dock-menu-prefs">
                        <LangSwitch onchoose={{
                            let close = close_after_choice.clone();
                            Callback::from(move |_: Locale| close())
                        }} />
                        <ThemeSwitch onchoose={{
                            let close = close_after_choice.clone();
                            Callback::from(move |_: Theme| close())
                        }} />
                    </div>
                </div>
            }
        </nav>
    }
}
