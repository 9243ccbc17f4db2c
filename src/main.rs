use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

mod config;
mod hooks;
mod i18n;
mod observable;
mod scroll {
    pub mod easing;
    pub mod navigator;
    pub mod driver;
}
mod dock {
    pub mod visibility;
    pub mod popover;
    pub mod observe;
}
mod prefs {
    pub mod value;
    pub mod store;
    pub mod detect;
    pub mod host;
    pub mod preference;
}
mod components {
    pub mod anchor_link;
    pub mod header;
    pub mod quick_dock;
    pub mod lang_switch;
    pub mod lang_dropdown;
    pub mod theme_switch;
}
mod pages {
    pub mod landing;
}

use components::{header::Header, quick_dock::QuickDock};
use config::{DockConfig, ScrollConfig};
use dock::popover::PopoverRegistry;
use pages::landing::Landing;
use prefs::{
    detect::Environment,
    host::DomHost,
    preference::Preferences,
    store::browser_store,
};
use scroll::driver::{initial_fragment, ScrollDriver};

/// Input that takes over from a running scroll animation.
const INTERRUPT_EVENTS: [&str; 5] = ["wheel", "touchstart", "keydown", "pointerdown", "resize"];

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub preferences: Preferences,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let driver = use_memo(|_| ScrollDriver::new(ScrollConfig::default()), ());
    let registry = use_memo(|_| PopoverRegistry::new(), ());
    let sentinel_px = DockConfig::default().scroll_threshold_px;

    {
        let driver = (*driver).clone();
        use_effect_with_deps(
            move |_| {
                let window = web_sys::window();
                let callback = Closure::wrap(Box::new(move || {
                    driver.interrupt();
                }) as Box<dyn FnMut()>);

                if let Some(window) = window.as_ref() {
                    for event in INTERRUPT_EVENTS {
                        if window
                            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
                            .is_err()
                        {
                            debug!("could not listen for {}", event);
                        }
                    }
                }

                move || {
                    if let Some(window) = window {
                        for event in INTERRUPT_EVENTS {
                            let _ = window.remove_event_listener_with_callback(
                                event,
                                callback.as_ref().unchecked_ref(),
                            );
                        }
                    }
                }
            },
            (),
        );
    }

    // Deep links like /#faq land below the fixed header too.
    {
        let driver = (*driver).clone();
        use_effect_with_deps(
            move |_| {
                if let Some(id) = initial_fragment() {
                    debug!("initial fragment #{}", id);
                    driver.navigate(&id);
                }
                || ()
            },
            (),
        );
    }

    html! {
        <ContextProvider<Preferences> context={props.preferences.clone()}>
            <ContextProvider<ScrollDriver> context={(*driver).clone()}>
                <ContextProvider<PopoverRegistry> context={(*registry).clone()}>
                    <div
                        id={DockConfig::default().sentinel_id}
                        aria-hidden="true"
                        style={format!(
                            "position:absolute;top:0;left:0;width:1px;height:{}px;pointer-events:none",
                            sentinel_px
                        )}
                    />
                    <Header />
                    <Landing />
                    <QuickDock />
                </ContextProvider<PopoverRegistry>>
            </ContextProvider<ScrollDriver>>
        </ContextProvider<Preferences>>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting application");
    let preferences = Preferences::init(
        Rc::from(browser_store()),
        &Environment::detect(),
        Rc::new(DomHost),
    );
    yew::Renderer::<App>::with_props(AppProps { preferences }).render();
}
