use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{Array, Reflect};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, Window};
use yew::prelude::*;

use crate::config::DockConfig;
use crate::dock::visibility::{DockState, DockVisibility, Signal};

/// Live subscription to the header's position. Dropping it disconnects.
enum HeaderWatch {
    Intersection {
        observer: IntersectionObserver,
        _callback: Closure<dyn FnMut(Array)>,
    },
    Scroll {
        window: Window,
        callback: Closure<dyn FnMut()>,
    },
    Detached,
}

impl Drop for HeaderWatch {
    fn drop(&mut self) {
        match self {
            HeaderWatch::Intersection { observer, .. } => observer.disconnect(),
            HeaderWatch::Scroll { window, callback } => {
                let _ = window
                    .remove_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref());
            }
            HeaderWatch::Detached => {}
        }
    }
}

fn watch_header(config: &DockConfig, on_signal: Rc<dyn Fn(Signal)>) -> HeaderWatch {
    let Some(window) = web_sys::window() else {
        return HeaderWatch::Detached;
    };

    let supported = Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
    let sentinel = window
        .document()
        .and_then(|d| d.get_element_by_id(config.sentinel_id));

    if let (true, Some(sentinel)) = (supported, sentinel) {
        let callback = {
            let on_signal = on_signal.clone();
            Closure::wrap(Box::new(move |entries: Array| {
                let latest = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .last();
                if let Some(entry) = latest {
                    on_signal(Signal::HeaderIntersecting(entry.is_intersecting()));
                }
            }) as Box<dyn FnMut(Array)>)
        };
        if let Ok(observer) = IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
            observer.observe(&sentinel);
            return HeaderWatch::Intersection {
                observer,
                _callback: callback,
            };
        }
    }

    debug!("IntersectionObserver unavailable, dock follows scroll offset");
    let callback = {
        let window = window.clone();
        let on_signal = on_signal.clone();
        Closure::wrap(Box::new(move || {
            if let Ok(y) = window.scroll_y() {
                on_signal(Signal::ScrollOffset(y));
            }
        }) as Box<dyn FnMut()>)
    };
    if window
        .add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())
        .is_err()
    {
        return HeaderWatch::Detached;
    }
    // Initial check
    if let Ok(y) = window.scroll_y() {
        on_signal(Signal::ScrollOffset(y));
    }
    HeaderWatch::Scroll { window, callback }
}

/// Whether the dock should be shown, re-evaluated for the lifetime of the
/// calling component.
#[hook]
pub fn use_dock_visible(config: DockConfig) -> bool {
    let visible = use_state_eq(|| false);

    {
        let visible = visible.clone();
        use_effect_with_deps(
            move |config: &DockConfig| {
                let machine = RefCell::new(DockVisibility::new(config.scroll_threshold_px));
                let on_signal: Rc<dyn Fn(Signal)> = Rc::new(move |signal: Signal| {
                    let changed = machine.borrow_mut().apply(signal);
                    if let Some(state) = changed {
                        visible.set(state == DockState::Visible);
                    }
                });
                let watch = watch_header(config, on_signal);
                move || drop(watch)
            },
            config,
        );
    }

    *visible
}
