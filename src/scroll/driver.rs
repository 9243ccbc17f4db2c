use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::config::{ScrollConfig, HEADER_SELECTOR};
use crate::scroll::navigator::{
    AnimationToken, Frame, Navigation, ScrollNavigator, ScrollSurface, Watchdog,
};

/// The browser window as a [`ScrollSurface`]. Every lookup is live so header
/// height changes (mobile menu, breakpoints) are picked up per call.
#[derive(Debug, Default)]
pub struct DomSurface;

impl ScrollSurface for DomSurface {
    fn scroll_y(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn set_scroll_y(&mut self, y: f64) {
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, y);
        }
    }

    fn element_top(&self, id: &str) -> Option<f64> {
        let window = web_sys::window()?;
        let element = window.document()?.get_element_by_id(id)?;
        let scroll_y = window.scroll_y().ok()?;
        Some(element.get_bounding_client_rect().top() + scroll_y)
    }

    fn header_height(&self) -> Option<f64> {
        let header = web_sys::window()?
            .document()?
            .query_selector(HEADER_SELECTOR)
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        match header.offset_height() {
            0 => None,
            h => Some(h as f64),
        }
    }

    fn max_scroll_y(&self) -> Option<f64> {
        let window = web_sys::window()?;
        let root = window.document()?.document_element()?;
        let viewport = window.inner_height().ok()?.as_f64()?;
        Some((root.scroll_height() as f64 - viewport).max(0.0))
    }

    fn push_fragment(&mut self, id: &str) {
        let url = format!("#{}", urlencoding::encode(id));
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&url));
        }
    }

    fn native_scroll_to(&mut self, id: &str) {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id));
        if let Some(element) = element {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }
}

/// Shared handle to the page's single [`ScrollNavigator`]; drives it with
/// animation frames and timers. Provided to components through context.
#[derive(Clone)]
pub struct ScrollDriver {
    navigator: Rc<RefCell<ScrollNavigator<DomSurface>>>,
}

impl PartialEq for ScrollDriver {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.navigator, &other.navigator)
    }
}

impl ScrollDriver {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            navigator: Rc::new(RefCell::new(ScrollNavigator::new(DomSurface, config))),
        }
    }

    /// Scrolls to `#id` after the next frame so menus closing in the same
    /// click have already changed the layout. Missing anchors are ignored.
    pub fn navigate(&self, id: &str) {
        let driver = self.clone();
        let id = id.to_string();
        request_frame(move |_| driver.begin(&id));
    }

    fn begin(&self, id: &str) {
        let navigation = self.navigator.borrow_mut().navigate_to_anchor(id);
        if let Navigation::Animating(token) = navigation {
            self.schedule_frame(token);
        }
    }

    fn schedule_frame(&self, token: AnimationToken) {
        let driver = self.clone();
        request_frame(move |now| {
            let frame = driver.navigator.borrow_mut().frame(token, now);
            match frame {
                Frame::Started { watchdog_after_ms } => {
                    driver.arm_watchdog(token, watchdog_after_ms);
                    driver.schedule_frame(token);
                }
                Frame::Continue => driver.schedule_frame(token),
                Frame::Settled | Frame::Stale => {}
            }
        });
    }

    /// The delay runs from the first frame, the same instant the animation's
    /// start time is taken from.
    fn arm_watchdog(&self, token: AnimationToken, delay_ms: f64) {
        let driver = self.clone();
        Timeout::new(delay_ms.ceil() as u32, move || {
            driver.check(token);
        })
        .forget();
    }

    fn check(&self, token: AnimationToken) {
        let (outcome, settle_ms) = {
            let mut navigator = self.navigator.borrow_mut();
            let settle_ms = navigator.config().fallback_settle_ms;
            (navigator.watchdog(token), settle_ms)
        };
        if outcome == Watchdog::Fallback {
            let driver = self.clone();
            Timeout::new(settle_ms.ceil() as u32, move || {
                driver.navigator.borrow_mut().reapply_offset(token);
            })
            .forget();
        }
    }

    /// Called from pointer, touch, wheel, key and resize listeners.
    pub fn interrupt(&self) {
        // A frame callback may be mid-flight if input arrives re-entrantly.
        if let Ok(mut navigator) = self.navigator.try_borrow_mut() {
            navigator.interrupt();
        }
    }
}

fn request_frame(callback: impl FnOnce(f64) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once_into_js(callback);
    if window
        .request_animation_frame(closure.unchecked_ref())
        .is_err()
    {
        debug!("requestAnimationFrame unavailable");
    }
}

/// Id of the in-page anchor an `href` points at, or `None` for links the
/// browser should handle (other pages, external hosts, bare `#`).
pub fn anchor_target(href: &str) -> Option<String> {
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        return None;
    }
    let id = urlencoding::decode(fragment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| fragment.to_string());
    Some(id)
}

/// Anchor from the address bar on first load, if any.
pub fn initial_fragment() -> Option<String> {
    let hash = web_sys::window()?.location().hash().ok()?;
    anchor_target(&hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_same_document_fragments_are_intercepted() {
        assert_eq!(anchor_target("#contact"), Some("contact".to_string()));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target(""), None);
        assert_eq!(anchor_target("/pricing"), None);
        assert_eq!(anchor_target("/#contact"), None);
        assert_eq!(anchor_target("https://example.com/#faq"), None);
    }

    #[test]
    fn fragment_ids_are_percent_decoded() {
        assert_eq!(anchor_target("#our%20team"), Some("our team".to_string()));
        assert_eq!(anchor_target("#%E6%A1%88%E4%BE%8B"), Some("案例".to_string()));
    }
}
