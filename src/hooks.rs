use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, KeyboardEvent, Node, PointerEvent};
use yew::prelude::*;
use yew_hooks::use_event_with_window;

use crate::dock::popover::{Dismissal, Hit, KeyOutcome, Popover, PopoverId, PopoverRegistry};
use crate::prefs::preference::{Preference, Preferences};
use crate::prefs::value::PreferenceValue;

#[hook]
pub fn use_preferences() -> Preferences {
    use_context::<Preferences>().expect("Preferences must be provided by App")
}

/// Current value of a preference; re-renders the caller whenever any other
/// control changes it.
#[hook]
pub fn use_preference<P: PreferenceValue>(preference: &Preference<P>) -> P {
    let current = use_state_eq(|| preference.get());

    {
        let current = current.clone();
        use_effect_with_deps(
            move |preference: &Preference<P>| {
                current.set(preference.get());
                let subscription = preference.subscribe(move |value| current.set(*value));
                move || drop(subscription)
            },
            preference.clone(),
        );
    }

    *current
}

/// Handle to one component's popover machine. Keeps the page-wide registry
/// informed so opening this popover closes any other.
#[derive(Clone)]
pub struct PopoverHandle {
    id: PopoverId,
    machine: Rc<RefCell<Popover>>,
    registry: PopoverRegistry,
    redraw: Rc<dyn Fn()>,
}

impl PopoverHandle {
    pub fn is_open(&self) -> bool {
        self.machine.borrow().is_open()
    }

    pub fn active(&self) -> usize {
        self.machine.borrow().active()
    }

    fn update<R>(&self, change: impl FnOnce(&mut Popover) -> R) -> R {
        let (before, result, after) = {
            let mut machine = self.machine.borrow_mut();
            let before = *machine;
            let result = change(&mut *machine);
            (before, result, *machine)
        };
        if before == after {
            return result;
        }
        if before.is_open() != after.is_open() {
            if after.is_open() {
                self.registry.opened(self.id);
            } else {
                self.registry.closed(self.id);
            }
        }
        (self.redraw)();
        result
    }

    pub fn toggle(&self, selected: usize) -> bool {
        self.update(|p| p.toggle(selected))
    }

    pub fn pointer_down(&self, hit: Hit) -> Option<Dismissal> {
        self.update(|p| p.pointer_down(hit))
    }

    pub fn window_key(&self, key: &str) -> Option<Dismissal> {
        self.update(|p| p.window_key(key))
    }

    pub fn trigger_key(&self, key: &str, selected: usize) -> KeyOutcome {
        self.update(|p| p.trigger_key(key, selected))
    }

    pub fn select(&self, index: usize) -> Option<Dismissal> {
        self.update(|p| p.select(index))
    }

    pub fn anchor_hidden(&self) -> Option<Dismissal> {
        self.update(|p| p.anchor_hidden())
    }

    pub fn hover(&self, index: usize) {
        self.update(|p| p.hover(index))
    }
}

fn hit_test(target: Option<&Node>, anchor: &NodeRef, menu: &NodeRef) -> Hit {
    let inside = |node: &NodeRef| {
        node.cast::<Node>()
            .map(|container| container.contains(target))
            .unwrap_or(false)
    };
    if target.is_some() && inside(anchor) {
        Hit::Anchor
    } else if target.is_some() && inside(menu) {
        Hit::Menu
    } else {
        Hit::Outside
    }
}

/// Popover state for a menu of `len` entries toggled by the element behind
/// `anchor`. Closes on pointer-down outside `anchor` and `menu`, and on
/// Escape, which also hands focus back to the anchor.
#[hook]
pub fn use_popover(len: usize, anchor: NodeRef, menu: NodeRef) -> PopoverHandle {
    let registry = use_context::<PopoverRegistry>().unwrap_or_default();
    let id = *use_state(|| registry.allocate());
    let machine = use_mut_ref(|| Popover::new(len));
    let redraw: Rc<dyn Fn()> = {
        let force = use_force_update();
        Rc::new(move || force.force_update())
    };

    let handle = PopoverHandle {
        id,
        machine,
        registry: registry.clone(),
        redraw,
    };

    {
        let handle = handle.clone();
        use_effect_with_deps(
            move |registry: &PopoverRegistry| {
                let watch = {
                    let handle = handle.clone();
                    registry.watch(handle.id, move || {
                        handle.update(|p| p.superseded());
                    })
                };
                let registry = registry.clone();
                move || {
                    drop(watch);
                    registry.closed(handle.id);
                }
            },
            registry,
        );
    }

    {
        let handle = handle.clone();
        let anchor = anchor.clone();
        use_event_with_window("pointerdown", move |e: PointerEvent| {
            if !handle.is_open() {
                return;
            }
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            handle.pointer_down(hit_test(target.as_ref(), &anchor, &menu));
        });
    }

    {
        let handle = handle.clone();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if handle.window_key(&e.key()) == Some(Dismissal::Escape) {
                if let Some(anchor) = anchor.cast::<HtmlElement>() {
                    let _ = anchor.focus();
                }
            }
        });
    }

    handle
}
