//! Open/closed state of transient menus (dock menu, locale dropdown).

use std::cell::Cell;
use std::rc::Rc;

use crate::observable::{Observable, Subscription};

/// Where a pointer-down landed relative to a popover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// Inside the menu itself.
    Menu,
    /// On the control that toggles the menu. Left to its click handler so the
    /// same press can't close and then reopen the menu.
    Anchor,
    Outside,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dismissal {
    OutsidePointer,
    Escape,
    Selection,
    AnchorHidden,
    /// Another popover opened.
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Opened,
    Moved,
    Selected(usize),
    Dismissed(Dismissal),
}

/// `Closed ⇄ Open` machine with a highlighted row for keyboard use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Popover {
    open: bool,
    active: usize,
    len: usize,
}

impl Popover {
    pub fn new(len: usize) -> Self {
        Self {
            open: false,
            active: 0,
            len,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Opens with `selected` highlighted.
    pub fn open_at(&mut self, selected: usize) {
        self.open = true;
        self.active = if selected < self.len { selected } else { 0 };
    }

    pub fn toggle(&mut self, selected: usize) -> bool {
        if self.open {
            self.open = false;
        } else {
            self.open_at(selected);
        }
        self.open
    }

    fn dismiss(&mut self, why: Dismissal) -> Option<Dismissal> {
        if !self.open {
            return None;
        }
        self.open = false;
        Some(why)
    }

    pub fn pointer_down(&mut self, hit: Hit) -> Option<Dismissal> {
        match hit {
            Hit::Outside => self.dismiss(Dismissal::OutsidePointer),
            Hit::Menu | Hit::Anchor => None,
        }
    }

    /// Picking an entry closes the menu.
    pub fn select(&mut self, index: usize) -> Option<Dismissal> {
        if index < self.len {
            self.active = index;
        }
        self.dismiss(Dismissal::Selection)
    }

    pub fn anchor_hidden(&mut self) -> Option<Dismissal> {
        self.dismiss(Dismissal::AnchorHidden)
    }

    pub fn superseded(&mut self) -> Option<Dismissal> {
        self.dismiss(Dismissal::Superseded)
    }

    /// Window-level key handling; only Escape matters here.
    pub fn window_key(&mut self, key: &str) -> Option<Dismissal> {
        match key {
            "Escape" | "Esc" => self.dismiss(Dismissal::Escape),
            _ => None,
        }
    }

    /// Keys pressed on the trigger button.
    pub fn trigger_key(&mut self, key: &str, selected: usize) -> KeyOutcome {
        if !self.open {
            return match key {
                "ArrowDown" | "Enter" | " " => {
                    self.open_at(selected);
                    KeyOutcome::Opened
                }
                _ => KeyOutcome::Ignored,
            };
        }
        match key {
            "ArrowDown" if self.len > 0 => {
                self.active = (self.active + 1) % self.len;
                KeyOutcome::Moved
            }
            "ArrowUp" if self.len > 0 => {
                self.active = (self.active + self.len - 1) % self.len;
                KeyOutcome::Moved
            }
            "Enter" | " " => {
                let index = self.active;
                self.open = false;
                KeyOutcome::Selected(index)
            }
            "Escape" | "Esc" => {
                self.open = false;
                KeyOutcome::Dismissed(Dismissal::Escape)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    pub fn hover(&mut self, index: usize) {
        if self.open && index < self.len {
            self.active = index;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PopoverId(u32);

/// Tracks which popover is open so at most one is open page-wide.
#[derive(Clone, PartialEq, Debug)]
pub struct PopoverRegistry {
    open: Observable<Option<PopoverId>>,
    next_id: Rc<Cell<u32>>,
}

impl PopoverRegistry {
    pub fn new() -> Self {
        Self {
            open: Observable::new(None),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    pub fn allocate(&self) -> PopoverId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        PopoverId(id)
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<PopoverId> {
        self.open.get()
    }

    pub fn opened(&self, id: PopoverId) {
        self.open.set(Some(id));
    }

    pub fn closed(&self, id: PopoverId) {
        if self.open.get() == Some(id) {
            self.open.set(None);
        }
    }

    /// Calls `close` when a popover other than `id` opens.
    pub fn watch(&self, id: PopoverId, close: impl Fn() + 'static) -> Subscription {
        self.open.subscribe(move |open| {
            if matches!(open, Some(other) if *other != id) {
                close();
            }
        })
    }
}

impl Default for PopoverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Below,
    Above,
}

impl Placement {
    pub fn class(self) -> &'static str {
        match self {
            Placement::Below => "bottom",
            Placement::Above => "top",
        }
    }
}

const MENU_GAP_PX: f64 = 8.0;
const MENU_DESIRED_PX: f64 = 280.0;
const MENU_MIN_PX: f64 = 140.0;
const MENU_BELOW_MIN_PX: f64 = 160.0;

/// Chooses where a menu opens given its trigger's viewport rectangle, and the
/// max height it may take there.
pub fn placement(trigger_top: f64, trigger_height: f64, viewport_height: f64) -> (Placement, f64) {
    let below = viewport_height - (trigger_top + trigger_height) - MENU_GAP_PX;
    let above = trigger_top - MENU_GAP_PX;
    let (side, space) = if below >= MENU_BELOW_MIN_PX {
        (Placement::Below, below)
    } else {
        (Placement::Above, above)
    };
    (side, space.min(MENU_DESIRED_PX).max(MENU_MIN_PX))
}
