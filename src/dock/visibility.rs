/// Where the dock learns about the header's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Signal {
    /// IntersectionObserver report for the header sentinel.
    HeaderIntersecting(bool),
    /// Scroll offset, used when IntersectionObserver is unavailable.
    ScrollOffset(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DockState {
    Hidden,
    Visible,
}

/// `Hidden ⇄ Visible` machine for the quick-navigation dock. The dock is
/// visible exactly while the header is out of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockVisibility {
    state: DockState,
    scroll_threshold_px: f64,
}

impl DockVisibility {
    pub fn new(scroll_threshold_px: f64) -> Self {
        Self {
            state: DockState::Hidden,
            scroll_threshold_px,
        }
    }

    /// Applies a signal, returning the new state if it changed.
    pub fn apply(&mut self, signal: Signal) -> Option<DockState> {
        let header_in_view = match signal {
            Signal::HeaderIntersecting(intersecting) => intersecting,
            Signal::ScrollOffset(y) => y <= self.scroll_threshold_px,
        };
        let next = if header_in_view {
            DockState::Hidden
        } else {
            DockState::Visible
        };
        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }
}
