//! Animated anchor navigation.
//!
//! [`ScrollNavigator`] owns at most one animation per scroll surface. It never
//! schedules anything itself: the driver feeds it animation frames and the
//! watchdog timer, each tagged with the [`AnimationToken`] handed out when the
//! animation started. A frame or timer carrying an old token is ignored, which
//! is how a new navigation supersedes an in-flight one.

use log::{debug, warn};

use crate::config::ScrollConfig;
use crate::scroll::easing::{duration_for, ease_in_out_cubic};

/// Everything the navigator needs from the page.
pub trait ScrollSurface {
    fn scroll_y(&self) -> f64;
    fn set_scroll_y(&mut self, y: f64);
    /// Top edge of the element in document coordinates, `None` if it doesn't exist.
    fn element_top(&self, id: &str) -> Option<f64>;
    /// Current height of the fixed header, `None` if it isn't rendered.
    fn header_height(&self) -> Option<f64>;
    /// Largest reachable scroll offset, `None` if it can't be measured.
    fn max_scroll_y(&self) -> Option<f64>;
    /// Writes `#id` into the location without jumping.
    fn push_fragment(&mut self, id: &str);
    /// Best-effort platform smooth scroll used when the animation was blocked.
    fn native_scroll_to(&mut self, id: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationToken(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollAnimation {
    pub anchor: String,
    pub start_y: f64,
    pub end_y: f64,
    /// Latched from the first frame timestamp.
    pub start_time: Option<f64>,
    pub duration_ms: f64,
}

impl ScrollAnimation {
    fn position_at(&mut self, now: f64) -> (f64, bool) {
        let start = *self.start_time.get_or_insert(now);
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now - start) / self.duration_ms).clamp(0.0, 1.0)
        };
        let y = self.start_y + (self.end_y - self.start_y) * ease_in_out_cubic(progress);
        (y, progress >= 1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Running(ScrollAnimation),
    /// Native fallback issued; waiting to re-apply the header offset.
    Recovering { anchor: String, fragment_written: bool },
    Settled { anchor: String, end_y: f64 },
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Navigation {
    /// No element carries the identifier; nothing changed.
    Missing,
    /// Close enough to jump; position and fragment are already final.
    Jumped,
    Animating(AnimationToken),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// First frame of the animation; its timestamp is the start time. The
    /// driver arms the watchdog to fire `watchdog_after_ms` from now.
    Started { watchdog_after_ms: f64 },
    Continue,
    Settled,
    /// Cancelled or superseded; the driver must stop requesting frames.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Watchdog {
    OnTarget,
    /// Native scroll issued; the driver should call
    /// [`ScrollNavigator::reapply_offset`] after `fallback_settle_ms`.
    Fallback,
    Stale,
}

pub struct ScrollNavigator<S> {
    surface: S,
    config: ScrollConfig,
    phase: Phase,
    generation: u64,
}

impl<S: ScrollSurface> ScrollNavigator<S> {
    pub fn new(surface: S, config: ScrollConfig) -> Self {
        Self {
            surface,
            config,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn current_token(&self) -> AnimationToken {
        AnimationToken(self.generation)
    }

    /// Scroll offset that puts the anchor just below the header, measured live.
    pub fn target_for(&self, id: &str) -> Option<f64> {
        let top = self.surface.element_top(id)?;
        let header = self
            .surface
            .header_height()
            .unwrap_or(self.config.fallback_header_px);
        let mut target = top - (header + self.config.gap_px);
        if let Some(max_y) = self.surface.max_scroll_y() {
            // Sections near the bottom can't reach the header line.
            target = target.min(max_y);
        }
        Some(target.max(0.0))
    }

    pub fn navigate_to_anchor(&mut self, id: &str) -> Navigation {
        let Some(end_y) = self.target_for(id) else {
            debug!("anchor #{} not in document, ignoring", id);
            return Navigation::Missing;
        };

        // Whatever was running is superseded from here on.
        self.generation += 1;
        let start_y = self.surface.scroll_y();
        let distance = end_y - start_y;

        if distance.abs() < self.config.jump_threshold_px {
            self.surface.set_scroll_y(end_y);
            self.surface.push_fragment(id);
            self.phase = Phase::Settled {
                anchor: id.to_string(),
                end_y,
            };
            return Navigation::Jumped;
        }

        let duration_ms = duration_for(distance, &self.config);
        debug!(
            "scrolling to #{} from {:.0} to {:.0} over {:.0}ms",
            id, start_y, end_y, duration_ms
        );
        self.phase = Phase::Running(ScrollAnimation {
            anchor: id.to_string(),
            start_y,
            end_y,
            start_time: None,
            duration_ms,
        });
        Navigation::Animating(self.current_token())
    }

    /// Advances the animation to `now` (an animation-frame timestamp in ms).
    pub fn frame(&mut self, token: AnimationToken, now: f64) -> Frame {
        if token != self.current_token() {
            return Frame::Stale;
        }
        let Phase::Running(animation) = &mut self.phase else {
            return Frame::Stale;
        };

        let first = animation.start_time.is_none();
        let (y, finished) = animation.position_at(now);
        self.surface.set_scroll_y(y);
        if !finished {
            if first {
                return Frame::Started {
                    watchdog_after_ms: animation.duration_ms + self.config.watchdog_grace_ms,
                };
            }
            return Frame::Continue;
        }

        let anchor = animation.anchor.clone();
        let end_y = animation.end_y;
        self.surface.push_fragment(&anchor);
        self.phase = Phase::Settled { anchor, end_y };
        Frame::Settled
    }

    /// Cancels the in-flight animation because the user took over. Returns
    /// whether anything was cancelled; calling it when idle or settled leaves
    /// the phase alone.
    pub fn interrupt(&mut self) -> bool {
        match self.phase {
            Phase::Running(_) | Phase::Recovering { .. } => {
                debug!("scroll animation interrupted by user input");
                self.generation += 1;
                self.phase = Phase::Cancelled;
                true
            }
            Phase::Settled { .. } => {
                // The watchdog for a settled animation may still be pending;
                // it must not pull the page back to the anchor.
                self.generation += 1;
                false
            }
            Phase::Idle | Phase::Cancelled => false,
        }
    }

    /// One-shot check after the animation should have finished. Escalates to
    /// the native scroll when the target wasn't reached.
    pub fn watchdog(&mut self, token: AnimationToken) -> Watchdog {
        if token != self.current_token() {
            return Watchdog::Stale;
        }
        let (anchor, end_y, fragment_written) = match &self.phase {
            Phase::Running(animation) => (animation.anchor.clone(), animation.end_y, false),
            Phase::Settled { anchor, end_y } => (anchor.clone(), *end_y, true),
            _ => return Watchdog::Stale,
        };

        if (self.surface.scroll_y() - end_y).abs() < self.config.jump_threshold_px {
            return Watchdog::OnTarget;
        }

        warn!(
            "scroll to #{} stalled at {:.0} (wanted {:.0}), using native scroll",
            anchor,
            self.surface.scroll_y(),
            end_y
        );
        self.surface.native_scroll_to(&anchor);
        self.phase = Phase::Recovering {
            anchor,
            fragment_written,
        };
        Watchdog::Fallback
    }

    /// Puts the anchor back below the header after the native fallback. This is
    /// the last attempt; a miss here is logged and left alone.
    pub fn reapply_offset(&mut self, token: AnimationToken) {
        if token != self.current_token() {
            return;
        }
        let Phase::Recovering {
            anchor,
            fragment_written,
        } = &self.phase
        else {
            return;
        };
        let anchor = anchor.clone();
        let fragment_written = *fragment_written;

        let Some(end_y) = self.target_for(&anchor) else {
            self.phase = Phase::Idle;
            return;
        };
        self.surface.set_scroll_y(end_y);
        if !fragment_written {
            self.surface.push_fragment(&anchor);
        }
        if (self.surface.scroll_y() - end_y).abs() >= self.config.jump_threshold_px {
            warn!("scroll to #{} still off target after fallback, giving up", anchor);
        }
        self.phase = Phase::Settled { anchor, end_y };
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::ScrollSurface;
    use std::collections::HashMap;

    /// In-memory page: element tops in document coordinates plus a header.
    #[derive(Debug, Default)]
    pub struct FakePage {
        pub y: f64,
        pub max_y: f64,
        pub elements: HashMap<String, f64>,
        pub header: Option<f64>,
        pub fragments: Vec<String>,
        pub native_scrolls: Vec<String>,
        pub writes: usize,
        /// Simulates a competing scroll owner swallowing our writes.
        pub frozen: bool,
    }

    impl FakePage {
        pub fn new(max_y: f64) -> Self {
            Self {
                max_y,
                header: Some(68.0),
                ..Self::default()
            }
        }

        pub fn with_section(mut self, id: &str, top: f64) -> Self {
            self.elements.insert(id.to_string(), top);
            self
        }
    }

    impl ScrollSurface for FakePage {
        fn scroll_y(&self) -> f64 {
            self.y
        }

        fn set_scroll_y(&mut self, y: f64) {
            self.writes += 1;
            if !self.frozen {
                self.y = y.clamp(0.0, self.max_y);
            }
        }

        fn element_top(&self, id: &str) -> Option<f64> {
            self.elements.get(id).copied()
        }

        fn header_height(&self) -> Option<f64> {
            self.header
        }

        fn max_scroll_y(&self) -> Option<f64> {
            Some(self.max_y)
        }

        fn push_fragment(&mut self, id: &str) {
            self.fragments.push(id.to_string());
        }

        fn native_scroll_to(&mut self, id: &str) {
            self.native_scrolls.push(id.to_string());
            if let Some(top) = self.elements.get(id) {
                self.y = top.clamp(0.0, self.max_y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakePage;
    use super::*;

    fn navigator(page: FakePage) -> ScrollNavigator<FakePage> {
        ScrollNavigator::new(page, ScrollConfig::default())
    }

    fn run_frames(nav: &mut ScrollNavigator<FakePage>, token: AnimationToken) -> usize {
        let mut now = 1000.0;
        for count in 1..=500 {
            match nav.frame(token, now) {
                Frame::Started { .. } | Frame::Continue => now += 16.0,
                _ => return count,
            }
        }
        panic!("animation never settled");
    }

    #[test]
    fn animation_lands_below_the_header_and_writes_fragment() {
        let mut nav = navigator(FakePage::new(10_000.0).with_section("services", 2400.0));

        let Navigation::Animating(token) = nav.navigate_to_anchor("services") else {
            panic!("expected an animation");
        };
        run_frames(&mut nav, token);

        let expected = 2400.0 - (68.0 + 12.0);
        assert!((nav.surface().y - expected).abs() <= 1.0);
        assert_eq!(nav.surface().fragments, vec!["services".to_string()]);
        assert_eq!(nav.watchdog(token), Watchdog::OnTarget);
    }

    #[test]
    fn header_height_is_measured_on_every_call() {
        let mut nav = navigator(FakePage::new(10_000.0).with_section("faq", 3000.0));
        assert_eq!(nav.target_for("faq"), Some(3000.0 - 80.0));

        nav.surface_mut().header = Some(300.0);
        assert_eq!(nav.target_for("faq"), Some(3000.0 - 312.0));

        nav.surface_mut().header = None;
        assert_eq!(nav.target_for("faq"), Some(3000.0 - 80.0));
    }

    #[test]
    fn target_never_goes_above_the_page() {
        let nav = navigator(FakePage::new(10_000.0).with_section("home", 20.0));
        assert_eq!(nav.target_for("home"), Some(0.0));
    }

    #[test]
    fn missing_anchor_changes_nothing() {
        let mut page = FakePage::new(10_000.0);
        page.y = 420.0;
        let mut nav = navigator(page);

        assert_eq!(nav.navigate_to_anchor("not-rendered-yet"), Navigation::Missing);
        assert_eq!(nav.surface().y, 420.0);
        assert_eq!(nav.surface().writes, 0);
        assert!(nav.surface().fragments.is_empty());
        assert_eq!(nav.phase(), &Phase::Idle);
    }

    #[test]
    fn tiny_distance_jumps_without_animating() {
        let mut page = FakePage::new(10_000.0).with_section("contact", 1081.0);
        page.y = 1000.0;
        let mut nav = navigator(page);

        assert_eq!(nav.navigate_to_anchor("contact"), Navigation::Jumped);
        assert_eq!(nav.surface().y, 1001.0);
        assert_eq!(nav.surface().fragments, vec!["contact".to_string()]);
    }

    #[test]
    fn user_interruption_wins_and_later_frames_do_nothing() {
        let mut nav = navigator(FakePage::new(10_000.0).with_section("portfolio", 5000.0));
        let Navigation::Animating(token) = nav.navigate_to_anchor("portfolio") else {
            panic!("expected an animation");
        };
        assert!(matches!(nav.frame(token, 0.0), Frame::Started { .. }));
        assert_eq!(nav.frame(token, 300.0), Frame::Continue);

        // User grabs the wheel.
        nav.surface_mut().y = 777.0;
        assert!(nav.interrupt());
        let writes = nav.surface().writes;

        assert_eq!(nav.frame(token, 316.0), Frame::Stale);
        assert_eq!(nav.frame(token, 5000.0), Frame::Stale);
        assert_eq!(nav.watchdog(token), Watchdog::Stale);
        assert_eq!(nav.surface().y, 777.0);
        assert_eq!(nav.surface().writes, writes);
        assert!(nav.surface().fragments.is_empty());
        assert!(nav.surface().native_scrolls.is_empty());
    }

    #[test]
    fn interrupt_after_completion_is_a_no_op() {
        let mut nav = navigator(FakePage::new(10_000.0).with_section("team", 900.0));
        let Navigation::Animating(token) = nav.navigate_to_anchor("team") else {
            panic!("expected an animation");
        };
        run_frames(&mut nav, token);

        assert!(!nav.interrupt());
        assert!(matches!(nav.phase(), Phase::Settled { .. }));
    }

    #[test]
    fn new_navigation_supersedes_the_running_one() {
        let page = FakePage::new(10_000.0)
            .with_section("products", 1500.0)
            .with_section("blog", 6000.0);
        let mut nav = navigator(page);

        let Navigation::Animating(first) = nav.navigate_to_anchor("products") else {
            panic!("expected an animation");
        };
        nav.frame(first, 0.0);
        nav.frame(first, 100.0);

        let Navigation::Animating(second) = nav.navigate_to_anchor("blog") else {
            panic!("expected an animation");
        };
        assert_ne!(first, second);
        assert_eq!(nav.frame(first, 200.0), Frame::Stale);
        assert_eq!(nav.watchdog(first), Watchdog::Stale);

        run_frames(&mut nav, second);
        assert!((nav.surface().y - 5920.0).abs() <= 1.0);
        assert_eq!(nav.surface().fragments, vec!["blog".to_string()]);
    }

    #[test]
    fn watchdog_falls_back_to_native_scroll_when_blocked() {
        let mut page = FakePage::new(10_000.0).with_section("careers", 4000.0);
        page.frozen = true;
        let mut nav = navigator(page);

        let Navigation::Animating(token) = nav.navigate_to_anchor("careers") else {
            panic!("expected an animation");
        };
        run_frames(&mut nav, token);
        assert_eq!(nav.surface().y, 0.0);

        nav.surface_mut().frozen = false;
        assert_eq!(nav.watchdog(token), Watchdog::Fallback);
        assert_eq!(nav.surface().native_scrolls, vec!["careers".to_string()]);

        nav.reapply_offset(token);
        assert_eq!(nav.surface().y, 4000.0 - 80.0);
        // Fragment was already written when the frames finished.
        assert_eq!(nav.surface().fragments, vec!["careers".to_string()]);
        assert!(matches!(nav.phase(), Phase::Settled { .. }));
    }

    #[test]
    fn watchdog_without_any_progress_falls_back() {
        let mut nav = navigator(FakePage::new(10_000.0).with_section("faq", 3000.0));
        let Navigation::Animating(token) = nav.navigate_to_anchor("faq") else {
            panic!("expected an animation");
        };

        assert_eq!(nav.watchdog(token), Watchdog::Fallback);
        nav.reapply_offset(token);
        assert_eq!(nav.surface().y, 2920.0);
        assert_eq!(nav.surface().fragments, vec!["faq".to_string()]);
        // Leftover frames from the throttled loop are ignored.
        assert_eq!(nav.frame(token, 10.0), Frame::Stale);
    }

    #[test]
    fn user_input_during_recovery_cancels_the_offset_fix() {
        let mut page = FakePage::new(10_000.0).with_section("contact", 8000.0);
        page.frozen = true;
        let mut nav = navigator(page);
        let Navigation::Animating(token) = nav.navigate_to_anchor("contact") else {
            panic!("expected an animation");
        };
        assert_eq!(nav.watchdog(token), Watchdog::Fallback);

        assert!(nav.interrupt());
        let writes = nav.surface().writes;
        nav.reapply_offset(token);
        assert_eq!(nav.surface().writes, writes);
    }

    #[test]
    fn scrolling_away_after_settling_keeps_the_user_position() {
        let mut nav = navigator(FakePage::new(10_000.0).with_section("services", 2400.0));
        let Navigation::Animating(token) = nav.navigate_to_anchor("services") else {
            panic!("expected an animation");
        };
        run_frames(&mut nav, token);
        assert!((nav.surface().y - 2320.0).abs() <= 1.0);

        // User scrolls back up before the watchdog timer fires.
        nav.surface_mut().y = 500.0;
        assert!(!nav.interrupt());

        assert_eq!(nav.watchdog(token), Watchdog::Stale);
        nav.reapply_offset(token);
        assert_eq!(nav.surface().y, 500.0);
        assert!(nav.surface().native_scrolls.is_empty());
        assert_eq!(nav.surface().fragments, vec!["services".to_string()]);
    }

    #[test]
    fn targets_below_the_last_screen_stop_at_the_page_bottom() {
        let mut nav = navigator(FakePage::new(5000.0).with_section("contact", 5600.0));
        assert_eq!(nav.target_for("contact"), Some(5000.0));

        let Navigation::Animating(token) = nav.navigate_to_anchor("contact") else {
            panic!("expected an animation");
        };
        run_frames(&mut nav, token);

        assert_eq!(nav.surface().y, 5000.0);
        assert_eq!(nav.watchdog(token), Watchdog::OnTarget);
        assert!(nav.surface().native_scrolls.is_empty());
    }

    #[test]
    fn watchdog_delay_counts_from_the_first_frame() {
        let mut nav = navigator(FakePage::new(10_000.0).with_section("blog", 1680.0));
        let Navigation::Animating(token) = nav.navigate_to_anchor("blog") else {
            panic!("expected an animation");
        };
        // 1600 px at 1600 px/s, plus the grace period.
        assert_eq!(
            nav.frame(token, 5000.0),
            Frame::Started {
                watchdog_after_ms: 1000.0 + 120.0
            }
        );
        assert_eq!(nav.frame(token, 5016.0), Frame::Continue);
        // Halfway through, measured from the first frame rather than the click.
        assert_eq!(nav.frame(token, 5500.0), Frame::Continue);
        assert!((nav.surface().y - 800.0).abs() <= 1.0);
        assert_eq!(nav.frame(token, 6000.0), Frame::Settled);
    }
}
