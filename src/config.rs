use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose console output when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

pub const LOCALE_STORAGE_KEY: &str = "devotech.lang";
pub const THEME_STORAGE_KEY: &str = "devotech.theme";

/// Query parameter that overrides the locale for shareable links, e.g. `?lang=fr`.
pub const LOCALE_QUERY_PARAM: &str = "lang";

/// Selector of the fixed page header whose height offsets anchor targets.
pub const HEADER_SELECTOR: &str = ".header";

/// Tunables for animated anchor navigation.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Space kept between the fixed header and the target's top edge.
    pub gap_px: f64,
    /// Header height assumed when the header element can't be measured.
    pub fallback_header_px: f64,
    /// Distances below this are applied directly without animating.
    pub jump_threshold_px: f64,
    /// Scroll speed used to derive the animation duration.
    pub px_per_second: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    /// Extra wait after the expected end before the watchdog checks the position.
    pub watchdog_grace_ms: f64,
    /// Wait after the native fallback before the header offset is re-applied.
    pub fallback_settle_ms: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            gap_px: 12.0,
            fallback_header_px: 68.0,
            jump_threshold_px: 2.0,
            px_per_second: 1600.0,
            min_duration_ms: 350.0,
            max_duration_ms: 1400.0,
            watchdog_grace_ms: 120.0,
            fallback_settle_ms: 450.0,
        }
    }
}

/// Tunables for the quick-navigation dock.
#[derive(Clone, Debug, PartialEq)]
pub struct DockConfig {
    /// Id of the in-flow element standing in for the header; the dock shows
    /// once it stops intersecting the viewport.
    pub sentinel_id: &'static str,
    /// Scroll offset used instead when IntersectionObserver is missing.
    /// Matches the sentinel's height so both paths agree.
    pub scroll_threshold_px: f64,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            sentinel_id: "header-sentinel",
            scroll_threshold_px: 140.0,
        }
    }
}
