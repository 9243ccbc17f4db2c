use crate::config::ScrollConfig;

/// Symmetric ease-in-out cubic over normalized progress `t` in `0.0..=1.0`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Animation length for a travel distance, clamped to the configured bounds.
pub fn duration_for(distance_px: f64, config: &ScrollConfig) -> f64 {
    let raw = distance_px.abs() / config.px_per_second * 1000.0;
    raw.clamp(config.min_duration_ms, config.max_duration_ms)
}
