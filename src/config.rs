//! Site configuration - every timing and threshold the behaviors use.
//!
//! Defaults match the production page. Override with the `with_*` builders:
//!
//! ```ignore
//! let config = SiteConfig::default().with_autoplay_delay(ms(3000));
//! ```

use std::time::Duration;

use crate::features::reveal::REVEAL_SELECTOR;
use crate::types::ms;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Carousel autoplay interval.
pub const AUTOPLAY_DELAY: Duration = ms(5000);

/// Horizontal swipe distance (px) that must be exceeded to navigate.
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Vertical scroll (px) past which the header is marked scrolled.
pub const HEADER_SCROLL_THRESHOLD: f64 = 50.0;

/// Quiet period for the header scroll handler.
pub const HEADER_DEBOUNCE: Duration = ms(10);

/// Simulated submission latency.
pub const SUBMIT_DELAY: Duration = ms(2000);

/// Delay before filtered cards settle into place.
pub const FILTER_TRANSITION_DELAY: Duration = ms(50);

/// Offset kept above in-page anchor targets.
pub const ANCHOR_OFFSET: f64 = 100.0;

/// Offset kept above the first invalid form field.
pub const ERROR_FOCUS_OFFSET: f64 = 120.0;

/// Visible fraction that triggers a reveal.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Bottom shrink of the viewport for reveal checks (px).
pub const REVEAL_BOTTOM_MARGIN: f64 = 50.0;

// =============================================================================
// SiteConfig
// =============================================================================

/// Timings and thresholds for all page behaviors.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub autoplay_delay: Duration,
    pub swipe_threshold: f64,
    pub header_scroll_threshold: f64,
    pub header_debounce: Duration,
    pub submit_delay: Duration,
    pub filter_transition_delay: Duration,
    pub anchor_offset: f64,
    pub error_focus_offset: f64,
    pub reveal_threshold: f64,
    pub reveal_bottom_margin: f64,
    /// Elements that fade in on first sight.
    pub reveal_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            autoplay_delay: AUTOPLAY_DELAY,
            swipe_threshold: SWIPE_THRESHOLD,
            header_scroll_threshold: HEADER_SCROLL_THRESHOLD,
            header_debounce: HEADER_DEBOUNCE,
            submit_delay: SUBMIT_DELAY,
            filter_transition_delay: FILTER_TRANSITION_DELAY,
            anchor_offset: ANCHOR_OFFSET,
            error_focus_offset: ERROR_FOCUS_OFFSET,
            reveal_threshold: REVEAL_THRESHOLD,
            reveal_bottom_margin: REVEAL_BOTTOM_MARGIN,
            reveal_selector: REVEAL_SELECTOR.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn with_autoplay_delay(mut self, delay: Duration) -> Self {
        self.autoplay_delay = delay;
        self
    }

    pub fn with_swipe_threshold(mut self, px: f64) -> Self {
        self.swipe_threshold = px;
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn with_header_debounce(mut self, delay: Duration) -> Self {
        self.header_debounce = delay;
        self
    }

    /// Set the reveal threshold. Values are clamped to `0.0..=1.0`.
    pub fn with_reveal_threshold(mut self, threshold: f64) -> Self {
        self.reveal_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_reveal_selector(mut self, selector: impl Into<String>) -> Self {
        self.reveal_selector = selector.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.autoplay_delay, ms(5000));
        assert_eq!(config.swipe_threshold, 50.0);
        assert_eq!(config.submit_delay, ms(2000));
        assert_eq!(config.error_focus_offset, 120.0);
        assert_eq!(config.reveal_selector, REVEAL_SELECTOR);
    }

    #[test]
    fn test_builders_override() {
        let config = SiteConfig::default()
            .with_autoplay_delay(ms(1000))
            .with_reveal_threshold(3.0)
            .with_reveal_selector(".stat");
        assert_eq!(config.autoplay_delay, ms(1000));
        assert_eq!(config.reveal_threshold, 1.0);
        assert_eq!(config.anchor_offset, ANCHOR_OFFSET);
        assert_eq!(config.reveal_selector, ".stat");
    }
}
