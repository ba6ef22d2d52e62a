pub const DEFAULT_THRESHOLD_PX: f64 = 1000.0;

/// Where the viewport sits relative to the rendered listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl ViewportMetrics {
    pub fn scrolled_to_bottom(content_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_top: (content_height - viewport_height).max(0.0),
            viewport_height,
            content_height,
        }
    }

    pub fn remaining_px(&self) -> f64 {
        (self.content_height - (self.scroll_top + self.viewport_height)).max(0.0)
    }
}

/// Decides when a scroll event should pull in the next page.
#[derive(Clone, Copy, Debug)]
pub struct ScrollTrigger {
    threshold_px: f64,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_PX)
    }
}

impl ScrollTrigger {
    pub fn new(threshold_px: f64) -> Self {
        Self { threshold_px }
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    pub fn should_request(
        &self,
        metrics: &ViewportMetrics,
        fetch_in_flight: bool,
        has_more: bool,
    ) -> bool {
        has_more && !fetch_in_flight && metrics.remaining_px() < self.threshold_px
    }
}
