//! Horizontal pan/zoom window.
//!
//! The window is stored as fractions of the dataset so it survives data
//! refreshes that change the number of points.

use std::ops::Range;

use serde::Serialize;

const MIN_SPAN: f64 = 0.05;
const ZOOM_FACTOR: f64 = 0.8;
const PAN_FRACTION: f64 = 0.2;
// Absorbs float drift so 0.1 * 100 lands on index 10, not 9.
const EDGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    start: f64,
    span: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            start: 0.0,
            span: 1.0,
        }
    }
}

impl Viewport {
    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn is_full(&self) -> bool {
        self.start <= 0.0 && self.span >= 1.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Shrink the window around its center.
    pub fn zoom_in(&mut self) {
        self.rescale((self.span * ZOOM_FACTOR).max(MIN_SPAN));
    }

    /// Grow the window around its center, up to the full dataset.
    pub fn zoom_out(&mut self) {
        self.rescale((self.span / ZOOM_FACTOR).min(1.0));
    }

    pub fn pan_left(&mut self) {
        self.start = (self.start - self.span * PAN_FRACTION).max(0.0);
    }

    pub fn pan_right(&mut self) {
        self.start = (self.start + self.span * PAN_FRACTION).min(1.0 - self.span);
    }

    /// Indices of the points visible in a dataset of `len` points.
    ///
    /// Non-empty datasets always yield at least one point.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        if len == 0 {
            return 0..0;
        }

        let total = len as f64;
        let first = ((self.start * total + EDGE_EPSILON).floor() as usize).min(len - 1);
        let last = (((self.start + self.span) * total - EDGE_EPSILON).ceil() as usize)
            .clamp(first + 1, len);
        first..last
    }

    fn rescale(&mut self, span: f64) {
        let center = self.start + self.span / 2.0;
        self.span = span;
        self.start = (center - span / 2.0).clamp(0.0, 1.0 - span);
    }
}
