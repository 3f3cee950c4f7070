//! Current drawing style.

use crate::elements::Rgba;
use serde::{Deserialize, Serialize};

/// Allowed stroke width range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthRange {
    pub min: f64,
    pub max: f64,
}

impl WidthRange {
    /// Range between `a` and `b`, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Clamp `width` into the range. A reversed range is read in order and
    /// a NaN bound is ignored.
    pub fn clamp(&self, width: f64) -> f64 {
        let lo = self.min.min(self.max);
        let hi = self.max.max(self.min);
        width.max(lo).min(hi)
    }
}

impl Default for WidthRange {
    fn default() -> Self {
        Self { min: 2.0, max: 14.0 }
    }
}

/// Width and color applied to new strokes. Changing it never touches
/// strokes that already exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    width: f64,
    color: Rgba,
    range: WidthRange,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self::new(4.0, Rgba::black(), WidthRange::default())
    }
}

impl DrawStyle {
    pub fn new(width: f64, color: Rgba, range: WidthRange) -> Self {
        Self {
            width: range.clamp(width),
            color,
            range,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn range(&self) -> WidthRange {
        self.range
    }

    /// Adjust the width by `delta`, clamped to the allowed range.
    pub fn adjust_width(&mut self, delta: f64) -> f64 {
        self.width = self.range.clamp(self.width + delta);
        self.width
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }
}
