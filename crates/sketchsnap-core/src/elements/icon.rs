//! Icon placement element.

use crate::icons::IconRef;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A square icon asset drawn at a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconPlacement {
    /// Asset to draw.
    pub icon: IconRef,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Edge length of the square.
    pub size: f64,
}

impl IconPlacement {
    pub fn new(icon: IconRef, x: f64, y: f64, size: f64) -> Self {
        Self { icon, x, y, size }
    }

    /// Place an icon of edge `size` centred on `center`.
    pub fn centered_on(icon: IconRef, center: Point, size: f64) -> Self {
        Self::new(icon, center.x - size / 2.0, center.y - size / 2.0, size)
    }

    /// Destination rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.size, self.y + self.size)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Bounding-box containment, edges inclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.size
            && point.y >= self.y
            && point.y <= self.y + self.size
    }
}
