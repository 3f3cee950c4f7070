//! Heuristic shape classification of finished strokes.

use crate::elements::Stroke;
use crate::geometry::{self, CLOSE_MIN_POINTS, CLOSE_THRESHOLD_PX};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Curvature score above which a stroke is reported as wiggly.
///
/// Reporting only; classification never consults it.
pub const WIGGLE_GATE: f64 = 40.0;

/// Aspect ratio band (inclusive) treated as round.
const ROUND_ASPECT_MIN: f64 = 0.8;
const ROUND_ASPECT_MAX: f64 = 1.2;

/// Canonical shape a stroke resembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeCategory {
    Line,
    Circle,
    Square,
    Curve,
    Cloud,
}

impl ShapeCategory {
    pub fn name(self) -> &'static str {
        match self {
            ShapeCategory::Line => "line",
            ShapeCategory::Circle => "circle",
            ShapeCategory::Square => "square",
            ShapeCategory::Curve => "curve",
            ShapeCategory::Cloud => "cloud",
        }
    }
}

/// Closure tuning for the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierParams {
    /// Endpoint distance under which a path is closed.
    pub close_threshold_px: f64,
    /// Minimum points before a path may be closed.
    pub close_min_points: usize,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            close_threshold_px: CLOSE_THRESHOLD_PX,
            close_min_points: CLOSE_MIN_POINTS,
        }
    }
}

/// Everything the classifier measured about a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeAnalysis {
    pub category: ShapeCategory,
    pub closed: bool,
    pub bounds: Rect,
    /// `width / height`; infinite for a flat stroke.
    pub aspect: f64,
    pub curvature: f64,
}

impl StrokeAnalysis {
    pub fn is_wiggly(&self) -> bool {
        self.curvature > WIGGLE_GATE
    }
}

/// Classify a stroke with the default closure parameters.
pub fn classify(stroke: &Stroke) -> ShapeCategory {
    analyze(stroke, ClassifierParams::default()).category
}

/// Measure a stroke and pick its category.
///
/// Rules are checked in order and the first match wins, so every stroke gets
/// exactly one category.
pub fn analyze(stroke: &Stroke, params: ClassifierParams) -> StrokeAnalysis {
    let points = stroke.points();
    let closed = geometry::is_closed(points, params.close_threshold_px, params.close_min_points);
    let bounds = stroke.bounds();
    let (width, height) = (bounds.width(), bounds.height());
    let aspect = if height == 0.0 { f64::INFINITY } else { width / height };
    let round = (ROUND_ASPECT_MIN..=ROUND_ASPECT_MAX).contains(&aspect);

    let category = if !closed && width > 2.0 * height {
        ShapeCategory::Line
    } else if closed && round {
        ShapeCategory::Circle
    } else if closed && !round {
        ShapeCategory::Square
    } else if !closed {
        ShapeCategory::Curve
    } else {
        ShapeCategory::Cloud
    };

    StrokeAnalysis {
        category,
        closed,
        bounds,
        aspect,
        curvature: geometry::curvature_score(points),
    }
}
