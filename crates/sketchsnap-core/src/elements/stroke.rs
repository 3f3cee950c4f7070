//! Freehand stroke element.

use super::Rgba;
use crate::geometry::{self, GeometryError};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// One committed freehand gesture.
///
/// A stroke always holds at least one point; the constructor rejects empty
/// paths so geometry over a committed stroke never sees an empty sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStroke")]
pub struct Stroke {
    points: Vec<Point>,
    /// Per-point sample times, present only when every sample carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamps: Option<Vec<f64>>,
    width: f64,
    color: Rgba,
}

/// Unchecked shape of a stroke, used while deserializing.
#[derive(Deserialize)]
struct RawStroke {
    points: Vec<Point>,
    #[serde(default)]
    timestamps: Option<Vec<f64>>,
    width: f64,
    color: Rgba,
}

impl TryFrom<RawStroke> for Stroke {
    type Error = GeometryError;

    fn try_from(raw: RawStroke) -> Result<Self, Self::Error> {
        let stroke = Stroke::new(raw.points, raw.width, raw.color)?;
        Ok(match raw.timestamps {
            Some(times) => stroke.with_timestamps(times),
            None => stroke,
        })
    }
}

impl Stroke {
    /// Create a stroke from a non-empty point sequence.
    pub fn new(points: Vec<Point>, width: f64, color: Rgba) -> Result<Self, GeometryError> {
        if points.is_empty() {
            return Err(GeometryError::EmptyInput);
        }
        Ok(Self {
            points,
            timestamps: None,
            width,
            color,
        })
    }

    /// Attach sample times. Ignored unless there is one per point.
    pub fn with_timestamps(mut self, timestamps: Vec<f64>) -> Self {
        if timestamps.len() == self.points.len() {
            self.timestamps = Some(timestamps);
        }
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn timestamps(&self) -> Option<&[f64]> {
        self.timestamps.as_deref()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed stroke.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        geometry::bounding_box(&self.points).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stroke_rejected() {
        assert_eq!(Stroke::new(Vec::new(), 4.0, Rgba::black()), Err(GeometryError::EmptyInput));
    }

    #[test]
    fn test_single_point_stroke() {
        let stroke = Stroke::new(vec![Point::new(3.0, 4.0)], 4.0, Rgba::black()).unwrap();
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.bounds().area(), 0.0);
    }

    #[test]
    fn test_timestamps_must_match_length() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let stroke = Stroke::new(points.clone(), 2.0, Rgba::black()).unwrap();

        assert!(stroke.clone().with_timestamps(vec![0.0]).timestamps().is_none());
        assert_eq!(stroke.with_timestamps(vec![0.0, 16.0]).timestamps(), Some(&[0.0, 16.0][..]));
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let json = r#"{"points":[],"width":4.0,"color":{"r":0,"g":0,"b":0,"a":255}}"#;
        assert!(serde_json::from_str::<Stroke>(json).is_err());
    }
}
