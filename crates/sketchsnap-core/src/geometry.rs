//! Geometry helpers over stroke point sequences.
//!
//! Everything here is a pure function of its input. Callers are expected to
//! hold non-empty sequences (a committed [`Stroke`](crate::elements::Stroke)
//! always has at least one point), but [`bounding_box`] still rejects the
//! empty case explicitly.

use kurbo::{Point, Rect};
use thiserror::Error;

/// Default distance (in pixels) under which a path's endpoints count as touching.
pub const CLOSE_THRESHOLD_PX: f64 = 20.0;

/// Default minimum number of points before a path may count as closed.
pub const CLOSE_MIN_POINTS: usize = 10;

/// Geometry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("point sequence is empty")]
    EmptyInput,
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Axis-aligned bounding box of a point sequence.
///
/// A single point yields a zero-area rectangle at that point.
pub fn bounding_box(points: &[Point]) -> Result<Rect, GeometryError> {
    let first = points.first().ok_or(GeometryError::EmptyInput)?;

    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;

    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Ok(Rect::new(min_x, min_y, max_x, max_y))
}

/// Whether a path's endpoints meet.
///
/// Paths with fewer than `min_points` points are never closed, so a quick tap
/// cannot be mistaken for a loop.
pub fn is_closed(points: &[Point], threshold_px: f64, min_points: usize) -> bool {
    if points.len() < min_points {
        return false;
    }
    match (points.first(), points.last()) {
        (Some(&first), Some(&last)) => distance(first, last) < threshold_px,
        _ => false,
    }
}

/// [`is_closed`] with the default threshold and minimum length.
pub fn is_closed_default(points: &[Point]) -> bool {
    is_closed(points, CLOSE_THRESHOLD_PX, CLOSE_MIN_POINTS)
}

/// Sum of absolute heading changes over consecutive point triples.
///
/// This is a coarse wiggliness measure, not a curvature integral: it grows
/// with point count and is not normalised by arc length or wrapped to
/// `[-π, π]`.
pub fn curvature_score(points: &[Point]) -> f64 {
    points
        .windows(3)
        .map(|w| {
            let (a, b, c) = (w[0], w[1], w[2]);
            let incoming = (b.y - a.y).atan2(b.x - a.x);
            let outgoing = (c.y - b.y).atan2(c.x - b.x);
            (outgoing - incoming).abs()
        })
        .sum()
}
