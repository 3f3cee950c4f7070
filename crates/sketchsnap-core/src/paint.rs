//! Paint lists: the draw instructions every output is produced from.
//!
//! Screen drawing, raster export and SVG export all consume the same
//! [`DrawInstruction`] sequence, so what is exported is what was shown.

use crate::elements::{Element, ElementKind, Rgba};
use crate::icons::IconRef;
use kurbo::{BezPath, Cap, Join, Point, Rect};

/// A stroked polyline with round caps and joins.
#[derive(Debug, Clone, PartialEq)]
pub struct PathInstruction {
    pub points: Vec<Point>,
    pub width: f64,
    pub color: Rgba,
}

impl PathInstruction {
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(&first) = points.next() {
            path.move_to(first);
            for &point in points {
                path.line_to(point);
            }
        }
        path
    }

    /// Round-capped, round-joined stroke at this width.
    pub fn stroke_style(&self) -> kurbo::Stroke {
        kurbo::Stroke::new(self.width)
            .with_caps(Cap::Round)
            .with_join(Join::Round)
    }
}

/// An image asset drawn into a destination rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInstruction {
    pub asset: IconRef,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImageInstruction {
    pub fn dest(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// One paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    Path(PathInstruction),
    Image(ImageInstruction),
}

impl DrawInstruction {
    pub fn for_element(element: &Element) -> Self {
        match &element.kind {
            ElementKind::Stroke(stroke) => DrawInstruction::Path(PathInstruction {
                points: stroke.points().to_vec(),
                width: stroke.width(),
                color: stroke.color(),
            }),
            ElementKind::Icon(icon) => DrawInstruction::Image(ImageInstruction {
                asset: icon.icon.clone(),
                x: icon.x,
                y: icon.y,
                width: icon.size,
                height: icon.size,
            }),
        }
    }
}

/// Paint list for a sequence of elements, in the same order.
pub fn project<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Vec<DrawInstruction> {
    elements.into_iter().map(DrawInstruction::for_element).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{IconPlacement, Stroke};

    #[test]
    fn test_project_preserves_order() {
        let stroke = Stroke::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)], 3.0, Rgba::black()).unwrap();
        let elements = vec![
            Element::icon(IconPlacement::new(IconRef::new("a.png"), 1.0, 2.0, 40.0)),
            Element::stroke(stroke),
        ];

        let list = project(&elements);
        assert_eq!(list.len(), 2);
        match &list[0] {
            DrawInstruction::Image(image) => {
                assert_eq!(image.asset, IconRef::new("a.png"));
                assert_eq!(image.dest(), Rect::new(1.0, 2.0, 41.0, 42.0));
            }
            other => panic!("expected an image, got {other:?}"),
        }
        match &list[1] {
            DrawInstruction::Path(path) => {
                assert_eq!(path.points.len(), 2);
                assert!((path.width - 3.0).abs() < f64::EPSILON);
            }
            other => panic!("expected a path, got {other:?}"),
        }
    }

    #[test]
    fn test_project_is_deterministic() {
        let stroke = Stroke::new(vec![Point::new(0.0, 0.0)], 3.0, Rgba::black()).unwrap();
        let elements = vec![Element::stroke(stroke)];
        assert_eq!(project(&elements), project(&elements));
    }

    #[test]
    fn test_round_stroke_style() {
        let path = PathInstruction {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            width: 6.0,
            color: Rgba::black(),
        };
        let style = path.stroke_style();
        assert!((style.width - 6.0).abs() < f64::EPSILON);
        assert_eq!(style.join, Join::Round);
        assert_eq!(path.to_bez_path().elements().len(), 2);
    }
}
