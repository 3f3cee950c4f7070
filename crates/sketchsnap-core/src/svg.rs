//! SVG export of a paint list, and a reader for SVG documents.
//!
//! Numbers are written with Rust's shortest round-trip formatting, so reading
//! an exported document gives back exactly the instructions it came from.
//! The reader goes through `roxmltree` and kurbo's path-data parser, so
//! documents written by other tools are read too.

use crate::elements::Rgba;
use crate::icons::IconRef;
use crate::paint::{DrawInstruction, ImageInstruction, PathInstruction};
use kurbo::{BezPath, PathEl, Point, Size, SvgParseError};
use roxmltree::Node;
use std::str::FromStr;
use thiserror::Error;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Maximum deviation when reading curved path data as a polyline.
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Errors from reading an SVG document.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Document has no <svg> root element")]
    MissingRoot,
    #[error("<{element}> is missing attribute {attribute:?}")]
    MissingAttribute { element: String, attribute: String },
    #[error("Invalid number {value:?} for attribute {attribute:?}")]
    BadNumber { attribute: String, value: String },
    #[error("Invalid path data {data:?}: {source}")]
    BadPathData { data: String, source: SvgParseError },
    #[error("Path data draws nothing")]
    EmptyPath,
    #[error("Invalid color: {0:?}")]
    BadColor(String),
}

/// A parsed SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSvg {
    pub size: Size,
    pub instructions: Vec<DrawInstruction>,
}

/// Write `instructions` as a standalone SVG document of the given size.
pub fn export_svg(instructions: &[DrawInstruction], size: Size) -> String {
    let mut out = format!(
        "<svg xmlns=\"{SVG_NS}\" width=\"{}\" height=\"{}\">\n",
        size.width, size.height
    );
    for instruction in instructions {
        match instruction {
            DrawInstruction::Path(path) => out.push_str(&path_element(path)),
            DrawInstruction::Image(image) => out.push_str(&image_element(image)),
        }
        out.push('\n');
    }
    out.push_str("</svg>\n");
    out
}

fn path_element(path: &PathInstruction) -> String {
    let mut d = String::new();
    for (i, point) in path.points.iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        let command = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{command}{} {}", point.x, point.y));
    }

    let opacity = if path.color.is_opaque() {
        String::new()
    } else {
        format!(" stroke-opacity=\"{}\"", path.color.alpha_fraction())
    };

    format!(
        "<path d=\"{d}\" stroke=\"{}\"{opacity} stroke-width=\"{}\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
        path.color.to_hex_rgb(),
        path.width
    )
}

fn image_element(image: &ImageInstruction) -> String {
    format!(
        "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
        escape(image.asset.as_str()),
        image.x,
        image.y,
        image.width,
        image.height
    )
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Read back the `<path>` and `<image>` elements of an SVG document.
///
/// Path data may use any SVG command; curves are flattened and subpaths are
/// joined into one polyline. Stroke colors accept any SVG color syntax.
/// Other elements are skipped.
pub fn parse_svg(input: &str) -> Result<ParsedSvg, SvgError> {
    let tree = roxmltree::Document::parse(input)?;
    let root = tree.root_element();
    if root.tag_name().name() != "svg" {
        return Err(SvgError::MissingRoot);
    }
    let size = Size::new(number(root, "width")?, number(root, "height")?);

    let mut instructions = Vec::new();
    for node in root.descendants().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "path" => instructions.push(DrawInstruction::Path(read_path(node)?)),
            "image" => instructions.push(DrawInstruction::Image(read_image(node)?)),
            _ => {}
        }
    }

    Ok(ParsedSvg { size, instructions })
}

fn read_path(node: Node<'_, '_>) -> Result<PathInstruction, SvgError> {
    let stroke = required(node, "stroke")?;
    let parsed = svgtypes::Color::from_str(stroke).map_err(|_| SvgError::BadColor(stroke.to_string()))?;
    let mut color = Rgba::new(parsed.red, parsed.green, parsed.blue, parsed.alpha);
    if node.attribute("stroke-opacity").is_some() {
        let opacity = number(node, "stroke-opacity")?;
        color.a = (opacity * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    let width = match node.attribute("stroke-width") {
        Some(_) => number(node, "stroke-width")?,
        None => 1.0,
    };
    Ok(PathInstruction {
        points: path_points(required(node, "d")?)?,
        width,
        color,
    })
}

fn read_image(node: Node<'_, '_>) -> Result<ImageInstruction, SvgError> {
    let href = node
        .attribute("href")
        .or_else(|| node.attribute((XLINK_NS, "href")))
        .ok_or_else(|| missing(node, "href"))?;
    Ok(ImageInstruction {
        asset: IconRef::new(href),
        x: number(node, "x")?,
        y: number(node, "y")?,
        width: number(node, "width")?,
        height: number(node, "height")?,
    })
}

fn path_points(d: &str) -> Result<Vec<Point>, SvgError> {
    let path = BezPath::from_svg(d).map_err(|source| SvgError::BadPathData {
        data: d.to_string(),
        source,
    })?;

    let mut points = Vec::new();
    let mut subpath_start = None;
    kurbo::flatten(&path, FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            subpath_start = Some(p);
            points.push(p);
        }
        PathEl::LineTo(p) => points.push(p),
        PathEl::ClosePath => points.extend(subpath_start),
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });

    if points.is_empty() {
        return Err(SvgError::EmptyPath);
    }
    Ok(points)
}

fn missing(node: Node<'_, '_>, attribute: &str) -> SvgError {
    SvgError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
    }
}

fn required<'a>(node: Node<'a, '_>, attribute: &str) -> Result<&'a str, SvgError> {
    node.attribute(attribute).ok_or_else(|| missing(node, attribute))
}

fn number(node: Node<'_, '_>, attribute: &str) -> Result<f64, SvgError> {
    let value = required(node, attribute)?;
    value.trim().parse().map_err(|_| SvgError::BadNumber {
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, IconPlacement, Stroke};
    use crate::paint::project;

    fn sample_elements() -> Vec<Element> {
        let stroke = Stroke::new(
            vec![Point::new(0.1 + 0.2, 10.0), Point::new(12.5, -3.25), Point::new(1e-7, 480.0)],
            6.0,
            Rgba::new(200, 30, 40, 128),
        )
        .unwrap();
        let single = Stroke::new(vec![Point::new(7.0, 7.0)], 2.0, Rgba::black()).unwrap();
        vec![
            Element::stroke(stroke),
            Element::icon(IconPlacement::new(IconRef::new("icons/a&b \"q\".png"), 10.0 / 3.0, 5.5, 52.65)),
            Element::stroke(single),
        ]
    }

    #[test]
    fn test_export_format() {
        let stroke = Stroke::new(vec![Point::new(0.0, 0.0), Point::new(10.5, 20.0)], 4.0, Rgba::black()).unwrap();
        let elements = vec![
            Element::stroke(stroke),
            Element::icon(IconPlacement::new(IconRef::new("icons/circle.png"), 1.0, 2.0, 40.0)),
        ];
        let svg = export_svg(&project(&elements), Size::new(800.0, 600.0));
        let expected = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"600\">\n\
<path d=\"M0 0 L10.5 20\" stroke=\"#000000\" stroke-width=\"4\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n\
<image href=\"icons/circle.png\" x=\"1\" y=\"2\" width=\"40\" height=\"40\"/>\n\
</svg>\n";
        assert_eq!(svg, expected);
    }

    #[test]
    fn test_parse_recovers_paint_list() {
        let elements = sample_elements();
        let list = project(&elements);
        let size = Size::new(1024.0, 768.0);

        let parsed = parse_svg(&export_svg(&list, size)).unwrap();
        assert_eq!(parsed.size, size);
        assert_eq!(parsed.instructions, list);
    }

    #[test]
    fn test_export_is_reproducible() {
        let list = project(&sample_elements());
        let size = Size::new(800.0, 600.0);
        assert_eq!(export_svg(&list, size), export_svg(&list, size));
    }

    #[test]
    fn test_translucent_stroke_gets_opacity() {
        let svg = export_svg(&project(&sample_elements()), Size::new(10.0, 10.0));
        assert!(svg.contains("stroke=\"#c81e28\" stroke-opacity="));
    }

    #[test]
    fn test_empty_document() {
        let parsed = parse_svg(&export_svg(&[], Size::new(800.0, 600.0))).unwrap();
        assert!(parsed.instructions.is_empty());
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(parse_svg("<g></g>"), Err(SvgError::MissingRoot)));
    }

    #[test]
    fn test_bad_path_data() {
        let svg = "<svg width=\"1\" height=\"1\"><path d=\"L0 0\" stroke=\"#000000\" stroke-width=\"1\"/></svg>";
        assert!(matches!(parse_svg(svg), Err(SvgError::BadPathData { .. })));
    }

    #[test]
    fn test_missing_attribute() {
        let svg = "<svg width=\"1\" height=\"1\"><image href=\"a.png\" x=\"0\" y=\"0\" width=\"4\"/></svg>";
        assert!(matches!(parse_svg(svg), Err(SvgError::MissingAttribute { .. })));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(parse_svg("<svg width=\"1\""), Err(SvgError::Xml(_))));
    }

    #[test]
    fn test_comma_separated_path_data() {
        let svg = r##"<svg width="10" height="10"><path d="M0,0 L5,5" stroke="#000000" stroke-width="1"/></svg>"##;
        let parsed = parse_svg(svg).unwrap();
        assert_eq!(
            parsed.instructions,
            vec![DrawInstruction::Path(PathInstruction {
                points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
                width: 1.0,
                color: Rgba::black(),
            })]
        );
    }

    #[test]
    fn test_handwritten_svg() {
        let svg = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="100" height="50">
  <!-- a comment -->
  <g>
    <path d="m10 10 h20 v5 z" stroke="red"/>
    <rect x="0" y="0" width="5" height="5"/>
  </g>
  <image xlink:href="icons/star.png" x="1" y="2" width="3" height="4"/>
</svg>"##;
        let parsed = parse_svg(svg).unwrap();
        assert_eq!(parsed.size, Size::new(100.0, 50.0));
        assert_eq!(parsed.instructions.len(), 2);

        let DrawInstruction::Path(path) = &parsed.instructions[0] else {
            panic!("expected a path");
        };
        assert_eq!(
            path.points,
            vec![
                Point::new(10.0, 10.0),
                Point::new(30.0, 10.0),
                Point::new(30.0, 15.0),
                Point::new(10.0, 10.0),
            ]
        );
        assert_eq!(path.color, Rgba::new(255, 0, 0, 255));
        assert!((path.width - 1.0).abs() < f64::EPSILON);

        let DrawInstruction::Image(image) = &parsed.instructions[1] else {
            panic!("expected an image");
        };
        assert_eq!(image.asset, IconRef::new("icons/star.png"));
    }

    #[test]
    fn test_curves_are_flattened() {
        let svg = r##"<svg width="100" height="100"><path d="M0 0 Q50 100 100 0" stroke="#000000" stroke-width="2"/></svg>"##;
        let parsed = parse_svg(svg).unwrap();
        let DrawInstruction::Path(path) = &parsed.instructions[0] else {
            panic!("expected a path");
        };
        assert!(path.points.len() > 2);
        assert_eq!(path.points.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(path.points.last(), Some(&Point::new(100.0, 0.0)));
        assert!(path.points.iter().any(|p| p.y > 40.0));
    }

    #[test]
    fn test_bad_color() {
        let svg = r##"<svg width="1" height="1"><path d="M0 0" stroke="not-a-color"/></svg>"##;
        assert!(matches!(parse_svg(svg), Err(SvgError::BadColor(_))));
    }
}
