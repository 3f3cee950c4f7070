//! Document elements: freehand strokes and icon placements.

mod icon;
mod stroke;

pub use icon::IconPlacement;
pub use stroke::Stroke;

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Errors from parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("unsupported color length {len} in {input:?}")]
    BadLength { input: String, len: usize },
    #[error("invalid hex digits in {0:?}")]
    BadDigits(String),
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let hex = input
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(input.to_string()))?;

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigits(input.to_string()));
        }

        let byte = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::BadDigits(input.to_string()))
        };

        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = byte(&hex[0..1])? * 17;
                let g = byte(&hex[1..2])? * 17;
                let b = byte(&hex[2..3])? * 17;
                Ok(Self::new(r, g, b, 255))
            }
            6 => Ok(Self::new(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 255)),
            8 => Ok(Self::new(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            len => Err(ColorParseError::BadLength {
                input: input.to_string(),
                len,
            }),
        }
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha_fraction(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stable identifier for elements, assigned at creation.
pub type ElementId = Uuid;

/// The content of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Stroke(Stroke),
    Icon(IconPlacement),
}

/// A unit of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    pub kind: ElementKind,
}

impl Element {
    /// Wrap content in a new element with a fresh identifier.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
        }
    }

    pub fn stroke(stroke: Stroke) -> Self {
        Self::new(ElementKind::Stroke(stroke))
    }

    pub fn icon(icon: IconPlacement) -> Self {
        Self::new(ElementKind::Icon(icon))
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match &self.kind {
            ElementKind::Stroke(stroke) => Some(stroke),
            ElementKind::Icon(_) => None,
        }
    }

    pub fn as_icon(&self) -> Option<&IconPlacement> {
        match &self.kind {
            ElementKind::Icon(icon) => Some(icon),
            ElementKind::Stroke(_) => None,
        }
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self.kind, ElementKind::Stroke(_))
    }

    /// Bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ElementKind::Stroke(stroke) => stroke.bounds(),
            ElementKind::Icon(icon) => icon.rect(),
        }
    }

    /// Whether `point` selects this element.
    ///
    /// Only icon placements are selectable; strokes never hit.
    pub fn hit_test(&self, point: Point) -> bool {
        match &self.kind {
            ElementKind::Icon(icon) => icon.contains(point),
            ElementKind::Stroke(_) => false,
        }
    }
}
