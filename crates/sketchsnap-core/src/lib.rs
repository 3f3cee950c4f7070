//! SketchSnap Core Library
//!
//! Document model, stroke classification and icon substitution for a
//! freehand sketch surface. Everything here is platform-agnostic.

pub mod classify;
pub mod config;
pub mod document;
pub mod elements;
pub mod geometry;
pub mod icons;
pub mod input;
pub mod paint;
pub mod selection;
pub mod sketchpad;
pub mod style;
pub mod substitution;
pub mod svg;

pub use classify::{ClassifierParams, ShapeCategory, StrokeAnalysis, classify};
pub use config::{ConfigError, SketchConfig};
pub use document::Document;
pub use elements::{ColorParseError, Element, ElementId, ElementKind, IconPlacement, Rgba, Stroke};
pub use geometry::GeometryError;
pub use icons::{IconEntry, IconLibrary, IconRef, IconTag};
pub use input::{PointerPhase, PointerSample, Tool};
pub use paint::{DrawInstruction, ImageInstruction, PathInstruction, project};
pub use selection::Selection;
pub use sketchpad::{EXPORT_PREFIX, SampleOutcome, Sketchpad, export_file_name};
pub use style::{DrawStyle, WidthRange};
pub use substitution::{IconSizing, Substitution, SubstitutionEngine};
pub use svg::{ParsedSvg, SvgError, export_svg, parse_svg};
