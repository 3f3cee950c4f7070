//! Icon library: the assets offered as replacements for classified strokes.

use crate::classify::ShapeCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to an icon asset (a path or URL understood by the asset loader).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(String);

impl IconRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IconRef {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

/// Shape an icon depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTag {
    Line,
    /// Directional variant of a straight stroke.
    Arrow,
    Circle,
    Square,
    Curve,
    Cloud,
}

impl IconTag {
    /// Whether an icon with this tag is offered for `category`.
    ///
    /// Tags match their own category; arrows are also offered for lines.
    pub fn matches(self, category: ShapeCategory) -> bool {
        matches!(
            (self, category),
            (IconTag::Line | IconTag::Arrow, ShapeCategory::Line)
                | (IconTag::Circle, ShapeCategory::Circle)
                | (IconTag::Square, ShapeCategory::Square)
                | (IconTag::Curve, ShapeCategory::Curve)
                | (IconTag::Cloud, ShapeCategory::Cloud)
        )
    }
}

/// One library entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconEntry {
    pub icon: IconRef,
    pub tag: IconTag,
}

impl IconEntry {
    pub fn new(icon: impl Into<String>, tag: IconTag) -> Self {
        Self {
            icon: IconRef::new(icon),
            tag,
        }
    }
}

/// Ordered set of icons available for substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconLibrary {
    entries: Vec<IconEntry>,
}

impl Default for IconLibrary {
    fn default() -> Self {
        Self::new(vec![
            IconEntry::new("icons/line.png", IconTag::Line),
            IconEntry::new("icons/arrow.png", IconTag::Arrow),
            IconEntry::new("icons/circle.png", IconTag::Circle),
            IconEntry::new("icons/square.png", IconTag::Square),
            IconEntry::new("icons/curve.png", IconTag::Curve),
            IconEntry::new("icons/cloud.png", IconTag::Cloud),
        ])
    }
}

impl IconLibrary {
    pub fn new(entries: Vec<IconEntry>) -> Self {
        Self { entries }
    }

    /// A library with no icons; every suggestion list is empty.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn entries(&self) -> &[IconEntry] {
        &self.entries
    }

    pub fn push(&mut self, entry: IconEntry) {
        self.entries.push(entry);
    }

    /// Icons offered for `category`, in library order.
    pub fn candidates(&self, category: ShapeCategory) -> Vec<IconRef> {
        self.entries
            .iter()
            .filter(|entry| entry.tag.matches(category))
            .map(|entry| entry.icon.clone())
            .collect()
    }
}
