//! Single-element selection for the select tool.

use crate::document::Document;
use crate::elements::ElementId;
use kurbo::Point;

/// The element picked by the select tool, held by identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Select the topmost icon under `point`, or nothing.
    pub fn select_at(&mut self, document: &Document, point: Point) -> Option<ElementId> {
        self.selected = document.element_at(point).map(|e| e.id());
        self.selected
    }

    /// Drop the selection if its element is no longer in the document.
    pub fn revalidate(&mut self, document: &Document) {
        if let Some(id) = self.selected {
            if !document.contains(id) {
                self.selected = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, IconPlacement};
    use crate::icons::IconRef;

    fn icon(x: f64) -> Element {
        Element::icon(IconPlacement::new(IconRef::new("icons/square.png"), x, 0.0, 40.0))
    }

    #[test]
    fn test_select_and_miss() {
        let mut doc = Document::new();
        let id = doc.append(icon(0.0));
        let mut selection = Selection::new();

        assert_eq!(selection.select_at(&doc, Point::new(10.0, 10.0)), Some(id));
        assert_eq!(selection.get(), Some(id));

        // A miss clears the previous pick
        assert_eq!(selection.select_at(&doc, Point::new(100.0, 100.0)), None);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_revalidate_after_removal() {
        let mut doc = Document::new();
        doc.append(icon(0.0));
        let mut selection = Selection::new();
        selection.select_at(&doc, Point::new(5.0, 5.0));
        assert!(!selection.is_empty());

        doc.undo();
        selection.revalidate(&doc);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_selection_survives_shift() {
        let mut doc = Document::new();
        doc.append(icon(200.0));
        let id = doc.append(icon(0.0));
        let mut selection = Selection::new();
        selection.select_at(&doc, Point::new(5.0, 5.0));

        // Removing an earlier element shifts indices but not identity
        doc.remove_at(0);
        selection.revalidate(&doc);
        assert_eq!(selection.get(), Some(id));
    }
}
