//! Stroke-to-icon substitution.
//!
//! When a stroke is finished the engine commits it, classifies it and lists
//! matching icons. If the user picks one, the most recent stroke in the
//! document is swapped for an icon placed over the stroke's bounding box.
//! Ignoring the suggestions is always fine; the stroke stays as drawn.

use crate::classify::{self, ClassifierParams, ShapeCategory, StrokeAnalysis};
use crate::document::Document;
use crate::elements::{Element, ElementId, ElementKind, IconPlacement, Stroke};
use crate::icons::{IconLibrary, IconRef};

/// Size rule for placed icons: `max(min_size, scale * longest bounds edge)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconSizing {
    pub min_size: f64,
    pub scale: f64,
}

impl Default for IconSizing {
    fn default() -> Self {
        Self {
            min_size: 40.0,
            scale: 1.3,
        }
    }
}

impl IconSizing {
    /// Icon placement replacing `stroke`, centred on its bounding box.
    pub fn place(&self, stroke: &Stroke, icon: IconRef) -> IconPlacement {
        let bounds = stroke.bounds();
        let size = self.min_size.max(self.scale * bounds.width().max(bounds.height()));
        IconPlacement::centered_on(icon, bounds.center(), size)
    }
}

/// Where the engine is in the suggest/substitute cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EngineState {
    #[default]
    Idle,
    /// Suggestions for the stroke `trigger` are on offer.
    Suggesting {
        trigger: ElementId,
        analysis: StrokeAnalysis,
        suggestions: Vec<IconRef>,
    },
}

/// Result of choosing a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    /// `removed` stroke was replaced by the icon element `placed`.
    Replaced { removed: ElementId, placed: ElementId },
    /// No stroke left in the document; nothing changed.
    NoStroke,
    /// No suggestions were on offer; nothing changed.
    NotSuggesting,
}

/// Classifies finished strokes and performs icon substitution.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionEngine {
    library: IconLibrary,
    params: ClassifierParams,
    sizing: IconSizing,
    state: EngineState,
}

impl SubstitutionEngine {
    pub fn new(library: IconLibrary, params: ClassifierParams, sizing: IconSizing) -> Self {
        Self {
            library,
            params,
            sizing,
            state: EngineState::Idle,
        }
    }

    pub fn library(&self) -> &IconLibrary {
        &self.library
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn is_suggesting(&self) -> bool {
        matches!(self.state, EngineState::Suggesting { .. })
    }

    /// Icons on offer for the latest stroke; empty when idle.
    pub fn suggestions(&self) -> &[IconRef] {
        match &self.state {
            EngineState::Suggesting { suggestions, .. } => suggestions,
            EngineState::Idle => &[],
        }
    }

    /// Category of the stroke whose suggestions are showing.
    pub fn detected(&self) -> Option<ShapeCategory> {
        match &self.state {
            EngineState::Suggesting { analysis, .. } => Some(analysis.category),
            EngineState::Idle => None,
        }
    }

    /// Commit a finished stroke and offer icons for it.
    ///
    /// Suggestions left over from an earlier stroke are replaced.
    pub fn stroke_completed(&mut self, document: &mut Document, stroke: Stroke) -> ElementId {
        let analysis = classify::analyze(&stroke, self.params);
        let trigger = document.append(Element::stroke(stroke));
        let suggestions = self.library.candidates(analysis.category);

        log::debug!(
            "stroke {trigger} classified as {} (closed: {}, aspect: {:.3}, curvature: {:.1}, wiggly: {}), {} suggestion(s)",
            analysis.category.name(),
            analysis.closed,
            analysis.aspect,
            analysis.curvature,
            analysis.is_wiggly(),
            suggestions.len(),
        );

        self.state = EngineState::Suggesting {
            trigger,
            analysis,
            suggestions,
        };
        trigger
    }

    /// Replace the most recent stroke with `icon`.
    ///
    /// The stroke is found by scanning back from the top of the document, so
    /// icons added after it do not hide it. The engine is idle afterwards
    /// whatever the outcome.
    pub fn substitution_chosen(&mut self, document: &mut Document, icon: IconRef) -> Substitution {
        if !self.is_suggesting() {
            return Substitution::NotSuggesting;
        }
        self.state = EngineState::Idle;

        let Some((index, element)) = document.last_stroke() else {
            log::debug!("no stroke left to replace with {icon}");
            return Substitution::NoStroke;
        };
        let removed = element.id();
        let Some(stroke) = document.remove_at(index).and_then(|e| match e.kind {
            ElementKind::Stroke(stroke) => Some(stroke),
            ElementKind::Icon(_) => None,
        }) else {
            return Substitution::NoStroke;
        };

        let placement = self.sizing.place(&stroke, icon);
        log::info!(
            "replaced stroke {removed} with {} at ({:.1}, {:.1}) size {:.1}",
            placement.icon,
            placement.x,
            placement.y,
            placement.size
        );
        let placed = document.append(Element::icon(placement));

        Substitution::Replaced { removed, placed }
    }

    /// Discard the current suggestions.
    pub fn dismiss(&mut self) {
        self.state = EngineState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Rgba;
    use kurbo::Point;

    fn horizontal_line(y: f64) -> Stroke {
        let points = (0..=20).map(|i| Point::new(i as f64 * 10.0, y)).collect();
        Stroke::new(points, 4.0, Rgba::black()).unwrap()
    }

    fn loop_stroke(cx: f64, cy: f64, r: f64) -> Stroke {
        let points = (0..=24)
            .map(|i| {
                let a = i as f64 / 24.0 * std::f64::consts::TAU;
                Point::new(cx + r * a.cos(), cy + r * a.sin())
            })
            .collect();
        Stroke::new(points, 4.0, Rgba::black()).unwrap()
    }

    #[test]
    fn test_suggestions_for_line() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        engine.stroke_completed(&mut doc, horizontal_line(0.0));

        assert!(engine.is_suggesting());
        assert_eq!(engine.detected(), Some(ShapeCategory::Line));
        assert_eq!(
            engine.suggestions(),
            &[IconRef::new("icons/line.png"), IconRef::new("icons/arrow.png")]
        );
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_empty_suggestions_still_suggesting() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::new(IconLibrary::empty(), ClassifierParams::default(), IconSizing::default());
        engine.stroke_completed(&mut doc, horizontal_line(0.0));

        assert!(engine.is_suggesting());
        assert!(engine.suggestions().is_empty());
    }

    #[test]
    fn test_replace_latest_stroke_only() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        let a = engine.stroke_completed(&mut doc, horizontal_line(0.0));
        let stroke_b = loop_stroke(300.0, 300.0, 50.0);
        let bounds_b = stroke_b.bounds();
        let b = engine.stroke_completed(&mut doc, stroke_b);

        let outcome = engine.substitution_chosen(&mut doc, IconRef::new("icons/circle.png"));
        let Substitution::Replaced { removed, placed } = outcome else {
            panic!("expected a replacement, got {outcome:?}");
        };
        assert_eq!(removed, b);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.elements()[0].id(), a);
        assert_eq!(doc.elements()[1].id(), placed);

        let icon = doc.elements()[1].as_icon().unwrap();
        let expected = 40f64.max(1.3 * bounds_b.width().max(bounds_b.height()));
        assert!((icon.size - expected).abs() < 1e-9);
        assert!((icon.center().x - bounds_b.center().x).abs() < 1e-9);
        assert!((icon.center().y - bounds_b.center().y).abs() < 1e-9);
        assert_eq!(engine.state(), &EngineState::Idle);
    }

    #[test]
    fn test_undo_after_substitution_removes_icon() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        let a = engine.stroke_completed(&mut doc, horizontal_line(0.0));
        let b = engine.stroke_completed(&mut doc, loop_stroke(300.0, 300.0, 50.0));

        let outcome = engine.substitution_chosen(&mut doc, IconRef::new("icons/circle.png"));
        let Substitution::Replaced { placed, .. } = outcome else {
            panic!("expected a replacement, got {outcome:?}");
        };

        assert!(doc.undo());
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.elements()[0].id(), a);
        assert!(!doc.contains(b));
        assert!(!doc.contains(placed));

        assert!(doc.redo());
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.elements()[1].id(), placed);
        assert!(doc.elements()[1].as_icon().is_some());
        assert!(!doc.contains(b));
    }

    #[test]
    fn test_small_stroke_uses_min_size() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        let tiny = Stroke::new(vec![Point::new(10.0, 10.0), Point::new(15.0, 12.0)], 2.0, Rgba::black()).unwrap();
        engine.stroke_completed(&mut doc, tiny);
        engine.substitution_chosen(&mut doc, IconRef::new("icons/curve.png"));

        let icon = doc.elements()[0].as_icon().unwrap();
        assert!((icon.size - 40.0).abs() < f64::EPSILON);
        assert!((icon.x - (12.5 - 20.0)).abs() < f64::EPSILON);
        assert!((icon.y - (11.0 - 20.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scan_skips_later_icons() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        let s = engine.stroke_completed(&mut doc, horizontal_line(0.0));
        let icon = doc.append(Element::icon(IconPlacement::new(IconRef::new("x.png"), 0.0, 0.0, 40.0)));

        let outcome = engine.substitution_chosen(&mut doc, IconRef::new("icons/line.png"));
        assert!(matches!(outcome, Substitution::Replaced { removed, .. } if removed == s));
        assert_eq!(doc.elements()[0].id(), icon);
        assert!(!doc.elements()[1].is_stroke());
    }

    #[test]
    fn test_no_stroke_is_noop() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        engine.stroke_completed(&mut doc, horizontal_line(0.0));
        doc.undo();
        doc.append(Element::icon(IconPlacement::new(IconRef::new("x.png"), 0.0, 0.0, 40.0)));
        let before = doc.elements().to_vec();

        let outcome = engine.substitution_chosen(&mut doc, IconRef::new("icons/line.png"));
        assert_eq!(outcome, Substitution::NoStroke);
        assert_eq!(doc.elements(), &before[..]);
        assert_eq!(engine.state(), &EngineState::Idle);
    }

    #[test]
    fn test_choose_while_idle_is_noop() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        engine.stroke_completed(&mut doc, horizontal_line(0.0));
        engine.dismiss();

        let outcome = engine.substitution_chosen(&mut doc, IconRef::new("icons/line.png"));
        assert_eq!(outcome, Substitution::NotSuggesting);
        assert!(doc.elements()[0].is_stroke());
    }

    #[test]
    fn test_substitution_clears_redo() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        engine.stroke_completed(&mut doc, horizontal_line(0.0));
        doc.append(Element::icon(IconPlacement::new(IconRef::new("x.png"), 0.0, 0.0, 40.0)));
        doc.undo();
        assert!(doc.can_redo());

        engine.substitution_chosen(&mut doc, IconRef::new("icons/line.png"));
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_new_stroke_replaces_suggestions() {
        let mut doc = Document::new();
        let mut engine = SubstitutionEngine::default();
        engine.stroke_completed(&mut doc, horizontal_line(0.0));
        let second = engine.stroke_completed(&mut doc, loop_stroke(0.0, 0.0, 40.0));

        assert_eq!(engine.suggestions(), &[IconRef::new("icons/circle.png")]);
        assert!(matches!(engine.state(), EngineState::Suggesting { trigger, .. } if *trigger == second));
        assert_eq!(doc.len(), 2);
    }
}
