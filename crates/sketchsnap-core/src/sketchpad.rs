//! The sketch controller: one owned object holding all session state.
//!
//! Hosts feed pointer samples and commands in, and read back the paint list,
//! the current suggestions and the SVG export.

use crate::classify::ShapeCategory;
use crate::config::SketchConfig;
use crate::document::Document;
use crate::elements::{ColorParseError, ElementId, Rgba};
use crate::icons::IconRef;
use crate::input::{PointerPhase, PointerSample, StrokeCapture, Tool};
use crate::paint::{self, DrawInstruction, PathInstruction};
use crate::selection::Selection;
use crate::style::DrawStyle;
use crate::substitution::{EngineState, Substitution, SubstitutionEngine};
use crate::svg;
use kurbo::Point;

/// File name prefix for exported drawings.
pub const EXPORT_PREFIX: &str = "sketchsnap-draw";

/// Export file name, e.g. `sketchsnap-draw-1700000000000.png`.
pub fn export_file_name(prefix: &str, ext: &str, millis: u128) -> String {
    format!("{prefix}-{millis}.{ext}")
}

/// What a pointer sample did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Nothing to do for this sample in the current state.
    Ignored,
    /// A gesture started or grew.
    Drawing,
    /// The gesture ended and was committed as this stroke.
    Committed(ElementId),
    /// The gesture was abandoned.
    Cancelled,
    /// Select tool press; holds the new selection.
    Selected(Option<ElementId>),
}

/// Sketch session state and the operations on it.
#[derive(Debug, Clone)]
pub struct Sketchpad {
    config: SketchConfig,
    document: Document,
    engine: SubstitutionEngine,
    selection: Selection,
    style: DrawStyle,
    capture: StrokeCapture,
    tool: Tool,
}

impl Default for Sketchpad {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}

impl Sketchpad {
    pub fn new(config: SketchConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("sketch config: {e}");
        }
        let engine = SubstitutionEngine::new(
            config.icons.clone(),
            config.classifier_params(),
            config.icon_sizing(),
        );
        Self {
            style: config.initial_style(),
            config,
            document: Document::new(),
            engine,
            selection: Selection::new(),
            capture: StrokeCapture::new(),
            tool: Tool::default(),
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. Any unfinished gesture is dropped, and leaving the
    /// select tool clears the selection.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        self.capture.cancel();
        if tool != Tool::Select {
            self.selection.clear();
        }
        log::debug!("tool changed to {tool:?}");
        self.tool = tool;
    }

    /// Feed one pointer sample.
    pub fn on_pointer_sample(&mut self, sample: PointerSample) -> SampleOutcome {
        log::trace!("pointer {:?} at {:?}", sample.phase, sample.position);
        match self.tool {
            Tool::Draw => self.draw_sample(sample),
            Tool::Select => match sample.phase {
                PointerPhase::Start => SampleOutcome::Selected(self.select_at(sample.position)),
                _ => SampleOutcome::Ignored,
            },
        }
    }

    fn draw_sample(&mut self, sample: PointerSample) -> SampleOutcome {
        match sample.phase {
            PointerPhase::Start => {
                self.capture.begin(sample.position, sample.t, &self.style);
                SampleOutcome::Drawing
            }
            PointerPhase::Move => {
                if self.capture.extend(sample.position, sample.t) {
                    SampleOutcome::Drawing
                } else {
                    SampleOutcome::Ignored
                }
            }
            PointerPhase::End => match self.capture.finish() {
                Some(stroke) => {
                    let id = self.engine.stroke_completed(&mut self.document, stroke);
                    self.after_edit();
                    SampleOutcome::Committed(id)
                }
                None => SampleOutcome::Ignored,
            },
            PointerPhase::Cancel => {
                if self.capture.cancel() {
                    log::debug!("gesture cancelled");
                    SampleOutcome::Cancelled
                } else {
                    SampleOutcome::Ignored
                }
            }
        }
    }

    /// Change the width for new strokes by `delta`, clamped. Returns the new width.
    pub fn set_stroke_width(&mut self, delta: f64) -> f64 {
        self.style.adjust_width(delta)
    }

    pub fn thicker(&mut self) -> f64 {
        self.set_stroke_width(self.config.width_step)
    }

    pub fn thinner(&mut self) -> f64 {
        self.set_stroke_width(-self.config.width_step)
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.style.set_color(color);
    }

    /// Set the color from `#rgb`, `#rrggbb` or `#rrggbbaa`. The current color
    /// is kept when parsing fails.
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ColorParseError> {
        let color = Rgba::from_hex(hex)?;
        self.set_color(color);
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.document.undo();
        if changed {
            self.after_edit();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.document.redo();
        if changed {
            self.after_edit();
        }
        changed
    }

    /// Empty the document and its history.
    pub fn clear(&mut self) {
        self.document.clear();
        self.engine.dismiss();
        self.selection.clear();
        log::info!("document cleared");
    }

    /// Select the topmost icon at `point`.
    pub fn select_at(&mut self, point: Point) -> Option<ElementId> {
        self.selection.select_at(&self.document, point)
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selection.get()
    }

    /// Delete the selected element so that undo brings it back.
    pub fn delete_selected_undoable(&mut self) -> bool {
        let Some(id) = self.selection.get() else {
            return false;
        };
        let deleted = self.document.delete_undoable(id);
        self.after_edit();
        deleted
    }

    /// Delete the selected element for good.
    pub fn delete_selected_permanent(&mut self) -> bool {
        let Some(id) = self.selection.get() else {
            return false;
        };
        let deleted = self.document.remove(id).is_some();
        self.after_edit();
        deleted
    }

    pub fn suggestions(&self) -> &[IconRef] {
        self.engine.suggestions()
    }

    pub fn detected_shape(&self) -> Option<ShapeCategory> {
        self.engine.detected()
    }

    /// Replace the most recent stroke with `icon`.
    pub fn choose_suggestion(&mut self, icon: IconRef) -> Substitution {
        let outcome = self.engine.substitution_chosen(&mut self.document, icon);
        self.after_edit();
        outcome
    }

    /// Choose the suggestion at `index`. `None` if there is no such entry.
    pub fn choose_suggestion_index(&mut self, index: usize) -> Option<Substitution> {
        let icon = self.suggestions().get(index)?.clone();
        Some(self.choose_suggestion(icon))
    }

    pub fn dismiss_suggestions(&mut self) {
        self.engine.dismiss();
    }

    /// Paint list for the committed document.
    pub fn paint_list(&self) -> Vec<DrawInstruction> {
        paint::project(self.document.elements())
    }

    /// Paint list with the gesture in progress drawn on top.
    pub fn preview(&self) -> Vec<DrawInstruction> {
        let mut list = self.paint_list();
        if let Some((points, width, color)) = self.capture.in_progress() {
            list.push(DrawInstruction::Path(PathInstruction {
                points: points.to_vec(),
                width,
                color,
            }));
        }
        list
    }

    /// SVG document for the current state, sized to the canvas.
    pub fn export_vector(&self) -> String {
        let svg = svg::export_svg(&self.paint_list(), self.config.canvas_size());
        log::info!(
            "exported {} element(s) as SVG ({} bytes)",
            self.document.len(),
            svg.len()
        );
        svg
    }

    /// Keep selection and suggestions pointing at live elements.
    fn after_edit(&mut self) {
        self.selection.revalidate(&self.document);
        let stale = matches!(
            self.engine.state(),
            EngineState::Suggesting { trigger, .. } if !self.document.contains(*trigger)
        );
        if stale {
            self.engine.dismiss();
        }
    }
}
