//! Session scripts: a recorded sequence of input events and commands.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use sketchsnap_core::icons::IconRef;
use sketchsnap_core::input::{PointerPhase, PointerSample, Tool};
use sketchsnap_core::sketchpad::Sketchpad;

/// One scripted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// A raw pointer sample.
    Pointer {
        x: f64,
        y: f64,
        phase: PointerPhase,
        #[serde(default)]
        t: Option<f64>,
    },
    /// A whole gesture: start at the first point, move through the rest, end.
    Stroke { points: Vec<(f64, f64)> },
    /// Pick the suggestion at `index`.
    Choose { index: usize },
    /// Replace the latest stroke with a named icon.
    ChooseIcon { icon: IconRef },
    Dismiss,
    Undo,
    Redo,
    Clear,
    Thicker,
    Thinner,
    Width { delta: f64 },
    Color { hex: String },
    Tool { tool: Tool },
    Select { x: f64, y: f64 },
    Delete {
        #[serde(default)]
        permanent: bool,
    },
}

/// A recorded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    pub events: Vec<ScriptEvent>,
}

impl SessionScript {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replay every event against `pad`.
    pub fn replay(&self, pad: &mut Sketchpad) {
        for event in &self.events {
            apply(pad, event);
        }
        log::info!(
            "replayed {} event(s), document holds {} element(s)",
            self.events.len(),
            pad.document().len()
        );
    }
}

/// Apply one event. Commands that do not apply in the current state are
/// skipped, as they would be in the interactive tool.
pub fn apply(pad: &mut Sketchpad, event: &ScriptEvent) {
    match event {
        ScriptEvent::Pointer { x, y, phase, t } => {
            let mut sample = PointerSample::new(*x, *y, *phase);
            sample.t = *t;
            pad.on_pointer_sample(sample);
        }
        ScriptEvent::Stroke { points } => {
            let Some((&(x, y), rest)) = points.split_first() else {
                log::warn!("skipping stroke with no points");
                return;
            };
            pad.on_pointer_sample(PointerSample::new(x, y, PointerPhase::Start));
            for &(x, y) in rest {
                pad.on_pointer_sample(PointerSample::new(x, y, PointerPhase::Move));
            }
            let (x, y) = points.last().copied().unwrap_or((x, y));
            pad.on_pointer_sample(PointerSample::new(x, y, PointerPhase::End));
        }
        ScriptEvent::Choose { index } => {
            if pad.choose_suggestion_index(*index).is_none() {
                log::warn!("no suggestion at index {index}");
            }
        }
        ScriptEvent::ChooseIcon { icon } => {
            pad.choose_suggestion(icon.clone());
        }
        ScriptEvent::Dismiss => pad.dismiss_suggestions(),
        ScriptEvent::Undo => {
            pad.undo();
        }
        ScriptEvent::Redo => {
            pad.redo();
        }
        ScriptEvent::Clear => pad.clear(),
        ScriptEvent::Thicker => {
            pad.thicker();
        }
        ScriptEvent::Thinner => {
            pad.thinner();
        }
        ScriptEvent::Width { delta } => {
            pad.set_stroke_width(*delta);
        }
        ScriptEvent::Color { hex } => {
            if let Err(e) = pad.set_color_hex(hex) {
                log::warn!("ignoring color: {e}");
            }
        }
        ScriptEvent::Tool { tool } => pad.set_tool(*tool),
        ScriptEvent::Select { x, y } => {
            pad.select_at(Point::new(*x, *y));
        }
        ScriptEvent::Delete { permanent } => {
            if *permanent {
                pad.delete_selected_permanent();
            } else {
                pad.delete_selected_undoable();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let json = r##"{
            "events": [
                {"op": "color", "hex": "#ff0000"},
                {"op": "pointer", "x": 1.0, "y": 2.0, "phase": "start"},
                {"op": "pointer", "x": 3.0, "y": 4.0, "phase": "move", "t": 16.0},
                {"op": "pointer", "x": 3.0, "y": 4.0, "phase": "end"},
                {"op": "stroke", "points": [[0, 0], [10, 10]]},
                {"op": "tool", "tool": "select"},
                {"op": "delete"},
                {"op": "undo"}
            ]
        }"##;
        let script = SessionScript::from_json(json).unwrap();
        assert_eq!(script.events.len(), 8);
        assert_eq!(script.events[6], ScriptEvent::Delete { permanent: false });
    }

    #[test]
    fn test_replay() {
        let script = SessionScript {
            events: vec![
                ScriptEvent::Color { hex: "#00ff00".into() },
                ScriptEvent::Thicker,
                ScriptEvent::Stroke {
                    points: vec![(0.0, 0.0), (100.0, 10.0)],
                },
                ScriptEvent::Stroke {
                    points: vec![(0.0, 50.0), (100.0, 60.0)],
                },
                ScriptEvent::Undo,
            ],
        };
        let mut pad = Sketchpad::default();
        script.replay(&mut pad);

        assert_eq!(pad.document().len(), 1);
        let stroke = pad.document().elements()[0].as_stroke().unwrap();
        assert!((stroke.width() - 6.0).abs() < f64::EPSILON);
        assert_eq!(stroke.color().g, 255);
        assert!(pad.document().can_redo());
    }

    #[test]
    fn test_bad_commands_are_skipped() {
        let mut pad = Sketchpad::default();
        apply(&mut pad, &ScriptEvent::Color { hex: "green".into() });
        apply(&mut pad, &ScriptEvent::Choose { index: 3 });
        apply(&mut pad, &ScriptEvent::Stroke { points: Vec::new() });
        apply(&mut pad, &ScriptEvent::Delete { permanent: true });
        assert!(pad.document().is_empty());
    }
}
