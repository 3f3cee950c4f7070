//! Pointer samples and in-progress stroke capture.

use crate::elements::{Rgba, Stroke};
use crate::style::DrawStyle;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Start,
    Move,
    End,
    /// Pointer left the surface; the gesture is abandoned.
    Cancel,
}

/// One pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub position: Point,
    /// Host timestamp in milliseconds, if available.
    #[serde(default)]
    pub t: Option<f64>,
    pub phase: PointerPhase,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, phase: PointerPhase) -> Self {
        Self {
            position: Point::new(x, y),
            t: None,
            phase,
        }
    }

    pub fn at_time(mut self, t: f64) -> Self {
        self.t = Some(t);
        self
    }
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Draw,
    Select,
}

/// A gesture being drawn.
#[derive(Debug, Clone)]
struct ActiveStroke {
    points: Vec<Point>,
    times: Vec<f64>,
    /// False once any sample arrives without a timestamp.
    timed: bool,
    width: f64,
    color: Rgba,
}

impl ActiveStroke {
    fn push(&mut self, position: Point, t: Option<f64>) {
        self.points.push(position);
        match t {
            Some(t) if self.timed => self.times.push(t),
            _ => self.timed = false,
        }
    }
}

/// Accumulates pointer samples into a stroke.
///
/// Width and color are taken from the style when the gesture starts.
#[derive(Debug, Clone, Default)]
pub struct StrokeCapture {
    active: Option<ActiveStroke>,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a new gesture, discarding any unfinished one.
    pub fn begin(&mut self, position: Point, t: Option<f64>, style: &DrawStyle) {
        let mut active = ActiveStroke {
            points: Vec::new(),
            times: Vec::new(),
            timed: true,
            width: style.width(),
            color: style.color(),
        };
        active.push(position, t);
        self.active = Some(active);
    }

    /// Append a sample. Ignored when no gesture is active.
    pub fn extend(&mut self, position: Point, t: Option<f64>) -> bool {
        match &mut self.active {
            Some(active) => {
                active.push(position, t);
                true
            }
            None => false,
        }
    }

    /// End the gesture and hand back the finished stroke.
    pub fn finish(&mut self) -> Option<Stroke> {
        let active = self.active.take()?;
        let stroke = Stroke::new(active.points, active.width, active.color).ok()?;
        Some(if active.timed {
            stroke.with_timestamps(active.times)
        } else {
            stroke
        })
    }

    /// Abandon the gesture. Returns true if one was in progress.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Points, width and color of the gesture so far.
    pub fn in_progress(&self) -> Option<(&[Point], f64, Rgba)> {
        self.active
            .as_ref()
            .map(|active| (active.points.as_slice(), active.width, active.color))
    }
}
