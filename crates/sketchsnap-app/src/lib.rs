//! SketchSnap application shell.
//!
//! Replays recorded sketch sessions through the controller and writes the
//! SVG and PNG exports.

pub mod app;
pub mod script;

pub use app::{AppConfig, AppError, CliOptions, Command, RunOutput, run};
pub use script::{ScriptEvent, SessionScript};
