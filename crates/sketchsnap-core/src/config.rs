//! Tunable settings for a sketch session.

use crate::classify::ClassifierParams;
use crate::elements::Rgba;
use crate::icons::IconLibrary;
use crate::style::{DrawStyle, WidthRange};
use crate::substitution::IconSizing;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value outside what a session can work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("min_width {min} is greater than max_width {max}")]
    WidthRange { min: f64, max: f64 },
}

/// Session settings. Every field has a default, so a partial JSON object is
/// a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub min_width: f64,
    pub max_width: f64,
    /// Width change per thicker/thinner step.
    pub width_step: f64,
    pub default_width: f64,
    pub default_color: Rgba,
    pub close_threshold_px: f64,
    pub close_min_points: usize,
    pub icon_min_size: f64,
    pub icon_scale: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub background: Rgba,
    pub icons: IconLibrary,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            min_width: 2.0,
            max_width: 14.0,
            width_step: 2.0,
            default_width: 4.0,
            default_color: Rgba::black(),
            close_threshold_px: 20.0,
            close_min_points: 10,
            icon_min_size: 40.0,
            icon_scale: 1.3,
            canvas_width: 800.0,
            canvas_height: 600.0,
            background: Rgba::white(),
            icons: IconLibrary::default(),
        }
    }
}

impl SketchConfig {
    pub fn width_range(&self) -> WidthRange {
        WidthRange::new(self.min_width, self.max_width)
    }

    pub fn initial_style(&self) -> DrawStyle {
        DrawStyle::new(self.default_width, self.default_color, self.width_range())
    }

    pub fn classifier_params(&self) -> ClassifierParams {
        ClassifierParams {
            close_threshold_px: self.close_threshold_px,
            close_min_points: self.close_min_points,
        }
    }

    pub fn icon_sizing(&self) -> IconSizing {
        IconSizing {
            min_size: self.icon_min_size,
            scale: self.icon_scale,
        }
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the values a session relies on. Loading a config file goes
    /// through this; building a session from an unchecked config still works,
    /// with the width range taken in order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_width", self.min_width),
            ("max_width", self.max_width),
            ("width_step", self.width_step),
            ("default_width", self.default_width),
            ("close_threshold_px", self.close_threshold_px),
            ("icon_min_size", self.icon_min_size),
            ("icon_scale", self.icon_scale),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.min_width > self.max_width {
            return Err(ConfigError::WidthRange {
                min: self.min_width,
                max: self.max_width,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_components() {
        let config = SketchConfig::default();
        assert_eq!(config.classifier_params(), ClassifierParams::default());
        assert_eq!(config.icon_sizing(), IconSizing::default());
        assert_eq!(config.width_range(), WidthRange::default());
        assert_eq!(config.initial_style(), DrawStyle::default());
    }

    #[test]
    fn test_partial_json() {
        let config = SketchConfig::from_json(r#"{"max_width": 20.0, "canvas_width": 1024.0}"#).unwrap();
        assert!((config.max_width - 20.0).abs() < f64::EPSILON);
        assert!((config.canvas_size().width - 1024.0).abs() < f64::EPSILON);
        assert_eq!(config.close_min_points, 10);
        assert_eq!(config.icons, IconLibrary::default());
    }

    #[test]
    fn test_validate() {
        assert_eq!(SketchConfig::default().validate(), Ok(()));

        let reversed = SketchConfig::from_json(r#"{"min_width": 20.0}"#).unwrap();
        assert_eq!(
            reversed.validate(),
            Err(ConfigError::WidthRange { min: 20.0, max: 14.0 })
        );
        assert_eq!(reversed.width_range(), WidthRange { min: 14.0, max: 20.0 });

        let zero = SketchConfig::from_json(r#"{"icon_scale": 0.0}"#).unwrap();
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::NotPositive { field: "icon_scale", .. })
        ));
    }
}
