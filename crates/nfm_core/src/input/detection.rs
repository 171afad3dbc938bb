//! Detector payload types and boundary validation.
//!
//! Field names on the wire follow the upstream detector (`x`, `y`, `class`,
//! `detection_id`); the Rust names say what the values are.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{MapError, Result};

/// One bounding box in image-pixel space. Centers, not corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct Detection {
    #[serde(rename = "detection_id", default)]
    pub id: String,
    #[serde(rename = "class")]
    #[validate(length(min = 1, message = "class is required"))]
    pub position_label: String,
    #[serde(rename = "x")]
    pub center_x: f64,
    #[serde(rename = "y")]
    pub center_y: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "width must be non-negative"))]
    pub width: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "height must be non-negative"))]
    pub height: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0, message = "confidence must be between 0 and 1"))]
    pub confidence: f64,
}

impl Detection {
    pub fn new(id: impl Into<String>, label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position_label: label.into(),
            center_x: x,
            center_y: y,
            width: 0.0,
            height: 0.0,
            confidence: 1.0,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("x", self.center_x),
            ("y", self.center_y),
            ("width", self.width),
            ("height", self.height),
            ("confidence", self.confidence),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// The upstream detector response: an ordered list of predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct DetectionBatch {
    pub predictions: Vec<Detection>,
}

impl DetectionBatch {
    pub fn new(predictions: Vec<Detection>) -> Self {
        Self { predictions }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Boundary validation. Anything that passes has finite numeric fields,
    /// a non-empty label and a confidence in [0, 1].
    pub fn validate(&self) -> Result<()> {
        if self.predictions.is_empty() {
            return Err(MapError::InvalidInput(
                "detection data must contain at least one prediction".to_string(),
            ));
        }
        for (idx, detection) in self.predictions.iter().enumerate() {
            if let Some(field) = detection.non_finite_field() {
                return Err(MapError::InvalidInput(format!(
                    "predictions[{idx}].{field} must be a finite number"
                )));
            }
            Validate::validate(detection)
                .map_err(|e| MapError::InvalidInput(format!("predictions[{idx}]: {e}")))?;
        }
        Ok(())
    }
}
