//! JSON-in / JSON-out entry points for host applications.

use serde::Deserialize;

use crate::config::MapperConfig;
use crate::error::Result;
use crate::input::DetectionBatch;
use crate::pipeline::{FieldMapper, Overrides};

/// Request accepted by [`map_detections_json`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRequest {
    pub detection_data: DetectionBatch,
    #[serde(default, rename = "lineOfScrimmageX")]
    pub line_of_scrimmage_x: Option<f64>,
    #[serde(default)]
    pub field_dims: Option<FieldDims>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldDims {
    #[serde(default)]
    pub pixels_per_yard: Option<f64>,
    #[serde(default)]
    pub field_center_y: Option<f64>,
}

impl MapRequest {
    fn overrides(&self) -> Overrides {
        let dims = self.field_dims.as_ref();
        Overrides {
            line_of_scrimmage_x: self.line_of_scrimmage_x,
            pixels_per_yard: dims.and_then(|d| d.pixels_per_yard),
            field_center_y: dims.and_then(|d| d.field_center_y),
        }
    }
}

/// Map a raw `{"predictions": [...]}` document with the environment config.
pub fn process_detections_json(batch_json: &str) -> Result<String> {
    let batch = DetectionBatch::from_json(batch_json)?;
    let play = FieldMapper::new(MapperConfig::from_env_or_default()).process(&batch)?;
    play.to_json()
}

/// Map a [`MapRequest`], honouring any caller-supplied line or scale.
pub fn map_detections_json(request_json: &str) -> Result<String> {
    let request: MapRequest = serde_json::from_str(request_json)?;
    let overrides = request.overrides();
    let play = FieldMapper::new(MapperConfig::from_env_or_default())
        .map_with_overrides(&request.detection_data, &overrides)?;
    play.to_json()
}
