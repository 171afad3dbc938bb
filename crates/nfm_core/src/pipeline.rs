//! Detection batch → mapped play
//!
//! [`FieldMapper::process`] runs the full estimation chain;
//! [`FieldMapper::map_with_overrides`] lets a caller pin the line of
//! scrimmage and/or the scale. Both return a [`MappedPlay`], the one payload
//! shape handed to renderers and play storage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MapperConfig;
use crate::coverage::{classify_coverage, CoverageReport};
use crate::error::{MapError, Result};
use crate::geometry::scale::from_override;
use crate::geometry::{
    compute_field_scale, estimate_line_of_scrimmage, project, FieldScale, MappedOfficial,
    MappedPlayer, ScrimmageLine, TeamStats,
};
use crate::input::{filter_overlapping, Detection, DetectionBatch};
use crate::taxonomy::{is_defensive_back, is_player};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateSystem {
    pub x_axis: String,
    pub y_axis: String,
    pub units: String,
}

impl CoordinateSystem {
    fn for_field_width(width_yards: f64) -> Self {
        Self {
            x_axis: "Line of scrimmage at x=0, offensive direction is positive".to_string(),
            y_axis: format!("Field center at y=0, sidelines at ±{} yards", width_yards / 2.0),
            units: "yards".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDimensions {
    pub width_yards: f64,
    pub length_yards: f64,
    pub pixels_per_yard: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayMetadata {
    pub coordinate_system: CoordinateSystem,
    pub field_dimensions: FieldDimensions,
    pub line_of_scrimmage_pixel: f64,
    pub field_center_y_pixel: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappedPlay {
    pub metadata: PlayMetadata,
    pub field_scale: FieldScale,
    pub players: Vec<MappedPlayer>,
    pub officials: Vec<MappedOfficial>,
    pub team_stats: TeamStats,
    /// Absent when the play has no defensive backs to read
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub coverage: Option<CoverageReport>,
}

impl MappedPlay {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Caller-supplied values that bypass estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct Overrides {
    #[serde(default, rename = "lineOfScrimmageX")]
    pub line_of_scrimmage_x: Option<f64>,
    #[serde(default)]
    pub pixels_per_yard: Option<f64>,
    #[serde(default)]
    pub field_center_y: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    config: MapperConfig,
}

impl FieldMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Validate, estimate, project and classify one batch. Near-duplicate
    /// detections are dropped first only when the input thresholds enable it.
    pub fn process(&self, batch: &DetectionBatch) -> Result<MappedPlay> {
        self.map_with_overrides(batch, &Overrides::default())
    }

    pub fn map_with_overrides(
        &self,
        batch: &DetectionBatch,
        overrides: &Overrides,
    ) -> Result<MappedPlay> {
        batch.validate()?;
        let detections = if self.config.input.dedup_enabled() {
            filter_overlapping(&batch.predictions, self.config.input.overlap_threshold_px)
        } else {
            batch.predictions.clone()
        };

        let line = match overrides.line_of_scrimmage_x {
            Some(x) => ScrimmageLine::new(x)?,
            None => self.estimate_line(&detections)?,
        };

        let scale = match overrides.pixels_per_yard {
            Some(ppy) => from_override(&detections, ppy, overrides.field_center_y, &self.config.scale)?,
            None => {
                let mut scale = compute_field_scale(&detections, Some(line), &self.config.scale)?;
                if let Some(center_y) = overrides.field_center_y {
                    scale = from_override(&detections, scale.pixels_per_yard, Some(center_y), &self.config.scale)?;
                }
                scale
            }
        };

        Ok(self.assemble(&detections, line, scale))
    }

    fn estimate_line(&self, detections: &[Detection]) -> Result<ScrimmageLine> {
        estimate_line_of_scrimmage(detections, &self.config.scrimmage).ok_or_else(|| {
            MapError::InsufficientData {
                found: detections.iter().filter(|d| is_player(&d.position_label)).count(),
                required: self.config.scrimmage.min_players,
            }
        })
    }

    fn assemble(&self, detections: &[Detection], line: ScrimmageLine, scale: FieldScale) -> MappedPlay {
        let projection = project(detections, line, &scale, &self.config.projection);

        let has_defensive_backs = projection
            .players
            .iter()
            .any(|p| is_defensive_back(&p.position));
        let coverage = has_defensive_backs
            .then(|| classify_coverage(&projection.players, &self.config.coverage));

        info!(
            players = projection.team_stats.total_players,
            officials = projection.team_stats.official_count,
            line_px = line.pixel_x(),
            pixels_per_yard = scale.pixels_per_yard,
            method = ?scale.method,
            coverage = coverage.as_ref().map(|c| c.coverage_call.label()).unwrap_or("n/a"),
            "mapped detection batch"
        );

        MappedPlay {
            metadata: PlayMetadata {
                coordinate_system: CoordinateSystem::for_field_width(scale.field_width_yards),
                field_dimensions: FieldDimensions {
                    width_yards: scale.field_width_yards,
                    length_yards: scale.length_yards,
                    pixels_per_yard: scale.pixels_per_yard,
                },
                line_of_scrimmage_pixel: line.pixel_x(),
                field_center_y_pixel: scale.field_center_y,
            },
            field_scale: scale,
            players: projection.players,
            officials: projection.officials,
            team_stats: projection.team_stats,
            coverage,
        }
    }
}
