//! Pixels-per-yard estimation
//!
//! Two methods, tried in order:
//! 1. **Backfield depth**: the x spread of the offense is assumed to cover
//!    3-5 yards (`depth_px / 40`, clamped).
//! 2. **Detection spread**: the x spread of every detection is assumed to
//!    cover 25-40 yards (`spread_px / 20`, clamped). If the x spread is zero
//!    the y spread is used instead.
//!
//! A scale that is not strictly positive never leaves this module; it is
//! reported as [`MapError::DegenerateGeometry`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::projection::{assign_team, Team};
use super::scrimmage::ScrimmageLine;
use super::{bounds, mean};
use crate::config::ScaleThresholds;
use crate::error::{MapError, Result};
use crate::input::Detection;
use crate::taxonomy::is_player;

const MIN_PIXELS_PER_YARD: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ScaleMethod {
    BackfieldDepth,
    DetectionSpread,
    Override,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldScale {
    pub pixels_per_yard: f64,
    pub field_center_y: f64,
    pub field_width_yards: f64,
    /// Sideline rows implied by the field width at this scale
    pub y_min: f64,
    pub y_max: f64,
    pub length_yards: f64,
    /// Field width in pixels at this scale
    pub width_pixels: f64,
    /// Vertical spread of the detections
    pub length_pixels: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub method: ScaleMethod,
}

struct Extent {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Extent {
    fn of(detections: &[Detection]) -> Result<Self> {
        if detections.is_empty() {
            return Err(MapError::DegenerateGeometry {
                x_spread_px: 0.0,
                y_spread_px: 0.0,
            });
        }
        let xs: Vec<f64> = detections.iter().map(|d| d.center_x).collect();
        let ys: Vec<f64> = detections.iter().map(|d| d.center_y).collect();
        let (x_min, x_max) = bounds(&xs);
        let (y_min, y_max) = bounds(&ys);
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    fn x_spread(&self) -> f64 {
        self.x_max - self.x_min
    }

    fn y_spread(&self) -> f64 {
        self.y_max - self.y_min
    }

    fn center_y(&self) -> f64 {
        (self.y_min + self.y_max) / 2.0
    }

    fn degenerate(&self) -> MapError {
        MapError::DegenerateGeometry {
            x_spread_px: self.x_spread(),
            y_spread_px: self.y_spread(),
        }
    }

    fn into_scale(
        self,
        pixels_per_yard: f64,
        field_center_y: f64,
        thresholds: &ScaleThresholds,
        method: ScaleMethod,
    ) -> FieldScale {
        let width_pixels = thresholds.field_width_yards * pixels_per_yard;
        FieldScale {
            pixels_per_yard,
            field_center_y,
            field_width_yards: thresholds.field_width_yards,
            y_min: field_center_y - width_pixels / 2.0,
            y_max: field_center_y + width_pixels / 2.0,
            length_yards: self.y_spread() / pixels_per_yard,
            width_pixels,
            length_pixels: self.y_spread(),
            x_min: self.x_min,
            x_max: self.x_max,
            method,
        }
    }
}

fn is_usable(pixels_per_yard: f64) -> bool {
    pixels_per_yard.is_finite() && pixels_per_yard > MIN_PIXELS_PER_YARD
}

/// Scale from the spread of the offensive formation.
fn backfield_scale(
    detections: &[Detection],
    line: ScrimmageLine,
    thresholds: &ScaleThresholds,
) -> Option<f64> {
    let offense_xs: Vec<f64> = detections
        .iter()
        .filter(|d| is_player(&d.position_label))
        .filter(|d| assign_team(&d.position_label, d.center_x, line) == Team::Offense)
        .map(|d| d.center_x)
        .collect();
    if offense_xs.len() < thresholds.min_offense_players {
        return None;
    }

    let (min_x, max_x) = bounds(&offense_xs);
    let (closest, farthest) = if line.pixel_x() > mean(&offense_xs) {
        (max_x, min_x)
    } else {
        (min_x, max_x)
    };
    let depth_px = (farthest - closest).abs();
    let assumed_yards = (depth_px / thresholds.backfield_depth_divisor_px)
        .max(thresholds.min_backfield_depth_yards)
        .min(thresholds.max_backfield_depth_yards);

    let ppy = depth_px / assumed_yards;
    debug!(depth_px, assumed_yards, ppy, "backfield depth scale");
    is_usable(ppy).then_some(ppy)
}

/// Scale from the assumption that `spread_px` covers 25-40 yards.
fn spread_scale(spread_px: f64, thresholds: &ScaleThresholds) -> Option<f64> {
    let assumed_yards = (spread_px / thresholds.spread_divisor_px)
        .max(thresholds.min_spread_yards)
        .min(thresholds.max_spread_yards);
    let ppy = spread_px / assumed_yards;
    is_usable(ppy).then_some(ppy)
}

/// Derive the field scale for one batch.
///
/// `line` is optional: without it only the detection-spread method applies.
pub fn compute_field_scale(
    detections: &[Detection],
    line: Option<ScrimmageLine>,
    thresholds: &ScaleThresholds,
) -> Result<FieldScale> {
    let extent = Extent::of(detections)?;

    let backfield = line.and_then(|l| backfield_scale(detections, l, thresholds));
    let (ppy, method) = match backfield {
        Some(ppy) => (ppy, ScaleMethod::BackfieldDepth),
        None => {
            let ppy = spread_scale(extent.x_spread(), thresholds)
                .or_else(|| spread_scale(extent.y_spread(), thresholds))
                .ok_or_else(|| extent.degenerate())?;
            (ppy, ScaleMethod::DetectionSpread)
        }
    };

    let center_y = extent.center_y();
    Ok(extent.into_scale(ppy, center_y, thresholds, method))
}

/// Build a scale from caller-supplied values. The field center defaults to
/// the midpoint of the detections' y range.
pub fn from_override(
    detections: &[Detection],
    pixels_per_yard: f64,
    field_center_y: Option<f64>,
    thresholds: &ScaleThresholds,
) -> Result<FieldScale> {
    let extent = Extent::of(detections)?;
    if !is_usable(pixels_per_yard) {
        return Err(extent.degenerate());
    }
    let center_y = match field_center_y {
        Some(y) if y.is_finite() => y,
        Some(y) => {
            return Err(MapError::InvalidInput(format!(
                "field center y must be finite, got {y}"
            )))
        }
        None => extent.center_y(),
    };
    Ok(extent.into_scale(pixels_per_yard, center_y, thresholds, ScaleMethod::Override))
}
