//! Line of scrimmage estimation
//!
//! Balance-seeking: picks the image-x split that leaves the most even player
//! counts on either side. It assumes offense and defense are numerically close
//! and does not look at the field itself.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{median, sorted_xs};
use crate::config::ScrimmageThresholds;
use crate::error::{MapError, Result};
use crate::input::Detection;
use crate::taxonomy::is_player;

/// Pixel x of the line of scrimmage. Always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ScrimmageLine(f64);

impl ScrimmageLine {
    pub fn new(pixel_x: f64) -> Result<Self> {
        if pixel_x.is_finite() {
            Ok(Self(pixel_x))
        } else {
            Err(MapError::InvalidInput(format!(
                "line of scrimmage must be finite, got {pixel_x}"
            )))
        }
    }

    pub fn pixel_x(&self) -> f64 {
        self.0
    }
}

/// |left - right| where left counts x strictly below the line.
fn imbalance(xs: &[f64], line: f64) -> usize {
    let left = xs.iter().filter(|&&x| x < line).count();
    let right = xs.len() - left;
    left.abs_diff(right)
}

/// Estimate the line of scrimmage from player detections.
///
/// Non-player labels are ignored. Returns `None` when fewer than
/// `min_players` classifiable players remain.
pub fn estimate_line_of_scrimmage(
    detections: &[Detection],
    thresholds: &ScrimmageThresholds,
) -> Option<ScrimmageLine> {
    let xs: Vec<f64> = detections
        .iter()
        .filter(|d| is_player(&d.position_label))
        .map(|d| d.center_x)
        .collect();
    if xs.len() < thresholds.min_players {
        debug!(players = xs.len(), required = thresholds.min_players, "line of scrimmage unresolved");
        return None;
    }

    let sorted = sorted_xs(&xs);
    let mut best_line: Option<f64> = None;
    let mut best_score = usize::MAX;

    for pair in sorted.windows(2) {
        let candidate = (pair[0] + pair[1]) / 2.0;
        let score = imbalance(&xs, candidate);
        if score < best_score {
            best_score = score;
            best_line = Some(candidate);
        }
    }

    if best_line.is_none() || best_score > thresholds.max_imbalance {
        let median_x = median(&xs);
        debug!(best_score, median_x, "probing around median");
        for offset in &thresholds.median_probe_offsets_px {
            let candidate = median_x + offset;
            let score = imbalance(&xs, candidate);
            if score < best_score {
                best_score = score;
                best_line = Some(candidate);
            }
        }
    }

    let line = best_line.unwrap_or_else(|| {
        let rank = xs.len() / 2;
        sorted.get(rank).copied().unwrap_or_else(|| median(&xs))
    });

    debug!(line, imbalance = best_score, "estimated line of scrimmage");
    Some(ScrimmageLine(line))
}
