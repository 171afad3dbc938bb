//! Pixel → yard geometry
//!
//! ## Coordinate System
//!
//! **Pixel coordinates** (detector output):
//! - x: image column, the axis the play runs along
//! - y: image row, sideline to sideline
//!
//! **Field coordinates** (mapped output, yards):
//! - x: 0 = line of scrimmage, offensive direction positive
//! - y: 0 = field center, sidelines at ±26.65
//!
//! Scale comes from [`scale::compute_field_scale`], the origin from
//! [`scrimmage::estimate_line_of_scrimmage`].

pub mod projection;
pub mod scale;
pub mod scrimmage;

pub use projection::{
    assign_team, project, BoundingBoxYards, FieldCoordinates, MappedOfficial, MappedPlayer,
    Projection, Team, TeamStats,
};
pub use scale::{compute_field_scale, FieldScale, ScaleMethod};
pub use scrimmage::{estimate_line_of_scrimmage, ScrimmageLine};

pub(crate) fn sorted_xs(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Median of an unsorted slice. Callers guarantee non-empty input.
pub(crate) fn median(values: &[f64]) -> f64 {
    let sorted = sorted_xs(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 != 0 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// (min, max) of a non-empty slice.
pub(crate) fn bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
