//! Greedy receiver → defensive back matching.
//!
//! Receivers pick in input order and a matched defender leaves the pool, so an
//! earlier receiver can take the defender a later one would have preferred.
//! The result depends on input order and is not an optimal assignment.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CoverageThresholds;
use crate::geometry::{round_to, MappedPlayer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManMatch {
    pub receiver_id: String,
    pub receiver_position: String,
    pub defender_id: String,
    pub defender_position: String,
    pub distance_yards: f64,
}

pub(crate) struct MatchOutcome<'a> {
    pub matches: Vec<ManMatch>,
    pub unmatched: Vec<&'a MappedPlayer>,
}

pub(crate) fn distance_yards(a: &MappedPlayer, b: &MappedPlayer) -> f64 {
    let dx = a.coordinates.x_yards - b.coordinates.x_yards;
    let dy = a.coordinates.y_yards - b.coordinates.y_yards;
    (dx * dx + dy * dy).sqrt()
}

/// Match each receiver to the nearest aligned, shallow defensive back still
/// in the pool. Defenders never matched are returned in input order.
pub(crate) fn match_receivers<'a>(
    receivers: &[&MappedPlayer],
    defensive_backs: &[&'a MappedPlayer],
    thresholds: &CoverageThresholds,
) -> MatchOutcome<'a> {
    let mut used = vec![false; defensive_backs.len()];
    let mut matches = Vec::new();

    for receiver in receivers {
        let mut best: Option<(usize, f64)> = None;
        for (idx, db) in defensive_backs.iter().enumerate() {
            if used[idx] {
                continue;
            }
            let aligned = (db.coordinates.y_yards - receiver.coordinates.y_yards).abs()
                <= thresholds.alignment_yards;
            let shallow = db.coordinates.x_yards.abs() <= thresholds.zone_depth_yards;
            if !(aligned && shallow) {
                continue;
            }
            let distance = distance_yards(db, receiver);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((idx, distance));
            }
        }

        if let Some((idx, distance)) = best {
            used[idx] = true;
            let db = defensive_backs[idx];
            debug!(
                receiver = %receiver.position,
                rx = receiver.coordinates.x_yards,
                ry = receiver.coordinates.y_yards,
                defender = %db.position,
                dx = db.coordinates.x_yards,
                dy = db.coordinates.y_yards,
                distance,
                "man match"
            );
            matches.push(ManMatch {
                receiver_id: receiver.detection_id.clone(),
                receiver_position: receiver.position.clone(),
                defender_id: db.detection_id.clone(),
                defender_position: db.position.clone(),
                distance_yards: round_to(distance, 2),
            });
        }
    }

    let unmatched = defensive_backs
        .iter()
        .zip(used)
        .filter(|(_, u)| !u)
        .map(|(db, _)| *db)
        .collect();

    MatchOutcome { matches, unmatched }
}
