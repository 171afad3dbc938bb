//! # Defensive coverage classification
//!
//! Infers a coverage call from projected players:
//! 1. receivers (offense `WR`/`TE`) claim aligned shallow defensive backs
//!    greedily, each claim is a man signal
//! 2. unclaimed defensive backs within the zone depth are zone signals, the
//!    rest are deep safeties
//! 3. the deep-safety count and man/zone balance pick the call
//!
//! | Deep safeties | man ≥ zone | otherwise |
//! |---------------|------------|-----------|
//! | 0 | Cover 0 Man | Cover 0 Man |
//! | 1 | Cover 1 (Man Free) | Cover 3 Zone |
//! | 2 | Cover 2 Man | Cover 2 Zone (zone ≤ 2) / Cover 4 Zone |
//! | 3 | Cover 3 Man | Cover 4 Zone |
//! | 4+ | Prevent | Prevent |

mod matching;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::CoverageThresholds;
use crate::geometry::{round_to, MappedPlayer, Team};
use crate::taxonomy::{is_defensive_back, is_linebacker, is_receiver};

pub use matching::ManMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CoverageCall {
    #[serde(rename = "Cover 0 Man")]
    Cover0Man,
    #[serde(rename = "Cover 1 (Man Free)")]
    Cover1ManFree,
    #[serde(rename = "Cover 2 Man")]
    Cover2Man,
    #[serde(rename = "Cover 2 Zone")]
    Cover2Zone,
    #[serde(rename = "Cover 3 Man")]
    Cover3Man,
    #[serde(rename = "Cover 3 Zone")]
    Cover3Zone,
    #[serde(rename = "Cover 4 Zone")]
    Cover4Zone,
    #[serde(rename = "Prevent")]
    Prevent,
}

impl CoverageCall {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cover0Man => "Cover 0 Man",
            Self::Cover1ManFree => "Cover 1 (Man Free)",
            Self::Cover2Man => "Cover 2 Man",
            Self::Cover2Zone => "Cover 2 Zone",
            Self::Cover3Man => "Cover 3 Man",
            Self::Cover3Zone => "Cover 3 Zone",
            Self::Cover4Zone => "Cover 4 Zone",
            Self::Prevent => "Prevent",
        }
    }

    /// Decision table keyed on the deep-safety count.
    pub fn decide(deep_safeties: usize, man_signals: usize, zone_signals: usize) -> Self {
        let man_leads = man_signals >= zone_signals;
        match deep_safeties {
            0 => Self::Cover0Man,
            1 if man_leads => Self::Cover1ManFree,
            1 => Self::Cover3Zone,
            2 if man_leads => Self::Cover2Man,
            2 if zone_signals <= 2 => Self::Cover2Zone,
            2 => Self::Cover4Zone,
            3 if man_leads => Self::Cover3Man,
            3 => Self::Cover4Zone,
            _ => Self::Prevent,
        }
    }
}

impl fmt::Display for CoverageCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub coverage_call: CoverageCall,
    pub deep_safety_count: usize,
    /// Defensive backs at or beyond the deep-corner depth, independent of matching
    pub deep_corner_count: usize,
    pub man_signal_count: usize,
    pub zone_signal_count: usize,
    pub avg_linebacker_depth: f64,
    pub man_matches: Vec<ManMatch>,
}

fn select(players: &[MappedPlayer], team: Team, label: fn(&str) -> bool) -> Vec<&MappedPlayer> {
    players
        .iter()
        .filter(|p| p.team == team && label(&p.position))
        .collect()
}

/// Classify the defensive coverage of one projected play.
///
/// Only defense-side defensive backs and linebackers and offense-side
/// receivers are considered. Output depends on player order.
pub fn classify_coverage(players: &[MappedPlayer], thresholds: &CoverageThresholds) -> CoverageReport {
    let defensive_backs = select(players, Team::Defense, is_defensive_back);
    let linebackers = select(players, Team::Defense, is_linebacker);
    let receivers = select(players, Team::Offense, is_receiver);

    let outcome = matching::match_receivers(&receivers, &defensive_backs, thresholds);

    let (zone, deep): (Vec<&MappedPlayer>, Vec<&MappedPlayer>) = outcome
        .unmatched
        .into_iter()
        .partition(|db| db.coordinates.x_yards.abs() <= thresholds.zone_depth_yards);

    let deep_corner_count = defensive_backs
        .iter()
        .filter(|db| db.coordinates.x_yards.abs() >= thresholds.deep_corner_yards)
        .count();

    let avg_linebacker_depth = if linebackers.is_empty() {
        0.0
    } else {
        let total: f64 = linebackers.iter().map(|lb| lb.coordinates.x_yards.abs()).sum();
        round_to(total / linebackers.len() as f64, 2)
    };

    let man_signal_count = outcome.matches.len();
    let zone_signal_count = zone.len();
    let deep_safety_count = deep.len();
    let coverage_call = CoverageCall::decide(deep_safety_count, man_signal_count, zone_signal_count);

    debug!(
        %coverage_call,
        deep_safety_count,
        man_signal_count,
        zone_signal_count,
        "classified coverage"
    );

    CoverageReport {
        coverage_call,
        deep_safety_count,
        deep_corner_count,
        man_signal_count,
        zone_signal_count,
        avg_linebacker_depth,
        man_matches: outcome.matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBoxYards, FieldCoordinates};
    use proptest::prelude::*;

    fn player(id: &str, position: &str, team: Team, x: f64, y: f64) -> MappedPlayer {
        MappedPlayer {
            detection_id: id.to_string(),
            position: position.to_string(),
            team,
            coordinates: FieldCoordinates {
                x_yards: x,
                y_yards: y,
                original_pixel_x: 0.0,
                original_pixel_y: 0.0,
            },
            confidence: 0.9,
            bounding_box: BoundingBoxYards {
                width_pixels: 0.0,
                height_pixels: 0.0,
                width_yards: 0.0,
                height_yards: 0.0,
            },
        }
    }

    fn wr(id: &str, x: f64, y: f64) -> MappedPlayer {
        player(id, "WR", Team::Offense, x, y)
    }

    fn db(id: &str, position: &str, x: f64, y: f64) -> MappedPlayer {
        player(id, position, Team::Defense, x, y)
    }

    fn classify(players: &[MappedPlayer]) -> CoverageReport {
        classify_coverage(players, &CoverageThresholds::default())
    }

    #[test]
    fn test_decision_table() {
        assert_eq!(CoverageCall::decide(0, 0, 5), CoverageCall::Cover0Man);
        assert_eq!(CoverageCall::decide(1, 2, 2), CoverageCall::Cover1ManFree);
        assert_eq!(CoverageCall::decide(1, 1, 2), CoverageCall::Cover3Zone);
        assert_eq!(CoverageCall::decide(2, 3, 1), CoverageCall::Cover2Man);
        assert_eq!(CoverageCall::decide(2, 1, 2), CoverageCall::Cover2Zone);
        assert_eq!(CoverageCall::decide(2, 1, 3), CoverageCall::Cover4Zone);
        assert_eq!(CoverageCall::decide(3, 0, 0), CoverageCall::Cover3Man);
        assert_eq!(CoverageCall::decide(3, 0, 1), CoverageCall::Cover4Zone);
        assert_eq!(CoverageCall::decide(4, 9, 0), CoverageCall::Prevent);
        assert_eq!(CoverageCall::decide(11, 0, 9), CoverageCall::Prevent);
    }

    #[test]
    fn test_all_receivers_matched_is_cover_zero() {
        let players = vec![
            wr("w1", -1.0, -20.0),
            wr("w2", -1.0, 20.0),
            db("c1", "CB", 1.0, -20.5),
            db("c2", "CB", 1.5, 19.6),
        ];
        let report = classify(&players);
        assert_eq!(report.man_signal_count, 2);
        assert_eq!(report.zone_signal_count, 0);
        assert_eq!(report.deep_safety_count, 0);
        assert_eq!(report.coverage_call, CoverageCall::Cover0Man);
        assert_eq!(report.man_matches[0].receiver_id, "w1");
        assert_eq!(report.man_matches[0].defender_id, "c1");
    }

    #[test]
    fn test_single_high_man_free() {
        let players = vec![
            wr("w1", -1.0, -20.0),
            wr("w2", -1.0, 20.0),
            db("c1", "CB", 1.0, -20.0),
            db("c2", "CB", 1.0, 20.0),
            db("fs", "FS", 12.0, 0.0),
            db("nb", "DB", 4.0, 8.0),
        ];
        let report = classify(&players);
        assert_eq!(report.deep_safety_count, 1);
        assert_eq!(report.man_signal_count, 2);
        assert_eq!(report.zone_signal_count, 1);
        assert_eq!(report.coverage_call, CoverageCall::Cover1ManFree);
    }

    #[test]
    fn test_two_high_zone() {
        let players = vec![
            wr("w1", -1.0, -20.0),
            db("c1", "CB", 5.0, -15.0),
            db("c2", "CB", 5.0, 15.0),
            db("s1", "S", 12.0, -8.0),
            db("s2", "SS", 12.0, 8.0),
        ];
        let report = classify(&players);
        assert_eq!(report.man_signal_count, 0);
        assert_eq!(report.zone_signal_count, 2);
        assert_eq!(report.deep_safety_count, 2);
        assert_eq!(report.coverage_call, CoverageCall::Cover2Zone);
        assert_eq!(report.deep_corner_count, 4);
    }

    #[test]
    fn test_deep_defender_is_not_a_man_candidate() {
        // Aligned but 9 yards off the line: not matchable, ends up deep.
        let players = vec![wr("w1", -1.0, 0.0), db("c1", "CB", 9.0, 0.0)];
        let report = classify(&players);
        assert_eq!(report.man_signal_count, 0);
        assert_eq!(report.deep_safety_count, 1);
        // 0 man vs 0 zone still counts as man leading.
        assert_eq!(report.coverage_call, CoverageCall::Cover1ManFree);
    }

    #[test]
    fn test_first_receiver_wins() {
        // c1 is nearest for both receivers; w1 claims it, w2 settles for c2.
        let players = vec![
            wr("w1", -1.0, 0.0),
            wr("w2", -1.0, 0.8),
            db("c1", "CB", 1.0, 0.5),
            db("c2", "CB", 6.0, 1.5),
        ];
        let report = classify(&players);
        assert_eq!(report.man_matches.len(), 2);
        assert_eq!(report.man_matches[0].defender_id, "c1");
        assert_eq!(report.man_matches[1].receiver_id, "w2");
        assert_eq!(report.man_matches[1].defender_id, "c2");

        // Reversed receiver order flips the claim.
        let reordered = vec![
            players[1].clone(),
            players[0].clone(),
            players[2].clone(),
            players[3].clone(),
        ];
        let report = classify(&reordered);
        assert_eq!(report.man_matches[0].receiver_id, "w2");
        assert_eq!(report.man_matches[0].defender_id, "c1");
        assert_eq!(report.man_matches.len(), 1, "c2 is more than a yard off w1");
    }

    #[test]
    fn test_equal_distance_takes_first_defender() {
        let players = vec![
            wr("w1", 0.0, 0.0),
            db("c1", "CB", 1.0, 0.5),
            db("c2", "CB", 1.0, -0.5),
        ];
        let report = classify(&players);
        assert_eq!(report.man_matches[0].defender_id, "c1");
    }

    #[test]
    fn test_alignment_boundary_is_inclusive() {
        let report = classify(&[wr("w1", -1.0, 0.0), db("c1", "CB", 1.0, 1.0)]);
        assert_eq!(report.man_signal_count, 1);

        let report = classify(&[wr("w1", -1.0, 0.0), db("c1", "CB", 1.0, 1.01)]);
        assert_eq!(report.man_signal_count, 0);
        assert_eq!(report.zone_signal_count, 1);
    }

    #[test]
    fn test_zone_depth_boundary_is_inclusive() {
        // Exactly at zone depth: still a man candidate.
        let report = classify(&[wr("w1", -1.0, 0.0), db("c1", "CB", 7.0, 0.0)]);
        assert_eq!(report.man_signal_count, 1);

        // Unmatched at exactly zone depth is a zone signal.
        let report = classify(&[db("c1", "CB", 7.0, 10.0)]);
        assert_eq!(report.zone_signal_count, 1);
        assert_eq!(report.deep_safety_count, 0);

        // Just beyond it is deep.
        let report = classify(&[db("c1", "CB", 7.01, 10.0)]);
        assert_eq!(report.zone_signal_count, 0);
        assert_eq!(report.deep_safety_count, 1);
    }

    #[test]
    fn test_deep_corner_boundary_is_inclusive() {
        let report = classify(&[db("c1", "CB", 5.0, 10.0), db("c2", "CB", 4.99, -10.0)]);
        assert_eq!(report.deep_corner_count, 1);
    }

    #[test]
    fn test_linebackers_are_not_matched() {
        let players = vec![
            player("te", "TE", Team::Offense, -1.0, 3.0),
            player("lb", "LB", Team::Defense, 1.0, 3.0),
        ];
        let report = classify(&players);
        assert_eq!(report.man_signal_count, 0);
        assert_eq!(report.deep_safety_count, 0);
        assert_eq!(report.coverage_call, CoverageCall::Cover0Man);
    }

    #[test]
    fn test_average_linebacker_depth() {
        let players = vec![
            player("m", "MLB", Team::Defense, 4.0, 0.0),
            player("o", "OLB", Team::Defense, -3.0, 5.0),
            player("l", "LB", Team::Defense, 6.5, -5.0),
        ];
        let report = classify(&players);
        assert!((report.avg_linebacker_depth - 4.5).abs() < 1e-9);
        assert_eq!(classify(&[]).avg_linebacker_depth, 0.0);
    }

    #[test]
    fn test_four_deep_is_prevent() {
        let players: Vec<MappedPlayer> = (0..4)
            .map(|i| db(&format!("s{i}"), "S", 15.0, i as f64 * 5.0))
            .collect();
        assert_eq!(classify(&players).coverage_call, CoverageCall::Prevent);
    }

    #[test]
    fn test_report_snapshot() {
        let players = vec![
            wr("w1", -1.0, -20.0),
            db("c1", "CB", 1.5, -20.25),
            db("fs", "FS", 12.5, 0.0),
            player("m", "MLB", Team::Defense, 4.5, 0.0),
        ];
        insta::assert_json_snapshot!(classify(&players), @r###"
        {
          "coverageCall": "Cover 1 (Man Free)",
          "deepSafetyCount": 1,
          "deepCornerCount": 1,
          "manSignalCount": 1,
          "zoneSignalCount": 0,
          "avgLinebackerDepth": 4.5,
          "manMatches": [
            {
              "receiverId": "w1",
              "receiverPosition": "WR",
              "defenderId": "c1",
              "defenderPosition": "CB",
              "distanceYards": 2.51
            }
          ]
        }
        "###);
    }

    proptest! {
        /// Identical input order always yields the identical report.
        #[test]
        fn prop_deterministic(
            entries in proptest::collection::vec((0usize..4, -15.0f64..15.0, -25.0f64..25.0), 0..20)
        ) {
            let kinds = [("WR", Team::Offense), ("CB", Team::Defense), ("S", Team::Defense), ("LB", Team::Defense)];
            let players: Vec<MappedPlayer> = entries
                .iter()
                .enumerate()
                .map(|(i, (k, x, y))| player(&i.to_string(), kinds[*k].0, kinds[*k].1, *x, *y))
                .collect();
            let a = classify(&players);
            let b = classify(&players);
            prop_assert_eq!(a, b);
        }

        /// Every defensive back is a man match, a zone signal or a deep safety.
        #[test]
        fn prop_defensive_backs_accounted(
            entries in proptest::collection::vec((0usize..3, -15.0f64..15.0, -25.0f64..25.0), 0..20)
        ) {
            let kinds = [("TE", Team::Offense), ("DB", Team::Defense), ("FS", Team::Defense)];
            let players: Vec<MappedPlayer> = entries
                .iter()
                .enumerate()
                .map(|(i, (k, x, y))| player(&i.to_string(), kinds[*k].0, kinds[*k].1, *x, *y))
                .collect();
            let dbs = entries.iter().filter(|(k, _, _)| *k != 0).count();
            let r = classify(&players);
            prop_assert_eq!(r.man_signal_count + r.zone_signal_count + r.deep_safety_count, dbs);
        }
    }
}
