//! Coordinate projection and team assignment.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::round_to;
use super::scale::FieldScale;
use super::scrimmage::ScrimmageLine;
use crate::config::ProjectionThresholds;
use crate::input::Detection;
use crate::taxonomy::{classify, is_official, is_player, PositionGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Offense,
    Defense,
    Special,
}

/// Team for a player label. Labels the taxonomy cannot place fall back to
/// their side of the line: left of it is offense.
pub fn assign_team(label: &str, pixel_x: f64, line: ScrimmageLine) -> Team {
    match classify(label) {
        PositionGroup::Offense => Team::Offense,
        PositionGroup::Defense => Team::Defense,
        PositionGroup::Special => Team::Special,
        PositionGroup::Unknown => {
            if pixel_x < line.pixel_x() {
                Team::Offense
            } else {
                Team::Defense
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldCoordinates {
    pub x_yards: f64,
    pub y_yards: f64,
    pub original_pixel_x: f64,
    pub original_pixel_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBoxYards {
    pub width_pixels: f64,
    pub height_pixels: f64,
    pub width_yards: f64,
    pub height_yards: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappedPlayer {
    pub detection_id: String,
    pub position: String,
    pub team: Team,
    pub coordinates: FieldCoordinates,
    pub confidence: f64,
    pub bounding_box: BoundingBoxYards,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappedOfficial {
    pub detection_id: String,
    pub coordinates: FieldCoordinates,
    pub confidence: f64,
    pub bounding_box: BoundingBoxYards,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub total_players: usize,
    pub offense_count: usize,
    pub defense_count: usize,
    pub special_count: usize,
    pub official_count: usize,
    /// |offense - defense| within the configured tolerance
    pub balanced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub players: Vec<MappedPlayer>,
    pub officials: Vec<MappedOfficial>,
    pub team_stats: TeamStats,
}

struct Projector<'a> {
    line: ScrimmageLine,
    scale: &'a FieldScale,
    decimals: u32,
}

impl Projector<'_> {
    fn yards(&self, pixels: f64) -> f64 {
        round_to(pixels / self.scale.pixels_per_yard, self.decimals)
    }

    fn coordinates(&self, d: &Detection) -> FieldCoordinates {
        FieldCoordinates {
            x_yards: self.yards(d.center_x - self.line.pixel_x()),
            y_yards: self.yards(d.center_y - self.scale.field_center_y),
            original_pixel_x: d.center_x,
            original_pixel_y: d.center_y,
        }
    }

    fn bounding_box(&self, d: &Detection) -> BoundingBoxYards {
        BoundingBoxYards {
            width_pixels: d.width,
            height_pixels: d.height,
            width_yards: self.yards(d.width),
            height_yards: self.yards(d.height),
        }
    }
}

/// Map every detection into yard coordinates relative to `line`.
///
/// Takes a resolved [`ScrimmageLine`]; callers without one must stop before
/// projecting. Labels that are neither players nor officials are skipped.
pub fn project(
    detections: &[Detection],
    line: ScrimmageLine,
    scale: &FieldScale,
    thresholds: &ProjectionThresholds,
) -> Projection {
    let projector = Projector {
        line,
        scale,
        decimals: thresholds.decimals,
    };

    let mut players = Vec::new();
    let mut officials = Vec::new();
    let mut stats = TeamStats::default();

    for d in detections {
        if is_player(&d.position_label) {
            let team = assign_team(&d.position_label, d.center_x, line);
            match team {
                Team::Offense => stats.offense_count += 1,
                Team::Defense => stats.defense_count += 1,
                Team::Special => stats.special_count += 1,
            }
            players.push(MappedPlayer {
                detection_id: d.id.clone(),
                position: d.position_label.clone(),
                team,
                coordinates: projector.coordinates(d),
                confidence: d.confidence,
                bounding_box: projector.bounding_box(d),
            });
        } else if is_official(&d.position_label) {
            officials.push(MappedOfficial {
                detection_id: d.id.clone(),
                coordinates: projector.coordinates(d),
                confidence: d.confidence,
                bounding_box: projector.bounding_box(d),
            });
        } else {
            debug!(label = %d.position_label, id = %d.id, "skipping unrecognised label");
        }
    }

    stats.total_players = players.len();
    stats.official_count = officials.len();
    stats.balanced =
        stats.offense_count.abs_diff(stats.defense_count) <= thresholds.balance_tolerance;

    Projection {
        players,
        officials,
        team_stats: stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScaleThresholds;
    use crate::geometry::scale::from_override;
    use proptest::prelude::*;

    fn scale_at(ppy: f64, center_y: f64) -> FieldScale {
        let anchor = vec![Detection::new("a", "QB", 0.0, center_y)];
        from_override(&anchor, ppy, Some(center_y), &ScaleThresholds::default()).unwrap()
    }

    fn line(x: f64) -> ScrimmageLine {
        ScrimmageLine::new(x).unwrap()
    }

    #[test]
    fn test_assign_team_by_label() {
        assert_eq!(assign_team("QB", 999.0, line(0.0)), Team::Offense);
        assert_eq!(assign_team("CB", -999.0, line(0.0)), Team::Defense);
        assert_eq!(assign_team("K", 0.0, line(0.0)), Team::Special);
    }

    #[test]
    fn test_assign_team_falls_back_to_line() {
        assert_eq!(assign_team("H-BACK", 90.0, line(100.0)), Team::Offense);
        assert_eq!(assign_team("H-BACK", 100.0, line(100.0)), Team::Defense);
    }

    #[test]
    fn test_projects_relative_yards() {
        let detections = vec![
            Detection::new("1", "QB", 150.0, 200.0).with_size(20.0, 45.0),
            Detection::new("2", "CB", 237.0, 120.0),
        ];
        let out = project(&detections, line(200.0), &scale_at(10.0, 150.0), &ProjectionThresholds::default());

        let qb = &out.players[0];
        assert_eq!(qb.team, Team::Offense);
        assert_eq!(qb.coordinates.x_yards, -5.0);
        assert_eq!(qb.coordinates.y_yards, 5.0);
        assert_eq!(qb.bounding_box.width_yards, 2.0);
        assert_eq!(qb.bounding_box.height_yards, 4.5);

        let cb = &out.players[1];
        assert_eq!(cb.coordinates.x_yards, 3.7);
        assert_eq!(cb.coordinates.y_yards, -3.0);
        assert_eq!(cb.coordinates.original_pixel_x, 237.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let detections = vec![Detection::new("1", "WR", 100.0 + 10.0 / 3.0, 0.0)];
        let out = project(&detections, line(100.0), &scale_at(1.0, 0.0), &ProjectionThresholds::default());
        assert_eq!(out.players[0].coordinates.x_yards, 3.33);
    }

    #[test]
    fn test_officials_have_no_team() {
        let detections = vec![
            Detection::new("1", "QB", 10.0, 0.0),
            Detection::new("r", "ref", 50.0, 0.0),
            Detection::new("b", "football", 55.0, 0.0),
        ];
        let out = project(&detections, line(30.0), &scale_at(10.0, 0.0), &ProjectionThresholds::default());
        assert_eq!(out.players.len(), 1);
        assert_eq!(out.officials.len(), 1);
        assert_eq!(out.officials[0].coordinates.x_yards, 2.0);
        assert_eq!(out.team_stats.official_count, 1);
        assert_eq!(out.team_stats.total_players, 1);
    }

    #[test]
    fn test_team_balance() {
        let mut detections: Vec<Detection> =
            (0..7).map(|i| Detection::new(i.to_string(), "OG", 10.0, 0.0)).collect();
        detections.extend((0..4).map(|i| Detection::new(format!("d{i}"), "DT", 90.0, 0.0)));
        let out = project(&detections, line(50.0), &scale_at(10.0, 0.0), &ProjectionThresholds::default());
        assert_eq!(out.team_stats.offense_count, 7);
        assert_eq!(out.team_stats.defense_count, 4);
        assert!(out.team_stats.balanced);

        detections.push(Detection::new("extra", "OT", 12.0, 0.0));
        let out = project(&detections, line(50.0), &scale_at(10.0, 0.0), &ProjectionThresholds::default());
        assert!(!out.team_stats.balanced);
    }

    #[test]
    fn test_serializes_camel_case() {
        let detections = vec![Detection::new("1", "QB", 10.0, 0.0)];
        let out = project(&detections, line(30.0), &scale_at(10.0, 0.0), &ProjectionThresholds::default());
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["players"][0]["team"], "offense");
        assert_eq!(json["players"][0]["coordinates"]["xYards"], -2.0);
        assert_eq!(json["teamStats"]["offenseCount"], 1);
    }

    proptest! {
        /// A detection on the line maps to x = 0.
        #[test]
        fn prop_line_maps_to_zero(los in -5000.0f64..5000.0, ppy in 0.5f64..80.0) {
            let detections = vec![Detection::new("1", "QB", los, 0.0)];
            let out = project(&detections, line(los), &scale_at(ppy, 0.0), &ProjectionThresholds::default());
            prop_assert!(out.players[0].coordinates.x_yards.abs() <= 0.01);
        }

        /// Every player lands in exactly one team and the counts add up.
        #[test]
        fn prop_team_partition(
            entries in proptest::collection::vec((0usize..27, 0.0f64..1000.0), 0..40),
            los in 0.0f64..1000.0,
        ) {
            let labels = [
                "QB", "RB", "FB", "WR", "TE", "C", "OG", "OT", "DE", "DT", "NT", "LB", "MLB",
                "OLB", "CB", "DB", "S", "FS", "SS", "K", "P", "LS", "KR", "PR", "ref", "ball", "?",
            ];
            let detections: Vec<Detection> = entries
                .iter()
                .enumerate()
                .map(|(i, (l, x))| Detection::new(i.to_string(), labels[*l], *x, 0.0))
                .collect();
            let out = project(&detections, line(los), &scale_at(10.0, 0.0), &ProjectionThresholds::default());
            let s = &out.team_stats;
            prop_assert_eq!(s.offense_count + s.defense_count + s.special_count, s.total_players);
            prop_assert_eq!(s.balanced, s.offense_count.abs_diff(s.defense_count) <= 3);
            let expected_players = detections.iter().filter(|d| is_player(&d.position_label)).count();
            prop_assert_eq!(s.total_players, expected_players);
        }
    }
}
