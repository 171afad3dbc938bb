//! Position label taxonomy
//!
//! Fixed partition of detector labels into offense, defense, special teams and
//! unknown. The official label (`ref`) is unknown and never counts as a player.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const OFFENSE_LABELS: &[&str] = &["QB", "RB", "FB", "WR", "TE", "C", "OG", "OT"];
pub const DEFENSE_LABELS: &[&str] = &["DE", "DT", "NT", "LB", "MLB", "OLB", "CB", "DB", "S", "FS", "SS"];
pub const SPECIAL_LABELS: &[&str] = &["K", "P", "LS", "KR", "PR"];
pub const OFFICIAL_LABEL: &str = "ref";

/// Coverage subsets
pub const DEFENSIVE_BACK_LABELS: &[&str] = &["DB", "CB", "S", "FS", "SS"];
pub const LINEBACKER_LABELS: &[&str] = &["LB", "MLB", "OLB"];
pub const RECEIVER_LABELS: &[&str] = &["WR", "TE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PositionGroup {
    Offense,
    Defense,
    Special,
    Unknown,
}

pub fn classify(label: &str) -> PositionGroup {
    if OFFENSE_LABELS.contains(&label) {
        PositionGroup::Offense
    } else if DEFENSE_LABELS.contains(&label) {
        PositionGroup::Defense
    } else if SPECIAL_LABELS.contains(&label) {
        PositionGroup::Special
    } else {
        PositionGroup::Unknown
    }
}

pub fn is_player(label: &str) -> bool {
    classify(label) != PositionGroup::Unknown
}

pub fn is_official(label: &str) -> bool {
    label == OFFICIAL_LABEL
}

pub fn is_defensive_back(label: &str) -> bool {
    DEFENSIVE_BACK_LABELS.contains(&label)
}

pub fn is_linebacker(label: &str) -> bool {
    LINEBACKER_LABELS.contains(&label)
}

pub fn is_receiver(label: &str) -> bool {
    RECEIVER_LABELS.contains(&label)
}

/// Player label sets, for callers that validate labels before upload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AvailablePositions {
    pub offensive: Vec<String>,
    pub defensive: Vec<String>,
    pub special: Vec<String>,
}

pub fn available_positions() -> AvailablePositions {
    fn owned(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }
    AvailablePositions {
        offensive: owned(OFFENSE_LABELS),
        defensive: owned(DEFENSE_LABELS),
        special: owned(SPECIAL_LABELS),
    }
}
