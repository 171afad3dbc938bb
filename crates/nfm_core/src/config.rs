//! Mapper thresholds configuration
//!
//! Every heuristic constant used by the estimators, the projector and the
//! coverage classifier lives here as a named value. Components take the
//! relevant sub-struct by reference instead of hardcoding magic numbers.
//!
//! ## Threshold Categories
//!
//! | Category | Description |
//! |----------|-------------|
//! | Scrimmage | Minimum player count, imbalance fallback trigger |
//! | Scale | Backfield depth clamp, detection-spread clamp, field width |
//! | Projection | Rounding, team balance tolerance |
//! | Coverage | Alignment, zone depth, deep corner thresholds |
//! | Input | Overlap filter distance |
//!
//! ## Usage
//!
//! ```rust
//! use nfm_core::config::MapperConfig;
//!
//! let config = MapperConfig::default();
//! assert_eq!(config.scrimmage.min_players, 4);
//!
//! let tuned = MapperConfig::from_yaml_str("coverage:\n  alignment_yards: 1.5\n").unwrap();
//! assert_eq!(tuned.coverage.alignment_yards, 1.5);
//! ```
//!
//! ## Environment Variables
//!
//! - `NFM_CONFIG`: path to a YAML file loaded by [`MapperConfig::from_env_or_default`]

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::warn;

use crate::error::{MapError, Result};

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV_VAR: &str = "NFM_CONFIG";

/// Regulation field width in yards (sideline to sideline).
pub const FIELD_WIDTH_YARDS: f64 = 53.3;

/// Overlap distance used when duplicate filtering is switched on.
pub const DEDUP_THRESHOLD_PX: f64 = 1.0;

/// Most decimal places a yard value may keep.
pub const MAX_DECIMALS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MapperConfig {
    pub scrimmage: ScrimmageThresholds,
    pub scale: ScaleThresholds,
    pub projection: ProjectionThresholds,
    pub coverage: CoverageThresholds,
    pub input: InputThresholds,
}

impl MapperConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: MapperConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MapError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&raw)
    }

    /// Load the file named by `NFM_CONFIG`, or defaults when unset/unreadable.
    pub fn from_env_or_default() -> Self {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => match Self::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    warn!(%path, error = %e, "falling back to default mapper config");
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Reject combinations that would make the formulas meaningless.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.non_finite_threshold() {
            return Err(MapError::Config(format!("{name} must be a finite number")));
        }
        let s = &self.scale;
        if s.backfield_depth_divisor_px <= 0.0 || s.spread_divisor_px <= 0.0 {
            return Err(MapError::Config("scale divisors must be positive".to_string()));
        }
        if s.min_backfield_depth_yards <= 0.0
            || s.min_backfield_depth_yards > s.max_backfield_depth_yards
        {
            return Err(MapError::Config(format!(
                "backfield depth range [{}, {}] is invalid",
                s.min_backfield_depth_yards, s.max_backfield_depth_yards
            )));
        }
        if s.min_spread_yards <= 0.0 || s.min_spread_yards > s.max_spread_yards {
            return Err(MapError::Config(format!(
                "spread width range [{}, {}] is invalid",
                s.min_spread_yards, s.max_spread_yards
            )));
        }
        if s.field_width_yards <= 0.0 {
            return Err(MapError::Config("field width must be positive".to_string()));
        }
        if self.scrimmage.min_players < 2 {
            return Err(MapError::Config("scrimmage.min_players must be at least 2".to_string()));
        }
        let c = &self.coverage;
        if c.alignment_yards < 0.0 || c.zone_depth_yards < 0.0 || c.deep_corner_yards < 0.0 {
            return Err(MapError::Config("coverage thresholds must be non-negative".to_string()));
        }
        if self.projection.decimals > MAX_DECIMALS {
            return Err(MapError::Config(format!(
                "projection.decimals must be at most {MAX_DECIMALS}, got {}",
                self.projection.decimals
            )));
        }
        Ok(())
    }

    fn non_finite_threshold(&self) -> Option<&'static str> {
        let s = &self.scale;
        let c = &self.coverage;
        if self.scrimmage.median_probe_offsets_px.iter().any(|o| !o.is_finite()) {
            return Some("scrimmage.median_probe_offsets_px");
        }
        [
            ("scale.backfield_depth_divisor_px", s.backfield_depth_divisor_px),
            ("scale.min_backfield_depth_yards", s.min_backfield_depth_yards),
            ("scale.max_backfield_depth_yards", s.max_backfield_depth_yards),
            ("scale.spread_divisor_px", s.spread_divisor_px),
            ("scale.min_spread_yards", s.min_spread_yards),
            ("scale.max_spread_yards", s.max_spread_yards),
            ("scale.field_width_yards", s.field_width_yards),
            ("coverage.alignment_yards", c.alignment_yards),
            ("coverage.zone_depth_yards", c.zone_depth_yards),
            ("coverage.deep_corner_yards", c.deep_corner_yards),
            ("input.overlap_threshold_px", self.input.overlap_threshold_px),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Line of scrimmage estimation thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrimmageThresholds {
    /// Fewer classifiable players than this leaves the line unresolved
    pub min_players: usize,
    /// Best midpoint imbalance above this triggers the median probe
    pub max_imbalance: usize,
    /// Pixel offsets around the median probed by the fallback
    pub median_probe_offsets_px: Vec<f64>,
}

impl Default for ScrimmageThresholds {
    fn default() -> Self {
        Self {
            min_players: 4,
            max_imbalance: 6,
            median_probe_offsets_px: vec![-50.0, -25.0, 0.0, 25.0, 50.0],
        }
    }
}

/// Pixels-per-yard estimation thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleThresholds {
    /// Offensive players required for the backfield-depth method
    pub min_offense_players: usize,
    /// Backfield pixels assumed per yard before clamping
    pub backfield_depth_divisor_px: f64,
    pub min_backfield_depth_yards: f64,
    pub max_backfield_depth_yards: f64,
    /// Detection-spread pixels assumed per yard before clamping
    pub spread_divisor_px: f64,
    pub min_spread_yards: f64,
    pub max_spread_yards: f64,
    pub field_width_yards: f64,
}

impl Default for ScaleThresholds {
    fn default() -> Self {
        Self {
            min_offense_players: 3,
            backfield_depth_divisor_px: 40.0,
            min_backfield_depth_yards: 3.0,
            max_backfield_depth_yards: 5.0,
            spread_divisor_px: 20.0,
            min_spread_yards: 25.0,
            max_spread_yards: 40.0,
            field_width_yards: FIELD_WIDTH_YARDS,
        }
    }
}

/// Coordinate projection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionThresholds {
    /// Maximum |offense - defense| still reported as balanced
    pub balance_tolerance: usize,
    /// Decimal places kept on yard values
    pub decimals: u32,
}

impl Default for ProjectionThresholds {
    fn default() -> Self {
        Self {
            balance_tolerance: 3,
            decimals: 2,
        }
    }
}

/// Coverage classification thresholds (mapped yards)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageThresholds {
    /// Max |db.y - receiver.y| for a man alignment
    pub alignment_yards: f64,
    /// Max |x| from scrimmage for a man candidate or zone defender
    pub zone_depth_yards: f64,
    /// Min |x| for a defensive back to count as a deep corner
    pub deep_corner_yards: f64,
}

impl Default for CoverageThresholds {
    fn default() -> Self {
        Self {
            alignment_yards: 1.0,
            zone_depth_yards: 7.0,
            deep_corner_yards: 5.0,
        }
    }
}

/// Boundary input thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputThresholds {
    /// Centers closer than this on both axes are duplicates; negative
    /// (the default) disables filtering
    pub overlap_threshold_px: f64,
}

impl InputThresholds {
    pub fn dedup_enabled(&self) -> bool {
        self.overlap_threshold_px >= 0.0
    }
}

impl Default for InputThresholds {
    fn default() -> Self {
        Self {
            overlap_threshold_px: -1.0,
        }
    }
}
