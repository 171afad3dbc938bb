//! # nfm_core - Football Field Mapper
//!
//! Turns one frame of player detections (image pixels) into field
//! coordinates in yards relative to the line of scrimmage, and reads the
//! defensive coverage from the resulting alignment.
//!
//! ## Pipeline
//! 1. validate the [`DetectionBatch`], dropping near-duplicates when enabled
//! 2. estimate the line of scrimmage ([`geometry::scrimmage`])
//! 3. estimate pixels-per-yard ([`geometry::scale`])
//! 4. project players and officials ([`geometry::projection`])
//! 5. classify coverage ([`coverage`])
//!
//! Everything is synchronous and deterministic for a given input order.

// Pairwise scans index both sides
#![allow(clippy::needless_range_loop)]

pub mod api;
pub mod config;
pub mod coverage;
pub mod error;
pub mod geometry;
pub mod input;
pub mod pipeline;
pub mod taxonomy;

pub use api::{map_detections_json, process_detections_json, MapRequest};
pub use config::MapperConfig;
pub use coverage::{classify_coverage, CoverageCall, CoverageReport, ManMatch};
pub use error::{MapError, Result};
pub use geometry::{FieldScale, MappedOfficial, MappedPlayer, ScaleMethod, ScrimmageLine, Team, TeamStats};
pub use input::{Detection, DetectionBatch};
pub use pipeline::{FieldMapper, MappedPlay, Overrides};

/// Version of the `MappedPlay` envelope written by tools built on this crate
pub const SCHEMA_VERSION: u32 = 1;
