//! Detector input: wire types, boundary validation and duplicate filtering.

pub mod detection;
pub mod overlap;

pub use detection::{Detection, DetectionBatch};
pub use overlap::filter_overlapping;
