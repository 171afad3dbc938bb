use tracing::debug;

use super::detection::Detection;

/// Drop near-duplicate detections.
///
/// Two detections whose centers are within `threshold_px` on both axes are
/// duplicates; the lower-confidence one is dropped (on a tie, the later one).
/// Survivors keep their input order. A negative threshold disables filtering.
pub fn filter_overlapping(detections: &[Detection], threshold_px: f64) -> Vec<Detection> {
    if threshold_px < 0.0 {
        return detections.to_vec();
    }

    let mut removed = vec![false; detections.len()];
    for i in 0..detections.len() {
        for j in (i + 1)..detections.len() {
            let a = &detections[i];
            let b = &detections[j];
            if (a.center_x - b.center_x).abs() <= threshold_px
                && (a.center_y - b.center_y).abs() <= threshold_px
            {
                let drop = if a.confidence < b.confidence { i } else { j };
                removed[drop] = true;
            }
        }
    }

    let dropped = removed.iter().filter(|r| **r).count();
    if dropped > 0 {
        debug!(dropped, threshold_px, "filtered overlapping detections");
    }

    detections
        .iter()
        .zip(removed)
        .filter(|(_, r)| !r)
        .map(|(d, _)| d.clone())
        .collect()
}
