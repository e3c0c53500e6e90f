//! Replacement resolution: map each flagged frame to a substitute good frame.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::warn;

use crate::detect::{Anomaly, AnomalyMap, Severity};

/// A flagged frame with its accumulated reasons and resolved substitute.
///
/// `replacement` is `None` when no good frame exists anywhere in the
/// sequence; the original frame is then left in place.
#[derive(Clone, Debug, Serialize)]
pub struct BadFrameRecord {
    pub index: usize,
    pub reasons: Vec<Anomaly>,
    pub replacement: Option<usize>,
    pub severity: Severity,
}

/// Find a substitute for `index`: the predecessor if good, else the
/// successor, else outward at increasing distance alternating earlier/later,
/// skipping bad indices, bounded by the sequence. No wraparound.
pub fn find_replacement(index: usize, total: usize, bad: &BTreeSet<usize>) -> Option<usize> {
    for distance in 1..total {
        if let Some(earlier) = index.checked_sub(distance) {
            if !bad.contains(&earlier) {
                return Some(earlier);
            }
        }
        let later = index + distance;
        if later < total && !bad.contains(&later) {
            return Some(later);
        }
    }
    None
}

/// Resolve a substitute for every flagged frame.
///
/// An unresolvable frame (the whole sequence is bad) is a soft failure: it is
/// recorded as unresolved and the pipeline continues.
pub fn resolve_replacements(anomalies: &AnomalyMap, total: usize) -> Vec<BadFrameRecord> {
    let bad: BTreeSet<usize> = anomalies.keys().copied().collect();

    anomalies
        .iter()
        .map(|(&index, reasons)| {
            let replacement = find_replacement(index, total, &bad);
            if replacement.is_none() {
                warn!(index, "No good frame available, leaving frame unmodified");
            }
            let severity = if reasons.iter().any(|a| a.severity == Severity::Severe) {
                Severity::Severe
            } else {
                Severity::Moderate
            };
            BadFrameRecord {
                index,
                reasons: reasons.clone(),
                replacement,
                severity,
            }
        })
        .collect()
}
