// SPDX-License-Identifier: MPL-2.0
//! Summary statistics over a correction run.

use std::collections::BTreeMap;

use serde::Serialize;

use super::confidence::is_applicable;
use super::Correction;
use crate::config::{DEFAULT_APPLY_THRESHOLD, HIGH_CONFIDENCE_THRESHOLD};

/// Aggregate view of a batch of corrections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrectionStats {
    pub count: usize,
    /// Mean original-to-recovered distance, 0 when there are no corrections.
    pub mean_distance: f64,
    pub mean_confidence: f64,
    /// Counts keyed by precision change, e.g. `"5→8"`.
    pub precision_histogram: BTreeMap<String, usize>,
    /// Corrections with confidence above 0.7.
    pub high_confidence_count: usize,
    /// Corrections that pass the apply threshold.
    pub applicable_count: usize,
}

impl CorrectionStats {
    #[must_use]
    pub fn from_corrections(corrections: &[Correction], apply_threshold: f64) -> Self {
        if corrections.is_empty() {
            return Self::default();
        }

        let count = corrections.len();
        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;

        let mut precision_histogram = BTreeMap::new();
        for correction in corrections {
            *precision_histogram
                .entry(correction.precision_change())
                .or_insert(0) += 1;
        }

        Self {
            count,
            mean_distance: corrections.iter().map(Correction::distance_meters).sum::<f64>() / n,
            mean_confidence: corrections.iter().map(Correction::confidence).sum::<f64>() / n,
            precision_histogram,
            high_confidence_count: corrections
                .iter()
                .filter(|c| c.confidence() > HIGH_CONFIDENCE_THRESHOLD)
                .count(),
            applicable_count: corrections
                .iter()
                .filter(|c| is_applicable(c.confidence(), apply_threshold))
                .count(),
        }
    }
}

/// Statistics using the default apply threshold.
#[must_use]
pub fn stats(corrections: &[Correction]) -> CorrectionStats {
    CorrectionStats::from_corrections(corrections, DEFAULT_APPLY_THRESHOLD)
}
