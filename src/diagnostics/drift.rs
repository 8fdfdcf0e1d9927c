// SPDX-License-Identifier: MPL-2.0
//! Coordinate drift between history entries.

use serde::{Deserialize, Serialize};

use super::session::{DiagnosticsSession, HistoryEntry};
use crate::domain::geo::{haversine_distance, METERS_PER_DEGREE};

/// Movement between two history entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftStep {
    pub from_stage: String,
    pub to_stage: String,
    pub delta_lat_deg: f64,
    pub delta_lon_deg: f64,
    /// Latitude delta in meters (flat approximation)
    pub meters_lat: f64,
    /// Longitude delta in meters, scaled by the cosine of the starting latitude
    pub meters_lon: f64,
    pub haversine_meters: f64,
    /// Milliseconds between the two timestamps
    pub elapsed_ms: i64,
}

impl DriftStep {
    fn between(from: &HistoryEntry, to: &HistoryEntry) -> Self {
        let delta_lat_deg = to.coordinate.latitude() - from.coordinate.latitude();
        let delta_lon_deg = to.coordinate.longitude() - from.coordinate.longitude();
        let cos_lat = from.coordinate.latitude().to_radians().cos();

        Self {
            from_stage: from.stage.clone(),
            to_stage: to.stage.clone(),
            delta_lat_deg,
            delta_lon_deg,
            meters_lat: delta_lat_deg * METERS_PER_DEGREE,
            meters_lon: delta_lon_deg * METERS_PER_DEGREE * cos_lat,
            haversine_meters: haversine_distance(&from.coordinate, &to.coordinate),
            elapsed_ms: (to.timestamp - from.timestamp).num_milliseconds(),
        }
    }
}

/// Drift across a whole session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// One step per consecutive pair of entries.
    pub steps: Vec<DriftStep>,
    /// First entry to last entry; `None` with fewer than two entries.
    pub cumulative: Option<DriftStep>,
}

impl DriftReport {
    /// Sum of the great-circle step lengths.
    #[must_use]
    pub fn path_meters(&self) -> f64 {
        self.steps.iter().map(|step| step.haversine_meters).sum()
    }

    /// Largest single step, if any. Ties go to the earliest step.
    #[must_use]
    pub fn max_step(&self) -> Option<&DriftStep> {
        self.steps.iter().reduce(|best, step| {
            if step.haversine_meters > best.haversine_meters {
                step
            } else {
                best
            }
        })
    }
}

/// Computes per-step and cumulative drift for the session's entries.
#[must_use]
pub fn analyze_drift(session: &DiagnosticsSession) -> DriftReport {
    let entries = session.entries();

    let steps = entries
        .windows(2)
        .map(|pair| DriftStep::between(&pair[0], &pair[1]))
        .collect();

    let cumulative = match entries {
        [first, .., last] => Some(DriftStep::between(first, last)),
        _ => None,
    };

    DriftReport { steps, cumulative }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::GeoCoordinate;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn session(points: &[(&str, f64, f64, i64)]) -> DiagnosticsSession {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut session = DiagnosticsSession::new();
        for &(stage, lat, lon, offset_ms) in points {
            session.push(HistoryEntry::at(
                stage,
                GeoCoordinate::new(lat, lon),
                "test",
                start + Duration::milliseconds(offset_ms),
            ));
        }
        session
    }

    #[test]
    fn empty_and_single_entry_have_no_drift() {
        assert_eq!(analyze_drift(&DiagnosticsSession::new()), DriftReport::default());

        let report = analyze_drift(&session(&[("original", 1.0, 1.0, 0)]));
        assert!(report.steps.is_empty());
        assert!(report.cumulative.is_none());
    }

    #[test]
    fn step_uses_flat_meter_approximation() {
        let report = analyze_drift(&session(&[
            ("original", 60.0, 10.0, 0),
            ("recovered", 60.001, 10.002, 250),
        ]));
        let step = &report.steps[0];

        assert_eq!(step.from_stage, "original");
        assert_eq!(step.to_stage, "recovered");
        assert_abs_diff_eq!(step.delta_lat_deg, 0.001, epsilon = 1e-9);
        assert_abs_diff_eq!(step.meters_lat, 111.0, epsilon = 1e-6);
        // cos(60°) = 0.5
        assert_abs_diff_eq!(step.meters_lon, 111.0, epsilon = 1e-6);
        assert_eq!(step.elapsed_ms, 250);
        assert!(step.haversine_meters > 150.0 && step.haversine_meters < 165.0);
    }

    #[test]
    fn cumulative_spans_first_to_last() {
        let report = analyze_drift(&session(&[
            ("original", 0.0, 0.0, 0),
            ("recovered", 0.0, 1.0, 100),
            ("corrected", 0.0, 0.0, 300),
        ]));

        assert_eq!(report.steps.len(), 2);
        let cumulative = report.cumulative.as_ref().unwrap();
        assert_eq!(cumulative.from_stage, "original");
        assert_eq!(cumulative.to_stage, "corrected");
        assert_eq!(cumulative.haversine_meters, 0.0);
        assert_eq!(cumulative.elapsed_ms, 300);
        assert_abs_diff_eq!(report.path_meters(), 2.0 * 111_194.93, epsilon = 1.0);
        assert_eq!(report.max_step().unwrap().to_stage, "recovered");
    }

    #[test]
    fn max_step_prefers_longest_then_earliest() {
        let report = analyze_drift(&session(&[
            ("original", 0.0, 0.0, 0),
            ("recovered", 0.0, 0.5, 100),
            ("corrected", 0.0, 2.0, 200),
            ("stored", 0.0, 3.5, 300),
        ]));
        assert_eq!(report.max_step().unwrap().to_stage, "corrected");

        assert!(DriftReport::default().max_step().is_none());
    }
}
