// SPDX-License-Identifier: MPL-2.0
//! Coordinate validation and plausibility heuristics.
//!
//! Only an out-of-range axis makes a coordinate invalid. Every other finding
//! (swapped axes, too few decimals, a point suspiciously close to the null
//! island) is advisory: it is reported alongside the coordinate so that a
//! form can show a warning, never used to block it.
//!
//! The land/ocean classifier uses three coarse bounding boxes. It is an
//! uncalibrated approximation kept for compatibility, not geodata.

use crate::domain::geo::GeoCoordinate;
use serde::Serialize;

/// Coordinates with fewer decimals than this on either axis are flagged.
const MIN_DECIMAL_PLACES: usize = 4;

/// Latitudes beyond this (absolute) are classified as polar.
const POLAR_LATITUDE: f64 = 80.0;

// =============================================================================
// Validation
// =============================================================================

/// Kind of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Latitude and longitude appear to be exchanged.
    Swap,
    /// An axis lies outside its valid range. The only blocking kind.
    InvalidRange,
    /// Too few decimals to locate anything smaller than a town.
    PrecisionLoss,
    /// Both axes within a degree of zero: likely a lost sign or default value.
    HemisphereError,
}

/// A single finding about a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<GeoCoordinate>,
}

impl ValidationIssue {
    fn new(kind: IssueKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            suggested_fix: None,
        }
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    /// Suggested replacement when a swap was detected.
    pub corrected: Option<GeoCoordinate>,
}

impl ValidationReport {
    /// Returns whether an issue of `kind` was reported.
    #[must_use]
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }
}

/// Validates `coord`, returning every finding.
///
/// # Example
///
/// ```
/// use geotag_lens::domain::geo::GeoCoordinate;
/// use geotag_lens::validation::{validate, IssueKind};
///
/// let report = validate(&GeoCoordinate::new(95.0, 40.0));
/// assert!(!report.is_valid);
/// assert!(report.has_issue(IssueKind::InvalidRange));
/// assert_eq!(report.corrected, Some(GeoCoordinate::new(40.0, 95.0)));
/// ```
#[must_use]
pub fn validate(coord: &GeoCoordinate) -> ValidationReport {
    let lat = coord.latitude();
    let lon = coord.longitude();
    let mut issues = Vec::new();
    let mut corrected = None;

    if !coord.latitude_in_range() {
        issues.push(ValidationIssue::new(
            IssueKind::InvalidRange,
            format!("Latitude {lat} is outside [-90, 90]"),
        ));
    }
    if !coord.longitude_in_range() {
        issues.push(ValidationIssue::new(
            IssueKind::InvalidRange,
            format!("Longitude {lon} is outside [-180, 180]"),
        ));
    }

    if lon.abs() <= 90.0 && lat.abs() <= 180.0 && (lat.abs() > 90.0 || lon.abs() > 90.0) {
        let fix = coord.swapped();
        issues.push(ValidationIssue {
            suggested_fix: Some(fix),
            ..ValidationIssue::new(
                IssueKind::Swap,
                "Latitude and longitude appear to be swapped",
            )
        });
        corrected = Some(fix);
    }

    if lat.is_finite() && lon.is_finite() {
        if decimal_places(lat) < MIN_DECIMAL_PLACES || decimal_places(lon) < MIN_DECIMAL_PLACES {
            issues.push(ValidationIssue::new(
                IssueKind::PrecisionLoss,
                format!("Fewer than {MIN_DECIMAL_PLACES} decimal places; location may be imprecise"),
            ));
        }

        if lat.abs() < 1.0 && lon.abs() < 1.0 && !coord.is_null_island() {
            issues.push(ValidationIssue::new(
                IssueKind::HemisphereError,
                "Coordinate is within one degree of (0, 0); a sign or axis may be lost",
            ));
        }
    }

    let is_valid = !issues
        .iter()
        .any(|issue| issue.kind == IssueKind::InvalidRange);

    ValidationReport {
        is_valid,
        issues,
        corrected,
    }
}

/// Number of digits after the decimal point in the shortest representation.
fn decimal_places(value: f64) -> usize {
    let text = value.abs().to_string();
    text.split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

// =============================================================================
// Correction Suggestions
// =============================================================================

/// Kind of an alternative reading of a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuggestionKind {
    #[serde(rename = "swap")]
    Swap,
    #[serde(rename = "negate_lat")]
    NegateLatitude,
    #[serde(rename = "negate_lng")]
    NegateLongitude,
    #[serde(rename = "negate_both")]
    NegateBoth,
}

impl SuggestionKind {
    /// Stable identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Swap => "swap",
            SuggestionKind::NegateLatitude => "negate_lat",
            SuggestionKind::NegateLongitude => "negate_lng",
            SuggestionKind::NegateBoth => "negate_both",
        }
    }
}

/// Candidate replacement for a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionSuggestion {
    pub kind: SuggestionKind,
    pub coordinate: GeoCoordinate,
    pub description: String,
    pub confidence: f64,
}

/// Proposes the four standard re-readings of `coord`, most likely first.
///
/// A swap scores 0.9 when the latitude is out of range but the swapped
/// pair would be valid, 0.3 otherwise. Sign flips score 0.2 each and 0.1
/// for both axes.
#[must_use]
pub fn suggest_corrections(coord: &GeoCoordinate) -> Vec<CorrectionSuggestion> {
    let lat = coord.latitude();
    let lon = coord.longitude();
    let swapped = coord.swapped();
    let swap_indicated = !coord.latitude_in_range() && swapped.is_in_range();

    let mut suggestions = vec![
        CorrectionSuggestion {
            kind: SuggestionKind::Swap,
            coordinate: swapped,
            description: "Swap latitude and longitude".to_string(),
            confidence: if swap_indicated { 0.9 } else { 0.3 },
        },
        CorrectionSuggestion {
            kind: SuggestionKind::NegateLatitude,
            coordinate: GeoCoordinate::new(-lat, lon),
            description: "Flip the latitude hemisphere (N/S)".to_string(),
            confidence: 0.2,
        },
        CorrectionSuggestion {
            kind: SuggestionKind::NegateLongitude,
            coordinate: GeoCoordinate::new(lat, -lon),
            description: "Flip the longitude hemisphere (E/W)".to_string(),
            confidence: 0.2,
        },
        CorrectionSuggestion {
            kind: SuggestionKind::NegateBoth,
            coordinate: GeoCoordinate::new(-lat, -lon),
            description: "Flip both hemispheres".to_string(),
            confidence: 0.1,
        },
    ];

    // Stable: equal confidences keep the order above
    suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    suggestions
}

// =============================================================================
// Reasonableness
// =============================================================================

/// Coarse classification of where a coordinate falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Land,
    Ocean,
    Polar,
    Unknown,
}

/// Outcome of [`classify_reasonableness`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reasonableness {
    pub reasonable: bool,
    pub issues: Vec<String>,
    pub kind: LocationKind,
}

struct OceanBox {
    name: &'static str,
    min_latitude: f64,
    max_latitude: f64,
    min_longitude: f64,
    max_longitude: f64,
}

impl OceanBox {
    fn contains(&self, coord: &GeoCoordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coord.latitude())
            && (self.min_longitude..=self.max_longitude).contains(&coord.longitude())
    }
}

// Open-water interiors only; coastlines and islands are not modelled.
const OCEAN_BOXES: [OceanBox; 3] = [
    OceanBox {
        name: "Pacific",
        min_latitude: -50.0,
        max_latitude: 50.0,
        min_longitude: -170.0,
        max_longitude: -125.0,
    },
    OceanBox {
        name: "Atlantic",
        min_latitude: -50.0,
        max_latitude: 45.0,
        min_longitude: -33.0,
        max_longitude: -15.0,
    },
    OceanBox {
        name: "Indian",
        min_latitude: -45.0,
        max_latitude: -5.0,
        min_longitude: 55.0,
        max_longitude: 95.0,
    },
];

/// Classifies whether `coord` is a plausible place for content to be tagged.
///
/// # Example
///
/// ```
/// use geotag_lens::domain::geo::GeoCoordinate;
/// use geotag_lens::validation::{classify_reasonableness, LocationKind};
///
/// let result = classify_reasonableness(&GeoCoordinate::new(0.0, -150.0));
/// assert_eq!(result.kind, LocationKind::Ocean);
/// assert!(!result.reasonable);
/// ```
#[must_use]
pub fn classify_reasonableness(coord: &GeoCoordinate) -> Reasonableness {
    let mut issues = Vec::new();

    let kind = if !coord.is_in_range() {
        issues.push("Coordinate is outside the valid range".to_string());
        LocationKind::Unknown
    } else if coord.latitude().abs() > POLAR_LATITUDE {
        issues.push("Coordinate is in a polar region".to_string());
        LocationKind::Polar
    } else if let Some(ocean) = OCEAN_BOXES.iter().find(|b| b.contains(coord)) {
        issues.push(format!("Coordinate appears to be in the open {} Ocean", ocean.name));
        LocationKind::Ocean
    } else {
        LocationKind::Land
    };

    if coord.is_null_island() {
        issues.push("Null island (0, 0) usually means missing GPS data".to_string());
    }

    Reasonableness {
        reasonable: issues.is_empty(),
        issues,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coordinate_has_no_range_issue() {
        let report = validate(&GeoCoordinate::new(52.0907, 5.1214));
        assert!(report.is_valid);
        assert!(report.issues.is_empty());
        assert!(report.corrected.is_none());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (45.1234, -180.0)] {
            let report = validate(&GeoCoordinate::new(lat, lon));
            assert!(report.is_valid);
            assert!(!report.has_issue(IssueKind::InvalidRange));
        }
    }

    #[test]
    fn out_of_range_axes_are_invalid() {
        for (lat, lon) in [(90.5, 0.1234), (-91.0, 10.1234), (10.1234, 180.5), (0.1234, -200.0)] {
            let report = validate(&GeoCoordinate::new(lat, lon));
            assert!(!report.is_valid, "({lat}, {lon}) should be invalid");
            assert!(report.has_issue(IssueKind::InvalidRange));
        }
    }

    #[test]
    fn each_bad_axis_gets_its_own_issue() {
        let report = validate(&GeoCoordinate::new(200.0, 400.0));
        let range_issues = report
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::InvalidRange)
            .count();
        assert_eq!(range_issues, 2);
    }

    #[test]
    fn nan_is_invalid() {
        let report = validate(&GeoCoordinate::new(f64::NAN, 5.0));
        assert!(!report.is_valid);
        assert!(!report.has_issue(IssueKind::PrecisionLoss));
    }

    #[test]
    fn swapped_axes_are_detected() {
        let report = validate(&GeoCoordinate::new(95.0, 40.0));
        assert!(!report.is_valid);
        assert!(report.has_issue(IssueKind::InvalidRange));

        let swap = report
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::Swap)
            .expect("swap issue");
        assert_eq!(swap.suggested_fix, Some(GeoCoordinate::new(40.0, 95.0)));
        assert_eq!(report.corrected, Some(GeoCoordinate::new(40.0, 95.0)));
    }

    #[test]
    fn swap_not_reported_when_longitude_too_large() {
        let report = validate(&GeoCoordinate::new(120.0, 100.0));
        assert!(!report.has_issue(IssueKind::Swap));
        assert!(report.corrected.is_none());
    }

    #[test]
    fn low_precision_is_advisory() {
        let report = validate(&GeoCoordinate::new(52.09, 5.1214));
        assert!(report.is_valid);
        assert!(report.has_issue(IssueKind::PrecisionLoss));

        let report = validate(&GeoCoordinate::new(52.0, 5.0));
        assert!(report.has_issue(IssueKind::PrecisionLoss));
    }

    #[test]
    fn four_decimals_is_enough() {
        let report = validate(&GeoCoordinate::new(52.0907, 5.1214));
        assert!(!report.has_issue(IssueKind::PrecisionLoss));
    }

    #[test]
    fn hemisphere_error_near_origin() {
        let report = validate(&GeoCoordinate::new(0.5123, -0.2345));
        assert!(report.is_valid);
        assert!(report.has_issue(IssueKind::HemisphereError));
    }

    #[test]
    fn exact_origin_is_not_a_hemisphere_error() {
        let report = validate(&GeoCoordinate::new(0.0, 0.0));
        assert!(!report.has_issue(IssueKind::HemisphereError));
    }

    #[test]
    fn decimal_places_counts_shortest_representation() {
        assert_eq!(decimal_places(52.0), 0);
        assert_eq!(decimal_places(52.09), 2);
        assert_eq!(decimal_places(-5.1214), 4);
        assert_eq!(decimal_places(0.000001), 6);
    }

    #[test]
    fn suggestions_rank_indicated_swap_first() {
        let suggestions = suggest_corrections(&GeoCoordinate::new(95.0, 40.0));
        let kinds: Vec<_> = suggestions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::Swap,
                SuggestionKind::NegateLatitude,
                SuggestionKind::NegateLongitude,
                SuggestionKind::NegateBoth
            ]
        );
        assert_eq!(suggestions[0].confidence, 0.9);
        assert_eq!(suggestions[0].coordinate, GeoCoordinate::new(40.0, 95.0));
    }

    #[test]
    fn unindicated_swap_scores_lower() {
        let suggestions = suggest_corrections(&GeoCoordinate::new(52.0907, 5.1214));
        assert_eq!(suggestions.len(), 4);
        assert_eq!(suggestions[0].kind, SuggestionKind::Swap);
        assert_eq!(suggestions[0].confidence, 0.3);
        assert!(suggestions
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence));
        assert_eq!(
            suggestions[3].coordinate,
            GeoCoordinate::new(-52.0907, -5.1214)
        );
    }

    #[test]
    fn suggestion_kind_identifiers() {
        assert_eq!(SuggestionKind::NegateLatitude.as_str(), "negate_lat");
        assert_eq!(
            serde_json::to_string(&SuggestionKind::NegateBoth).unwrap(),
            "\"negate_both\""
        );
    }

    #[test]
    fn classify_land() {
        let result = classify_reasonableness(&GeoCoordinate::new(52.0907, 5.1214));
        assert_eq!(result.kind, LocationKind::Land);
        assert!(result.reasonable);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn classify_polar() {
        let result = classify_reasonableness(&GeoCoordinate::new(-85.0, 10.0));
        assert_eq!(result.kind, LocationKind::Polar);
        assert!(!result.reasonable);
    }

    #[test]
    fn classify_each_ocean_box() {
        for (lat, lon) in [(0.0, -150.0), (20.0, -25.0), (-25.0, 75.0)] {
            let result = classify_reasonableness(&GeoCoordinate::new(lat, lon));
            assert_eq!(result.kind, LocationKind::Ocean, "({lat}, {lon})");
        }
    }

    #[test]
    fn null_island_flagged_regardless_of_kind() {
        let result = classify_reasonableness(&GeoCoordinate::new(0.0, 0.0));
        assert!(!result.reasonable);
        assert_eq!(result.kind, LocationKind::Land);
        assert!(result.issues.iter().any(|i| i.contains("Null island")));
    }

    #[test]
    fn classify_out_of_range_is_unknown() {
        let result = classify_reasonableness(&GeoCoordinate::new(100.0, 0.0));
        assert_eq!(result.kind, LocationKind::Unknown);
        assert!(!result.reasonable);
    }
}
