// SPDX-License-Identifier: MPL-2.0
//! Confidence model for automatic corrections.
//!
//! The score starts from the precision gain, is scaled down the further the
//! recovered coordinate lies from the stored cell, and gets a small boost
//! when a large gain lands very close to the original. All constants live
//! in [`crate::config::defaults`]; they are uncalibrated heuristics.

use crate::config::{
    CLOSE_MATCH_BOOST, CLOSE_MATCH_METERS, CLOSE_MATCH_MIN_GAIN, FAR_DISTANCE_FACTOR,
    FAR_DISTANCE_METERS, MEDIUM_DISTANCE_FACTOR, MEDIUM_DISTANCE_METERS, NEAR_DISTANCE_FACTOR,
    NEAR_DISTANCE_METERS, PRECISION_GAIN_DIVISOR,
};

/// Scores how trustworthy a correction is, in `[0, 1]`.
///
/// # Example
///
/// ```
/// use geotag_lens::correction::compute_confidence;
///
/// // Precision 5 -> 8 is a gain of 3 (0.6), 15 m away earns the boost.
/// assert!((compute_confidence(5, 8, 15.0) - 0.72).abs() < 1e-12);
/// // Same gain, 600 km away.
/// assert!((compute_confidence(5, 8, 600_000.0) - 0.18).abs() < 1e-12);
/// ```
#[must_use]
pub fn compute_confidence(original_precision: u8, target_precision: u8, distance_meters: f64) -> f64 {
    if !distance_meters.is_finite() {
        return 0.0;
    }

    let gain = target_precision.saturating_sub(original_precision);
    let mut confidence = (f64::from(gain) / PRECISION_GAIN_DIVISOR).clamp(0.0, 1.0);

    confidence *= distance_factor(distance_meters);

    if distance_meters < CLOSE_MATCH_METERS && gain >= CLOSE_MATCH_MIN_GAIN {
        confidence = (confidence * CLOSE_MATCH_BOOST).min(1.0);
    }

    confidence.clamp(0.0, 1.0)
}

/// Scale applied for the distance band.
fn distance_factor(distance_meters: f64) -> f64 {
    if distance_meters > FAR_DISTANCE_METERS {
        FAR_DISTANCE_FACTOR
    } else if distance_meters > MEDIUM_DISTANCE_METERS {
        MEDIUM_DISTANCE_FACTOR
    } else if distance_meters > NEAR_DISTANCE_METERS {
        NEAR_DISTANCE_FACTOR
    } else {
        1.0
    }
}

/// Returns whether a correction with `confidence` may be applied.
#[must_use]
pub fn is_applicable(confidence: f64, apply_threshold: f64) -> bool {
    confidence > apply_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn base_score_is_gain_over_five() {
        assert_abs_diff_eq!(compute_confidence(6, 8, 60.0), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(compute_confidence(3, 8, 60.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(compute_confidence(1, 12, 60.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn no_gain_means_no_confidence() {
        assert_eq!(compute_confidence(8, 8, 1.0), 0.0);
        assert_eq!(compute_confidence(9, 8, 1.0), 0.0);
    }

    #[test]
    fn distance_bands_scale_down() {
        assert_abs_diff_eq!(compute_confidence(3, 8, 20_000.0), 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(compute_confidence(3, 8, 5_000.0), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(compute_confidence(3, 8, 500.0), 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(compute_confidence(3, 8, 100.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn band_edges_are_exclusive() {
        assert_abs_diff_eq!(compute_confidence(3, 8, 10_000.0), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(compute_confidence(3, 8, 1_000.0), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn close_match_boost_needs_gain_of_two() {
        assert_abs_diff_eq!(compute_confidence(6, 8, 10.0), 0.48, epsilon = 1e-12);
        assert_abs_diff_eq!(compute_confidence(7, 8, 10.0), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(compute_confidence(6, 8, 50.0), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn boost_is_capped_at_one() {
        assert_eq!(compute_confidence(2, 8, 1.0), 1.0);
    }

    #[test]
    fn monotonic_in_precision_gain() {
        for distance in [0.0, 30.0, 75.0, 500.0, 5_000.0, 50_000.0] {
            let mut previous = 0.0;
            for original in (1..=8u8).rev() {
                let confidence = compute_confidence(original, 8, distance);
                assert!(
                    confidence >= previous,
                    "confidence dropped at precision {original}, distance {distance}"
                );
                assert!((0.0..=1.0).contains(&confidence));
                previous = confidence;
            }
        }
    }

    #[test]
    fn non_finite_distance_scores_zero() {
        assert_eq!(compute_confidence(3, 8, f64::NAN), 0.0);
        assert_eq!(compute_confidence(3, 8, f64::INFINITY), 0.0);
    }

    #[test]
    fn applicability_is_strict() {
        assert!(!is_applicable(0.5, 0.5));
        assert!(is_applicable(0.51, 0.5));
    }
}
