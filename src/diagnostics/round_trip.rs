// SPDX-License-Identifier: MPL-2.0
//! Geohash round-trip checks.

use serde::{Deserialize, Serialize};

use crate::domain::geo::{haversine_distance, GeoCoordinate, EARTH_RADIUS_METERS};
use crate::error::GeohashError;
use crate::geohash;

/// Outcome of encoding a coordinate and decoding it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTripResult {
    pub geohash: String,
    pub decoded: GeoCoordinate,
    /// Great-circle distance between input and decoded center
    pub error_meters: f64,
    /// Per-axis accuracy radius for the precision
    pub radius_meters: f64,
    /// Whether each axis moved no further than the radius
    pub within_radius: bool,
}

/// Encodes `coordinate` at `precision`, decodes it and measures the error.
///
/// # Errors
///
/// Returns the codec error for an invalid precision or an out-of-range
/// coordinate.
pub fn round_trip_test(coordinate: &GeoCoordinate, precision: u8) -> Result<RoundTripResult, GeohashError> {
    let hash = geohash::encode(coordinate, precision)?;
    let decoded = geohash::decode(&hash)?;
    let radius_meters =
        geohash::accuracy_radius_meters(precision).ok_or(GeohashError::InvalidPrecision(precision))?;

    let meters_per_degree = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
    let lat_error = (decoded.latitude() - coordinate.latitude()).abs() * meters_per_degree;
    let lon_error = (decoded.longitude() - coordinate.longitude()).abs()
        * meters_per_degree
        * coordinate.latitude().to_radians().cos();

    let result = RoundTripResult {
        geohash: hash,
        decoded,
        error_meters: haversine_distance(coordinate, &decoded),
        radius_meters,
        within_radius: lat_error <= radius_meters && lon_error <= radius_meters,
    };

    if !result.within_radius {
        tracing::warn!(
            geohash = %result.geohash,
            error_meters = result.error_meters,
            radius_meters,
            "round trip outside accuracy radius"
        );
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_eight_is_within_twenty_meters() {
        let result = round_trip_test(&GeoCoordinate::new(52.0907, 5.1214), 8).unwrap();
        assert_eq!(result.geohash, "u178kdc6");
        assert!(result.within_radius);
        assert!(result.error_meters < 20.0);
    }

    #[test]
    fn every_precision_stays_within_radius() {
        let samples = [
            (52.0907, 5.1214),
            (-33.8688, 151.2093),
            (40.7128, -74.006),
            (0.0, 0.0),
            (-89.9, 179.9),
        ];
        for (lat, lon) in samples {
            for precision in 1..=12 {
                let result = round_trip_test(&GeoCoordinate::new(lat, lon), precision).unwrap();
                assert!(
                    result.within_radius,
                    "({lat}, {lon}) at precision {precision}: {result:?}"
                );
                assert!(result.error_meters <= result.radius_meters * std::f64::consts::SQRT_2);
            }
        }
    }

    #[test]
    fn invalid_input_is_reported() {
        assert_eq!(
            round_trip_test(&GeoCoordinate::new(1.0, 1.0), 0),
            Err(GeohashError::InvalidPrecision(0))
        );
        assert!(matches!(
            round_trip_test(&GeoCoordinate::new(91.0, 1.0), 5),
            Err(GeohashError::CoordinateOutOfRange { .. })
        ));
    }
}
