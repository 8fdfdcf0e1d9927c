// SPDX-License-Identifier: MPL-2.0
//! Geohash codec.
//!
//! Geohashes are the only persisted encoding of a location: a base32 string
//! whose length (the *precision*) determines the size of the rectangular
//! cell it denotes. Bits alternate between longitude and latitude, longitude
//! first, each bit halving the remaining interval.
//!
//! # Example
//!
//! ```
//! use geotag_lens::domain::geo::GeoCoordinate;
//! use geotag_lens::geohash;
//!
//! let hash = geohash::encode(&GeoCoordinate::new(57.64911, 10.40744), 11).unwrap();
//! assert_eq!(hash, "u4pruydqqvj");
//!
//! let center = geohash::decode("u4pruydqqvj").unwrap();
//! assert!((center.latitude() - 57.64911).abs() < 1e-5);
//! assert_eq!(geohash::accuracy_label(8), "±19 m");
//! ```

use serde::Serialize;

use crate::config::{MAX_GEOHASH_PRECISION, MIN_GEOHASH_PRECISION};
use crate::domain::geo::{GeoCoordinate, EARTH_RADIUS_METERS};
use crate::error::GeohashError;

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Human labels for the accuracy of each precision (index = precision - 1).
const ACCURACY_LABELS: [&str; 10] = [
    "±2500 km", "±630 km", "±78 km", "±20 km", "±2.4 km", "±610 m", "±76 m", "±19 m", "±2.4 m",
    "±0.60 m",
];

/// Label returned for precisions outside the documented table.
pub const UNKNOWN_ACCURACY: &str = "Unknown";

/// Rectangular cell denoted by a geohash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl CellBounds {
    fn world() -> Self {
        Self {
            min_latitude: -90.0,
            max_latitude: 90.0,
            min_longitude: -180.0,
            max_longitude: 180.0,
        }
    }

    /// Center point of the cell.
    #[must_use]
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(
            (self.min_latitude + self.max_latitude) / 2.0,
            (self.min_longitude + self.max_longitude) / 2.0,
        )
    }

    /// Returns whether `coord` lies inside the cell (edges inclusive).
    #[must_use]
    pub fn contains(&self, coord: &GeoCoordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coord.latitude())
            && (self.min_longitude..=self.max_longitude).contains(&coord.longitude())
    }
}

/// Encodes `coord` into a geohash of exactly `precision` characters.
///
/// # Errors
///
/// Returns [`GeohashError::InvalidPrecision`] for precision 0 or above 12,
/// and [`GeohashError::CoordinateOutOfRange`] for coordinates outside WGS84
/// bounds. Callers are expected to validate first.
pub fn encode(coord: &GeoCoordinate, precision: u8) -> Result<String, GeohashError> {
    if !(MIN_GEOHASH_PRECISION..=MAX_GEOHASH_PRECISION).contains(&precision) {
        return Err(GeohashError::InvalidPrecision(precision));
    }
    if !coord.is_in_range() {
        return Err(GeohashError::CoordinateOutOfRange {
            latitude: coord.latitude(),
            longitude: coord.longitude(),
        });
    }

    let mut bounds = CellBounds::world();
    let mut hash = String::with_capacity(precision as usize);
    let mut even_bit = true;

    while hash.len() < precision as usize {
        let mut index = 0usize;
        for _ in 0..5 {
            let bit = if even_bit {
                bisect(
                    coord.longitude(),
                    &mut bounds.min_longitude,
                    &mut bounds.max_longitude,
                )
            } else {
                bisect(
                    coord.latitude(),
                    &mut bounds.min_latitude,
                    &mut bounds.max_latitude,
                )
            };
            index = (index << 1) | usize::from(bit);
            even_bit = !even_bit;
        }
        hash.push(char::from(BASE32[index]));
    }

    Ok(hash)
}

/// Narrows `[min, max]` towards `value`, returning the bit that was taken.
fn bisect(value: f64, min: &mut f64, max: &mut f64) -> bool {
    let mid = (*min + *max) / 2.0;
    if value >= mid {
        *min = mid;
        true
    } else {
        *max = mid;
        false
    }
}

/// Returns the cell denoted by `hash`.
///
/// Decoding is case-insensitive.
///
/// # Errors
///
/// Returns [`GeohashError::EmptyHash`] for an empty string and
/// [`GeohashError::InvalidCharacter`] for characters outside the alphabet.
pub fn bounds(hash: &str) -> Result<CellBounds, GeohashError> {
    let hash = hash.trim();
    if hash.is_empty() {
        return Err(GeohashError::EmptyHash);
    }

    let mut bounds = CellBounds::world();
    let mut even_bit = true;

    for c in hash.chars() {
        let index = char_index(c).ok_or(GeohashError::InvalidCharacter(c))?;
        for shift in (0..5).rev() {
            let bit = (index >> shift) & 1 == 1;
            let (min, max) = if even_bit {
                (&mut bounds.min_longitude, &mut bounds.max_longitude)
            } else {
                (&mut bounds.min_latitude, &mut bounds.max_latitude)
            };
            let mid = (*min + *max) / 2.0;
            if bit {
                *min = mid;
            } else {
                *max = mid;
            }
            even_bit = !even_bit;
        }
    }

    Ok(bounds)
}

/// Precision of `hash`: its length once surrounding whitespace is trimmed.
///
/// # Errors
///
/// Same conditions as [`bounds`], plus [`GeohashError::InvalidPrecision`]
/// for hashes longer than 255 characters.
pub fn hash_precision(hash: &str) -> Result<u8, GeohashError> {
    let hash = hash.trim();
    if hash.is_empty() {
        return Err(GeohashError::EmptyHash);
    }
    if let Some(c) = hash.chars().find(|&c| char_index(c).is_none()) {
        return Err(GeohashError::InvalidCharacter(c));
    }
    u8::try_from(hash.chars().count()).map_err(|_| GeohashError::InvalidPrecision(u8::MAX))
}

/// Decodes `hash` to the center point of its cell.
///
/// # Errors
///
/// Same conditions as [`bounds`].
pub fn decode(hash: &str) -> Result<GeoCoordinate, GeohashError> {
    bounds(hash).map(|cell| cell.center())
}

fn char_index(c: char) -> Option<usize> {
    let lower = c.to_ascii_lowercase();
    BASE32.iter().position(|&b| char::from(b) == lower)
}

/// Human-readable accuracy for a precision, e.g. 6 → "±610 m".
///
/// Precisions outside 1–10 return [`UNKNOWN_ACCURACY`].
#[must_use]
pub fn accuracy_label(precision: u8) -> &'static str {
    match precision {
        1..=10 => ACCURACY_LABELS[precision as usize - 1],
        _ => UNKNOWN_ACCURACY,
    }
}

/// Largest per-axis distance, in meters, between any point of a cell and
/// its center, measured at the equator.
///
/// This is the numeric radius behind [`accuracy_label`]: decoding an encoded
/// coordinate never moves either axis further than this.
#[must_use]
pub fn accuracy_radius_meters(precision: u8) -> Option<f64> {
    if !(MIN_GEOHASH_PRECISION..=MAX_GEOHASH_PRECISION).contains(&precision) {
        return None;
    }
    let bits = u32::from(precision) * 5;
    let lon_bits = bits.div_ceil(2);
    let lat_bits = bits / 2;

    let lon_half = 360.0 / f64::from(2u32.pow(lon_bits)) / 2.0;
    let lat_half = 180.0 / f64::from(2u32.pow(lat_bits)) / 2.0;
    let meters_per_degree = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

    Some(lon_half.max(lat_half) * meters_per_degree)
}
