// SPDX-License-Identifier: MPL-2.0
//! Geographic domain types.
//!
//! This module provides:
//! - [`GeoCoordinate`]: Decimal-degree coordinate value
//! - [`haversine_distance`]: Great-circle distance in meters
//! - [`GeohashPrecision`] and [`MaxCorrections`]: Clamped pipeline newtypes

mod newtypes;
mod types;

pub use newtypes::{GeohashPrecision, MaxCorrections};
pub use types::{haversine_distance, GeoCoordinate, EARTH_RADIUS_METERS, METERS_PER_DEGREE};
