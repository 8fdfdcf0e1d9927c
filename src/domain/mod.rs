// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core value types and rules.
//!
//! This module contains pure domain types, value objects, and business rules.
//! Apart from `serde` derives it has no dependencies on external crates, so
//! every type here can be built and tested in isolation.
//!
//! # Modules
//!
//! - [`geo`]: Geographic types ([`GeoCoordinate`](geo::GeoCoordinate),
//!   [`GeohashPrecision`](geo::GeohashPrecision), [`MaxCorrections`](geo::MaxCorrections))
//! - [`media`]: Photo format types ([`PhotoFormat`](media::PhotoFormat))

pub mod geo;
pub mod media;
