// SPDX-License-Identifier: MPL-2.0
//! `geotag_lens` recovers precise locations from the GPS metadata of photos.
//!
//! It provides a geohash codec, coordinate validation, a multi-strategy EXIF
//! GPS extractor, and a correction pipeline that upgrades coarse stored
//! geohashes using the photos attached to them. A small diagnostics layer
//! tracks coordinates across processing stages to measure drift.

#![doc(html_root_url = "https://docs.rs/geotag_lens/0.3.0")]

pub mod application;
pub mod config;
pub mod correction;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod geohash;
pub mod infrastructure;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_utils;
