// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and photo fixtures.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.

// Re-export approx macros for convenient use in tests
pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use crate::domain::geo::GeoCoordinate;
use crate::extraction::writer::embed_gps;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::{ExtendedColorType, ImageEncoder};

/// Default epsilon for coordinate comparisons in degrees.
pub const DEGREE_EPSILON: f64 = 1e-6;

/// Side length of the generated fixture image.
pub const FIXTURE_SIZE: u32 = 16;

/// Encodes a small gradient JPEG without any metadata.
pub fn jpeg_fixture() -> Vec<u8> {
    let pixels: Vec<u8> = (0..FIXTURE_SIZE * FIXTURE_SIZE)
        .flat_map(|i| {
            let v = (i % 256) as u8;
            [v, 255 - v, 128]
        })
        .collect();

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .write_image(&pixels, FIXTURE_SIZE, FIXTURE_SIZE, ExtendedColorType::Rgb8)
        .expect("fixture JPEG should encode");
    bytes
}

/// Encodes a small JPEG carrying `coordinate` in its EXIF GPS block.
pub fn geotagged_jpeg(latitude: f64, longitude: f64) -> Vec<u8> {
    embed_gps(&jpeg_fixture(), &GeoCoordinate::new(latitude, longitude))
        .expect("fixture GPS should embed")
}
