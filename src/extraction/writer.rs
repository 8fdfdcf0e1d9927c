// SPDX-License-Identifier: MPL-2.0
//! Embeds GPS coordinates into JPEG files as an EXIF APP1 segment.
//!
//! The block written here is minimal: IFD0 holds a single GPS IFD pointer
//! and the GPS IFD carries the version, hemisphere references and DMS
//! rationals. Any EXIF segment already present is replaced, other segments
//! are preserved in order.

use crate::domain::geo::GeoCoordinate;
use crate::error::{Error, Result};

/// EXIF identifier at the start of an APP1 payload.
const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Resolution of the seconds component.
const SECONDS_DENOMINATOR: u32 = 10_000;

const TAG_GPS_IFD_POINTER: u16 = 0x8825;
const TAG_GPS_VERSION: u16 = 0x0000;
const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
const TAG_GPS_LATITUDE: u16 = 0x0002;
const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
const TAG_GPS_LONGITUDE: u16 = 0x0004;

const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

// Offsets inside the TIFF block.
const GPS_IFD_OFFSET: u32 = 26;
const GPS_ENTRY_COUNT: u16 = 5;
const LATITUDE_OFFSET: u32 = 92;
const LONGITUDE_OFFSET: u32 = 116;
const TIFF_LEN: usize = 140;

/// Converts decimal degrees to a degree/minute/second rational triple.
///
/// The sign is dropped; the hemisphere is carried by the reference tag.
/// Rounding happens once on the total so seconds never reach 60.
#[must_use]
pub fn decimal_to_dms(decimal: f64) -> [(u32, u32); 3] {
    let units_per_degree = 3600 * u64::from(SECONDS_DENOMINATOR);
    let total = (decimal.abs() * units_per_degree as f64).round() as u64;

    let degrees = total / units_per_degree;
    let remainder = total % units_per_degree;
    let units_per_minute = 60 * u64::from(SECONDS_DENOMINATOR);
    let minutes = remainder / units_per_minute;
    let seconds = remainder % units_per_minute;

    [
        (degrees as u32, 1),
        (minutes as u32, 1),
        (seconds as u32, SECONDS_DENOMINATOR),
    ]
}

/// Returns a copy of `jpeg` carrying `coordinate` in its EXIF GPS IFD.
///
/// The APP1 segment goes right after SOI, or right after a leading APP0
/// (JFIF) segment since JFIF requires APP0 first. Existing EXIF APP1
/// segments are dropped.
///
/// # Errors
///
/// Returns [`Error::Metadata`] if the input is not a JPEG, its segment
/// structure is truncated, or the coordinate is outside the valid range.
pub fn embed_gps(jpeg: &[u8], coordinate: &GeoCoordinate) -> Result<Vec<u8>> {
    if !coordinate.is_in_range() {
        return Err(Error::Metadata(format!(
            "Coordinate out of range: {}",
            coordinate.format()
        )));
    }
    if jpeg.len() < 4 || jpeg[0] != 0xFF || jpeg[1] != 0xD8 {
        return Err(Error::Metadata("Not a valid JPEG file".to_string()));
    }

    let exif_segment = build_exif_segment(coordinate);
    let mut output = Vec::with_capacity(jpeg.len() + exif_segment.len());
    output.extend_from_slice(&jpeg[..2]);

    let mut pos = 2;
    let mut inserted = false;

    while pos < jpeg.len() {
        if pos + 4 > jpeg.len() || jpeg[pos] != 0xFF {
            return Err(Error::Metadata(
                "Truncated JPEG segment structure".to_string(),
            ));
        }

        let marker = jpeg[pos + 1];

        // Entropy-coded data follows SOS; copy the rest untouched.
        if marker == 0xDA || marker == 0xD9 {
            break;
        }

        let segment_len = usize::from(u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]));
        let segment_end = pos + 2 + segment_len;
        if segment_len < 2 || segment_end > jpeg.len() {
            return Err(Error::Metadata(
                "Truncated JPEG segment structure".to_string(),
            ));
        }

        // JFIF requires APP0 to stay first.
        if !inserted && marker != 0xE0 {
            output.extend_from_slice(&exif_segment);
            inserted = true;
        }

        let payload = &jpeg[pos + 4..segment_end];
        let is_exif = marker == 0xE1 && payload.starts_with(EXIF_HEADER);
        if !is_exif {
            output.extend_from_slice(&jpeg[pos..segment_end]);
        }

        pos = segment_end;
    }

    if !inserted {
        output.extend_from_slice(&exif_segment);
    }
    output.extend_from_slice(&jpeg[pos..]);

    Ok(output)
}

fn build_exif_segment(coordinate: &GeoCoordinate) -> Vec<u8> {
    let tiff = build_tiff(coordinate);
    let length = 2 + EXIF_HEADER.len() + tiff.len();

    let mut segment = Vec::with_capacity(2 + length);
    segment.extend_from_slice(&[0xFF, 0xE1]);
    // Fixed TIFF size keeps this far below the 64 KiB segment limit.
    segment.extend_from_slice(&(length as u16).to_be_bytes());
    segment.extend_from_slice(EXIF_HEADER);
    segment.extend_from_slice(&tiff);
    segment
}

fn build_tiff(coordinate: &GeoCoordinate) -> Vec<u8> {
    let latitude_ref = if coordinate.latitude() < 0.0 { b'S' } else { b'N' };
    let longitude_ref = if coordinate.longitude() < 0.0 { b'W' } else { b'E' };

    let mut tiff = Vec::with_capacity(TIFF_LEN);

    // Header: big-endian, magic 42, IFD0 at offset 8.
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes());

    // IFD0
    tiff.extend_from_slice(&1u16.to_be_bytes());
    push_entry(
        &mut tiff,
        TAG_GPS_IFD_POINTER,
        TYPE_LONG,
        1,
        GPS_IFD_OFFSET.to_be_bytes(),
    );
    tiff.extend_from_slice(&0u32.to_be_bytes());

    // GPS IFD
    tiff.extend_from_slice(&GPS_ENTRY_COUNT.to_be_bytes());
    push_entry(&mut tiff, TAG_GPS_VERSION, TYPE_BYTE, 4, [2, 2, 0, 0]);
    push_entry(
        &mut tiff,
        TAG_GPS_LATITUDE_REF,
        TYPE_ASCII,
        2,
        [latitude_ref, 0, 0, 0],
    );
    push_entry(
        &mut tiff,
        TAG_GPS_LATITUDE,
        TYPE_RATIONAL,
        3,
        LATITUDE_OFFSET.to_be_bytes(),
    );
    push_entry(
        &mut tiff,
        TAG_GPS_LONGITUDE_REF,
        TYPE_ASCII,
        2,
        [longitude_ref, 0, 0, 0],
    );
    push_entry(
        &mut tiff,
        TAG_GPS_LONGITUDE,
        TYPE_RATIONAL,
        3,
        LONGITUDE_OFFSET.to_be_bytes(),
    );
    tiff.extend_from_slice(&0u32.to_be_bytes());

    push_rationals(&mut tiff, coordinate.latitude());
    push_rationals(&mut tiff, coordinate.longitude());

    debug_assert_eq!(tiff.len(), TIFF_LEN);
    tiff
}

fn push_entry(tiff: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
    tiff.extend_from_slice(&tag.to_be_bytes());
    tiff.extend_from_slice(&kind.to_be_bytes());
    tiff.extend_from_slice(&count.to_be_bytes());
    tiff.extend_from_slice(&value);
}

fn push_rationals(tiff: &mut Vec<u8>, decimal: f64) {
    for (num, denom) in decimal_to_dms(decimal) {
        tiff.extend_from_slice(&num.to_be_bytes());
        tiff.extend_from_slice(&denom.to_be_bytes());
    }
}
