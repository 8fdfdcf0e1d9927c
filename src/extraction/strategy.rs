// SPDX-License-Identifier: MPL-2.0
//! Ordered GPS extraction strategies.
//!
//! Cameras and editing libraries disagree on how GPS data is laid out, so
//! each strategy is a full, independent parse of the same bytes. The first
//! one that yields a coordinate wins.

use std::fmt;
use std::io::Cursor;

use exif::{Exif, In, Reader, Tag};
use serde::Serialize;

use super::dms::{apply_reference, lenient_degrees, reference_letter, strict_dms};
use super::xmp;
use crate::domain::geo::GeoCoordinate;

/// EXIF identifier preceding the TIFF payload in APP1 segments.
const EXIF_HEADER: &[u8] = b"Exif\0\0";
const TIFF_LITTLE_ENDIAN: &[u8] = b"II*\0";
const TIFF_BIG_ENDIAN: &[u8] = b"MM\0*";

/// One way of reading GPS data out of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Container-aware parse of the primary IFD with lenient value shapes.
    Translated,
    /// Raw TIFF payload located by byte search, strict DMS with references.
    RawDms,
    /// GPS block attached to any IFD, strict DMS with references.
    Unfiltered,
    /// Embedded XMP packet.
    Xmp,
}

impl ExtractionStrategy {
    /// All strategies in priority order.
    pub const ALL: [ExtractionStrategy; 4] = [
        ExtractionStrategy::Translated,
        ExtractionStrategy::RawDms,
        ExtractionStrategy::Unfiltered,
        ExtractionStrategy::Xmp,
    ];

    /// Runs this strategy. Range checking is left to the caller.
    #[must_use]
    pub fn attempt(self, bytes: &[u8]) -> Option<GeoCoordinate> {
        match self {
            ExtractionStrategy::Translated => translated(bytes),
            ExtractionStrategy::RawDms => raw_dms(bytes),
            ExtractionStrategy::Unfiltered => unfiltered(bytes),
            ExtractionStrategy::Xmp => {
                let (latitude, longitude) = xmp::parse_gps(xmp::find_packet(bytes)?)?;
                Some(GeoCoordinate::new(latitude, longitude))
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionStrategy::Translated => "translated",
            ExtractionStrategy::RawDms => "raw_dms",
            ExtractionStrategy::Unfiltered => "unfiltered",
            ExtractionStrategy::Xmp => "xmp",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn translated(bytes: &[u8]) -> Option<GeoCoordinate> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;

    let axis = |value_tag: Tag, ref_tag: Tag, negative: u8| {
        let value = lenient_degrees(&exif.get_field(value_tag, In::PRIMARY)?.value)?;
        let reference = exif
            .get_field(ref_tag, In::PRIMARY)
            .and_then(reference_letter);
        Some(apply_reference(value, reference, negative))
    };

    let latitude = axis(Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S')?;
    let longitude = axis(Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W')?;
    Some(GeoCoordinate::new(latitude, longitude))
}

fn raw_dms(bytes: &[u8]) -> Option<GeoCoordinate> {
    let tiff = locate_tiff(bytes)?;
    let exif = Reader::new().read_raw(tiff.to_vec()).ok()?;
    strict_gps(&exif, In::PRIMARY)
}

fn unfiltered(bytes: &[u8]) -> Option<GeoCoordinate> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .or_else(|| {
            let tiff = locate_tiff(bytes)?;
            Reader::new().read_raw(tiff.to_vec()).ok()
        })?;

    let mut ifds: Vec<In> = exif
        .fields()
        .filter(|field| field.tag == Tag::GPSLatitude)
        .map(|field| field.ifd_num)
        .collect();
    ifds.dedup();

    ifds.into_iter().find_map(|ifd| strict_gps(&exif, ifd))
}

/// Strict DMS reading: three unsigned rationals per axis and a valid
/// hemisphere reference for each.
fn strict_gps(exif: &Exif, ifd: In) -> Option<GeoCoordinate> {
    let axis = |value_tag: Tag, ref_tag: Tag, positive: u8, negative: u8| {
        let value = strict_dms(&exif.get_field(value_tag, ifd)?.value)?;
        let reference = reference_letter(exif.get_field(ref_tag, ifd)?)?;
        if reference != positive && reference != negative {
            return None;
        }
        Some(apply_reference(value, Some(reference), negative))
    };

    let latitude = axis(Tag::GPSLatitude, Tag::GPSLatitudeRef, b'N', b'S')?;
    let longitude = axis(Tag::GPSLongitude, Tag::GPSLongitudeRef, b'E', b'W')?;
    Some(GeoCoordinate::new(latitude, longitude))
}

/// Finds the TIFF payload either after an `Exif\0\0` marker or as a bare
/// TIFF header anywhere in the bytes.
fn locate_tiff(bytes: &[u8]) -> Option<&[u8]> {
    if let Some(pos) = find(bytes, EXIF_HEADER) {
        return Some(&bytes[pos + EXIF_HEADER.len()..]);
    }
    [TIFF_LITTLE_ENDIAN, TIFF_BIG_ENDIAN]
        .iter()
        .filter_map(|magic| find(bytes, magic))
        .min()
        .map(|pos| &bytes[pos..])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
