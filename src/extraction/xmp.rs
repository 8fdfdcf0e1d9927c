// SPDX-License-Identifier: MPL-2.0
//! GPS coordinates from embedded XMP packets.
//!
//! XMP stores GPS positions as `exif:GPSLatitude` / `exif:GPSLongitude`
//! using the `DDD,MM.mmmk` or `DDD,MM,SSk` notation, where `k` is the
//! hemisphere letter. Writers put them either as attributes of
//! `rdf:Description` or as child elements, so both are handled.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::dms::dms_to_decimal;

const XMP_OPEN: &[u8] = b"<x:xmpmeta";
const XMP_CLOSE: &[u8] = b"</x:xmpmeta>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"GPSLatitude" => Some(Axis::Latitude),
            b"GPSLongitude" => Some(Axis::Longitude),
            _ => None,
        }
    }
}

/// Locates the `x:xmpmeta` packet anywhere in the file.
///
/// The packet is plain text inside an APP1 segment (JPEG), a TIFF tag or a
/// HEIF item, so a byte search covers every container without walking it.
pub fn find_packet(bytes: &[u8]) -> Option<&[u8]> {
    let start = find(bytes, XMP_OPEN)?;
    let end = find(&bytes[start..], XMP_CLOSE)? + start + XMP_CLOSE.len();
    Some(&bytes[start..end])
}

/// Extracts `(latitude, longitude)` in decimal degrees from an XMP packet.
pub fn parse_gps(packet: &[u8]) -> Option<(f64, f64)> {
    let mut reader = Reader::from_reader(packet);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut latitude = None;
    let mut longitude = None;
    let mut current: Option<Axis> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                read_attributes(e, &mut latitude, &mut longitude);
                current = Axis::from_local_name(e.local_name().as_ref());
            }
            Ok(Event::Empty(ref e)) => {
                read_attributes(e, &mut latitude, &mut longitude);
            }
            Ok(Event::Text(ref e)) => {
                if let Some(axis) = current {
                    let parsed = e
                        .unescape()
                        .ok()
                        .and_then(|text| parse_xmp_degrees(&text));
                    match axis {
                        Axis::Latitude => latitude = latitude.or(parsed),
                        Axis::Longitude => longitude = longitude.or(parsed),
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        if latitude.is_some() && longitude.is_some() {
            break;
        }
        buf.clear();
    }

    Some((latitude?, longitude?))
}

fn read_attributes(element: &BytesStart<'_>, latitude: &mut Option<f64>, longitude: &mut Option<f64>) {
    for attr in element.attributes().flatten() {
        let Some(axis) = Axis::from_local_name(attr.key.local_name().as_ref()) else {
            continue;
        };
        let parsed = attr
            .unescape_value()
            .ok()
            .and_then(|value| parse_xmp_degrees(&value));
        match axis {
            Axis::Latitude => *latitude = latitude.or(parsed),
            Axis::Longitude => *longitude = longitude.or(parsed),
        }
    }
}

/// Parses an XMP GPS coordinate string into signed decimal degrees.
///
/// Accepts `52,5.442N`, `52,5,26.52N` and, for lenient writers, a bare
/// decimal such as `-33.8688`.
pub fn parse_xmp_degrees(value: &str) -> Option<f64> {
    let value = value.trim();
    let last = value.chars().last()?;

    let (body, negative) = match last.to_ascii_uppercase() {
        'N' | 'E' => (&value[..value.len() - 1], false),
        'S' | 'W' => (&value[..value.len() - 1], true),
        _ => (value, false),
    };

    let parts: Vec<f64> = body
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<_>>()?;

    let magnitude = match parts.as_slice() {
        [decimal] => *decimal,
        [degrees, minutes] => dms_to_decimal(*degrees, *minutes, 0.0),
        [degrees, minutes, seconds] => dms_to_decimal(*degrees, *minutes, *seconds),
        _ => return None,
    };

    if !magnitude.is_finite() {
        return None;
    }
    Some(if negative { -magnitude.abs() } else { magnitude })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
