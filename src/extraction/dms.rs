// SPDX-License-Identifier: MPL-2.0
//! Degree/minute/second helpers for EXIF GPS values.

use exif::{Field, Value};

/// Converts degrees, minutes and seconds to decimal degrees.
#[must_use]
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Reads a strict three-component unsigned rational DMS value.
pub fn strict_dms(value: &Value) -> Option<f64> {
    match value {
        Value::Rational(rationals) if rationals.len() == 3 => {
            let decimal = dms_to_decimal(
                rationals[0].to_f64(),
                rationals[1].to_f64(),
                rationals[2].to_f64(),
            );
            decimal.is_finite().then_some(decimal)
        }
        _ => None,
    }
}

/// Reads a GPS coordinate value in whatever numeric shape a writer used.
///
/// One component is decimal degrees, two are degrees and decimal minutes,
/// three or more are degrees, minutes and seconds. Signed rationals and
/// floating-point values are accepted.
pub fn lenient_degrees(value: &Value) -> Option<f64> {
    let components: Vec<f64> = match value {
        Value::Rational(v) => v.iter().map(|r| r.to_f64()).collect(),
        Value::SRational(v) => v.iter().map(|r| r.to_f64()).collect(),
        Value::Float(v) => v.iter().map(|&f| f64::from(f)).collect(),
        Value::Double(v) => v.clone(),
        _ => return None,
    };

    let decimal = match components.as_slice() {
        [] => return None,
        [degrees] => *degrees,
        [degrees, minutes] => dms_to_decimal(degrees.abs(), *minutes, 0.0).copysign(*degrees),
        [degrees, minutes, seconds, ..] => {
            dms_to_decimal(degrees.abs(), *minutes, *seconds).copysign(*degrees)
        }
    };
    decimal.is_finite().then_some(decimal)
}

/// First letter of an ASCII reference field (`N`, `S`, `E`, `W`), uppercased.
pub fn reference_letter(field: &Field) -> Option<u8> {
    match &field.value {
        Value::Ascii(strings) => strings
            .iter()
            .flat_map(|s| s.iter())
            .find(|b| !b.is_ascii_whitespace())
            .map(u8::to_ascii_uppercase),
        _ => None,
    }
}

/// Applies a hemisphere reference: `negative` (S or W) forces a negative
/// value, any other letter or a missing reference keeps the parsed sign.
#[must_use]
pub fn apply_reference(value: f64, reference: Option<u8>, negative: u8) -> f64 {
    match reference {
        Some(letter) if letter == negative => -value.abs(),
        _ => value,
    }
}
