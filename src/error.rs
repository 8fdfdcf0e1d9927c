// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Json(String),
    Metadata(String),
    Geohash(GeohashError),
    Fetch(FetchError),
}

/// Errors raised by the geohash codec.
///
/// Callers are expected to validate coordinates before encoding; these
/// variants exist so that misuse is reported instead of silently clamped.
#[derive(Debug, Clone, PartialEq)]
pub enum GeohashError {
    /// Precision must be between 1 and the codec maximum (12).
    InvalidPrecision(u8),

    /// Latitude or longitude outside the WGS84 range.
    CoordinateOutOfRange { latitude: f64, longitude: f64 },

    /// Empty geohash string.
    EmptyHash,

    /// Character outside the geohash base32 alphabet.
    InvalidCharacter(char),
}

/// Failure to obtain photo bytes from a reference.
///
/// Never fatal for the correction pipeline: a failed fetch moves on to the
/// next photo reference.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    Network(String),

    /// The remote answered with a non-success HTTP status.
    Status(u16),

    /// Local file could not be read.
    Io(String),

    /// The response carried no bytes.
    EmptyBody,

    /// The body exceeded the fetcher's size cap (in bytes).
    TooLarge(u64),
}

/// Reason why no coordinate could be extracted from a photo.
///
/// Absence of GPS data is an expected outcome, so this is reported as a
/// value and never propagated as a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// Declared type is not one that can carry EXIF.
    UnsupportedFormat,

    /// File is too small to hold any metadata block.
    TooSmall { size: usize, minimum: usize },

    /// Every strategy ran and none produced an in-range coordinate.
    NoGpsData,
}

impl fmt::Display for GeohashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeohashError::InvalidPrecision(p) => write!(f, "Invalid geohash precision: {p}"),
            GeohashError::CoordinateOutOfRange {
                latitude,
                longitude,
            } => write!(f, "Coordinate out of range: ({latitude}, {longitude})"),
            GeohashError::EmptyHash => write!(f, "Empty geohash"),
            GeohashError::InvalidCharacter(c) => write!(f, "Invalid geohash character: '{c}'"),
        }
    }
}

impl std::error::Error for GeohashError {}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::Status(code) => write!(f, "HTTP status: {code}"),
            FetchError::Io(msg) => write!(f, "I/O error: {msg}"),
            FetchError::EmptyBody => write!(f, "Empty response body"),
            FetchError::TooLarge(limit) => write!(f, "Response larger than {limit} bytes"),
        }
    }
}

impl std::error::Error for FetchError {}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionFailure::UnsupportedFormat => write!(f, "Format cannot contain EXIF"),
            ExtractionFailure::TooSmall { size, minimum } => {
                write!(f, "File too small for metadata ({size} bytes, need more than {minimum})")
            }
            ExtractionFailure::NoGpsData => write!(f, "No GPS data found"),
        }
    }
}

impl std::error::Error for ExtractionFailure {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Json(e) => write!(f, "JSON Error: {}", e),
            Error::Metadata(e) => write!(f, "Metadata Error: {}", e),
            Error::Geohash(e) => write!(f, "Geohash Error: {}", e),
            Error::Fetch(e) => write!(f, "Fetch Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<GeohashError> for Error {
    fn from(err: GeohashError) -> Self {
        Error::Geohash(err)
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Error::Fetch(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn geohash_error_wraps_into_crate_error() {
        let err: Error = GeohashError::InvalidCharacter('a').into();
        assert!(matches!(err, Error::Geohash(GeohashError::InvalidCharacter('a'))));
        assert_eq!(
            format!("{}", err),
            "Geohash Error: Invalid geohash character: 'a'"
        );
    }

    #[test]
    fn fetch_error_display() {
        assert_eq!(format!("{}", FetchError::Status(404)), "HTTP status: 404");
        let err: Error = FetchError::Network("timed out".into()).into();
        assert!(format!("{}", err).contains("timed out"));
    }

    #[test]
    fn json_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn extraction_failure_display() {
        let failure = ExtractionFailure::TooSmall {
            size: 12,
            minimum: 128,
        };
        assert_eq!(
            format!("{}", failure),
            "File too small for metadata (12 bytes, need more than 128)"
        );
    }
}
