// SPDX-License-Identifier: MPL-2.0
//! Identification of stored locations that are worth correcting.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Correction;
use crate::domain::geo::{GeoCoordinate, GeohashPrecision};
use crate::error::GeohashError;
use crate::geohash;

/// Image URLs in free text: http(s), ends in an image extension, optional
/// query string. Group 1 is the URL; the match also consumes the character
/// that ends it, so `1.jpg.html` is not read as `1.jpg`.
static IMAGE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(https?://[^\s"'<>()\[\]]+\.(?:jpe?g|png|gif|webp|heic|heif|tiff?)(?:\?[^\s"'<>()\[\]#]*)?)(?:$|[\s"'<>()\[\],;!#]|\.(?:$|\s))"#,
    )
    .expect("Image URL regex should compile")
});

/// Tags whose first value is an image reference.
const IMAGE_TAGS: &[&str] = &["image", "thumb"];

/// A stored location as handed over by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    pub geohash: String,

    /// Explicit image references.
    #[serde(default)]
    pub images: Vec<String>,

    /// Structured metadata, each tag a name followed by its values.
    #[serde(default)]
    pub tags: Vec<Vec<String>>,

    /// Free text that may mention image URLs.
    #[serde(default)]
    pub content: String,
}

/// A stored location decoded from its geohash.
///
/// Precision, coordinate and accuracy label are all derived from the
/// geohash and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionMarker {
    id: String,
    geohash: String,
    precision: u8,
    coordinate: GeoCoordinate,
    accuracy_label: &'static str,
    photo_refs: Vec<String>,
    corrected_confidence: Option<f64>,
}

impl PrecisionMarker {
    /// Builds a marker by decoding `geohash`.
    ///
    /// # Errors
    ///
    /// Returns a [`GeohashError`] when the geohash is empty, contains a
    /// character outside the base32 alphabet, or is longer than 255.
    pub fn from_geohash(
        id: impl Into<String>,
        geohash: &str,
        photo_refs: Vec<String>,
    ) -> Result<Self, GeohashError> {
        let geohash = geohash.trim().to_ascii_lowercase();
        let coordinate = geohash::decode(&geohash)?;
        let precision = geohash::hash_precision(&geohash)?;

        Ok(Self {
            id: id.into(),
            geohash,
            precision,
            coordinate,
            accuracy_label: geohash::accuracy_label(precision),
            photo_refs,
            corrected_confidence: None,
        })
    }

    /// Builds a marker from a stored record, collecting its photo references.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_geohash`](Self::from_geohash).
    pub fn from_record(record: &LocationRecord) -> Result<Self, GeohashError> {
        Self::from_geohash(record.id.clone(), &record.geohash, collect_photo_refs(record))
    }

    /// Returns the marker rebuilt from the correction's geohash.
    pub(crate) fn corrected(&self, correction: &Correction) -> Result<Self, GeohashError> {
        let mut marker = Self::from_geohash(
            self.id.clone(),
            correction.corrected_geohash(),
            self.photo_refs.clone(),
        )?;
        marker.corrected_confidence = Some(correction.confidence());
        Ok(marker)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn geohash(&self) -> &str {
        &self.geohash
    }

    /// Geohash length.
    #[must_use]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Center of the geohash cell.
    #[must_use]
    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    #[must_use]
    pub fn accuracy_label(&self) -> &'static str {
        self.accuracy_label
    }

    #[must_use]
    pub fn photo_refs(&self) -> &[String] {
        &self.photo_refs
    }

    /// Confidence of the correction applied to this marker, if any.
    #[must_use]
    pub fn corrected_confidence(&self) -> Option<f64> {
        self.corrected_confidence
    }

    #[must_use]
    pub fn is_corrected(&self) -> bool {
        self.corrected_confidence.is_some()
    }
}

/// Returns whether `reference` looks like an image URL.
#[must_use]
pub fn is_image_url(reference: &str) -> bool {
    let reference = reference.trim();
    image_urls(reference)
        .next()
        .is_some_and(|url| url.len() == reference.len())
}

fn image_urls(text: &str) -> impl Iterator<Item = &str> {
    IMAGE_URL_REGEX
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|url| url.as_str())
}

/// Collects the photo references attached to a record, first-seen order,
/// without duplicates.
///
/// Sources, in order: explicit `images`, `image`/`thumb` tags, `r` tags
/// holding an image URL, `imeta` entries of the form `url <URL>`, then
/// image URLs found in the free-text content.
#[must_use]
pub fn collect_photo_refs(record: &LocationRecord) -> Vec<String> {
    let explicit = record.images.iter().map(String::as_str);

    let structured = record.tags.iter().flat_map(|tag| {
        let (name, values) = match tag.split_first() {
            Some((name, values)) => (name.as_str(), values),
            None => ("", &[][..]),
        };
        let refs: Vec<&str> = match name {
            n if IMAGE_TAGS.contains(&n) => values.first().map(String::as_str).into_iter().collect(),
            "r" => values
                .first()
                .map(String::as_str)
                .filter(|value| is_image_url(value))
                .into_iter()
                .collect(),
            "imeta" => values
                .iter()
                .filter_map(|entry| entry.strip_prefix("url "))
                .collect(),
            _ => Vec::new(),
        };
        refs
    });

    let scanned = image_urls(&record.content);

    let mut seen = HashSet::new();
    explicit
        .chain(structured)
        .chain(scanned)
        .map(str::trim)
        .filter(|reference| !reference.is_empty())
        .filter(|reference| seen.insert(reference.to_string()))
        .map(str::to_string)
        .collect()
}

/// Returns markers for records whose geohash is shorter than `threshold`.
///
/// Records with an undecodable geohash are logged and skipped.
#[must_use]
pub fn identify_low_precision_markers(
    records: &[LocationRecord],
    threshold: GeohashPrecision,
) -> Vec<PrecisionMarker> {
    records
        .iter()
        .filter(|record| record.geohash.trim().chars().count() < usize::from(threshold.value()))
        .filter_map(|record| match PrecisionMarker::from_record(record) {
            Ok(marker) => {
                tracing::debug!(
                    marker = marker.id(),
                    precision = marker.precision(),
                    photos = marker.photo_refs().len(),
                    "identified"
                );
                Some(marker)
            }
            Err(e) => {
                tracing::warn!(record = %record.id, geohash = %record.geohash, error = %e, "skipping record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn record(id: &str, geohash: &str) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            geohash: geohash.to_string(),
            ..LocationRecord::default()
        }
    }

    fn tag(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn marker_derives_fields_from_geohash() {
        let marker = PrecisionMarker::from_geohash("m1", " U281Z ", vec![]).unwrap();
        assert_eq!(marker.geohash(), "u281z");
        assert_eq!(marker.precision(), 5);
        assert_eq!(marker.accuracy_label(), "±2.4 km");
        assert_abs_diff_eq!(marker.coordinate().latitude(), 48.14208984375, epsilon = 1e-12);
        assert_abs_diff_eq!(marker.coordinate().longitude(), 11.57958984375, epsilon = 1e-12);
        assert!(!marker.is_corrected());
    }

    #[test]
    fn marker_rejects_bad_geohash() {
        assert_eq!(
            PrecisionMarker::from_geohash("m", "", vec![]),
            Err(GeohashError::EmptyHash)
        );
        assert_eq!(
            PrecisionMarker::from_geohash("m", "u2a", vec![]),
            Err(GeohashError::InvalidCharacter('a'))
        );
    }

    #[test]
    fn image_url_detection() {
        assert!(is_image_url("https://cdn.example.com/a/b.JPG"));
        assert!(is_image_url("http://x.org/p.webp?w=400&h=300"));
        assert!(!is_image_url("https://example.com/page.html"));
        assert!(!is_image_url("see https://x.org/p.png"));
    }

    #[test]
    fn collects_from_every_source_in_order() {
        let record = LocationRecord {
            id: "r".into(),
            geohash: "u281z".into(),
            images: vec!["https://a.com/1.jpg".into()],
            tags: vec![
                tag(&["image", "https://a.com/2.jpg"]),
                tag(&["thumb", "https://a.com/3.jpg"]),
                tag(&["r", "https://a.com/article"]),
                tag(&["r", "https://a.com/4.png"]),
                tag(&["imeta", "url https://a.com/5.heic", "m image/heic"]),
                tag(&["t", "https://a.com/ignored.jpg"]),
                tag(&[]),
            ],
            content: "Sunset (https://a.com/6.jpeg?size=l) and again https://a.com/1.jpg".into(),
        };

        assert_eq!(
            collect_photo_refs(&record),
            vec![
                "https://a.com/1.jpg",
                "https://a.com/2.jpg",
                "https://a.com/3.jpg",
                "https://a.com/4.png",
                "https://a.com/5.heic",
                "https://a.com/6.jpeg?size=l",
            ]
        );
    }

    #[test]
    fn content_scan_ignores_non_images() {
        let record = LocationRecord {
            content: "read https://blog.example.com/post and https://x.org/file.pdf".into(),
            ..record("r", "u281z")
        };
        assert!(collect_photo_refs(&record).is_empty());
    }

    #[test]
    fn content_scan_keeps_whole_urls() {
        let record = LocationRecord {
            content: "gallery https://a.com/1.jpg.html, then https://a.com/2.png, \
                      https://a.com/3.gif; and finally https://a.com/4.webp."
                .into(),
            ..record("r", "u281z")
        };
        assert_eq!(
            collect_photo_refs(&record),
            vec![
                "https://a.com/2.png",
                "https://a.com/3.gif",
                "https://a.com/4.webp",
            ]
        );
        assert!(!is_image_url("https://a.com/1.jpg.html"));
    }

    #[test]
    fn identifies_only_low_precision_records() {
        let records = vec![
            record("coarse", "u281z"),
            record("exact", "u281zbcd"),
            record("threshold", "u281zb"),
            record("broken", "u2!"),
            record("empty", ""),
        ];

        let markers = identify_low_precision_markers(&records, GeohashPrecision::new(6));
        let ids: Vec<&str> = markers.iter().map(PrecisionMarker::id).collect();
        assert_eq!(ids, vec!["coarse"]);
    }

    #[test]
    fn record_deserializes_with_defaults() {
        let record: LocationRecord =
            serde_json::from_str(r#"{"id":"a","geohash":"u281z"}"#).unwrap();
        assert!(record.images.is_empty());
        assert!(record.tags.is_empty());
        assert!(record.content.is_empty());
    }
}
