// SPDX-License-Identifier: MPL-2.0
//! Core media types for the domain layer.
//!
//! These types represent pure data without any parsing dependencies.

/// MIME types that carry no information about the content.
const GENERIC_MIME_TYPES: &[&str] = &["application/octet-stream", "binary/octet-stream"];

/// Registered MIME top-level types.
const MIME_TOP_LEVEL: &[&str] = &[
    "application",
    "audio",
    "binary",
    "font",
    "image",
    "message",
    "model",
    "multipart",
    "text",
    "video",
];

/// `type/subtype` with a registered top-level type and no URL scheme.
fn is_mime_type(essence: &str) -> bool {
    match essence.split_once('/') {
        Some((top, subtype)) => {
            MIME_TOP_LEVEL.contains(&top) && !subtype.is_empty() && !subtype.contains('/')
        }
        None => false,
    }
}

/// Photo container formats known to the geotagging pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Jpeg,
    Tiff,
    Heic,
    Heif,
    Png,
    WebP,
    Gif,
    /// Anything else (including unknown MIME types).
    Other,
}

impl PhotoFormat {
    /// Classifies a declared type.
    ///
    /// Accepts a MIME type (`image/jpeg`), a bare extension (`jpg`, `.JPG`)
    /// or a file name / URL whose last path segment carries an extension
    /// (`IMG_0001.HEIC`, `https://host/p.jpg?size=large`).
    ///
    /// # Example
    ///
    /// ```
    /// use geotag_lens::domain::media::PhotoFormat;
    ///
    /// assert_eq!(PhotoFormat::from_declared("image/jpeg"), PhotoFormat::Jpeg);
    /// assert_eq!(PhotoFormat::from_declared("IMG_0042.HEIC"), PhotoFormat::Heic);
    /// assert_eq!(PhotoFormat::from_declared("video/mp4"), PhotoFormat::Other);
    /// ```
    #[must_use]
    pub fn from_declared(declared: &str) -> Self {
        let declared = declared.trim().to_ascii_lowercase();

        // MIME type, possibly with parameters ("image/jpeg; charset=binary")
        if let Some(subtype) = declared
            .split(';')
            .next()
            .and_then(|mime| mime.trim().strip_prefix("image/"))
        {
            return Self::from_token(subtype);
        }

        // Strip query string/fragment, then keep the last path segment
        let path = declared
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segment = path.rsplit('/').next().unwrap_or_default();
        let token = segment.rsplit('.').next().unwrap_or_default();
        Self::from_token(token)
    }

    /// Returns whether `declared` says nothing about the content.
    ///
    /// True for an empty value, `application/octet-stream`,
    /// `binary/octet-stream`, and file names or URLs without an extension.
    /// Any other MIME type or extension is a statement about the format.
    ///
    /// # Example
    ///
    /// ```
    /// use geotag_lens::domain::media::PhotoFormat;
    ///
    /// assert!(PhotoFormat::is_unspecified("application/octet-stream"));
    /// assert!(PhotoFormat::is_unspecified("https://host/photos/1234"));
    /// assert!(!PhotoFormat::is_unspecified("application/pdf"));
    /// ```
    #[must_use]
    pub fn is_unspecified(declared: &str) -> bool {
        let declared = declared.trim().to_ascii_lowercase();
        if declared.is_empty() {
            return true;
        }

        let essence = declared.split(';').next().unwrap_or_default().trim();
        if GENERIC_MIME_TYPES.contains(&essence) {
            return true;
        }
        if is_mime_type(essence) {
            return false;
        }

        let path = declared
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segment = path.rsplit('/').next().unwrap_or_default();
        match segment.rsplit_once('.') {
            Some((_, extension)) => extension.is_empty(),
            None => true,
        }
    }

    fn from_token(token: &str) -> Self {
        match token {
            "jpeg" | "jpg" | "jpe" | "jfif" | "pjpeg" => PhotoFormat::Jpeg,
            "tiff" | "tif" => PhotoFormat::Tiff,
            "heic" | "heic-sequence" => PhotoFormat::Heic,
            "heif" | "heif-sequence" => PhotoFormat::Heif,
            "png" => PhotoFormat::Png,
            "webp" => PhotoFormat::WebP,
            "gif" => PhotoFormat::Gif,
            _ => PhotoFormat::Other,
        }
    }

    /// Returns whether this format is on the EXIF allow-list.
    #[must_use]
    pub fn may_contain_exif(self) -> bool {
        matches!(
            self,
            PhotoFormat::Jpeg | PhotoFormat::Tiff | PhotoFormat::Heic | PhotoFormat::Heif
        )
    }

    /// Canonical MIME type.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "image/jpeg",
            PhotoFormat::Tiff => "image/tiff",
            PhotoFormat::Heic => "image/heic",
            PhotoFormat::Heif => "image/heif",
            PhotoFormat::Png => "image/png",
            PhotoFormat::WebP => "image/webp",
            PhotoFormat::Gif => "image/gif",
            PhotoFormat::Other => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types_are_classified() {
        assert_eq!(PhotoFormat::from_declared("image/jpeg"), PhotoFormat::Jpeg);
        assert_eq!(PhotoFormat::from_declared("IMAGE/TIFF"), PhotoFormat::Tiff);
        assert_eq!(PhotoFormat::from_declared("image/heic"), PhotoFormat::Heic);
        assert_eq!(PhotoFormat::from_declared("image/heif"), PhotoFormat::Heif);
        assert_eq!(
            PhotoFormat::from_declared("image/jpeg; charset=binary"),
            PhotoFormat::Jpeg
        );
        assert_eq!(PhotoFormat::from_declared("image/png"), PhotoFormat::Png);
    }

    #[test]
    fn extensions_and_names_are_classified() {
        assert_eq!(PhotoFormat::from_declared("jpg"), PhotoFormat::Jpeg);
        assert_eq!(PhotoFormat::from_declared(".JPEG"), PhotoFormat::Jpeg);
        assert_eq!(PhotoFormat::from_declared("scan.tif"), PhotoFormat::Tiff);
        assert_eq!(
            PhotoFormat::from_declared("https://cdn.example.com/a/b/IMG_1.HEIC?w=800"),
            PhotoFormat::Heic
        );
    }

    #[test]
    fn unknown_types_are_other() {
        assert_eq!(PhotoFormat::from_declared("video/mp4"), PhotoFormat::Other);
        assert_eq!(PhotoFormat::from_declared("notes.txt"), PhotoFormat::Other);
        assert_eq!(PhotoFormat::from_declared(""), PhotoFormat::Other);
    }

    #[test]
    fn generic_declarations_are_unspecified() {
        assert!(PhotoFormat::is_unspecified(""));
        assert!(PhotoFormat::is_unspecified("  "));
        assert!(PhotoFormat::is_unspecified("application/octet-stream"));
        assert!(PhotoFormat::is_unspecified("Binary/Octet-Stream; charset=binary"));
        assert!(PhotoFormat::is_unspecified("https://cdn.example.com/p/8812?w=400"));
        assert!(PhotoFormat::is_unspecified("IMG_0042"));
    }

    #[test]
    fn explicit_declarations_are_specified() {
        for declared in [
            "image/jpeg",
            "video/mp4",
            "application/pdf",
            "text/html; charset=utf-8",
            "notes.txt",
            "https://example.com/page.html",
            "IMG_0042.JPG",
        ] {
            assert!(!PhotoFormat::is_unspecified(declared), "{declared}");
        }
    }

    #[test]
    fn exif_allow_list() {
        assert!(PhotoFormat::Jpeg.may_contain_exif());
        assert!(PhotoFormat::Tiff.may_contain_exif());
        assert!(PhotoFormat::Heic.may_contain_exif());
        assert!(PhotoFormat::Heif.may_contain_exif());
        assert!(!PhotoFormat::Png.may_contain_exif());
        assert!(!PhotoFormat::WebP.may_contain_exif());
        assert!(!PhotoFormat::Other.may_contain_exif());
    }

    #[test]
    fn mime_type_round_trips_through_from_declared() {
        for format in [
            PhotoFormat::Jpeg,
            PhotoFormat::Tiff,
            PhotoFormat::Heic,
            PhotoFormat::Heif,
        ] {
            assert_eq!(PhotoFormat::from_declared(format.mime_type()), format);
        }
    }
}
