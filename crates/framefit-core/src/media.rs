//! Encoded image container and media type handling.
//!
//! [`MediaType`] is a closed enumeration validated at the boundary:
//! unrecognized MIME strings fail with
//! [`TransformError::UnsupportedMediaType`] instead of passing a prefix
//! check. [`EncodedImage`] is the value that flows through the pipeline:
//! each step consumes one and produces a new one, and the short-circuit
//! paths hand the input back bit-for-bit.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// The raster (and vector) image formats the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Jpeg,
    Png,
    Gif,
    WebP,
    /// Vector source. Recognized at the boundary but rasterized to PNG on
    /// output, since it cannot be re-encoded in place.
    Svg,
}

impl MediaType {
    /// Parse a MIME string into a media type.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedMediaType` for anything outside the closed set,
    /// including non-image MIME types.
    pub fn from_mime(mime: &str) -> Result<Self, TransformError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(MediaType::Jpeg),
            "image/png" => Ok(MediaType::Png),
            "image/gif" => Ok(MediaType::Gif),
            "image/webp" => Ok(MediaType::WebP),
            "image/svg+xml" => Ok(MediaType::Svg),
            other => Err(TransformError::UnsupportedMediaType(other.to_string())),
        }
    }

    /// Canonical MIME string.
    pub fn as_mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Gif => "image/gif",
            MediaType::WebP => "image/webp",
            MediaType::Svg => "image/svg+xml",
        }
    }

    /// Preferred filename extension. JPEG uses the short `jpg` form;
    /// everything else takes the MIME subtype verbatim.
    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
            MediaType::Gif => "gif",
            MediaType::WebP => "webp",
            MediaType::Svg => "svg",
        }
    }

    /// Whether the format has a meaningful quality/size tradeoff.
    pub fn is_lossy(self) -> bool {
        matches!(self, MediaType::Jpeg | MediaType::WebP)
    }

    /// Substitute type for the size-budget search when the source format has
    /// no useful quality knob: PNG and GIF fall back to WebP, everything
    /// else to JPEG.
    pub fn lossy_fallback(self) -> Self {
        match self {
            MediaType::Png | MediaType::Gif => MediaType::WebP,
            _ => MediaType::Jpeg,
        }
    }

    /// Output type for the cover-crop re-encode: the source type is
    /// preserved unless it is a vector format, which falls back to PNG.
    pub fn raster_output(self) -> Self {
        match self {
            MediaType::Svg => MediaType::Png,
            other => other,
        }
    }
}

/// Pixel dimensions of an image. Both values are >= 1 once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelDimensions {
    pub width: u32,
    pub height: u32,
}

impl PixelDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An encoded image blob with its declared media type and display name.
///
/// The name is used only for extension rewriting when a step re-encodes to
/// a different format. `last_modified` is stamped on every re-encode and
/// carried through unchanged on pass-through paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
    pub last_modified: Option<SystemTime>,
}

impl EncodedImage {
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes,
            last_modified: None,
        }
    }

    /// Construct from a raw MIME string, validating it at the boundary.
    pub fn from_mime(
        name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, TransformError> {
        Ok(Self::new(name, MediaType::from_mime(mime)?, bytes))
    }

    /// Encoded size in bytes.
    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Build the successor image produced by a re-encode: new bytes, new
    /// type, extension rewritten, fresh modification timestamp.
    pub(crate) fn reencoded(&self, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            name: rewrite_extension(&self.name, media_type),
            media_type,
            bytes,
            last_modified: Some(SystemTime::now()),
        }
    }
}

/// Replace the filename extension (if any) with the one matching the given
/// media type.
pub fn rewrite_extension(name: &str, media_type: MediaType) -> String {
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    format!("{}.{}", stem, media_type.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_recognized() {
        assert_eq!(MediaType::from_mime("image/jpeg").unwrap(), MediaType::Jpeg);
        assert_eq!(MediaType::from_mime("image/jpg").unwrap(), MediaType::Jpeg);
        assert_eq!(MediaType::from_mime("image/png").unwrap(), MediaType::Png);
        assert_eq!(MediaType::from_mime("IMAGE/WEBP").unwrap(), MediaType::WebP);
        assert_eq!(
            MediaType::from_mime("image/svg+xml").unwrap(),
            MediaType::Svg
        );
    }

    #[test]
    fn test_from_mime_rejects_non_image() {
        for mime in ["text/plain", "application/pdf", "image/tiff", ""] {
            assert!(matches!(
                MediaType::from_mime(mime),
                Err(TransformError::UnsupportedMediaType(_))
            ));
        }
    }

    #[test]
    fn test_lossy_fallback() {
        assert_eq!(MediaType::Png.lossy_fallback(), MediaType::WebP);
        assert_eq!(MediaType::Gif.lossy_fallback(), MediaType::WebP);
        assert_eq!(MediaType::Jpeg.lossy_fallback(), MediaType::Jpeg);
        assert_eq!(MediaType::WebP.lossy_fallback(), MediaType::Jpeg);
    }

    #[test]
    fn test_raster_output_falls_back_for_svg() {
        assert_eq!(MediaType::Svg.raster_output(), MediaType::Png);
        assert_eq!(MediaType::Jpeg.raster_output(), MediaType::Jpeg);
        assert_eq!(MediaType::WebP.raster_output(), MediaType::WebP);
    }

    #[test]
    fn test_rewrite_extension() {
        assert_eq!(rewrite_extension("photo.jpeg", MediaType::Jpeg), "photo.jpg");
        assert_eq!(rewrite_extension("photo.png", MediaType::WebP), "photo.webp");
        assert_eq!(rewrite_extension("noext", MediaType::Png), "noext.png");
        assert_eq!(
            rewrite_extension("archive.tar.gz", MediaType::Jpeg),
            "archive.tar.jpg"
        );
        assert_eq!(rewrite_extension(".hidden", MediaType::Png), ".hidden.png");
    }

    #[test]
    fn test_encoded_image_from_mime() {
        let img = EncodedImage::from_mime("a.png", "image/png", vec![1, 2, 3]).unwrap();
        assert_eq!(img.media_type, MediaType::Png);
        assert_eq!(img.byte_len(), 3);
        assert!(img.last_modified.is_none());

        assert!(EncodedImage::from_mime("a.txt", "text/plain", vec![]).is_err());
    }

    #[test]
    fn test_reencoded_rewrites_name_and_stamps_time() {
        let img = EncodedImage::new("photo.png", MediaType::Png, vec![0; 10]);
        let out = img.reencoded(MediaType::WebP, vec![0; 4]);
        assert_eq!(out.name, "photo.webp");
        assert_eq!(out.media_type, MediaType::WebP);
        assert_eq!(out.byte_len(), 4);
        assert!(out.last_modified.is_some());
    }
}
