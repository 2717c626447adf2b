//! Decoding and dimension probing with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::types::{Orientation, PixelBuffer};
use crate::error::TransformError;
use crate::media::{MediaType, PixelDimensions};

/// Decode an encoded blob into an RGBA pixel buffer.
///
/// JPEG sources get EXIF orientation correction applied so the buffer is in
/// display orientation. The decode buffer is dropped on every exit path;
/// nothing is cached between calls.
pub(super) fn decode(bytes: &[u8], media_type: MediaType) -> Result<PixelBuffer, TransformError> {
    let orientation = orientation_of(bytes, media_type);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    let img = apply_orientation(img, orientation);
    Ok(PixelBuffer::from_rgba_image(img.into_rgba8()))
}

/// Report pixel dimensions from the format header, without a full decode.
///
/// Dimensions are orientation-corrected for JPEG, so a rotated camera file
/// reports its display width/height.
pub(super) fn probe_dimensions(
    bytes: &[u8],
    media_type: MediaType,
) -> Result<PixelDimensions, TransformError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    if orientation_of(bytes, media_type).swaps_dimensions() {
        Ok(PixelDimensions::new(height, width))
    } else {
        Ok(PixelDimensions::new(width, height))
    }
}

/// EXIF orientation for JPEG sources; everything else is Normal.
fn orientation_of(bytes: &[u8], media_type: MediaType) -> Orientation {
    if media_type != MediaType::Jpeg {
        return Orientation::Normal;
    }
    extract_orientation(bytes)
}

/// Extract EXIF orientation, defaulting to Normal when there is no EXIF
/// block or no orientation tag.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
