//! Per-format encoding.
//!
//! JPEG, PNG and GIF go through the `image` crate's encoders; WebP goes
//! through libwebp (`webp` crate) because the `image` crate only offers a
//! lossless WebP encoder and the size-budget search needs the quality knob.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use super::types::PixelBuffer;
use crate::error::TransformError;
use crate::media::MediaType;

/// Encode a pixel buffer to the requested format.
///
/// `quality` is in `(0, 1]` and ignored for the lossless formats. Absent
/// quality means "maximum" for JPEG and lossless mode for WebP.
pub(super) fn encode(
    buffer: &PixelBuffer,
    media_type: MediaType,
    quality: Option<f32>,
) -> Result<Vec<u8>, TransformError> {
    if buffer.is_empty() {
        return Err(TransformError::InvalidArgument(
            "cannot encode an empty pixel buffer".to_string(),
        ));
    }

    match media_type {
        MediaType::Jpeg => encode_jpeg(buffer, quality.unwrap_or(1.0)),
        MediaType::Png => encode_png(buffer),
        MediaType::Gif => encode_gif(buffer),
        MediaType::WebP => encode_webp(buffer, quality),
        MediaType::Svg => Err(TransformError::Encode(
            "no encoder can produce image/svg+xml from raster pixels".to_string(),
        )),
    }
}

/// Map the `(0, 1]` quality contract to the 1-100 integer scale, clamping
/// out-of-range values instead of failing.
fn quality_percent(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn rgba_image(buffer: &PixelBuffer) -> Result<image::RgbaImage, TransformError> {
    buffer
        .to_rgba_image()
        .ok_or_else(|| TransformError::Encode("pixel buffer size mismatch".to_string()))
}

fn encode_jpeg(buffer: &PixelBuffer, quality: f32) -> Result<Vec<u8>, TransformError> {
    // JPEG has no alpha channel; flatten to RGB first.
    let rgb = DynamicImage::ImageRgba8(rgba_image(buffer)?).into_rgb8();

    let mut cursor = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut cursor, quality_percent(quality));
    encoder
        .write_image(
            rgb.as_raw(),
            buffer.width,
            buffer.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| TransformError::Encode(e.to_string()))?;

    Ok(cursor.into_inner())
}

fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, TransformError> {
    let mut cursor = Cursor::new(Vec::new());
    PngEncoder::new(&mut cursor)
        .write_image(
            &buffer.pixels,
            buffer.width,
            buffer.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| TransformError::Encode(e.to_string()))?;

    Ok(cursor.into_inner())
}

fn encode_gif(buffer: &PixelBuffer) -> Result<Vec<u8>, TransformError> {
    let mut out = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut out);
        encoder
            .encode(
                &buffer.pixels,
                buffer.width,
                buffer.height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| TransformError::Encode(e.to_string()))?;
    }
    Ok(out)
}

fn encode_webp(buffer: &PixelBuffer, quality: Option<f32>) -> Result<Vec<u8>, TransformError> {
    let encoder = webp::Encoder::from_rgba(&buffer.pixels, buffer.width, buffer.height);
    let memory = match quality {
        Some(q) => encoder.encode(f32::from(quality_percent(q))),
        None => encoder.encode_lossless(),
    };
    Ok(memory.to_vec())
}
