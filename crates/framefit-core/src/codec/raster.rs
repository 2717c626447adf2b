//! Production codec backed by the `image` crate.

use image::imageops;

use super::types::{FilterType, PixelBuffer};
use super::{decode, encode, Codec};
use crate::error::TransformError;
use crate::media::{MediaType, PixelDimensions};

/// Pure Rust codec: `image` crate decoders/encoders, libwebp for lossy WebP,
/// EXIF-aware JPEG handling.
///
/// Stateless apart from the resampling filter choice, so a single instance
/// can serve concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct RasterCodec {
    /// Filter used for resize operations.
    pub filter: FilterType,
}

impl RasterCodec {
    pub fn new() -> Self {
        Self {
            filter: FilterType::default(),
        }
    }

    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for RasterCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn rgba_image(buffer: &PixelBuffer) -> Result<image::RgbaImage, TransformError> {
    buffer
        .to_rgba_image()
        .ok_or_else(|| TransformError::InvalidArgument("pixel buffer size mismatch".to_string()))
}

impl Codec for RasterCodec {
    fn decode(&self, bytes: &[u8], media_type: MediaType) -> Result<PixelBuffer, TransformError> {
        decode::decode(bytes, media_type)
    }

    fn encode(
        &self,
        buffer: &PixelBuffer,
        media_type: MediaType,
        quality: Option<f32>,
    ) -> Result<Vec<u8>, TransformError> {
        encode::encode(buffer, media_type, quality)
    }

    fn probe_dimensions(
        &self,
        bytes: &[u8],
        media_type: MediaType,
    ) -> Result<PixelDimensions, TransformError> {
        decode::probe_dimensions(bytes, media_type)
    }

    fn resize(
        &self,
        buffer: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, TransformError> {
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidArgument(format!(
                "resize dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }

        // Fast path: nothing to do.
        if buffer.width == width && buffer.height == height {
            return Ok(buffer.clone());
        }

        let img = rgba_image(buffer)?;
        let resized = imageops::resize(&img, width, height, self.filter.to_image_filter());
        Ok(PixelBuffer::from_rgba_image(resized))
    }

    fn crop_window(
        &self,
        buffer: &PixelBuffer,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, TransformError> {
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidArgument(format!(
                "crop window must be non-zero, got {}x{}",
                width, height
            )));
        }
        if x.checked_add(width).is_none_or(|right| right > buffer.width)
            || y.checked_add(height).is_none_or(|bottom| bottom > buffer.height)
        {
            return Err(TransformError::InvalidArgument(format!(
                "crop window {}x{}+{}+{} exceeds buffer {}x{}",
                width, height, x, y, buffer.width, buffer.height
            )));
        }

        let img = rgba_image(buffer)?;
        let window = imageops::crop_imm(&img, x, y, width, height).to_image();
        Ok(PixelBuffer::from_rgba_image(window))
    }
}
