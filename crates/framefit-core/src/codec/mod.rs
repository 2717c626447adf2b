//! Codec capability boundary.
//!
//! The pipeline never implements codecs itself: decoding, encoding,
//! dimension probing, and the geometric transforms are consumed through the
//! [`Codec`] trait. The production implementation is [`RasterCodec`], backed
//! by the `image` crate plus libwebp. Tests drive the pipeline through a
//! recording mock instead.
//!
//! Quality is a float in `(0, 1]` at this boundary; implementations map it
//! to whatever scale their backend uses. It is ignored for lossless formats.

mod decode;
mod encode;
mod raster;
mod types;

pub use raster::RasterCodec;
pub use types::{FilterType, Orientation, PixelBuffer};

use crate::error::TransformError;
use crate::media::{MediaType, PixelDimensions};

/// The capabilities the pipeline requires from its environment.
///
/// All methods take `&self`; implementations must not share mutable state
/// between calls, so concurrent requests on different inputs are independent.
pub trait Codec {
    /// Decode an encoded blob into a pixel buffer at its native dimensions.
    fn decode(&self, bytes: &[u8], media_type: MediaType) -> Result<PixelBuffer, TransformError>;

    /// Encode a pixel buffer. `quality` is in `(0, 1]` and ignored for
    /// lossless formats.
    fn encode(
        &self,
        buffer: &PixelBuffer,
        media_type: MediaType,
        quality: Option<f32>,
    ) -> Result<Vec<u8>, TransformError>;

    /// Report the pixel dimensions of an encoded blob. May be implemented
    /// via header inspection without a full decode.
    fn probe_dimensions(
        &self,
        bytes: &[u8],
        media_type: MediaType,
    ) -> Result<PixelDimensions, TransformError>;

    /// Resize to exact dimensions. Pure geometric transform, no format
    /// change.
    fn resize(
        &self,
        buffer: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, TransformError>;

    /// Extract a `width x height` window at `(x, y)`. The window must lie
    /// within the buffer.
    fn crop_window(
        &self,
        buffer: &PixelBuffer,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, TransformError>;
}
