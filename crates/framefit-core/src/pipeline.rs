//! Request orchestration: probe, cover-crop, then size-budget compression,
//! with short-circuits that avoid unnecessary re-encoding.
//!
//! A source that is already small enough for the crop target and already
//! under the byte budget comes back byte-for-byte identical to the input.

use crate::codec::{Codec, RasterCodec};
use crate::compress::{compress_to_budget, CompressionOptions};
use crate::cover::{cover_crop, normalize_target};
use crate::error::TransformError;
use crate::media::{EncodedImage, PixelDimensions};

/// One transformation request: a source image, optional target dimensions,
/// and an optional byte budget for a follow-on compression pass.
#[derive(Debug, Clone)]
pub struct CropRequest {
    pub source: EncodedImage,
    pub target_width: Option<u32>,
    pub target_height: Option<u32>,
    pub max_bytes: Option<u64>,
}

impl CropRequest {
    pub fn new(source: EncodedImage) -> Self {
        Self {
            source,
            target_width: None,
            target_height: None,
            max_bytes: None,
        }
    }
}

/// Report the pixel dimensions of an encoded image.
pub fn probe(codec: &impl Codec, image: &EncodedImage) -> Result<PixelDimensions, TransformError> {
    codec.probe_dimensions(&image.bytes, image.media_type)
}

/// Run the full pipeline for one request.
///
/// The state machine is linear: with no target axes the source passes
/// through untouched. Otherwise the source is probed; a source that is
/// already within the target bound on at least one constrained axis skips
/// the crop entirely and only the byte budget is checked. Larger sources
/// are cover-cropped, then compressed if a budget is set.
///
/// The "already fits" test is deliberately `width <= target_width OR
/// height <= target_height`: a source under the bound on one axis is
/// returned as-is even if the other axis is far below its target, so the
/// result can be smaller than requested. Longstanding behavior, preserved;
/// callers needing an exact-size guarantee should call
/// [`cover_crop`](crate::cover::cover_crop) directly.
///
/// # Errors
///
/// Any probe, crop, or compression failure aborts the whole call; nothing
/// is caught or retried, and there is no partial result.
pub fn process(codec: &impl Codec, request: CropRequest) -> Result<EncodedImage, TransformError> {
    let CropRequest {
        source,
        target_width,
        target_height,
        max_bytes,
    } = request;

    let target_width = normalize_target(target_width);
    let target_height = normalize_target(target_height);
    if target_width.is_none() && target_height.is_none() {
        return Ok(source);
    }

    let dims = probe(codec, &source)?;
    // Absent axes compare false: only a constrained axis can satisfy the
    // "already fits" check.
    let already_fits = target_width.is_some_and(|t| dims.width <= t)
        || target_height.is_some_and(|t| dims.height <= t);

    if already_fits {
        return match max_bytes {
            Some(max) if source.byte_len() >= max => {
                compress_to_budget(codec, source, max, &CompressionOptions::default())
            }
            _ => Ok(source),
        };
    }

    let cropped = cover_crop(codec, source, target_width, target_height)?;
    match max_bytes {
        Some(max) => compress_to_budget(codec, cropped, max, &CompressionOptions::default()),
        None => Ok(cropped),
    }
}

/// Handle bundling a codec with the pipeline operations.
///
/// `Pipeline::new()` uses the production [`RasterCodec`]; any [`Codec`]
/// implementation can be substituted with [`Pipeline::with_codec`].
#[derive(Debug, Default, Clone)]
pub struct Pipeline<C: Codec = RasterCodec> {
    codec: C,
}

impl Pipeline<RasterCodec> {
    pub fn new() -> Self {
        Self {
            codec: RasterCodec::new(),
        }
    }
}

impl<C: Codec> Pipeline<C> {
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    pub fn probe(&self, image: &EncodedImage) -> Result<PixelDimensions, TransformError> {
        probe(&self.codec, image)
    }

    pub fn cover_crop(
        &self,
        image: EncodedImage,
        target_width: Option<u32>,
        target_height: Option<u32>,
    ) -> Result<EncodedImage, TransformError> {
        cover_crop(&self.codec, image, target_width, target_height)
    }

    pub fn compress_to_budget(
        &self,
        image: EncodedImage,
        max_bytes: u64,
        options: &CompressionOptions,
    ) -> Result<EncodedImage, TransformError> {
        compress_to_budget(&self.codec, image, max_bytes, options)
    }

    pub fn process(&self, request: CropRequest) -> Result<EncodedImage, TransformError> {
        process(&self.codec, request)
    }
}
