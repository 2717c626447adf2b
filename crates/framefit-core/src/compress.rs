//! Size-budget compression: search downward over encode quality until an
//! image fits a byte budget or the quality floor is reached.
//!
//! The search never touches pixel dimensions (that is the cover-crop
//! engine's job) and never returns a result that is no smaller than its
//! input. Budget satisfaction is best-effort: when the floor is reached
//! without meeting the budget, the smaller of the final candidate and the
//! original wins.

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::error::TransformError;
use crate::media::EncodedImage;

/// Near-visually-lossless starting point for the quality descent.
pub const INITIAL_QUALITY: f32 = 0.95;

/// Knobs for the quality search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionOptions {
    /// Lowest quality attempted before giving up. In `(0, 1]`.
    pub min_quality: f32,
    /// Quality decrement per iteration. Must be > 0.
    pub quality_step: f32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            min_quality: 0.3,
            quality_step: 0.05,
        }
    }
}

impl CompressionOptions {
    fn validate(&self) -> Result<(), TransformError> {
        if !(self.min_quality > 0.0 && self.min_quality <= 1.0) {
            return Err(TransformError::InvalidArgument(format!(
                "min_quality must be in (0, 1], got {}",
                self.min_quality
            )));
        }
        if self.quality_step <= 0.0 {
            return Err(TransformError::InvalidArgument(format!(
                "quality_step must be > 0, got {}",
                self.quality_step
            )));
        }
        Ok(())
    }
}

/// Convert a mebibyte budget to bytes (1 MiB = 1024 * 1024 bytes).
pub fn mib_to_bytes(mib: f64) -> u64 {
    (mib * 1024.0 * 1024.0) as u64
}

/// Re-encode an image until it fits `max_bytes`, descending in quality.
///
/// An image already at or under budget is returned byte-identical, with no
/// re-encode. Otherwise the first candidate is encoded at the original
/// media type and quality 0.95; subsequent attempts use the lossy fallback
/// type (PNG/GIF sources switch to WebP, everything else to JPEG), stepping
/// quality down by `quality_step` and clamping at `min_quality`. The loop
/// terminates after at most `1 + ceil((0.95 - min_quality) / quality_step)`
/// encodes: quality is monotonically non-increasing and bounded below.
///
/// # Errors
///
/// `InvalidArgument` for out-of-range options; `Decode`/`Encode` failures
/// from the codec propagate uncaught; the search tolerates missed budgets,
/// not backend errors.
pub fn compress_to_budget(
    codec: &impl Codec,
    image: EncodedImage,
    max_bytes: u64,
    options: &CompressionOptions,
) -> Result<EncodedImage, TransformError> {
    options.validate()?;

    if image.byte_len() <= max_bytes {
        return Ok(image);
    }

    let pixels = codec.decode(&image.bytes, image.media_type)?;
    let fallback = image.media_type.lossy_fallback();

    let mut quality = INITIAL_QUALITY;
    let mut media_type = image.media_type;
    let mut candidate = codec.encode(&pixels, media_type, Some(quality))?;

    // Quality is derived from the attempt count rather than accumulated
    // subtraction, so float drift cannot sneak in an extra iteration past
    // the floor.
    let mut attempt = 0u32;
    while candidate.len() as u64 > max_bytes && quality > options.min_quality {
        attempt += 1;
        quality = (INITIAL_QUALITY - attempt as f32 * options.quality_step)
            .max(options.min_quality);
        media_type = fallback;
        candidate = codec.encode(&pixels, media_type, Some(quality))?;
    }

    // Never hand back a "compressed" blob that is no smaller than the input.
    if candidate.len() as u64 >= image.byte_len() {
        return Ok(image);
    }

    Ok(image.reencoded(media_type, candidate))
}
