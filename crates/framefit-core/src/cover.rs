//! Cover-crop engine: scale an image until it fully covers a target
//! rectangle, then center-crop to exact target dimensions.
//!
//! "Cover" (as opposed to "contain") means the scaled image is never smaller
//! than the target on either axis, so the crop window always fits. The
//! geometry is pure and tested without a codec; the [`cover_crop`] operation
//! drives it through the [`Codec`] capabilities.

use crate::codec::Codec;
use crate::error::TransformError;
use crate::media::{EncodedImage, PixelDimensions};

/// Re-encode quality for lossy output after a crop.
pub(crate) const CROP_QUALITY: f32 = 0.9;

/// Treat zero the same as absent for a target axis.
pub(crate) fn normalize_target(target: Option<u32>) -> Option<u32> {
    target.filter(|&value| value > 0)
}

/// Resolve the effective target rectangle.
///
/// With both axes given, they are used as-is. With exactly one axis given,
/// the other is derived from the same scale factor so the result is not
/// stretched. With neither, there is no target and the caller should
/// pass the image through unchanged.
pub fn resolve_targets(
    source: PixelDimensions,
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Option<PixelDimensions> {
    match (target_width, target_height) {
        (Some(width), Some(height)) => Some(PixelDimensions::new(width, height)),
        (Some(width), None) => {
            let scale = f64::from(width) / f64::from(source.width);
            let height = (scale * f64::from(source.height)).round().max(1.0) as u32;
            Some(PixelDimensions::new(width, height))
        }
        (None, Some(height)) => {
            let scale = f64::from(height) / f64::from(source.height);
            let width = (scale * f64::from(source.width)).round().max(1.0) as u32;
            Some(PixelDimensions::new(width, height))
        }
        (None, None) => None,
    }
}

/// The cover scale: the larger of the two axis ratios, so the scaled image
/// is at least as large as the target on both axes.
pub fn cover_scale(source: PixelDimensions, target: PixelDimensions) -> f64 {
    let scale_w = f64::from(target.width) / f64::from(source.width);
    let scale_h = f64::from(target.height) / f64::from(source.height);
    scale_w.max(scale_h)
}

/// Dimensions after applying the cover scale, rounding up so the scaled
/// image never falls short of the target by a sub-pixel amount.
pub fn scaled_dimensions(source: PixelDimensions, scale: f64) -> PixelDimensions {
    PixelDimensions::new(
        (f64::from(source.width) * scale).ceil() as u32,
        (f64::from(source.height) * scale).ceil() as u32,
    )
}

/// Centered crop offsets. Non-negative whenever `scaled` covers `target`.
pub fn crop_offsets(scaled: PixelDimensions, target: PixelDimensions) -> (u32, u32) {
    (
        scaled.width.saturating_sub(target.width) / 2,
        scaled.height.saturating_sub(target.height) / 2,
    )
}

/// Crop an image to exactly cover the target rectangle.
///
/// With both targets absent (or zero) the input is returned unchanged.
/// With one target absent, the missing axis is derived from the other
/// axis's scale factor. The output preserves the source media type, except
/// vector sources which are rasterized to PNG; lossy output is re-encoded
/// at quality 0.9 and the filename extension is rewritten to match.
///
/// Note that this engine always crops; the "source already small enough"
/// short-circuit lives in [`process`](crate::pipeline::process), not here.
///
/// # Errors
///
/// Propagates `Decode`/`Encode`/`InvalidArgument` from the codec untouched.
pub fn cover_crop(
    codec: &impl Codec,
    image: EncodedImage,
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Result<EncodedImage, TransformError> {
    let target_width = normalize_target(target_width);
    let target_height = normalize_target(target_height);
    if target_width.is_none() && target_height.is_none() {
        return Ok(image);
    }

    let source = codec.probe_dimensions(&image.bytes, image.media_type)?;
    let Some(target) = resolve_targets(source, target_width, target_height) else {
        return Ok(image);
    };

    let scale = cover_scale(source, target);
    let scaled = scaled_dimensions(source, scale);

    let pixels = codec.decode(&image.bytes, image.media_type)?;
    let resized = codec.resize(&pixels, scaled.width, scaled.height)?;

    let (x, y) = crop_offsets(scaled, target);
    let window = codec.crop_window(&resized, x, y, target.width, target.height)?;

    let output_type = image.media_type.raster_output();
    let quality = output_type.is_lossy().then_some(CROP_QUALITY);
    let bytes = codec.encode(&window, output_type, quality)?;

    Ok(image.reencoded(output_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::mock::{MockCodec, RecordedOp};
    use crate::codec::RasterCodec;
    use crate::media::MediaType;

    fn dims(w: u32, h: u32) -> PixelDimensions {
        PixelDimensions::new(w, h)
    }

    // =========================================================================
    // Pure geometry
    // =========================================================================

    #[test]
    fn resolve_both_axes_given() {
        assert_eq!(
            resolve_targets(dims(4000, 3000), Some(800), Some(600)),
            Some(dims(800, 600))
        );
    }

    #[test]
    fn resolve_missing_height_from_width_scale() {
        // 4000x3000 at target width 800: scale 0.2, height 600
        assert_eq!(
            resolve_targets(dims(4000, 3000), Some(800), None),
            Some(dims(800, 600))
        );
    }

    #[test]
    fn resolve_missing_width_from_height_scale() {
        assert_eq!(
            resolve_targets(dims(4000, 3000), None, Some(600)),
            Some(dims(800, 600))
        );
    }

    #[test]
    fn resolve_rounds_to_at_least_one_pixel() {
        // Extreme downscale on a narrow image still yields a 1px axis.
        assert_eq!(
            resolve_targets(dims(10000, 2), Some(100), None),
            Some(dims(100, 1))
        );
    }

    #[test]
    fn resolve_nothing_to_do() {
        assert_eq!(resolve_targets(dims(100, 100), None, None), None);
    }

    #[test]
    fn cover_scale_uses_larger_ratio() {
        // 800/4000 = 0.2, 600/3000 = 0.2: equal ratios
        assert_eq!(cover_scale(dims(4000, 3000), dims(800, 600)), 0.2);
        // 500/1000 = 0.5 vs 300/1000 = 0.3: width ratio wins
        assert_eq!(cover_scale(dims(1000, 1000), dims(500, 300)), 0.5);
        // Upscale: source smaller than target
        assert_eq!(cover_scale(dims(100, 100), dims(200, 150)), 2.0);
    }

    #[test]
    fn scaled_dimensions_round_up() {
        // 333 * 0.7 = 233.1 -> 234
        assert_eq!(scaled_dimensions(dims(333, 100), 0.7), dims(234, 70));
    }

    #[test]
    fn offsets_are_centered_and_floored() {
        assert_eq!(crop_offsets(dims(1000, 600), dims(800, 600)), (100, 0));
        // Odd slack floors: (101 - 100) / 2 = 0
        assert_eq!(crop_offsets(dims(101, 100), dims(100, 99)), (0, 0));
    }

    // =========================================================================
    // Engine, against the mock
    // =========================================================================

    #[test]
    fn noop_when_both_targets_absent() {
        let codec = MockCodec::new(400, 300);
        let src = EncodedImage::new("a.png", MediaType::Png, vec![1, 2, 3]);
        let out = cover_crop(&codec, src.clone(), None, None).unwrap();
        assert_eq!(out, src);
        assert!(codec.operations().is_empty());
    }

    #[test]
    fn zero_targets_are_treated_as_absent() {
        let codec = MockCodec::new(400, 300);
        let src = EncodedImage::new("a.png", MediaType::Png, vec![1, 2, 3]);
        let out = cover_crop(&codec, src.clone(), Some(0), Some(0)).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn records_probe_decode_resize_crop_encode() {
        let codec = MockCodec::new(1000, 1000);
        let src = EncodedImage::new("a.jpg", MediaType::Jpeg, vec![0; 100]);
        cover_crop(&codec, src, Some(500), Some(300)).unwrap();

        let ops = codec.operations();
        assert!(matches!(ops[0], RecordedOp::Probe(MediaType::Jpeg)));
        assert!(matches!(ops[1], RecordedOp::Decode(MediaType::Jpeg)));
        // scale 0.5 -> 500x500 scaled, window 500x300 at (0, 100)
        assert!(matches!(ops[2], RecordedOp::Resize { width: 500, height: 500 }));
        assert!(matches!(
            ops[3],
            RecordedOp::Crop {
                x: 0,
                y: 100,
                width: 500,
                height: 300
            }
        ));
        assert!(matches!(
            ops[4],
            RecordedOp::Encode {
                media_type: MediaType::Jpeg,
                quality: Some(q)
            } if (q - 0.9).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn svg_source_is_rasterized_to_png() {
        let codec = MockCodec::new(300, 300);
        let src = EncodedImage::new("logo.svg", MediaType::Svg, vec![0; 10]);
        let out = cover_crop(&codec, src, Some(100), Some(100)).unwrap();
        assert_eq!(out.media_type, MediaType::Png);
        assert_eq!(out.name, "logo.png");
        // Lossless output: no quality passed to the encoder.
        assert!(codec
            .operations()
            .iter()
            .any(|op| matches!(op, RecordedOp::Encode { media_type: MediaType::Png, quality: None })));
    }

    // =========================================================================
    // Engine, against the real codec
    // =========================================================================

    fn png_image(width: u32, height: u32) -> EncodedImage {
        let codec = RasterCodec::new();
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
            }
        }
        let buf = crate::codec::PixelBuffer::new(width, height, pixels);
        let bytes = codec.encode(&buf, MediaType::Png, None).unwrap();
        EncodedImage::new("src.png", MediaType::Png, bytes)
    }

    #[test]
    fn crop_exactness_with_real_codec() {
        let codec = RasterCodec::new();
        let out = cover_crop(&codec, png_image(400, 300), Some(80), Some(60)).unwrap();
        assert_eq!(out.media_type, MediaType::Png);
        assert_eq!(out.name, "src.png");
        assert!(out.last_modified.is_some());

        let dims = codec.probe_dimensions(&out.bytes, out.media_type).unwrap();
        assert_eq!(dims, PixelDimensions::new(80, 60));
    }

    #[test]
    fn crop_exactness_with_mismatched_aspect() {
        let codec = RasterCodec::new();
        // 400x300 (4:3) into 50x100 (1:2): scale binds on height
        let out = cover_crop(&codec, png_image(400, 300), Some(50), Some(100)).unwrap();
        let dims = codec.probe_dimensions(&out.bytes, out.media_type).unwrap();
        assert_eq!(dims, PixelDimensions::new(50, 100));
    }

    #[test]
    fn single_axis_target_keeps_aspect() {
        let codec = RasterCodec::new();
        let out = cover_crop(&codec, png_image(400, 300), Some(100), None).unwrap();
        let dims = codec.probe_dimensions(&out.bytes, out.media_type).unwrap();
        assert_eq!(dims, PixelDimensions::new(100, 75));
    }
}
