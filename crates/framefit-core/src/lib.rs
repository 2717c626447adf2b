//! Framefit Core - image transformation pipeline
//!
//! This crate derives images that satisfy two independent constraints:
//! target pixel dimensions (via a "cover" crop) and a maximum encoded byte
//! size (via iterative lossy re-encoding).
//!
//! # Architecture
//!
//! Three operations, composed by one orchestrator:
//!
//! - [`probe`]: pixel dimensions of an encoded image
//! - [`cover_crop`]: scale until the image covers the target rectangle,
//!   then center-crop to exact target dimensions
//! - [`compress_to_budget`]: descend over encode quality (with format
//!   fallback) until a byte budget is met or the quality floor is hit
//! - [`process`]: probe, crop, compress, with short-circuits that return
//!   the input byte-identical when it already satisfies the constraints
//!
//! Codecs are consumed through the [`Codec`] capability trait; the
//! production implementation is [`RasterCodec`]. Each request owns its
//! buffers end to end, so concurrent calls on different inputs are
//! independent.
//!
//! # Examples
//!
//! ```ignore
//! use framefit_core::{CropRequest, EncodedImage, MediaType, Pipeline};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let source = EncodedImage::new("photo.jpg", MediaType::Jpeg, bytes);
//!
//! let pipeline = Pipeline::new();
//! let mut request = CropRequest::new(source);
//! request.target_width = Some(800);
//! request.target_height = Some(600);
//! let result = pipeline.process(request).unwrap();
//! println!("{} -> {} bytes", result.name, result.byte_len());
//! ```

pub mod codec;
pub mod compress;
pub mod cover;
pub mod error;
pub mod media;
pub mod pipeline;

pub use codec::{Codec, FilterType, Orientation, PixelBuffer, RasterCodec};
pub use compress::{compress_to_budget, mib_to_bytes, CompressionOptions, INITIAL_QUALITY};
pub use cover::{cover_crop, cover_scale, crop_offsets, resolve_targets, scaled_dimensions};
pub use error::TransformError;
pub use media::{rewrite_extension, EncodedImage, MediaType, PixelDimensions};
pub use pipeline::{probe, process, CropRequest, Pipeline};
