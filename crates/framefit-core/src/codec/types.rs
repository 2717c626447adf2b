//! Core types for the codec boundary.

use serde::{Deserialize, Serialize};

/// A decoded image with RGBA pixel data.
///
/// RGBA (not RGB) so that alpha survives the PNG/GIF/WebP paths through the
/// pipeline. Length is `width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 4,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbaImage` for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Size of the pixel data in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// Filter type for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    Transpose = 5,
    Rotate90CW = 6,
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// Whether this orientation swaps width and height. True for the 90 and
    /// 270 degree rotations and their flipped variants.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}
