//! Raster assets decoded from operator-supplied image files.

use std::fmt;

use thiserror::Error;

/// Bytes per pixel in the engine's skin/cape wire layout.
pub const RGBA_CHANNELS: usize = 4;

/// Error raised when a pixel buffer does not match its declared dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
pub struct AssetImageError {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub actual: usize,
}

/// A fully populated RGBA raster.
///
/// The buffer length always equals `width * height * 4`; the constructor is
/// the only way in, so a partially filled image cannot be observed. Once
/// built, an image is immutable.
#[derive(Clone, PartialEq, Eq)]
pub struct AssetImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AssetImage {
    /// Wraps a raw RGBA buffer, validating it against the declared dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AssetImageError> {
        let expected = width as usize * height as usize * RGBA_CHANNELS;
        if data.len() != expected {
            return Err(AssetImageError {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a single-color image, used for the built-in default skin.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * RGBA_CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for AssetImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Skip the pixel buffer; a 64x64 skin is already 16 KiB.
        f.debug_struct("AssetImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Arm-width classification of a humanoid skin.
///
/// Taken from the caller's filename/variant hint, never inferred from pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ArmWidth {
    #[default]
    Wide,
    Slim,
}
