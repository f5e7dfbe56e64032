//! Decoding of image and geometry files into validated descriptors.
//!
//! Decoding is pure: the functions here read nothing from disk, and a failure
//! is always returned to the caller instead of yielding a partially built
//! descriptor. The one silent path is a geometry document that names no
//! usable identifier; that falls back to the built-in template.

mod geometry;

use npc_core::{ArmWidth, AssetImage, SkinDescriptor};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub use geometry::{
    BUILTIN_GEOMETRY, RESOURCE_PATCH_SLIM, RESOURCE_PATCH_WIDE, default_resource_patch,
    extract_identifier, resource_patch,
};

/// Errors raised while turning raw bytes into a descriptor.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source bytes are not a readable raster image.
    #[error("unreadable image")]
    UnreadableImage(#[source] image::ImageError),

    /// The decoder produced a pixel buffer that does not match its declared
    /// dimensions.
    #[error("decoded pixel buffer does not match {width}x{height} RGBA")]
    InvalidDimensions { width: u32, height: u32 },

    /// A geometry document that could not be parsed at all.
    #[error("malformed geometry document")]
    MalformedGeometry(#[source] serde_json::Error),
}

/// Decodes raw image bytes into a validated RGBA raster.
///
/// Any unreadable input yields [`DecodeError::UnreadableImage`]; a decoder
/// that silently truncates is caught by the dimension check, so callers never
/// see a partially populated image.
pub fn decode_image(bytes: &[u8]) -> Result<AssetImage, DecodeError> {
    let decoded = image::load_from_memory(bytes).map_err(DecodeError::UnreadableImage)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    AssetImage::new(width, height, rgba.into_raw())
        .map_err(|_| DecodeError::InvalidDimensions { width, height })
}

/// Decodes a skin image plus optional custom geometry into a descriptor.
///
/// Arm width comes from the caller (filename hint), never from pixels. With
/// no geometry document the descriptor binds the built-in humanoid template
/// and the identifier is the logical name. With custom geometry the
/// identifier is derived from a content hash of the image bytes and resource
/// patch, so the same file pair always produces the same id and different
/// geometry busts any engine-side cache.
pub fn decode_skin(
    image_bytes: &[u8],
    geometry_document: Option<&str>,
    logical_name: &str,
    arm_width: ArmWidth,
) -> Result<SkinDescriptor, DecodeError> {
    let image = decode_image(image_bytes)?;

    if let Some(document) = geometry_document {
        match extract_identifier(document) {
            Ok(Some(identifier)) => {
                let patch = resource_patch(&identifier);
                let id = skin_id(logical_name, image_bytes, &patch);
                return Ok(SkinDescriptor::new(id, arm_width, patch, document, image));
            }
            Ok(None) => {
                tracing::debug!(skin = logical_name, "geometry names no identifier, using built-in template");
            }
            Err(error) => {
                tracing::warn!(skin = logical_name, %error, "malformed geometry, using built-in template");
            }
        }
    }

    Ok(SkinDescriptor::new(
        logical_name,
        arm_width,
        default_resource_patch(arm_width),
        BUILTIN_GEOMETRY,
        image,
    ))
}

/// Deterministic skin identifier for an image/geometry pair.
fn skin_id(logical_name: &str, image_bytes: &[u8], patch: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image_bytes);
    hasher.update(patch.as_bytes());
    let digest = hasher.finalize();
    format!("{}-{}", logical_name, hex::encode(&digest[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smallest useful fixture: encode a flat-color PNG in memory.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixel = image::Rgba([10u8, 20, 30, 255]);
        let buffer = image::RgbaImage::from_pixel(width, height, pixel);
        let mut bytes = std::io::Cursor::new(Vec::new());
        buffer
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn decode_image_yields_exact_rgba_buffer() {
        let image = decode_image(&png_bytes(64, 32)).unwrap();
        assert_eq!(image.width(), 64);
        assert_eq!(image.height(), 32);
        assert_eq!(image.data().len(), 64 * 32 * 4);
    }

    #[test]
    fn decode_image_rejects_garbage() {
        let err = decode_image(b"not an image").unwrap_err();
        assert!(matches!(err, DecodeError::UnreadableImage(_)));
    }

    #[test]
    fn plain_skin_uses_logical_name_and_builtin_template() {
        let skin = decode_skin(&png_bytes(64, 64), None, "guide", ArmWidth::Slim).unwrap();
        assert_eq!(skin.id(), "guide");
        assert_eq!(skin.resource_patch(), RESOURCE_PATCH_SLIM);
        assert_eq!(skin.geometry(), BUILTIN_GEOMETRY);
    }

    #[test]
    fn custom_geometry_hashes_into_identifier() {
        let bytes = png_bytes(64, 64);
        let doc = r#"{"format_version":"1.12.0","minecraft:geometry":[{"description":{"identifier":"geometry.knight"}}]}"#;

        let first = decode_skin(&bytes, Some(doc), "knight", ArmWidth::Wide).unwrap();
        let second = decode_skin(&bytes, Some(doc), "knight", ArmWidth::Wide).unwrap();

        assert_eq!(first.id(), second.id(), "identifier must be deterministic");
        assert!(first.id().starts_with("knight-"));
        assert_eq!(
            first.resource_patch(),
            r#"{"geometry":{"default":"geometry.knight"}}"#
        );
        assert_eq!(first.geometry(), doc);
    }

    #[test]
    fn different_geometry_yields_different_identifier() {
        let bytes = png_bytes(64, 64);
        let knight = r#"{"format_version":"1.12.0","minecraft:geometry":[{"description":{"identifier":"geometry.knight"}}]}"#;
        let wizard = r#"{"format_version":"1.12.0","minecraft:geometry":[{"description":{"identifier":"geometry.wizard"}}]}"#;

        let a = decode_skin(&bytes, Some(knight), "hero", ArmWidth::Wide).unwrap();
        let b = decode_skin(&bytes, Some(wizard), "hero", ArmWidth::Wide).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn unusable_geometry_falls_back_without_error() {
        let bytes = png_bytes(64, 64);

        // Parses, but the modern shape holds no identifier.
        let empty = r#"{"format_version":"1.16.0","minecraft:geometry":[]}"#;
        let skin = decode_skin(&bytes, Some(empty), "guide", ArmWidth::Wide).unwrap();
        assert_eq!(skin.id(), "guide");
        assert_eq!(skin.geometry(), BUILTIN_GEOMETRY);

        // Does not parse at all.
        let skin = decode_skin(&bytes, Some("{broken"), "guide", ArmWidth::Wide).unwrap();
        assert_eq!(skin.id(), "guide");
        assert_eq!(skin.resource_patch(), RESOURCE_PATCH_WIDE);
    }
}
