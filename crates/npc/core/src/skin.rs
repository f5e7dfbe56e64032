//! Engine-ready skin descriptors produced by the asset decoder.

use crate::asset::{ArmWidth, AssetImage};

/// A validated skin ready to hand to the engine at entity creation.
///
/// Descriptors are immutable once constructed; a registry reload replaces
/// them wholesale. The identifier is deterministic: for a plain image it is
/// the asset's logical name, and for an image paired with custom geometry it
/// is derived from a content hash so the same file pair always yields the
/// same id and different geometry yields a different one.
#[derive(Clone, Debug, PartialEq)]
pub struct SkinDescriptor {
    id: String,
    arm_width: ArmWidth,
    resource_patch: String,
    geometry: String,
    image: AssetImage,
    cape: Option<AssetImage>,
}

impl SkinDescriptor {
    pub fn new(
        id: impl Into<String>,
        arm_width: ArmWidth,
        resource_patch: impl Into<String>,
        geometry: impl Into<String>,
        image: AssetImage,
    ) -> Self {
        Self {
            id: id.into(),
            arm_width,
            resource_patch: resource_patch.into(),
            geometry: geometry.into(),
            image,
            cape: None,
        }
    }

    /// Returns a copy of this descriptor carrying the given cape texture.
    pub fn with_cape(mut self, cape: AssetImage) -> Self {
        self.cape = Some(cape);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn arm_width(&self) -> ArmWidth {
        self.arm_width
    }

    /// Resource-patch JSON naming which geometry variant the engine binds.
    pub fn resource_patch(&self) -> &str {
        &self.resource_patch
    }

    /// Geometry-description document (the built-in humanoid template unless
    /// the skin shipped custom geometry).
    pub fn geometry(&self) -> &str {
        &self.geometry
    }

    pub fn image(&self) -> &AssetImage {
        &self.image
    }

    pub fn cape(&self) -> Option<&AssetImage> {
        self.cape.as_ref()
    }
}
