use crate::texture::TextureInfo;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum MaterialAlphaMode {
    #[default]
    Opaque,
    // Alpha cutoff
    Mask(f32),
    Blend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalTextureInfo {
    pub texture: TextureInfo,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OcclusionTextureInfo {
    pub texture: TextureInfo,
    pub strength: f32,
}

/// Metallic-roughness material parameters with textures resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDefinition {
    pub name: Option<String>,
    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<TextureInfo>,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub metallic_roughness_texture: Option<TextureInfo>,
    pub normal_texture: Option<NormalTextureInfo>,
    pub occlusion_texture: Option<OcclusionTextureInfo>,
    pub emissive_texture: Option<TextureInfo>,
    pub emissive_factor: [f32; 3],
    pub alpha_mode: MaterialAlphaMode,
    pub double_sided: bool,
}

/// The material used by primitives that name none.
impl Default for MaterialDefinition {
    fn default() -> Self {
        Self {
            name: None,
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: [0.0, 0.0, 0.0],
            alpha_mode: MaterialAlphaMode::Opaque,
            double_sided: false,
        }
    }
}

/// A material materialized for one primitive.
///
/// Every primitive gets its own instance. Two instances built from the same
/// definition and joint count compare equal but are distinct objects.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialInstance {
    definition_index: Option<usize>,
    definition: MaterialDefinition,
    joint_count: usize,
}

impl MaterialInstance {
    pub(crate) fn new(
        definition_index: Option<usize>,
        definition: MaterialDefinition,
        joint_count: usize,
    ) -> Self {
        Self {
            definition_index,
            definition,
            joint_count,
        }
    }

    /// Index of the definition, `None` for the default material.
    pub fn definition_index(&self) -> Option<usize> {
        self.definition_index
    }

    pub fn name(&self) -> Option<&str> {
        self.definition.name.as_deref()
    }

    pub fn definition(&self) -> &MaterialDefinition {
        &self.definition
    }

    /// Number of skin joints the material is parameterized for.
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    pub fn is_skinned(&self) -> bool {
        self.joint_count > 0
    }
}
