//! Raw, index-addressed records as produced by a document reader.
//!
//! Nothing in here is resolved: every reference to another record is the
//! position of that record inside its sequence in [`RawDocument`].
//! [`Model::build`](crate::model::Model::build) turns these records into a
//! linked model.

use crate::accessor::{ComponentType, ElementType};

#[derive(Debug, Clone, Default)]
pub struct RawBuffer {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub byte_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBufferTarget {
    ArrayBuffer,
    ElementArrayBuffer,
}

#[derive(Debug, Clone, Default)]
pub struct RawBufferView {
    pub name: Option<String>,
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
    pub target: Option<RawBufferTarget>,
}

#[derive(Debug, Clone)]
pub struct RawSparseIndices {
    pub buffer_view: usize,
    pub byte_offset: usize,
    pub component_type: ComponentType,
}

#[derive(Debug, Clone)]
pub struct RawSparseValues {
    pub buffer_view: usize,
    pub byte_offset: usize,
}

#[derive(Debug, Clone)]
pub struct RawSparse {
    pub count: usize,
    pub indices: RawSparseIndices,
    pub values: RawSparseValues,
}

#[derive(Debug, Clone)]
pub struct RawAccessor {
    pub name: Option<String>,
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    pub count: usize,
    pub component_type: ComponentType,
    pub element_type: ElementType,
    pub normalized: bool,
    pub min: Option<Vec<f64>>,
    pub max: Option<Vec<f64>>,
    pub sparse: Option<RawSparse>,
}

impl RawAccessor {
    pub fn new(component_type: ComponentType, element_type: ElementType, count: usize) -> Self {
        Self {
            name: None,
            buffer_view: None,
            byte_offset: 0,
            count,
            component_type,
            element_type,
            normalized: false,
            min: None,
            max: None,
            sparse: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RawImage {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub mime_type: Option<String>,
    pub buffer_view: Option<usize>,
}

/// Sampler parameters as GL enum values.
#[derive(Debug, Clone, Default)]
pub struct RawSampler {
    pub name: Option<String>,
    pub mag_filter: Option<u32>,
    pub min_filter: Option<u32>,
    pub wrap_s: Option<u32>,
    pub wrap_t: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct RawTexture {
    pub name: Option<String>,
    pub sampler: Option<usize>,
    pub source: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RawTextureInfo {
    pub index: usize,
    pub tex_coord: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RawAlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

#[derive(Debug, Clone)]
pub struct RawMaterial {
    pub name: Option<String>,
    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<RawTextureInfo>,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub metallic_roughness_texture: Option<RawTextureInfo>,
    pub normal_texture: Option<RawTextureInfo>,
    pub normal_scale: f32,
    pub occlusion_texture: Option<RawTextureInfo>,
    pub occlusion_strength: f32,
    pub emissive_texture: Option<RawTextureInfo>,
    pub emissive_factor: [f32; 3],
    pub alpha_mode: RawAlphaMode,
    pub alpha_cutoff: Option<f32>,
    pub double_sided: bool,
}

impl Default for RawMaterial {
    fn default() -> Self {
        Self {
            name: None,
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
            normal_texture: None,
            normal_scale: 1.0,
            occlusion_texture: None,
            occlusion_strength: 1.0,
            emissive_texture: None,
            emissive_factor: [0.0, 0.0, 0.0],
            alpha_mode: RawAlphaMode::Opaque,
            alpha_cutoff: None,
            double_sided: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RawProjection {
    Perspective {
        aspect_ratio: Option<f32>,
        yfov: f32,
        znear: f32,
        zfar: Option<f32>,
    },
    Orthographic {
        xmag: f32,
        ymag: f32,
        znear: f32,
        zfar: f32,
    },
}

#[derive(Debug, Clone)]
pub struct RawCamera {
    pub name: Option<String>,
    pub projection: RawProjection,
}

/// Attribute semantic name to accessor index, in declaration order.
pub type RawAttributes = Vec<(String, usize)>;

#[derive(Debug, Clone, Default)]
pub struct RawPrimitive {
    /// GL draw mode, `None` means triangles.
    pub mode: Option<u32>,
    pub indices: Option<usize>,
    pub attributes: RawAttributes,
    pub targets: Vec<RawAttributes>,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    pub name: Option<String>,
    pub primitives: Vec<RawPrimitive>,
    pub weights: Vec<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct RawNode {
    pub name: Option<String>,
    pub camera: Option<usize>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    /// Column-major local matrix, exclusive with the TRS parts.
    pub matrix: Option<[f32; 16]>,
    pub translation: Option<[f32; 3]>,
    /// Unit quaternion as `[x, y, z, w]`.
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    pub weights: Vec<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct RawScene {
    pub name: Option<String>,
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RawSkin {
    pub name: Option<String>,
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Option<usize>,
    pub skeleton: Option<usize>,
}

/// All records of one document, one sequence per kind.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub accessors: Vec<RawAccessor>,
    pub buffers: Vec<RawBuffer>,
    pub buffer_views: Vec<RawBufferView>,
    pub cameras: Vec<RawCamera>,
    pub images: Vec<RawImage>,
    pub materials: Vec<RawMaterial>,
    pub meshes: Vec<RawMesh>,
    pub nodes: Vec<RawNode>,
    pub samplers: Vec<RawSampler>,
    pub scenes: Vec<RawScene>,
    pub skins: Vec<RawSkin>,
    pub textures: Vec<RawTexture>,
    /// Default scene.
    pub scene: Option<usize>,
}
