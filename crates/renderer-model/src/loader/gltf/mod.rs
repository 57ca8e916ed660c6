//! Read glTF 2.0 documents (`.gltf` and `.glb`) into [`RawDocument`]s.
//!
//! The `gltf` crate parses the JSON and the binary container. Only the JSON
//! tree is used here: the records are copied into their raw form and every
//! reference is left to [`Model::build`] to resolve.

use std::collections::BTreeMap;

use bytes::Bytes;
use gltf::{
    json::{self, validation::Checked, Index, Value},
    Gltf,
};
use log::debug;
use thiserror::Error;

use crate::{
    accessor::{ComponentType, ElementType},
    archive::Archive,
    error::{BoxedError, ModelError},
    index::{RecordIndex, RecordKind},
    loader::LoadParams,
    model::Model,
    raw::{
        RawAccessor, RawAlphaMode, RawAttributes, RawBuffer, RawBufferTarget, RawBufferView,
        RawCamera, RawDocument, RawImage, RawMaterial, RawMesh, RawNode, RawPrimitive,
        RawProjection, RawSampler, RawScene, RawSkin, RawSparse, RawSparseIndices,
        RawSparseValues, RawTexture, RawTextureInfo,
    },
    resource::{ArchiveLoader, ResourceLoader},
};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Invalid {field} in {record}")]
    Invalid {
        record: RecordIndex,
        field: &'static str,
    },
    #[error("Unsupported component type {code} in {record}")]
    UnsupportedComponentType { record: RecordIndex, code: u32 },
    #[error("Camera #{0} has no projection parameters")]
    MissingProjection(usize),
}

#[derive(Debug, Error)]
pub enum GltfLoaderError {
    #[error(transparent)]
    Gltf(#[from] gltf::Error),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Failed to read bundle: {0}")]
    Archive(#[source] BoxedError),
    #[error("File {0} not found in bundle")]
    ModelNotFound(String),
}

fn checked<T: Clone>(
    value: &Checked<T>,
    record: RecordIndex,
    field: &'static str,
) -> Result<T, ReadError> {
    match value {
        Checked::Valid(value) => Ok(value.clone()),
        Checked::Invalid => Err(ReadError::Invalid { record, field }),
    }
}

fn index<T>(index: &Index<T>) -> usize {
    index.value()
}

fn component_type(
    component_type: json::accessor::ComponentType,
    record: RecordIndex,
) -> Result<ComponentType, ReadError> {
    let code = component_type.as_gl_enum();
    ComponentType::from_gl(code).ok_or(ReadError::UnsupportedComponentType { record, code })
}

fn element_type(element_type: json::accessor::Type) -> ElementType {
    match element_type {
        json::accessor::Type::Scalar => ElementType::Scalar,
        json::accessor::Type::Vec2 => ElementType::Vec2,
        json::accessor::Type::Vec3 => ElementType::Vec3,
        json::accessor::Type::Vec4 => ElementType::Vec4,
        json::accessor::Type::Mat2 => ElementType::Mat2,
        json::accessor::Type::Mat3 => ElementType::Mat3,
        json::accessor::Type::Mat4 => ElementType::Mat4,
    }
}

fn bounds(value: &Option<Value>) -> Option<Vec<f64>> {
    value
        .as_ref()
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_f64).collect())
}

fn read_buffer_view(view: &json::buffer::View, record: RecordIndex) -> Result<RawBufferView, ReadError> {
    let target = view
        .target
        .as_ref()
        .map(|target| checked(target, record, "target"))
        .transpose()?
        .map(|target| match target {
            json::buffer::Target::ArrayBuffer => RawBufferTarget::ArrayBuffer,
            json::buffer::Target::ElementArrayBuffer => RawBufferTarget::ElementArrayBuffer,
        });
    Ok(RawBufferView {
        name: view.name.clone(),
        buffer: index(&view.buffer),
        byte_offset: view.byte_offset.as_ref().map(|offset| offset.0 as usize).unwrap_or(0),
        byte_length: view.byte_length.0 as usize,
        byte_stride: view.byte_stride.as_ref().map(|stride| stride.0),
        target,
    })
}

fn read_accessor(accessor: &json::Accessor, record: RecordIndex) -> Result<RawAccessor, ReadError> {
    let sparse = accessor
        .sparse
        .as_ref()
        .map(|sparse| -> Result<RawSparse, ReadError> {
            let index_type = checked(&sparse.indices.component_type, record, "sparse index type")?;
            Ok(RawSparse {
                count: sparse.count.0 as usize,
                indices: RawSparseIndices {
                    buffer_view: index(&sparse.indices.buffer_view),
                    byte_offset: sparse.indices.byte_offset.0 as usize,
                    component_type: component_type(index_type.0, record)?,
                },
                values: RawSparseValues {
                    buffer_view: index(&sparse.values.buffer_view),
                    byte_offset: sparse.values.byte_offset.0 as usize,
                },
            })
        })
        .transpose()?;
    let generic = checked(&accessor.component_type, record, "componentType")?;
    Ok(RawAccessor {
        name: accessor.name.clone(),
        buffer_view: accessor.buffer_view.as_ref().map(index),
        byte_offset: accessor.byte_offset.as_ref().map(|offset| offset.0 as usize).unwrap_or(0),
        count: accessor.count.0 as usize,
        component_type: component_type(generic.0, record)?,
        element_type: element_type(checked(&accessor.type_, record, "type")?),
        normalized: accessor.normalized,
        min: bounds(&accessor.min),
        max: bounds(&accessor.max),
        sparse,
    })
}

fn read_sampler(sampler: &json::texture::Sampler, record: RecordIndex) -> Result<RawSampler, ReadError> {
    Ok(RawSampler {
        name: sampler.name.clone(),
        mag_filter: sampler
            .mag_filter
            .as_ref()
            .map(|filter| checked(filter, record, "magFilter").map(|filter| filter.as_gl_enum()))
            .transpose()?,
        min_filter: sampler
            .min_filter
            .as_ref()
            .map(|filter| checked(filter, record, "minFilter").map(|filter| filter.as_gl_enum()))
            .transpose()?,
        wrap_s: Some(checked(&sampler.wrap_s, record, "wrapS")?.as_gl_enum()),
        wrap_t: Some(checked(&sampler.wrap_t, record, "wrapT")?.as_gl_enum()),
    })
}

fn texture_info(info: &Option<json::texture::Info>) -> Option<RawTextureInfo> {
    info.as_ref().map(|info| RawTextureInfo {
        index: index(&info.index),
        tex_coord: info.tex_coord as usize,
    })
}

fn read_material(material: &json::Material, record: RecordIndex) -> Result<RawMaterial, ReadError> {
    let pbr = &material.pbr_metallic_roughness;
    let alpha_mode = match checked(&material.alpha_mode, record, "alphaMode")? {
        json::material::AlphaMode::Opaque => RawAlphaMode::Opaque,
        json::material::AlphaMode::Mask => RawAlphaMode::Mask,
        json::material::AlphaMode::Blend => RawAlphaMode::Blend,
    };
    let normal = material.normal_texture.as_ref();
    let occlusion = material.occlusion_texture.as_ref();
    Ok(RawMaterial {
        name: material.name.clone(),
        base_color_factor: pbr.base_color_factor.0,
        base_color_texture: texture_info(&pbr.base_color_texture),
        metallic_factor: pbr.metallic_factor.0,
        roughness_factor: pbr.roughness_factor.0,
        metallic_roughness_texture: texture_info(&pbr.metallic_roughness_texture),
        normal_texture: normal.map(|normal| RawTextureInfo {
            index: index(&normal.index),
            tex_coord: normal.tex_coord as usize,
        }),
        normal_scale: normal.map(|normal| normal.scale).unwrap_or(1.0),
        occlusion_texture: occlusion.map(|occlusion| RawTextureInfo {
            index: index(&occlusion.index),
            tex_coord: occlusion.tex_coord as usize,
        }),
        occlusion_strength: occlusion
            .map(|occlusion| occlusion.strength.0)
            .unwrap_or(1.0),
        emissive_texture: texture_info(&material.emissive_texture),
        emissive_factor: material.emissive_factor.0,
        alpha_mode,
        alpha_cutoff: material.alpha_cutoff.as_ref().map(|cutoff| cutoff.0),
        double_sided: material.double_sided,
    })
}

fn read_camera(camera: &json::Camera, camera_index: usize) -> Result<RawCamera, ReadError> {
    let record = RecordIndex::new(RecordKind::Camera, camera_index);
    let projection = match checked(&camera.type_, record, "type")? {
        json::camera::Type::Perspective => {
            let perspective = camera
                .perspective
                .as_ref()
                .ok_or(ReadError::MissingProjection(camera_index))?;
            RawProjection::Perspective {
                aspect_ratio: perspective.aspect_ratio,
                yfov: perspective.yfov,
                znear: perspective.znear,
                zfar: perspective.zfar,
            }
        }
        json::camera::Type::Orthographic => {
            let orthographic = camera
                .orthographic
                .as_ref()
                .ok_or(ReadError::MissingProjection(camera_index))?;
            RawProjection::Orthographic {
                xmag: orthographic.xmag,
                ymag: orthographic.ymag,
                znear: orthographic.znear,
                zfar: orthographic.zfar,
            }
        }
    };
    Ok(RawCamera {
        name: camera.name.clone(),
        projection,
    })
}

fn read_attributes(
    attributes: &BTreeMap<Checked<json::mesh::Semantic>, Index<json::Accessor>>,
    record: RecordIndex,
) -> Result<RawAttributes, ReadError> {
    attributes
        .iter()
        .map(|(semantic, accessor)| {
            let semantic = checked(semantic, record, "attribute semantic")?;
            Ok((semantic.to_string(), index(accessor)))
        })
        .collect()
}

fn read_morph_target(target: &json::mesh::MorphTarget) -> RawAttributes {
    [
        ("POSITION", &target.positions),
        ("NORMAL", &target.normals),
        ("TANGENT", &target.tangents),
    ]
    .into_iter()
    .filter_map(|(semantic, accessor)| {
        accessor
            .as_ref()
            .map(|accessor| (semantic.to_string(), index(accessor)))
    })
    .collect()
}

fn read_mesh(mesh: &json::Mesh, record: RecordIndex) -> Result<RawMesh, ReadError> {
    let primitives = mesh
        .primitives
        .iter()
        .map(|primitive| -> Result<RawPrimitive, ReadError> {
            Ok(RawPrimitive {
                mode: Some(checked(&primitive.mode, record, "mode")?.as_gl_enum()),
                indices: primitive.indices.as_ref().map(index),
                attributes: read_attributes(&primitive.attributes, record)?,
                targets: primitive
                    .targets
                    .iter()
                    .flatten()
                    .map(read_morph_target)
                    .collect(),
                material: primitive.material.as_ref().map(index),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RawMesh {
        name: mesh.name.clone(),
        primitives,
        weights: mesh.weights.clone().unwrap_or_default(),
    })
}

fn read_node(node: &json::Node) -> RawNode {
    RawNode {
        name: node.name.clone(),
        camera: node.camera.as_ref().map(index),
        children: node.children.iter().flatten().map(index).collect(),
        mesh: node.mesh.as_ref().map(index),
        skin: node.skin.as_ref().map(index),
        matrix: node.matrix,
        translation: node.translation,
        rotation: node.rotation.as_ref().map(|rotation| rotation.0),
        scale: node.scale,
        weights: node.weights.clone().unwrap_or_default(),
    }
}

fn read_all<T, R>(
    items: &[T],
    kind: RecordKind,
    read: impl Fn(&T, RecordIndex) -> Result<R, ReadError>,
) -> Result<Vec<R>, ReadError> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| read(item, RecordIndex::new(kind, position)))
        .collect()
}

/// Copy the records of a glTF JSON tree into a [`RawDocument`].
///
/// Enumerations are checked here. References are not.
pub fn read_document(root: &json::Root) -> Result<RawDocument, ReadError> {
    let document = RawDocument {
        accessors: read_all(&root.accessors, RecordKind::Accessor, read_accessor)?,
        buffers: root
            .buffers
            .iter()
            .map(|buffer| RawBuffer {
                name: buffer.name.clone(),
                uri: buffer.uri.clone(),
                byte_length: buffer.byte_length.0 as usize,
            })
            .collect(),
        buffer_views: read_all(&root.buffer_views, RecordKind::BufferView, read_buffer_view)?,
        cameras: root
            .cameras
            .iter()
            .enumerate()
            .map(|(position, camera)| read_camera(camera, position))
            .collect::<Result<_, _>>()?,
        images: root
            .images
            .iter()
            .map(|image| RawImage {
                name: image.name.clone(),
                uri: image.uri.clone(),
                mime_type: image.mime_type.as_ref().map(|mime| mime.0.clone()),
                buffer_view: image.buffer_view.as_ref().map(index),
            })
            .collect(),
        materials: read_all(&root.materials, RecordKind::Material, read_material)?,
        meshes: read_all(&root.meshes, RecordKind::Mesh, read_mesh)?,
        nodes: root.nodes.iter().map(read_node).collect(),
        samplers: read_all(&root.samplers, RecordKind::Sampler, read_sampler)?,
        scenes: root
            .scenes
            .iter()
            .map(|scene| RawScene {
                name: scene.name.clone(),
                nodes: scene.nodes.iter().map(index).collect(),
            })
            .collect(),
        skins: root
            .skins
            .iter()
            .map(|skin| RawSkin {
                name: skin.name.clone(),
                joints: skin.joints.iter().map(index).collect(),
                inverse_bind_matrices: skin.inverse_bind_matrices.as_ref().map(index),
                skeleton: skin.skeleton.as_ref().map(index),
            })
            .collect(),
        textures: root
            .textures
            .iter()
            .map(|texture| RawTexture {
                name: texture.name.clone(),
                sampler: texture.sampler.as_ref().map(index),
                source: index(&texture.source),
            })
            .collect(),
        scene: root.scene.as_ref().map(index),
    };
    debug!(
        "Read glTF document: {} nodes, {} meshes, {} accessors",
        document.nodes.len(),
        document.meshes.len(),
        document.accessors.len()
    );
    Ok(document)
}

/// Load a `.gltf` or `.glb` file from a slice.
///
/// The binary chunk of a GLB file becomes the data of buffer 0. Every other
/// resource is read through `loader`.
pub fn load_gltf_from_slice<L: ResourceLoader>(
    data: &[u8],
    loader: &mut L,
    params: &LoadParams,
) -> Result<Model, GltfLoaderError> {
    let Gltf { document, blob } = Gltf::from_slice(data)?;
    let document = read_document(&document.into_json())?;
    Ok(Model::build(document, blob.map(Bytes::from), loader, params)?)
}

/// Load a GLTF file from archive.
///
/// The model file is looked up as [`LoadParams::model_filename`] with the
/// `gltf` extension, then with `glb`. The archive is also used to read
/// binary buffers and images.
pub fn load_gltf_from_archive<T, A: Archive<T>>(
    archive: &mut A,
    params: &LoadParams,
) -> Result<Model, GltfLoaderError> {
    for extension in ["gltf", "glb"] {
        let file_name = params.model_filename(extension);
        let data = archive
            .read(&file_name)
            .map_err(|error| GltfLoaderError::Archive(Box::new(error)))?;
        if let Some(data) = data {
            let mut loader = ArchiveLoader::<T, A>::new(archive, &file_name);
            return load_gltf_from_slice(&data, &mut loader, params);
        }
    }
    Err(GltfLoaderError::ModelNotFound(params.model_filename("gltf")))
}
