//! Three-phase construction of a [`Model`] from a [`RawDocument`].
//!
//! 1. create: one pending slot per raw record, in record order;
//! 2. link: resolve byte data and every index reference, leaves first;
//! 3. instantiate: camera and material instances, one per usage.
//!
//! Any error drops everything built so far.

use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use log::{debug, trace, warn};
use parking_lot::RwLock;

use crate::{
    accessor::{accessor_span, element_size, Accessor},
    buffer::{Buffer, BufferSource},
    camera::CameraInstance,
    error::{check_range, checked_size, ModelError, ModelResult},
    index::RecordKind,
    loader::LoadParams,
    material::{
        MaterialAlphaMode, MaterialDefinition, MaterialInstance, NormalTextureInfo,
        OcclusionTextureInfo,
    },
    mesh::Mesh,
    model::Model,
    node::{first_path_to, reachable_nodes, Node, NodeTransform},
    primitive::{Primitive, PrimitiveAttributes, PrimitiveMode},
    raw::{RawAlphaMode, RawAttributes, RawDocument, RawMaterial, RawTextureInfo},
    resource::{is_data_uri, ResourceLoader},
    scene::Scene,
    skin::Skin,
    sparse::{SparseBase, SparseIndexType, SparseSubstitution},
    texture::{Image, ImageSource, Sampler, Texture, TextureInfo},
    view::BufferView,
};

use arena::{check_index, Arena, Slot};

mod arena;

pub(crate) struct ModelBuilder<'a, L> {
    document: Arc<RawDocument>,
    blob: Option<Bytes>,
    loader: &'a mut L,
    params: &'a LoadParams,
    buffers: Arena<Buffer>,
    buffer_views: Arena<BufferView>,
    accessors: Arena<Accessor>,
    samplers: Arena<Sampler>,
    images: Arena<Image>,
    textures: Arena<Texture>,
    materials: Arena<MaterialDefinition>,
    meshes: Arena<Mesh>,
    nodes: Arena<Node>,
    skins: Arena<Skin>,
    scenes: Arena<Scene>,
}

impl<'a, L: ResourceLoader> ModelBuilder<'a, L> {
    /// Create phase.
    pub fn new(
        document: Arc<RawDocument>,
        blob: Option<Bytes>,
        loader: &'a mut L,
        params: &'a LoadParams,
    ) -> Self {
        debug!(
            "Creating model: {} buffers, {} buffer views, {} accessors, {} meshes, {} nodes, {} scenes",
            document.buffers.len(),
            document.buffer_views.len(),
            document.accessors.len(),
            document.meshes.len(),
            document.nodes.len(),
            document.scenes.len()
        );
        Self {
            buffers: Arena::new(RecordKind::Buffer, document.buffers.len()),
            buffer_views: Arena::new(RecordKind::BufferView, document.buffer_views.len()),
            accessors: Arena::new(RecordKind::Accessor, document.accessors.len()),
            samplers: Arena::new(RecordKind::Sampler, document.samplers.len()),
            images: Arena::new(RecordKind::Image, document.images.len()),
            textures: Arena::new(RecordKind::Texture, document.textures.len()),
            materials: Arena::new(RecordKind::Material, document.materials.len()),
            meshes: Arena::new(RecordKind::Mesh, document.meshes.len()),
            nodes: Arena::new(RecordKind::Node, document.nodes.len()),
            skins: Arena::new(RecordKind::Skin, document.skins.len()),
            scenes: Arena::new(RecordKind::Scene, document.scenes.len()),
            document,
            blob,
            loader,
            params,
        }
    }

    pub fn build(mut self) -> ModelResult<Model> {
        self.link()?;
        self.instantiate()
    }

    /// Link phase. Bytes are loaded and views linked before anything reads
    /// through them.
    fn link(&mut self) -> ModelResult<()> {
        let document = self.document.clone();

        if self.blob.is_some() && document.buffers.is_empty() {
            warn!("Binary chunk present but no buffers are defined, ignoring it");
        }
        for index in 0..document.buffers.len() {
            let buffer = self.link_buffer(index)?;
            self.buffers.insert(index, Arc::new(buffer));
        }
        debug!("Linked {} buffers", self.buffers.len());

        for index in 0..document.buffer_views.len() {
            let view = self.link_buffer_view(index)?;
            self.buffer_views.insert(index, Arc::new(view));
        }
        for index in 0..document.accessors.len() {
            let accessor = self.link_accessor(index)?;
            self.accessors.insert(index, Arc::new(accessor));
        }
        debug!(
            "Linked {} buffer views and {} accessors",
            self.buffer_views.len(),
            self.accessors.len()
        );

        for (index, sampler) in document.samplers.iter().enumerate() {
            self.samplers.insert(index, Arc::new(Sampler::from(sampler)));
        }
        for index in 0..document.images.len() {
            let image = self.link_image(index)?;
            self.images.insert(index, Arc::new(image));
        }
        for index in 0..document.textures.len() {
            let texture = self.link_texture(index)?;
            self.textures.insert(index, Arc::new(texture));
        }
        for (index, material) in document.materials.iter().enumerate() {
            let material = self.link_material(material)?;
            self.materials.insert(index, Arc::new(material));
        }
        debug!(
            "Linked {} images, {} textures and {} materials",
            self.images.len(),
            self.textures.len(),
            self.materials.len()
        );

        for index in 0..document.meshes.len() {
            let mesh = self.link_mesh(index)?;
            self.meshes.insert(index, Arc::new(mesh));
        }
        for index in 0..document.nodes.len() {
            self.link_node(index)?;
        }
        for index in 0..document.skins.len() {
            let skin = self.link_skin(index)?;
            self.skins.insert(index, Arc::new(skin));
        }
        for (index, scene) in document.scenes.iter().enumerate() {
            let nodes = scene
                .nodes
                .iter()
                .map(|node| self.nodes.get(*node).cloned())
                .collect::<ModelResult<Vec<_>>>()?;
            let scene = Scene {
                index,
                name: scene.name.clone(),
                nodes,
            };
            self.scenes.insert(index, Arc::new(scene));
        }
        if let Some(scene) = document.scene {
            check_index(RecordKind::Scene, scene, document.scenes.len())?;
        }
        debug!(
            "Linked {} meshes, {} nodes, {} skins and {} scenes",
            self.meshes.len(),
            self.nodes.len(),
            self.skins.len(),
            self.scenes.len()
        );
        Ok(())
    }

    fn load_uri(&mut self, uri: &str, what: impl FnOnce() -> String) -> ModelResult<Bytes> {
        let resource_error = |error: L::Error| ModelError::Resource {
            uri: uri.to_string(),
            source: Box::new(error),
        };
        if is_data_uri(uri) {
            return self.loader.decode_data_uri(uri).map_err(resource_error);
        }
        self.loader
            .resolve(uri)
            .map_err(resource_error)?
            .ok_or_else(|| ModelError::missing(what(), format!("resource {} not found", uri)))
    }

    fn link_buffer(&mut self, index: usize) -> ModelResult<Buffer> {
        let document = self.document.clone();
        let raw = &document.buffers[index];
        let what = || format!("buffer #{}", index);

        let blob = if index == 0 { self.blob.clone() } else { None };
        let (source, data) = match (blob, &raw.uri) {
            (Some(blob), _) => (BufferSource::Embedded, blob),
            (None, Some(uri)) => {
                let data = self.load_uri(uri, what)?;
                let source = if is_data_uri(uri) {
                    BufferSource::DataUri
                } else {
                    BufferSource::Uri(uri.clone())
                };
                (source, data)
            }
            (None, None) => {
                return Err(ModelError::missing(
                    what(),
                    "no URI and no embedded binary chunk",
                ))
            }
        };

        if data.len() < raw.byte_length {
            return Err(ModelError::missing(
                what(),
                format!(
                    "{} bytes declared but only {} available",
                    raw.byte_length,
                    data.len()
                ),
            ));
        }
        // Binary chunks are padded to 4 bytes.
        if data.len() - raw.byte_length >= 4 {
            warn!(
                "Ignoring {} bytes past the declared length of buffer #{}",
                data.len() - raw.byte_length,
                index
            );
        }
        let data = data.slice(..raw.byte_length);
        Ok(Buffer::new(Some(index), raw.name.clone(), source, data))
    }

    fn link_buffer_view(&self, index: usize) -> ModelResult<BufferView> {
        let raw = &self.document.buffer_views[index];
        let buffer = self.buffers.get(raw.buffer)?.clone();
        check_range(
            || format!("buffer view #{}", index),
            raw.byte_offset,
            raw.byte_length,
            buffer.byte_length(),
        )?;
        Ok(BufferView::new(
            Some(index),
            raw.name.clone(),
            buffer,
            raw.byte_offset,
            raw.byte_length,
            raw.byte_stride,
            raw.target,
        ))
    }

    /// Zero-filled, tightly packed storage owned by one accessor.
    fn synthesize_view(index: usize, element_size: usize, count: usize) -> ModelResult<BufferView> {
        let byte_length = checked_size(|| format!("accessor #{}", index), count, element_size)?;
        let buffer = Buffer::zeroed(format!("buffer_for_accessor{}.bin", index), byte_length);
        Ok(BufferView::dense(Arc::new(buffer), element_size))
    }

    /// A document view with the effective stride of `element_size` elements,
    /// checked to hold `count` of them from `byte_offset` on.
    fn layout_view(
        &self,
        accessor: usize,
        view: usize,
        byte_offset: usize,
        element_size: usize,
        count: usize,
    ) -> ModelResult<(Arc<BufferView>, usize)> {
        let view = self.buffer_views.get(view)?.clone();
        let stride = view.byte_stride().unwrap_or(element_size);
        check_range(
            || format!("accessor #{}", accessor),
            byte_offset,
            accessor_span(count, stride, element_size).unwrap_or(usize::MAX),
            view.byte_length(),
        )?;
        Ok((view, stride))
    }

    fn link_accessor(&self, index: usize) -> ModelResult<Accessor> {
        let raw = &self.document.accessors[index];
        let element_size = element_size(raw.component_type, raw.element_type);

        let (view, byte_offset, byte_stride) = match (&raw.sparse, raw.buffer_view) {
            (None, Some(view)) => {
                let (view, stride) =
                    self.layout_view(index, view, raw.byte_offset, element_size, raw.count)?;
                (view, raw.byte_offset, stride)
            }
            (None, None) => {
                let view = Self::synthesize_view(index, element_size, raw.count)?;
                (Arc::new(view), 0, element_size)
            }
            (Some(sparse), base) => {
                let base = base
                    .map(|view| {
                        self.layout_view(index, view, raw.byte_offset, element_size, raw.count)
                            .map(|(view, byte_stride)| SparseBase {
                                view,
                                byte_offset: raw.byte_offset,
                                byte_stride,
                            })
                    })
                    .transpose()?;

                let component_type = sparse.indices.component_type;
                let index_type = SparseIndexType::from_component_type(component_type).ok_or(
                    ModelError::InvalidSparseIndexType {
                        accessor: index,
                        component_type,
                    },
                )?;

                let indices_view = self.buffer_views.get(sparse.indices.buffer_view)?;
                let indices_length = sparse.count.saturating_mul(index_type.size());
                check_range(
                    || format!("sparse indices of accessor #{}", index),
                    sparse.indices.byte_offset,
                    indices_length,
                    indices_view.byte_length(),
                )?;
                let indices = indices_view.data().slice(
                    sparse.indices.byte_offset..sparse.indices.byte_offset + indices_length,
                );

                let values_view = self.buffer_views.get(sparse.values.buffer_view)?;
                let values_length = sparse.count.saturating_mul(element_size);
                check_range(
                    || format!("sparse values of accessor #{}", index),
                    sparse.values.byte_offset,
                    values_length,
                    values_view.byte_length(),
                )?;
                let values = values_view
                    .data()
                    .slice(sparse.values.byte_offset..sparse.values.byte_offset + values_length);

                let substitution = SparseSubstitution::new(
                    index,
                    raw.count,
                    element_size,
                    index_type,
                    &indices,
                    values,
                    base,
                )?;
                let view = Self::synthesize_view(index, element_size, raw.count)?
                    .with_substitution(substitution);
                if self.params.eager_sparse {
                    trace!("Patching sparse accessor #{} eagerly", index);
                    view.data();
                }
                (Arc::new(view), 0, element_size)
            }
        };

        Ok(Accessor {
            index,
            name: raw.name.clone(),
            component_type: raw.component_type,
            element_type: raw.element_type,
            count: raw.count,
            byte_offset,
            byte_stride,
            normalized: raw.normalized,
            min: raw.min.clone(),
            max: raw.max.clone(),
            view,
        })
    }

    fn link_image(&mut self, index: usize) -> ModelResult<Image> {
        let document = self.document.clone();
        let raw = &document.images[index];
        let what = || format!("image #{}", index);
        let source = match (raw.buffer_view, &raw.uri) {
            (Some(view), _) => ImageSource::View(self.buffer_views.get(view)?.clone()),
            (None, Some(uri)) => ImageSource::Inline(self.load_uri(uri, what)?),
            (None, None) => return Err(ModelError::missing(what(), "no URI and no buffer view")),
        };
        Ok(Image {
            index,
            name: raw.name.clone(),
            uri: raw.uri.clone(),
            mime_type: raw.mime_type.clone(),
            source,
        })
    }

    fn link_texture(&self, index: usize) -> ModelResult<Texture> {
        let raw = &self.document.textures[index];
        let sampler = match raw.sampler {
            Some(sampler) => Sampler::clone(self.samplers.get(sampler)?),
            None => Sampler::default(),
        };
        Ok(Texture {
            index,
            name: raw.name.clone(),
            sampler,
            image: self.images.get(raw.source)?.clone(),
        })
    }

    fn texture_info(&self, info: Option<&RawTextureInfo>) -> ModelResult<Option<TextureInfo>> {
        info.map(|info| {
            self.textures.get(info.index).map(|texture| TextureInfo {
                texture: texture.clone(),
                tex_coord: info.tex_coord,
            })
        })
        .transpose()
    }

    fn link_material(&self, raw: &RawMaterial) -> ModelResult<MaterialDefinition> {
        let alpha_mode = match raw.alpha_mode {
            RawAlphaMode::Opaque => MaterialAlphaMode::Opaque,
            RawAlphaMode::Mask => MaterialAlphaMode::Mask(raw.alpha_cutoff.unwrap_or(0.5)),
            RawAlphaMode::Blend => MaterialAlphaMode::Blend,
        };
        let normal_texture = self
            .texture_info(raw.normal_texture.as_ref())?
            .map(|texture| NormalTextureInfo {
                texture,
                scale: raw.normal_scale,
            });
        let occlusion_texture = self
            .texture_info(raw.occlusion_texture.as_ref())?
            .map(|texture| OcclusionTextureInfo {
                texture,
                strength: raw.occlusion_strength,
            });
        Ok(MaterialDefinition {
            name: raw.name.clone(),
            base_color_factor: raw.base_color_factor,
            base_color_texture: self.texture_info(raw.base_color_texture.as_ref())?,
            metallic_factor: raw.metallic_factor,
            roughness_factor: raw.roughness_factor,
            metallic_roughness_texture: self
                .texture_info(raw.metallic_roughness_texture.as_ref())?,
            normal_texture,
            occlusion_texture,
            emissive_texture: self.texture_info(raw.emissive_texture.as_ref())?,
            emissive_factor: raw.emissive_factor,
            alpha_mode,
            double_sided: raw.double_sided,
        })
    }

    fn link_attributes(&self, attributes: &RawAttributes) -> ModelResult<PrimitiveAttributes> {
        attributes
            .iter()
            .map(|(semantic, accessor)| {
                let accessor = self.accessors.get(*accessor)?;
                Ok((semantic.clone(), accessor.clone()))
            })
            .collect()
    }

    fn link_mesh(&self, index: usize) -> ModelResult<Mesh> {
        let raw = &self.document.meshes[index];
        let primitives = raw
            .primitives
            .iter()
            .map(|primitive| -> ModelResult<Arc<Primitive>> {
                let mode = match primitive.mode {
                    None => PrimitiveMode::TriangleList,
                    Some(code) => PrimitiveMode::from_gl(code).unwrap_or_else(|| {
                        warn!(
                            "Unknown primitive mode {} in mesh #{}, drawing triangles",
                            code, index
                        );
                        PrimitiveMode::TriangleList
                    }),
                };
                let indices = primitive
                    .indices
                    .map(|indices| self.accessors.get(indices).cloned())
                    .transpose()?;
                let targets = primitive
                    .targets
                    .iter()
                    .map(|target| self.link_attributes(target))
                    .collect::<ModelResult<Vec<_>>>()?;
                let material_index = primitive
                    .material
                    .map(|material| check_index(RecordKind::Material, material, self.materials.len()))
                    .transpose()?;
                Ok(Arc::new(Primitive {
                    mode,
                    indices,
                    attributes: self.link_attributes(&primitive.attributes)?,
                    targets,
                    material_index,
                    material: OnceLock::new(),
                }))
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Mesh {
            index,
            name: raw.name.clone(),
            primitives,
            weights: raw.weights.clone(),
        })
    }

    /// Link node `index` after all of its descendants.
    ///
    /// Walks the children with an explicit stack. A child met again while it
    /// is still on the stack closes a cycle.
    fn link_node(&mut self, index: usize) -> ModelResult<()> {
        if !matches!(self.nodes.slot(index)?, Slot::Pending) {
            return Ok(());
        }
        self.nodes.begin(index);

        let document = self.document.clone();
        // Node and position of the next child to visit.
        let mut stack = vec![(index, 0)];
        while let Some((current, next)) = stack.last_mut() {
            let current = *current;
            let Some(&child) = document.nodes[current].children.get(*next) else {
                stack.pop();
                let node = self.create_node(current)?;
                self.nodes.insert(current, Arc::new(node));
                continue;
            };
            *next += 1;
            let pending = match self.nodes.slot(child)? {
                Slot::Ready(_) => false,
                Slot::Linking => return Err(ModelError::CyclicNodeGraph { node: child }),
                Slot::Pending => true,
            };
            if pending {
                self.nodes.begin(child);
                stack.push((child, 0));
            }
        }
        Ok(())
    }

    /// Node `index`, once all of its children are linked.
    fn create_node(&self, index: usize) -> ModelResult<Node> {
        let document = &self.document;
        let raw = &document.nodes[index];
        let children = raw
            .children
            .iter()
            .map(|child| self.nodes.get(*child).cloned())
            .collect::<ModelResult<Vec<_>>>()?;
        let mesh = raw
            .mesh
            .map(|mesh| self.meshes.get(mesh).cloned())
            .transpose()?;
        let skin = raw
            .skin
            .map(|skin| check_index(RecordKind::Skin, skin, document.skins.len()))
            .transpose()?;
        let camera = raw
            .camera
            .map(|camera| check_index(RecordKind::Camera, camera, document.cameras.len()))
            .transpose()?;

        Ok(Node {
            index,
            name: raw.name.clone(),
            transform: RwLock::new(NodeTransform::from_parts(
                raw.matrix,
                raw.translation,
                raw.rotation,
                raw.scale,
            )),
            children,
            mesh,
            skin,
            camera,
            weights: raw.weights.clone(),
        })
    }

    fn link_skin(&self, index: usize) -> ModelResult<Skin> {
        let raw = &self.document.skins[index];
        let joints = raw
            .joints
            .iter()
            .map(|joint| self.nodes.get(*joint).cloned())
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Skin {
            index,
            name: raw.name.clone(),
            joints,
            inverse_bind_matrices: raw
                .inverse_bind_matrices
                .map(|accessor| self.accessors.get(accessor).cloned())
                .transpose()?,
            skeleton: raw
                .skeleton
                .map(|node| self.nodes.get(node).cloned())
                .transpose()?,
        })
    }

    /// Instantiate phase.
    fn instantiate(self) -> ModelResult<Model> {
        let document = self.document;
        let buffers = self.buffers.into_vec()?;
        let buffer_views = self.buffer_views.into_vec()?;
        let accessors = self.accessors.into_vec()?;
        let samplers = self.samplers.into_vec()?;
        let images = self.images.into_vec()?;
        let textures = self.textures.into_vec()?;
        let material_definitions = self.materials.into_vec()?;
        let meshes = self.meshes.into_vec()?;
        let nodes = self.nodes.into_vec()?;
        let skins = self.skins.into_vec()?;
        let scenes = self.scenes.into_vec()?;

        let cameras = nodes
            .iter()
            .filter_map(|node| node.camera.map(|camera| (node, camera)))
            .map(|(node, camera_index)| {
                let camera = &document.cameras[camera_index];
                let roots = scenes.iter().flat_map(|scene| scene.nodes.iter());
                let path = first_path_to(roots, node.index)
                    .map(|path| path.nodes().to_vec())
                    .unwrap_or_else(|| vec![node.clone()]);
                CameraInstance::new(
                    camera_index,
                    camera.name.clone(),
                    (&camera.projection).into(),
                    &path,
                    node,
                )
            })
            .collect::<Vec<_>>();
        debug!("Instantiated {} cameras", cameras.len());

        let reachable = reachable_nodes(
            scenes.iter().flat_map(|scene| scene.nodes.iter()),
            nodes.len(),
        );
        let mut materials = Vec::new();
        for mesh in &meshes {
            let Some(user) = nodes.iter().find(|node| {
                reachable[node.index]
                    && node.mesh.as_ref().is_some_and(|used| Arc::ptr_eq(used, mesh))
            }) else {
                continue;
            };
            let joint_count = user
                .skin
                .map(|skin| skins[skin].joint_count())
                .unwrap_or(0);
            for primitive in &mesh.primitives {
                let definition = match primitive.material_index {
                    Some(index) => MaterialDefinition::clone(&material_definitions[index]),
                    None => MaterialDefinition::default(),
                };
                let instance = primitive
                    .material
                    .get_or_init(|| {
                        Arc::new(MaterialInstance::new(
                            primitive.material_index,
                            definition,
                            joint_count,
                        ))
                    })
                    .clone();
                materials.push(instance);
            }
        }
        debug!("Instantiated {} materials", materials.len());

        Ok(Model {
            document,
            buffers,
            buffer_views,
            accessors,
            samplers,
            images,
            textures,
            material_definitions,
            materials,
            meshes,
            nodes,
            skins,
            scenes,
            cameras,
        })
    }
}
