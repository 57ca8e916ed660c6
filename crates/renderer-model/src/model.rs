use std::sync::Arc;

use bytes::Bytes;

use crate::{
    accessor::Accessor,
    buffer::Buffer,
    builder::ModelBuilder,
    camera::CameraInstance,
    error::ModelResult,
    loader::LoadParams,
    material::{MaterialDefinition, MaterialInstance},
    mesh::Mesh,
    node::{paths_to, Node, NodePath},
    raw::RawDocument,
    resource::ResourceLoader,
    scene::Scene,
    skin::Skin,
    texture::{Image, Sampler, Texture},
    view::BufferView,
};

/// A fully linked asset graph.
///
/// Every sequence is index-aligned with the records of the same kind in the
/// document, except for [`Model::cameras`] and [`Model::materials`] which hold
/// one instance per usage. The model is read-only apart from node
/// transforms.
#[derive(Debug)]
pub struct Model {
    pub(crate) document: Arc<RawDocument>,
    pub(crate) buffers: Vec<Arc<Buffer>>,
    pub(crate) buffer_views: Vec<Arc<BufferView>>,
    pub(crate) accessors: Vec<Arc<Accessor>>,
    pub(crate) samplers: Vec<Arc<Sampler>>,
    pub(crate) images: Vec<Arc<Image>>,
    pub(crate) textures: Vec<Arc<Texture>>,
    pub(crate) material_definitions: Vec<Arc<MaterialDefinition>>,
    pub(crate) materials: Vec<Arc<MaterialInstance>>,
    pub(crate) meshes: Vec<Arc<Mesh>>,
    pub(crate) nodes: Vec<Arc<Node>>,
    pub(crate) skins: Vec<Arc<Skin>>,
    pub(crate) scenes: Vec<Arc<Scene>>,
    pub(crate) cameras: Vec<CameraInstance>,
}

impl Model {
    /// Build the graph of `document`.
    ///
    /// `blob` is the binary chunk shipped with the document, used as the
    /// bytes of buffer 0. All other buffer and image bytes come from
    /// `loader`.
    pub fn build<L: ResourceLoader>(
        document: RawDocument,
        blob: Option<Bytes>,
        loader: &mut L,
        params: &LoadParams,
    ) -> ModelResult<Self> {
        ModelBuilder::new(Arc::new(document), blob, loader, params).build()
    }

    /// The document the model was built from.
    pub fn document(&self) -> &Arc<RawDocument> {
        &self.document
    }

    pub fn buffers(&self) -> &[Arc<Buffer>] {
        &self.buffers
    }

    pub fn buffer_views(&self) -> &[Arc<BufferView>] {
        &self.buffer_views
    }

    pub fn accessors(&self) -> &[Arc<Accessor>] {
        &self.accessors
    }

    pub fn samplers(&self) -> &[Arc<Sampler>] {
        &self.samplers
    }

    pub fn images(&self) -> &[Arc<Image>] {
        &self.images
    }

    pub fn textures(&self) -> &[Arc<Texture>] {
        &self.textures
    }

    pub fn material_definitions(&self) -> &[Arc<MaterialDefinition>] {
        &self.material_definitions
    }

    /// Material instances, one per primitive of every mesh used by a node
    /// reachable from a scene, in mesh and primitive order.
    pub fn materials(&self) -> &[Arc<MaterialInstance>] {
        &self.materials
    }

    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.meshes
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn skins(&self) -> &[Arc<Skin>] {
        &self.skins
    }

    pub fn scenes(&self) -> &[Arc<Scene>] {
        &self.scenes
    }

    /// Camera instances, one per node referencing a camera, in node order.
    pub fn cameras(&self) -> &[CameraInstance] {
        &self.cameras
    }

    /// The scene to show when loading the model.
    pub fn default_scene(&self) -> Option<&Arc<Scene>> {
        self.document
            .scene
            .and_then(|index| self.scenes.get(index))
            .or_else(|| self.scenes.first())
    }

    /// Every path from a root of any scene to node `index`, scenes in order.
    pub fn paths_to(&self, index: usize) -> Vec<NodePath> {
        paths_to(
            self.scenes.iter().flat_map(|scene| scene.nodes.iter()),
            index,
        )
    }
}
