use std::sync::{Arc, OnceLock};

use crate::{accessor::Accessor, material::MaterialInstance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points,
    LineList,
    LineLoop,
    LineStrip,
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub fn from_gl(mode: u32) -> Option<Self> {
        match mode {
            0 => Some(PrimitiveMode::Points),
            1 => Some(PrimitiveMode::LineList),
            2 => Some(PrimitiveMode::LineLoop),
            3 => Some(PrimitiveMode::LineStrip),
            4 => Some(PrimitiveMode::TriangleList),
            5 => Some(PrimitiveMode::TriangleStrip),
            6 => Some(PrimitiveMode::TriangleFan),
            _ => None,
        }
    }
}

/// Attribute semantic to accessor, in declaration order.
pub type PrimitiveAttributes = Vec<(String, Arc<Accessor>)>;

#[derive(Debug)]
pub struct Primitive {
    pub(crate) mode: PrimitiveMode,
    pub(crate) indices: Option<Arc<Accessor>>,
    pub(crate) attributes: PrimitiveAttributes,
    pub(crate) targets: Vec<PrimitiveAttributes>,
    pub(crate) material_index: Option<usize>,
    pub(crate) material: OnceLock<Arc<MaterialInstance>>,
}

impl Primitive {
    pub fn mode(&self) -> PrimitiveMode {
        self.mode
    }

    pub fn indices(&self) -> Option<&Arc<Accessor>> {
        self.indices.as_ref()
    }

    pub fn attributes(&self) -> &[(String, Arc<Accessor>)] {
        &self.attributes
    }

    pub fn attribute(&self, semantic: &str) -> Option<&Arc<Accessor>> {
        self.attributes
            .iter()
            .find(|(name, _)| name == semantic)
            .map(|(_, accessor)| accessor)
    }

    /// Morph targets, each mapping attribute semantics to displacements.
    pub fn targets(&self) -> &[PrimitiveAttributes] {
        &self.targets
    }

    /// Index of the material definition, `None` for the default material.
    pub fn material_index(&self) -> Option<usize> {
        self.material_index
    }

    /// The material instance created for this primitive, `None` when no
    /// scene reaches a node drawing its mesh.
    pub fn material(&self) -> Option<&Arc<MaterialInstance>> {
        self.material.get()
    }
}
