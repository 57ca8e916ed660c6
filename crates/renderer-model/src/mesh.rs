use std::sync::Arc;

use super::primitive::Primitive;

#[derive(Debug)]
pub struct Mesh {
    pub(crate) index: usize,
    pub(crate) name: Option<String>,
    pub(crate) primitives: Vec<Arc<Primitive>>,
    pub(crate) weights: Vec<f32>,
}

impl Mesh {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn primitives(&self) -> &[Arc<Primitive>] {
        &self.primitives
    }

    /// Default morph target weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}
