use std::sync::Arc;

use crate::{accessor::Accessor, node::Node};

#[derive(Debug)]
pub struct Skin {
    pub(crate) index: usize,
    pub(crate) name: Option<String>,
    pub(crate) joints: Vec<Arc<Node>>,
    pub(crate) inverse_bind_matrices: Option<Arc<Accessor>>,
    pub(crate) skeleton: Option<Arc<Node>>,
}

impl Skin {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn joints(&self) -> &[Arc<Node>] {
        &self.joints
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn inverse_bind_matrices(&self) -> Option<&Arc<Accessor>> {
        self.inverse_bind_matrices.as_ref()
    }

    pub fn skeleton(&self) -> Option<&Arc<Node>> {
        self.skeleton.as_ref()
    }
}
