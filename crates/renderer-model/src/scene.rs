use std::sync::Arc;

use super::node::Node;

#[derive(Debug)]
pub struct Scene {
    pub(crate) index: usize,
    pub(crate) name: Option<String>,
    pub(crate) nodes: Vec<Arc<Node>>,
}

impl Scene {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Root nodes.
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }
}
