use std::{collections::HashSet, mem, sync::Arc};

use glam::{Mat4, Quat, Vec3};
use parking_lot::RwLock;

use crate::mesh::Mesh;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixNodeTransform(pub Mat4);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecomposedTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for DecomposedTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeTransform {
    Matrix(MatrixNodeTransform),
    Decomposed(DecomposedTransform),
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::Decomposed(DecomposedTransform::default())
    }
}

impl NodeTransform {
    /// Build from the optional parts of a node record.
    ///
    /// A matrix wins over TRS parts; missing TRS parts are identity.
    pub fn from_parts(
        matrix: Option<[f32; 16]>,
        translation: Option<[f32; 3]>,
        rotation: Option<[f32; 4]>,
        scale: Option<[f32; 3]>,
    ) -> Self {
        if let Some(matrix) = matrix {
            return NodeTransform::Matrix(MatrixNodeTransform(Mat4::from_cols_array(&matrix)));
        }
        let identity = DecomposedTransform::default();
        NodeTransform::Decomposed(DecomposedTransform {
            translation: translation.map(Vec3::from_array).unwrap_or(identity.translation),
            rotation: rotation.map(Quat::from_array).unwrap_or(identity.rotation),
            scale: scale.map(Vec3::from_array).unwrap_or(identity.scale),
        })
    }

    pub fn matrix(&self) -> Mat4 {
        (*self).into()
    }
}

impl From<DecomposedTransform> for Mat4 {
    fn from(value: DecomposedTransform) -> Self {
        Mat4::from_scale_rotation_translation(value.scale, value.rotation, value.translation)
    }
}

impl From<NodeTransform> for Mat4 {
    fn from(value: NodeTransform) -> Self {
        match value {
            NodeTransform::Matrix(matrix) => matrix.0,
            NodeTransform::Decomposed(decomposed) => decomposed.into(),
        }
    }
}

impl From<NodeTransform> for DecomposedTransform {
    fn from(value: NodeTransform) -> Self {
        match value {
            NodeTransform::Matrix(matrix) => {
                let (scale, rotation, translation) = matrix.0.to_scale_rotation_translation();
                DecomposedTransform {
                    translation,
                    rotation,
                    scale,
                }
            }
            NodeTransform::Decomposed(decomposed) => decomposed,
        }
    }
}

/// A node of the scene graph.
///
/// Children are shared: a node listed under several parents is one object
/// reachable along several [`NodePath`]s.
#[derive(Debug)]
pub struct Node {
    pub(crate) index: usize,
    pub(crate) name: Option<String>,
    pub(crate) transform: RwLock<NodeTransform>,
    pub(crate) children: Vec<Arc<Node>>,
    pub(crate) mesh: Option<Arc<Mesh>>,
    pub(crate) skin: Option<usize>,
    pub(crate) camera: Option<usize>,
    pub(crate) weights: Vec<f32>,
}

impl Node {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn transform(&self) -> NodeTransform {
        *self.transform.read()
    }

    /// Replace the local transform, e.g. from an animation driver.
    pub fn set_transform(&self, transform: NodeTransform) {
        *self.transform.write() = transform;
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.transform.read().matrix()
    }

    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    /// Index of the skin, see [`Model::skins`](crate::model::Model::skins).
    pub fn skin(&self) -> Option<usize> {
        self.skin
    }

    /// Index of the camera definition this node instantiates.
    pub fn camera(&self) -> Option<usize> {
        self.camera
    }

    /// Morph target weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

// Deep child chains are released without recursing once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Ok(mut child) = Arc::try_unwrap(child) {
                pending.append(&mut child.children);
            }
        }
    }
}

/// Chain of nodes from a root down to the last node.
#[derive(Debug, Clone)]
pub struct NodePath(Vec<Arc<Node>>);

impl NodePath {
    pub fn new(nodes: Vec<Arc<Node>>) -> Self {
        Self(nodes)
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.0
    }

    pub fn last(&self) -> Option<&Arc<Node>> {
        self.0.last()
    }

    /// Compose the local transforms along this path.
    ///
    /// Computed from the current transforms on every call.
    pub fn global_matrix(&self) -> Mat4 {
        global_matrix(self.0.iter().map(|node| node.as_ref()))
    }
}

pub(crate) fn global_matrix<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Mat4 {
    nodes
        .into_iter()
        .fold(Mat4::IDENTITY, |parent, node| parent * node.local_matrix())
}

struct Frame<'a> {
    node: &'a Arc<Node>,
    next: usize,
    reaches: bool,
}

/// Depth-first search for paths from `root` down to node `target`.
///
/// Nodes in `dead` are skipped, and every node found not to lead to `target`
/// is added to it. Returns false once `visit` asks to stop.
fn walk_paths(
    root: &Arc<Node>,
    target: usize,
    dead: &mut HashSet<usize>,
    visit: &mut impl FnMut(NodePath) -> bool,
) -> bool {
    if dead.contains(&root.index) {
        return true;
    }
    if root.index == target {
        return visit(NodePath(vec![root.clone()]));
    }
    let mut stack = vec![Frame {
        node: root,
        next: 0,
        reaches: false,
    }];
    while let Some(frame) = stack.last_mut() {
        let node = frame.node;
        let Some(child) = node.children.get(frame.next) else {
            let reaches = frame.reaches;
            stack.pop();
            if !reaches {
                dead.insert(node.index);
            } else if let Some(parent) = stack.last_mut() {
                parent.reaches = true;
            }
            continue;
        };
        frame.next += 1;
        if dead.contains(&child.index) {
            continue;
        }
        if child.index == target {
            // The graph is acyclic, so nothing below the target leads back to it.
            frame.reaches = true;
            let mut path = stack
                .iter()
                .map(|frame| frame.node.clone())
                .collect::<Vec<_>>();
            path.push(child.clone());
            if !visit(NodePath(path)) {
                return false;
            }
            continue;
        }
        stack.push(Frame {
            node: child,
            next: 0,
            reaches: false,
        });
    }
    true
}

/// Every path from `roots` to node `target`, in depth-first order.
pub(crate) fn paths_to<'a>(
    roots: impl IntoIterator<Item = &'a Arc<Node>>,
    target: usize,
) -> Vec<NodePath> {
    let mut paths = Vec::new();
    let mut dead = HashSet::new();
    for root in roots {
        walk_paths(root, target, &mut dead, &mut |path| {
            paths.push(path);
            true
        });
    }
    paths
}

/// The first path [`paths_to`] would find.
///
/// Visits every node at most once.
pub(crate) fn first_path_to<'a>(
    roots: impl IntoIterator<Item = &'a Arc<Node>>,
    target: usize,
) -> Option<NodePath> {
    let mut found = None;
    let mut dead = HashSet::new();
    for root in roots {
        walk_paths(root, target, &mut dead, &mut |path| {
            found = Some(path);
            false
        });
        if found.is_some() {
            break;
        }
    }
    found
}

/// Flags, by node index, the nodes reachable from `roots`.
pub(crate) fn reachable_nodes<'a>(
    roots: impl IntoIterator<Item = &'a Arc<Node>>,
    node_count: usize,
) -> Vec<bool> {
    let mut reachable = vec![false; node_count];
    let mut pending = roots.into_iter().collect::<Vec<_>>();
    while let Some(node) = pending.pop() {
        if reachable[node.index] {
            continue;
        }
        reachable[node.index] = true;
        pending.extend(node.children.iter());
    }
    reachable
}
