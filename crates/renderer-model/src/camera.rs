use std::sync::{Arc, Weak};

use glam::Mat4;

use crate::{
    node::{global_matrix, Node},
    raw::RawProjection,
};

#[derive(Debug, Clone, PartialEq)]
pub enum CameraProjection {
    Perspective {
        aspect_ratio: Option<f32>,
        /// Vertical field of view in radians.
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

impl From<&RawProjection> for CameraProjection {
    fn from(projection: &RawProjection) -> Self {
        match *projection {
            RawProjection::Perspective {
                aspect_ratio,
                yfov,
                znear,
                zfar,
            } => CameraProjection::Perspective {
                aspect_ratio,
                yfov,
                znear,
                zfar,
            },
            RawProjection::Orthographic {
                xmag,
                ymag,
                znear,
                zfar,
            } => CameraProjection::Orthographic {
                xmag,
                ymag,
                znear,
                zfar,
            },
        }
    }
}

impl CameraProjection {
    /// Projection matrix; a declared aspect ratio wins over `default_aspect`.
    pub fn matrix(&self, default_aspect: f32) -> Mat4 {
        match *self {
            CameraProjection::Perspective {
                aspect_ratio,
                yfov,
                znear,
                zfar,
            } => {
                let aspect = aspect_ratio.unwrap_or(default_aspect);
                if let Some(zfar) = zfar {
                    Mat4::perspective_rh(yfov, aspect, znear, zfar)
                } else {
                    Mat4::perspective_infinite_rh(yfov, aspect, znear)
                }
            }
            CameraProjection::Orthographic {
                xmag,
                ymag,
                znear,
                zfar,
            } => Mat4::orthographic_rh(-xmag, xmag, -ymag, ymag, znear, zfar),
        }
    }
}

/// A camera bound to the node that uses it.
///
/// Nodes sharing one camera definition each get their own instance.
#[derive(Debug, Clone)]
pub struct CameraInstance {
    camera_index: usize,
    name: Option<String>,
    instance_name: String,
    projection: CameraProjection,
    node: Weak<Node>,
    path: Vec<Weak<Node>>,
}

impl CameraInstance {
    /// Bind camera `camera_index` to the last node of `path`.
    pub(crate) fn new(
        camera_index: usize,
        name: Option<String>,
        projection: CameraProjection,
        path: &[Arc<Node>],
        node: &Arc<Node>,
    ) -> Self {
        let node_name = node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index()));
        let camera_name = name
            .clone()
            .unwrap_or_else(|| format!("camera{}", camera_index));
        Self {
            camera_index,
            name,
            instance_name: format!("{}.{}", node_name, camera_name),
            projection,
            node: Arc::downgrade(node),
            path: path.iter().map(Arc::downgrade).collect(),
        }
    }

    /// Index of the camera definition.
    pub fn camera_index(&self) -> usize {
        self.camera_index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `"{node}.{camera}"`, for diagnostics.
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn projection(&self) -> &CameraProjection {
        &self.projection
    }

    /// The bound node, `None` once the model is dropped.
    pub fn node(&self) -> Option<Arc<Node>> {
        self.node.upgrade()
    }

    /// Inverse of the bound node's current global transform.
    ///
    /// Recomputed on every call; `None` once the model is dropped.
    pub fn compute_view_matrix(&self) -> Option<Mat4> {
        let nodes = self
            .path
            .iter()
            .map(Weak::upgrade)
            .collect::<Option<Vec<_>>>()?;
        Some(global_matrix(nodes.iter().map(|node| node.as_ref())).inverse())
    }

    pub fn compute_projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        self.projection.matrix(aspect_ratio)
    }
}
