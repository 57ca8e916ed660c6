use std::fmt::{self, Display, Formatter};

/// Kind of a top-level record in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    Accessor,
    Buffer,
    BufferView,
    Camera,
    Image,
    Material,
    Mesh,
    Node,
    Sampler,
    Scene,
    Skin,
    Texture,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Accessor => write!(f, "Accessor"),
            RecordKind::Buffer => write!(f, "Buffer"),
            RecordKind::BufferView => write!(f, "BufferView"),
            RecordKind::Camera => write!(f, "Camera"),
            RecordKind::Image => write!(f, "Image"),
            RecordKind::Material => write!(f, "Material"),
            RecordKind::Mesh => write!(f, "Mesh"),
            RecordKind::Node => write!(f, "Node"),
            RecordKind::Sampler => write!(f, "Sampler"),
            RecordKind::Scene => write!(f, "Scene"),
            RecordKind::Skin => write!(f, "Skin"),
            RecordKind::Texture => write!(f, "Texture"),
        }
    }
}

/// Position of a record inside the sequence of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordIndex {
    pub kind: RecordKind,
    pub index: usize,
}

impl RecordIndex {
    pub fn new(kind: RecordKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl Display for RecordIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.index)
    }
}
