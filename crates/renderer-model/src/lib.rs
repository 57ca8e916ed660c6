//! In-memory asset graph for glTF-like scene documents.
//!
//! A document arrives as flat, index-addressed records ([`raw`]). Building a
//! [`Model`] resolves every reference into shared objects and exposes the
//! buffer bytes as zero-copy windows. It also instantiates one camera per
//! node and one material per primitive a scene can reach. The glTF front-end
//! in [`loader::gltf`] reads `.gltf`/`.glb` files, and the [`archive`] and
//! [`resource`] modules isolate resource loading from the file system so a
//! model and its resources can be packed into one bundle.

pub mod accessor;
pub mod archive;
pub mod buffer;
mod builder;
pub mod camera;
pub mod error;
pub mod index;
/// Model loaders and load parameters
pub mod loader;
pub mod material;
pub mod mesh;
pub mod model;
pub mod node;
pub mod primitive;
pub mod raw;
pub mod resource;
pub mod scene;
pub mod skin;
pub mod sparse;
pub mod texture;
pub mod view;

pub use error::{ModelError, ModelResult};
pub use loader::LoadParams;
pub use model::Model;
pub use raw::RawDocument;
