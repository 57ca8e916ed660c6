/// glTF 2.0 front-end with `gltf` crate.
#[cfg(feature = "gltf")]
pub mod gltf;

#[derive(Debug, Clone)]
pub struct LoadParams {
    /// Patch sparse accessors while building instead of on first read.
    pub eager_sparse: bool,
    pub model_name: String,
    pub model_extension: bool,
}

impl Default for LoadParams {
    fn default() -> Self {
        Self {
            eager_sparse: false,
            model_name: String::from("model"),
            model_extension: true,
        }
    }
}

impl LoadParams {
    /// File name of the model inside a bundle.
    pub fn model_filename(&self, extension: &str) -> String {
        if self.model_extension {
            format!("{}.{}", self.model_name, extension)
        } else {
            self.model_name.clone()
        }
    }
}
