use std::sync::Arc;

use bytes::Bytes;

use crate::{raw::RawSampler, view::BufferView};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureMagFilter {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureMinFilter {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureMipmapFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureWrappingMode {
    ClampToEdge,
    MirroredRepeat,
    #[default]
    Repeat,
}

impl TextureWrappingMode {
    fn from_gl(mode: u32) -> Option<Self> {
        match mode {
            33071 => Some(TextureWrappingMode::ClampToEdge),
            33648 => Some(TextureWrappingMode::MirroredRepeat),
            10497 => Some(TextureWrappingMode::Repeat),
            _ => None,
        }
    }
}

/// Filtering and wrapping of a texture.
///
/// The default applies to textures without a sampler: linear filtering,
/// no mipmaps and repeat wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sampler {
    pub mag_filter: TextureMagFilter,
    pub min_filter: TextureMinFilter,
    pub mipmap_filter: Option<TextureMipmapFilter>,
    pub wrap_x: TextureWrappingMode,
    pub wrap_y: TextureWrappingMode,
}

impl From<&RawSampler> for Sampler {
    fn from(sampler: &RawSampler) -> Self {
        let mag_filter = match sampler.mag_filter {
            Some(9728) => TextureMagFilter::Nearest,
            _ => TextureMagFilter::Linear,
        };
        let (min_filter, mipmap_filter) = match sampler.min_filter {
            Some(9728) => (TextureMinFilter::Nearest, None),
            Some(9984) => (TextureMinFilter::Nearest, Some(TextureMipmapFilter::Nearest)),
            Some(9985) => (TextureMinFilter::Linear, Some(TextureMipmapFilter::Nearest)),
            Some(9986) => (TextureMinFilter::Nearest, Some(TextureMipmapFilter::Linear)),
            Some(9987) => (TextureMinFilter::Linear, Some(TextureMipmapFilter::Linear)),
            _ => (TextureMinFilter::Linear, None),
        };
        Self {
            mag_filter,
            min_filter,
            mipmap_filter,
            wrap_x: sampler
                .wrap_s
                .and_then(TextureWrappingMode::from_gl)
                .unwrap_or_default(),
            wrap_y: sampler
                .wrap_t
                .and_then(TextureWrappingMode::from_gl)
                .unwrap_or_default(),
        }
    }
}

/// Where the encoded bytes of an [`Image`] live.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Loaded from a URI or a data URI.
    Inline(Bytes),
    /// Stored in a buffer view.
    View(Arc<BufferView>),
}

#[derive(Debug)]
pub struct Image {
    pub(crate) index: usize,
    pub(crate) name: Option<String>,
    pub(crate) uri: Option<String>,
    pub(crate) mime_type: Option<String>,
    pub(crate) source: ImageSource,
}

impl Image {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Encoded image bytes, zero-copy.
    pub fn data(&self) -> Bytes {
        match &self.source {
            ImageSource::Inline(data) => data.clone(),
            ImageSource::View(view) => view.data(),
        }
    }

    /// Decode the image, using the MIME type when known and sniffing the
    /// format otherwise.
    #[cfg(feature = "image")]
    pub fn decode(&self) -> Result<image::DynamicImage, image::ImageError> {
        use std::io::Cursor;

        use image::{ImageFormat, ImageReader};

        let data = self.data();
        let mut reader = ImageReader::new(Cursor::new(&data[..]));
        match self.mime_type.as_deref().and_then(ImageFormat::from_mime_type) {
            Some(format) => reader.set_format(format),
            None => reader = reader.with_guessed_format()?,
        }
        reader.decode()
    }
}

#[derive(Debug)]
pub struct Texture {
    pub(crate) index: usize,
    pub(crate) name: Option<String>,
    pub(crate) sampler: Sampler,
    pub(crate) image: Arc<Image>,
}

impl Texture {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn image(&self) -> &Arc<Image> {
        &self.image
    }
}

#[derive(Debug, Clone)]
pub struct TextureInfo {
    pub texture: Arc<Texture>,
    pub tex_coord: usize,
}

impl PartialEq for TextureInfo {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.texture, &other.texture) && self.tex_coord == other.tex_coord
    }
}
